//! Typed record extraction from cleaned tables.
//!
//! All required columns are checked before any value is read, so a table
//! that lacks a column fails at startup with [`AnalysisError::ColumnNotFound`]
//! instead of halfway through the analysis.

use crate::error::{AnalysisError, Result};
use crate::types::{HealthRecord, InterventionPhase, WaterQualityRecord, columns};
use polars::prelude::*;

pub const WATER_QUALITY_DATASET: &str = "water quality";
pub const HEALTH_DATASET: &str = "health";
pub const SERIES_DATASET: &str = "time series";

const WATER_QUALITY_COLUMNS: [&str; 2] = [columns::VILLAGE, columns::ACCESS_TO_CLEAN_WATER];

const HEALTH_COLUMNS: [&str; 6] = [
    columns::VILLAGE,
    columns::INTERVENTION,
    columns::TIME_PERIOD,
    columns::WATERBORNE_DISEASE_CASES,
    columns::ECONOMIC_OUTPUT,
    columns::SCHOOL_ATTENDANCE,
];

const SERIES_COLUMNS: [&str; 2] = [columns::TIME, columns::ACCESS_TO_CLEAN_WATER];

/// Fail with the first required column that `df` does not have.
pub fn require_columns(df: &DataFrame, dataset: &str, required: &[&str]) -> Result<()> {
    for column in required {
        if df.column(column).is_err() {
            return Err(AnalysisError::column_not_found(dataset, *column));
        }
    }
    Ok(())
}

impl WaterQualityRecord {
    /// Build typed records from a cleaned water-quality table.
    ///
    /// `contaminant_level` is optional, both as a column and per row: a
    /// value forward-fill could not resolve becomes `None`. Every other
    /// column is required.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>> {
        require_columns(df, WATER_QUALITY_DATASET, &WATER_QUALITY_COLUMNS)?;

        let villages = string_values(df, columns::VILLAGE)?;
        let access = float_values(df, columns::ACCESS_TO_CLEAN_WATER)?;
        let contaminants = match df.column(columns::CONTAMINANT_LEVEL) {
            Ok(_) => optional_float_values(df, columns::CONTAMINANT_LEVEL)?,
            Err(_) => vec![None; df.height()],
        };

        Ok(villages
            .into_iter()
            .zip(access)
            .zip(contaminants)
            .map(|((village, access_to_clean_water), contaminant_level)| Self {
                village,
                access_to_clean_water,
                contaminant_level,
            })
            .collect())
    }
}

impl HealthRecord {
    /// Build typed records from a cleaned health-outcomes table.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>> {
        require_columns(df, HEALTH_DATASET, &HEALTH_COLUMNS)?;

        let villages = string_values(df, columns::VILLAGE)?;
        let phases = string_values(df, columns::INTERVENTION)?;
        let periods = string_values(df, columns::TIME_PERIOD)?;
        let cases = float_values(df, columns::WATERBORNE_DISEASE_CASES)?;
        let economic = float_values(df, columns::ECONOMIC_OUTPUT)?;
        let attendance = float_values(df, columns::SCHOOL_ATTENDANCE)?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            records.push(Self {
                village: villages[i].clone(),
                intervention: InterventionPhase::parse(&phases[i]),
                time_period: periods[i].clone(),
                waterborne_disease_cases: cases[i],
                economic_output: economic[i],
                school_attendance: attendance[i],
            });
        }
        Ok(records)
    }
}

/// `(time, access_to_clean_water)` points from a cleaned time-series table.
pub fn series_points(df: &DataFrame) -> Result<Vec<(f64, f64)>> {
    require_columns(df, SERIES_DATASET, &SERIES_COLUMNS)?;

    let times = float_values(df, columns::TIME)?;
    let values = float_values(df, columns::ACCESS_TO_CLEAN_WATER)?;
    Ok(times.into_iter().zip(values).collect())
}

fn string_values(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    series
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.map(str::to_string).ok_or_else(|| AnalysisError::UnresolvedMissing {
                column: column.to_string(),
                row,
            })
        })
        .collect()
}

fn float_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    optional_float_values(df, column)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| AnalysisError::UnresolvedMissing {
                column: column.to_string(),
                row,
            })
        })
        .collect()
}

fn optional_float_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .strict_cast(&DataType::Float64)?;

    Ok(series.f64()?.into_iter().collect())
}
