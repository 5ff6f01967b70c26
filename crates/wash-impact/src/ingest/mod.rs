//! Loading and cleaning of the input tables.
//!
//! Cleaning has three steps:
//! - exact-duplicate rows are dropped, keeping the first occurrence
//! - every column is forward-filled in row order
//! - a named column can be rescaled by a constant factor
//!
//! Forward-fill depends on row order, so de-duplication must be stable.
//! Missing values before the first valid observation of a column (leading
//! gaps) cannot be filled; they are counted in the [`CleaningReport`] and
//! rejected later by the typed extraction in [`records`].

pub mod records;

use crate::error::{Result, ResultExt};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Rows sampled for schema inference on the first attempt.
const INFER_SCHEMA_ROWS: usize = 100;

/// Read a CSV file with a header row into a DataFrame.
///
/// The schema is first inferred from the leading rows. If a later row does
/// not fit (say a decimal after a run of integers), the file is read again
/// with the schema inferred from every row.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    debug!("Loading CSV from {}", path.display());

    // Surface a missing file as an IO error rather than a polars one.
    std::fs::metadata(path)?;

    let df = match read_csv(path, Some(INFER_SCHEMA_ROWS)) {
        Ok(df) => df,
        Err(e) => {
            debug!("Sampled schema failed for {}: {}", path.display(), e);
            read_csv(path, None).context(format!("Parsing {}", path.display()))?
        }
    };

    info!("Loaded {}: {:?}", path.display(), df.shape());
    Ok(df)
}

fn read_csv(path: &Path, infer_rows: Option<usize>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_rows)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

/// Missing values that forward-fill could not resolve in one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadingGap {
    pub column: String,
    pub rows: usize,
}

/// What [`TableCleaner::clean`] did to a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    pub dataset: String,
    pub rows_before: usize,
    pub rows_after: usize,
    pub duplicates_removed: usize,
    /// Per column, how many missing values forward-fill replaced.
    pub filled_values: Vec<(String, usize)>,
    pub leading_gaps: Vec<LeadingGap>,
}

impl CleaningReport {
    pub fn has_leading_gaps(&self) -> bool {
        !self.leading_gaps.is_empty()
    }
}

/// A cleaned table together with the report describing the cleaning.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub frame: DataFrame,
    pub report: CleaningReport,
}

/// Table cleaning operations shared by both programs.
pub struct TableCleaner;

impl TableCleaner {
    /// Remove exact duplicates and forward-fill every column.
    pub fn clean(dataset: &str, df: DataFrame) -> Result<CleanedTable> {
        info!("Cleaning {} data...", dataset);

        let rows_before = df.height();
        let mut df = Self::drop_duplicates(&df)?;
        let rows_after = df.height();
        let duplicates_removed = rows_before - rows_after;

        if duplicates_removed > 0 {
            debug!("Removed {} duplicate rows from {}", duplicates_removed, dataset);
        }

        let (filled_values, leading_gaps) = Self::forward_fill(&mut df)?;

        for gap in &leading_gaps {
            warn!(
                "{}: column '{}' starts with {} missing value(s) that forward-fill cannot resolve",
                dataset, gap.column, gap.rows
            );
        }

        Ok(CleanedTable {
            frame: df,
            report: CleaningReport {
                dataset: dataset.to_string(),
                rows_before,
                rows_after,
                duplicates_removed,
                filled_values,
                leading_gaps,
            },
        })
    }

    /// Drop exact-duplicate rows, keeping the first occurrence in row order.
    pub fn drop_duplicates(df: &DataFrame) -> Result<DataFrame> {
        Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
    }

    /// Forward-fill every column in place.
    ///
    /// Returns the number of values filled per column and the columns that
    /// still hold leading missing values afterwards.
    pub fn forward_fill(df: &mut DataFrame) -> Result<(Vec<(String, usize)>, Vec<LeadingGap>)> {
        let mut filled_values = Vec::new();
        let mut leading_gaps = Vec::new();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        for name in names {
            let series = df.column(&name)?.as_materialized_series();
            let missing_before = series.null_count();
            if missing_before == 0 {
                continue;
            }

            let filled = series.fill_null(FillNullStrategy::Forward(None))?;
            let missing_after = filled.null_count();
            df.replace(&name, filled)?;

            if missing_before > missing_after {
                filled_values.push((name.clone(), missing_before - missing_after));
            }
            if missing_after > 0 {
                leading_gaps.push(LeadingGap {
                    column: name,
                    rows: missing_after,
                });
            }
        }

        Ok((filled_values, leading_gaps))
    }

    /// Multiply a numeric column by `factor`.
    ///
    /// Does nothing when the column is absent, so callers can apply a unit
    /// conversion to tables that may or may not carry the column.
    pub fn scale_column(df: &mut DataFrame, column: &str, factor: f64) -> Result<bool> {
        let scaled = match df.column(column) {
            Ok(col) => {
                let series = col.as_materialized_series().cast(&DataType::Float64)?;
                &series * factor
            }
            Err(_) => return Ok(false),
        };

        df.replace(column, scaled)?;
        debug!("Scaled '{}' by {}", column, factor);
        Ok(true)
    }

    /// First `rows` rows, for console previews.
    pub fn preview(df: &DataFrame, rows: usize) -> DataFrame {
        df.head(Some(rows))
    }
}
