//! The impact analysis run behind `impact-dashboard`.
//!
//! Stages, strictly in order:
//! 1. load both CSV files ([`LoadedTables::load`])
//! 2. clean, rescale contaminants, build typed records
//! 3. split health records by phase; fail if a phase is empty
//! 4. t-test on disease cases, mean deltas, chart data
//!
//! Data problems abort the run at the stage that finds them: a missing
//! required column or an unfillable gap in step 2, an empty phase in step 3.
//! After any abort no statistics are reported and no chart is drawn.

use crate::charts::dashboard::DashboardData;
use crate::config::{CONTAMINANT_CONVERSION_FACTOR, DashboardConfig, LOW_ACCESS_THRESHOLD};
use crate::error::{Result, ResultExt};
use crate::ingest::records::{HEALTH_DATASET, WATER_QUALITY_DATASET};
use crate::ingest::{CleaningReport, TableCleaner, load_csv};
use crate::stats::summary::{ImpactSummary, summarize};
use crate::stats::{InterventionComparison, InterventionGroups, compare_disease_cases};
use crate::types::{HealthRecord, WaterQualityRecord, columns};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::info;

/// The two raw input tables, as read from disk.
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub water_quality: DataFrame,
    pub health: DataFrame,
}

impl LoadedTables {
    pub fn load(config: &DashboardConfig) -> Result<Self> {
        let water_quality = load_csv(&config.water_quality_path)
            .context(format!("Loading {} data", WATER_QUALITY_DATASET))?;
        let health =
            load_csv(&config.health_path).context(format!("Loading {} data", HEALTH_DATASET))?;
        Ok(Self {
            water_quality,
            health,
        })
    }

    /// Clean both tables and run the comparison.
    pub fn analyze(self) -> Result<ImpactAnalysis> {
        let water = TableCleaner::clean(WATER_QUALITY_DATASET, self.water_quality)?;
        let health = TableCleaner::clean(HEALTH_DATASET, self.health)?;

        let mut water_frame = water.frame;
        TableCleaner::scale_column(
            &mut water_frame,
            columns::CONTAMINANT_LEVEL,
            CONTAMINANT_CONVERSION_FACTOR,
        )?;

        let water_records = WaterQualityRecord::from_frame(&water_frame)?;
        let health_records = HealthRecord::from_frame(&health.frame)?;
        info!(
            "Typed {} water-quality and {} health records",
            water_records.len(),
            health_records.len()
        );

        analyze_records(
            &water_records,
            &health_records,
            vec![water.report, health.report],
        )
    }
}

/// Everything one dashboard run produces.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactAnalysis {
    pub cleaning: Vec<CleaningReport>,
    pub comparison: InterventionComparison,
    pub summary: ImpactSummary,
    pub dashboard: DashboardData,
}

/// Steps 3 and 4 on already typed records.
pub fn analyze_records(
    water: &[WaterQualityRecord],
    health: &[HealthRecord],
    cleaning: Vec<CleaningReport>,
) -> Result<ImpactAnalysis> {
    let groups = InterventionGroups::split(health)?;
    let comparison = compare_disease_cases(&groups)?;
    let summary = summarize(&groups)?;
    let dashboard = DashboardData::build(water, health, &summary, LOW_ACCESS_THRESHOLD);

    Ok(ImpactAnalysis {
        cleaning,
        comparison,
        summary,
        dashboard,
    })
}
