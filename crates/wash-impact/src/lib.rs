//! Clean-water intervention impact analysis.
//!
//! Two programs are built on this library:
//!
//! - **`impact-dashboard`** loads a water-quality table and a health-outcomes
//!   table. It removes duplicates and forward-fills both, then compares
//!   waterborne disease cases before and after the intervention with a
//!   Student t-test. It shows four charts in a dark 2x2 grid.
//! - **`live-monitor`** loads a water-quality time series and extends it by
//!   one random-walk point per second for 200 ticks, redrawing a line chart
//!   each time.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wash_impact::{DashboardConfig, LoadedTables};
//!
//! let config = DashboardConfig::builder()
//!     .water_quality_path("water_quality_india.csv")
//!     .health_path("health_outcomes_india.csv")
//!     .build()?;
//!
//! let analysis = LoadedTables::load(&config)?.analyze()?;
//! println!(
//!     "T-statistic: {}, P-value: {}",
//!     analysis.comparison.t_test.statistic, analysis.comparison.t_test.p_value
//! );
//! ```
//!
//! # Missing data
//!
//! Forward-fill cannot repair missing values at the very start of a column.
//! Such leading gaps are reported by [`ingest::CleaningReport`] and rejected
//! with [`AnalysisError::UnresolvedMissing`] when the typed records are built.

pub mod charts;
pub mod config;
pub mod error;
pub mod ingest;
pub mod monitor;
pub mod pipeline;
pub mod stats;
pub mod types;

pub use config::{ConfigValidationError, DashboardConfig, MonitorConfig};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use ingest::{CleanedTable, CleaningReport, TableCleaner, load_csv};
pub use monitor::{LiveMonitor, LiveSeries, MonitorState, ViewBounds};
pub use pipeline::{ImpactAnalysis, LoadedTables, analyze_records};
pub use stats::summary::ImpactSummary;
pub use stats::{InterventionComparison, InterventionGroups, TTestResult, student_t_test};
pub use types::{HealthRecord, InterventionPhase, Significance, SummaryMetric, WaterQualityRecord};
