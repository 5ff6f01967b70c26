//! Integration tests for the impact analysis and the live monitor.
//!
//! These run the library end to end on small CSV fixtures.

use plotters::prelude::*;
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use wash_impact::charts::dashboard::draw_dashboard;
use wash_impact::config::{DASHBOARD_SIZE, FRAME_COUNT};
use wash_impact::{
    AnalysisError, DashboardConfig, LiveMonitor, LiveSeries, LoadedTables, MonitorState,
    Significance, TableCleaner, load_csv,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixture(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(filename)
}

fn config(water: &str, health: &str) -> DashboardConfig {
    DashboardConfig::builder()
        .water_quality_path(fixture(water))
        .health_path(fixture(health))
        .show_window(false)
        .build()
        .expect("fixture config is valid")
}

// ============================================================================
// Cleaning
// ============================================================================

#[test]
fn test_cleaning_removes_duplicates_and_fills_gaps() {
    let raw = load_csv(fixture("water_quality.csv")).unwrap();
    assert_eq!(raw.height(), 6);

    let cleaned = TableCleaner::clean("water quality", raw).unwrap();
    assert_eq!(cleaned.report.rows_before, 6);
    assert_eq!(cleaned.report.rows_after, 5);
    assert_eq!(cleaned.report.duplicates_removed, 1);
    assert!(!cleaned.report.has_leading_gaps());

    for column in cleaned.frame.get_columns() {
        assert_eq!(column.null_count(), 0, "column {} still has nulls", column.name());
    }

    // Ghazipur's missing access is filled from Sitapur, the row above it.
    let access = cleaned.frame.column("access_to_clean_water").unwrap();
    assert_eq!(access.get(2).unwrap().try_extract::<f64>().unwrap(), 62.0);
}

#[test]
fn test_cleaning_reports_leading_gap() {
    let raw = load_csv(fixture("health_leading_gap.csv")).unwrap();
    let cleaned = TableCleaner::clean("health", raw).unwrap();

    assert!(cleaned.report.has_leading_gaps());
    assert_eq!(cleaned.report.leading_gaps[0].column, "waterborne_disease_cases");
    assert_eq!(cleaned.report.leading_gaps[0].rows, 1);
}

// ============================================================================
// Full analysis
// ============================================================================

#[test]
fn test_full_analysis() {
    let analysis = LoadedTables::load(&config("water_quality.csv", "health_outcomes.csv"))
        .unwrap()
        .analyze()
        .unwrap();

    let comparison = &analysis.comparison;
    assert_eq!(comparison.pre_count, 3);
    assert_eq!(comparison.post_count, 3);
    assert!(comparison.t_test.statistic > 0.0);
    assert!(comparison.t_test.p_value < 0.05);
    assert_eq!(comparison.significance, Significance::Significant);

    // Sitapur's missing post economic output is forward-filled with 130.
    let summary = &analysis.summary;
    assert!((summary.health_improvement() - -7.0).abs() < 1e-9);
    assert!((summary.economic_benefits() - (380.0 / 3.0 - 100.0)).abs() < 1e-9);
    assert!((summary.educational_outcomes() - 10.0).abs() < 1e-9);

    let low_access: Vec<(&str, f64)> = analysis
        .dashboard
        .low_access
        .iter()
        .map(|bar| (bar.label.as_str(), bar.value))
        .collect();
    assert_eq!(low_access, vec![("Rampur", 40.0), ("Varanasi", 48.0)]);

    let periods: Vec<(&str, usize)> = analysis
        .dashboard
        .period_shares
        .iter()
        .map(|share| (share.label.as_str(), share.count))
        .collect();
    assert_eq!(periods, vec![("2022", 3), ("2023", 2), ("2024", 1)]);

    let villages: Vec<&str> = analysis
        .dashboard
        .village_distributions
        .iter()
        .map(|d| d.village.as_str())
        .collect();
    assert_eq!(villages, vec!["Rampur", "Sitapur", "Ghazipur"]);
}

#[test]
fn test_analysis_is_deterministic() {
    let run = || {
        LoadedTables::load(&config("water_quality.csv", "health_outcomes.csv"))
            .unwrap()
            .analyze()
            .unwrap()
    };
    let (first, second) = (run(), run());
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.comparison, second.comparison);
}

#[test]
fn test_all_villages_high_access() {
    let analysis = LoadedTables::load(&config(
        "water_quality_high_access.csv",
        "health_outcomes.csv",
    ))
    .unwrap()
    .analyze()
    .unwrap();

    assert!(analysis.dashboard.low_access.is_empty());
    assert_eq!(analysis.dashboard.summary.len(), 3);
}

#[test]
fn test_contaminant_gap_does_not_abort() {
    let analysis = LoadedTables::load(&config(
        "water_quality_contaminant_gap.csv",
        "health_outcomes.csv",
    ))
    .unwrap()
    .analyze()
    .unwrap();

    let labels: Vec<&str> = analysis
        .dashboard
        .low_access
        .iter()
        .map(|bar| bar.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Rampur", "Varanasi"]);
}

#[test]
fn test_decimal_after_sampled_rows_loads() {
    let raw = load_csv(fixture("health_late_decimal.csv")).unwrap();
    assert_eq!(raw.height(), 121);

    let analysis = LoadedTables::load(&config("water_quality.csv", "health_late_decimal.csv"))
        .unwrap()
        .analyze()
        .unwrap();
    assert_eq!(analysis.comparison.pre_count, 60);
    assert_eq!(analysis.comparison.post_count, 61);
    assert_eq!(analysis.comparison.significance, Significance::Significant);
}

#[test]
fn test_dashboard_draws_without_low_access_villages() {
    let analysis = LoadedTables::load(&config(
        "water_quality_high_access.csv",
        "health_outcomes.csv",
    ))
    .unwrap()
    .analyze()
    .unwrap();
    assert!(analysis.dashboard.low_access.is_empty());

    let (width, height) = DASHBOARD_SIZE;
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    let root = BitMapBackend::with_buffer(&mut buffer, DASHBOARD_SIZE).into_drawing_area();
    draw_dashboard(&root, &analysis.dashboard).unwrap();
    root.present().unwrap();
}

#[test]
fn test_json_report_serializes() {
    let analysis = LoadedTables::load(&config("water_quality.csv", "health_outcomes.csv"))
        .unwrap()
        .analyze()
        .unwrap();

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["comparison"]["significance"], "significant");
    assert_eq!(json["summary"]["metrics"][0]["name"], "Health Improvement");
    assert_eq!(json["cleaning"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_post_phase_aborts() {
    let err = LoadedTables::load(&config("water_quality.csv", "health_pre_only.csv"))
        .unwrap()
        .analyze()
        .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::MissingInterventionData { pre: 2, post: 0 }
    ));
}

#[test]
fn test_missing_column_fails_at_startup() {
    let err = LoadedTables::load(&config("water_quality.csv", "health_missing_column.csv"))
        .unwrap()
        .analyze()
        .unwrap_err();

    match err {
        AnalysisError::ColumnNotFound { dataset, column } => {
            assert_eq!(dataset, "health");
            assert_eq!(column, "school_attendance");
        }
        other => panic!("expected ColumnNotFound, got {:?}", other),
    }
}

#[test]
fn test_leading_gap_rejected_by_typed_records() {
    let err = LoadedTables::load(&config("water_quality.csv", "health_leading_gap.csv"))
        .unwrap()
        .analyze()
        .unwrap_err();

    assert_eq!(err.error_code(), "UNRESOLVED_MISSING");
    assert!(err.is_data_error());
}

#[test]
fn test_missing_input_file() {
    let err = LoadedTables::load(&config("no_such_file.csv", "health_outcomes.csv")).unwrap_err();
    assert_eq!(err.error_code(), "IO_ERROR");
    assert!(err.to_string().contains("Loading water quality data"));
}

// ============================================================================
// Live monitor
// ============================================================================

#[test]
fn test_live_series_first_tick() {
    let raw = load_csv(fixture("water_quality_series.csv")).unwrap();
    let cleaned = TableCleaner::clean("time series", raw).unwrap();
    let series = LiveSeries::from_frame("water_quality_series.csv", &cleaned.frame).unwrap();
    assert_eq!(series.points(), &[(0.0, 80.0)]);

    let mut rng = StdRng::seed_from_u64(2024);
    let mut monitor = LiveMonitor::new(FRAME_COUNT);
    monitor.start();
    let series = monitor.tick(series, &mut rng);

    assert_eq!(series.len(), 2);
    let (time, value) = series.points()[1];
    assert_eq!(time, 1.0);
    assert!((value - 80.0).abs() < 6.0);
}

#[test]
fn test_live_monitor_full_run() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut monitor = LiveMonitor::new(FRAME_COUNT);
    let mut series = LiveSeries::new("seed", vec![(0.0, 80.0)]).unwrap();
    assert_eq!(monitor.state(), MonitorState::Idle);

    monitor.start();
    while !monitor.is_finished() {
        series = monitor.tick(series, &mut rng);
    }

    assert_eq!(series.len(), FRAME_COUNT + 1);
    assert_eq!(series.last().0, FRAME_COUNT as f64);

    let bounds = series.bounds();
    for &(x, y) in series.points() {
        assert!(bounds.x_min <= x && x <= bounds.x_max);
        assert!(bounds.y_min <= y && y <= bounds.y_max);
    }
}
