//! CLI entry point for the intervention impact dashboard.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use wash_impact::charts::FigureWindow;
use wash_impact::charts::dashboard::draw_dashboard;
use wash_impact::config::{
    DEFAULT_HEALTH_PATH, DEFAULT_WATER_QUALITY_PATH, LOW_ACCESS_THRESHOLD, PREVIEW_ROWS,
};
use wash_impact::{DashboardConfig, ImpactAnalysis, LoadedTables, TableCleaner};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean-water intervention impact dashboard",
    long_about = "Compares waterborne disease cases before and after a clean-water \
                  intervention and shows the results as four charts.\n\n\
                  EXAMPLES:\n  \
                  # Read the default CSV files from the working directory\n  \
                  impact-dashboard\n\n  \
                  # Print the analysis as JSON without opening a window\n  \
                  impact-dashboard --json --no-window"
)]
struct Args {
    /// Water-quality CSV (village, access_to_clean_water, contaminant_level)
    #[arg(long, default_value = DEFAULT_WATER_QUALITY_PATH)]
    water: String,

    /// Health-outcomes CSV (village, intervention, time_period, ...)
    #[arg(long, default_value = DEFAULT_HEALTH_PATH)]
    health: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Output the analysis as JSON on stdout instead of the text report
    #[arg(long)]
    json: bool,

    /// Skip the chart window
    #[arg(long)]
    no_window: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// Logging stays off with `--json` so stdout only holds the report.
fn init_logging(level: &str, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.json);

    let config = DashboardConfig::builder()
        .water_quality_path(&args.water)
        .health_path(&args.health)
        .show_window(!args.no_window)
        .build()?;

    let tables = LoadedTables::load(&config)?;

    if !args.json {
        println!("Water Quality Data:");
        println!("{}", TableCleaner::preview(&tables.water_quality, PREVIEW_ROWS));
        println!("\nHealth Data:");
        println!("{}", TableCleaner::preview(&tables.health, PREVIEW_ROWS));
    }

    let analysis = match tables.analyze() {
        Ok(analysis) => analysis,
        Err(e) => {
            error!("Analysis failed [{}]: {}", e.error_code(), e);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_report(&analysis);
    }

    if config.show_window {
        show_dashboard(&config, &analysis)?;
    }

    Ok(())
}

/// User-facing console report.
///
/// Uses `println!` rather than logging so it is visible at any log level.
fn print_report(analysis: &ImpactAnalysis) {
    for report in &analysis.cleaning {
        info!(
            "{}: {} -> {} rows ({} duplicates removed)",
            report.dataset, report.rows_before, report.rows_after, report.duplicates_removed
        );
    }

    let t_test = &analysis.comparison.t_test;
    println!("\nT-statistic: {}, P-value: {}", t_test.statistic, t_test.p_value);
    println!("{}", analysis.comparison.significance.verdict());

    println!("\nSummary of Project Impact (post - pre):");
    for metric in &analysis.summary.metrics {
        println!("  {:<22} {:>12.3}", metric.name, metric.value);
    }

    if analysis.dashboard.low_access.is_empty() {
        println!(
            "\nNo villages below {:.0}% access to clean water",
            LOW_ACCESS_THRESHOLD
        );
    }
}

fn show_dashboard(config: &DashboardConfig, analysis: &ImpactAnalysis) -> Result<()> {
    let mut window = FigureWindow::open("Water Intervention Impact", config.figure_size)
        .context("Opening chart window (use --no-window on headless systems)")?;
    window.render(|root| draw_dashboard(root, &analysis.dashboard))?;
    window.hold()?;
    Ok(())
}
