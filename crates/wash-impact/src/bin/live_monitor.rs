//! CLI entry point for the live water-quality monitor.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use wash_impact::MonitorConfig;
use wash_impact::charts::live::run_live_monitor;
use wash_impact::config::DEFAULT_SERIES_PATH;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Live water-quality monitor",
    long_about = "Extends a water-quality time series with one random-walk point per \
                  second and redraws the line chart after every point.\n\n\
                  EXAMPLES:\n  \
                  live-monitor\n  \
                  live-monitor --series data/water_quality_india_2024.csv --seed 42"
)]
struct Args {
    /// Seed time series CSV (time, access_to_clean_water)
    #[arg(long, default_value = DEFAULT_SERIES_PATH)]
    series: String,

    /// Fix the random walk seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut builder = MonitorConfig::builder().series_path(&args.series);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let config = builder.build()?;

    let series = run_live_monitor(&config)?;
    let (time, value) = series.last();
    info!("Last point: t = {}, access = {:.1}%", time, value);

    Ok(())
}
