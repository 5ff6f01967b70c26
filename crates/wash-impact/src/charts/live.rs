//! Live water-quality line chart.

use super::{FigureWindow, white_text};
use crate::config::{FRAME_COUNT, MonitorConfig, TICK_INTERVAL};
use crate::error::Result;
use crate::ingest::records::SERIES_DATASET;
use crate::ingest::{TableCleaner, load_csv};
use crate::monitor::{LiveMonitor, LiveSeries};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;
use tracing::info;

pub const TITLE: &str = "Live Water Quality Monitoring";
const SERIES_LABEL: &str = "Access to Clean Water";

/// Redraw the full series: line, one value label per point, axes fitted to
/// every point seen so far. The area is cleared first, so labels from the
/// previous frame never linger.
pub fn draw_live_frame<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &LiveSeries,
) -> Result<()> {
    area.fill(&BLACK)?;

    let bounds = series.bounds();
    let mut chart = ChartBuilder::on(area)
        .caption(TITLE, white_text(24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(bounds.x_min..bounds.x_max, bounds.y_min..bounds.y_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(WHITE)
        .label_style(white_text(13))
        .axis_desc_style(white_text(16))
        .x_desc("Time")
        .y_desc("Access to Clean Water (%)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            series.points().iter().copied(),
            CYAN.stroke_width(2),
        ))?
        .label(SERIES_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CYAN.stroke_width(2)));

    let annotation = white_text(11).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(
        series
            .points()
            .iter()
            .map(|&(x, y)| Text::new(format!("{:.1}", y), (x, y), annotation.clone())),
    )?;

    chart
        .configure_series_labels()
        .background_style(BLACK.mix(0.8))
        .border_style(WHITE)
        .label_font(white_text(13))
        .draw()?;

    Ok(())
}

/// Load the seed series and animate it on screen until the window closes.
///
/// Returns the series as it stood when the window was closed.
pub fn run_live_monitor(config: &MonitorConfig) -> Result<LiveSeries> {
    let source = config.series_path.display().to_string();
    let raw = load_csv(&config.series_path)?;
    let cleaned = TableCleaner::clean(SERIES_DATASET, raw)?;
    let mut series = LiveSeries::from_frame(&source, &cleaned.frame)?;
    info!("Seed series has {} points", series.len());

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut window = FigureWindow::open(TITLE, config.figure_size)?;
    let mut monitor = LiveMonitor::new(FRAME_COUNT);

    window.render(|root| draw_live_frame(root, &series))?;
    monitor.start();

    let mut next_tick = Instant::now() + TICK_INTERVAL;
    while window.is_open() {
        if !monitor.is_finished() && Instant::now() >= next_tick {
            series = monitor.tick(series, &mut rng);
            window.render(|root| draw_live_frame(root, &series))?;
            next_tick += TICK_INTERVAL;
        } else {
            window.refresh()?;
        }
    }

    info!(
        "Window closed in state {:?} with {} points",
        monitor.state(),
        series.len()
    );
    Ok(series)
}
