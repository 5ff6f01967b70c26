//! The 2x2 impact dashboard.
//!
//! Chart data is prepared by plain functions over the typed records and then
//! drawn panel by panel:
//!
//! | panel        | chart                                         |
//! |--------------|-----------------------------------------------|
//! | top left     | villages below the low-access threshold (bar) |
//! | top right    | share of records per time period (pie)        |
//! | bottom left  | disease cases per village (box)               |
//! | bottom right | post-minus-pre summary deltas (bar)           |

use super::{SKY_BLUE, padded_range, white_text, zero_based_range};
use crate::error::Result;
use crate::stats::summary::ImpactSummary;
use crate::types::{HealthRecord, WaterQualityRecord};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

const LOW_ACCESS_TITLE: &str = "Villages with Low Access to Clean Water in India";
const PERIOD_TITLE: &str = "Changes in Waterborne Disease Cases Over Time";
const BOX_TITLE: &str = "Waterborne Disease Cases by Village";
const SUMMARY_TITLE: &str = "Summary of Project Impact";

const PIE_START_ANGLE: f64 = 140.0;

/// seaborn "Set2".
const SET2: [RGBColor; 8] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
    RGBColor(166, 216, 84),
    RGBColor(255, 217, 47),
    RGBColor(229, 196, 148),
    RGBColor(179, 179, 179),
];

/// seaborn "muted", first three entries.
const MUTED: [RGBColor; 3] = [
    RGBColor(72, 120, 208),
    RGBColor(238, 133, 74),
    RGBColor(106, 204, 100),
];

/// Anchor colors of the viridis map, dark to light.
const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];

// ============================================================================
// Chart data
// ============================================================================

/// One bar: a label and its height.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

/// Frequency of one `time_period` value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodShare {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

/// Disease case distribution of one village.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VillageDistribution {
    pub village: String,
    pub values: Vec<f64>,
}

/// Everything the dashboard draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub low_access: Vec<LabeledValue>,
    pub period_shares: Vec<PeriodShare>,
    pub village_distributions: Vec<VillageDistribution>,
    pub summary: Vec<LabeledValue>,
}

impl DashboardData {
    pub fn build(
        water: &[WaterQualityRecord],
        health: &[HealthRecord],
        summary: &ImpactSummary,
        threshold: f64,
    ) -> Self {
        Self {
            low_access: low_access_villages(water, threshold),
            period_shares: period_shares(health),
            village_distributions: village_distributions(health),
            summary: summary
                .metrics
                .iter()
                .map(|m| LabeledValue {
                    label: m.name.to_string(),
                    value: m.value,
                })
                .collect(),
        }
    }
}

/// Villages with access below `threshold`, one bar per village at the mean
/// of its qualifying observations, in first-appearance order.
pub fn low_access_villages(records: &[WaterQualityRecord], threshold: f64) -> Vec<LabeledValue> {
    let grouped = group_in_order(
        records
            .iter()
            .filter(|r| r.access_to_clean_water < threshold)
            .map(|r| (r.village.as_str(), r.access_to_clean_water)),
    );

    grouped
        .into_iter()
        .map(|(label, values)| LabeledValue {
            value: values.iter().sum::<f64>() / values.len() as f64,
            label,
        })
        .collect()
}

/// Record count per `time_period`, most frequent first. Ties keep the order
/// in which the periods first appear.
pub fn period_shares(records: &[HealthRecord]) -> Vec<PeriodShare> {
    let grouped = group_in_order(records.iter().map(|r| (r.time_period.as_str(), 0.0)));
    let total = records.len() as f64;

    let mut shares: Vec<PeriodShare> = grouped
        .into_iter()
        .map(|(label, values)| PeriodShare {
            label,
            count: values.len(),
            percent: values.len() as f64 / total * 100.0,
        })
        .collect();

    // Stable sort keeps first-appearance order among equal counts.
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// Disease cases grouped by village, in first-appearance order.
pub fn village_distributions(records: &[HealthRecord]) -> Vec<VillageDistribution> {
    group_in_order(
        records
            .iter()
            .map(|r| (r.village.as_str(), r.waterborne_disease_cases)),
    )
    .into_iter()
    .map(|(village, values)| VillageDistribution { village, values })
    .collect()
}

fn group_in_order<'a>(items: impl Iterator<Item = (&'a str, f64)>) -> Vec<(String, Vec<f64>)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();

    for (key, value) in items {
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key.to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(value);
    }
    groups
}

fn viridis(index: usize, count: usize) -> RGBColor {
    if count <= 1 {
        return VIRIDIS[0];
    }
    let pos = index as f64 / (count - 1) as f64 * (VIRIDIS.len() - 1) as f64;
    let lower = (pos.floor() as usize).min(VIRIDIS.len() - 1);
    let upper = (lower + 1).min(VIRIDIS.len() - 1);
    let t = pos - lower as f64;
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    let (a, b) = (VIRIDIS[lower], VIRIDIS[upper]);
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

// ============================================================================
// Drawing
// ============================================================================

/// Draw the four panels into `root`.
pub fn draw_dashboard<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &DashboardData,
) -> Result<()> {
    root.fill(&BLACK)?;
    let panels = root.split_evenly((2, 2));

    let (labels, values) = unzip_bars(&data.low_access);
    draw_bar_panel(
        &panels[0],
        LOW_ACCESS_TITLE,
        ("Village", "Access to Clean Water (%)"),
        &labels,
        &values,
        |_| SKY_BLUE,
    )?;

    draw_pie_panel(&panels[1], PERIOD_TITLE, &data.period_shares)?;
    draw_box_panel(&panels[2], BOX_TITLE, &data.village_distributions)?;

    let (labels, values) = unzip_bars(&data.summary);
    draw_bar_panel(
        &panels[3],
        SUMMARY_TITLE,
        ("Metric", "Change"),
        &labels,
        &values,
        |i| MUTED[i % MUTED.len()],
    )?;

    Ok(())
}

fn unzip_bars(bars: &[LabeledValue]) -> (Vec<String>, Vec<f64>) {
    bars.iter().map(|b| (b.label.clone(), b.value)).unzip()
}

fn draw_empty_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, title: &str) -> Result<()> {
    let area = area.titled(title, white_text(22))?;
    let (width, height) = area.dim_in_pixel();
    area.draw(&Text::new(
        "No data",
        (width as i32 / 2 - 30, height as i32 / 2),
        white_text(18),
    ))?;
    Ok(())
}

fn segment_label(labels: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

fn draw_bar_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    (x_desc, y_desc): (&str, &str),
    labels: &[String],
    values: &[f64],
    color: impl Fn(usize) -> RGBColor,
) -> Result<()> {
    if labels.is_empty() {
        return draw_empty_panel(area, title);
    }

    let mut chart = ChartBuilder::on(area)
        .caption(title, white_text(22))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0..labels.len() as i32).into_segmented(),
            zero_based_range(values),
        )?;

    let format_label = |v: &SegmentValue<i32>| segment_label(labels, v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(WHITE.mix(0.05))
        .bold_line_style(WHITE.mix(0.15))
        .axis_style(WHITE)
        .label_style(white_text(13))
        .axis_desc_style(white_text(16))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(labels.len() + 1)
        .x_label_formatter(&format_label)
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, value)| {
        let x = i as i32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(x), 0.0), (SegmentValue::Exact(x + 1), *value)],
            color(i).filled(),
        );
        bar.set_margin(0, 0, 6, 6);
        bar
    }))?;

    Ok(())
}

fn draw_pie_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    shares: &[PeriodShare],
) -> Result<()> {
    if shares.is_empty() {
        return draw_empty_panel(area, title);
    }

    let area = area.titled(title, white_text(22))?;
    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;

    let sizes: Vec<f64> = shares.iter().map(|s| s.count as f64).collect();
    let colors: Vec<RGBColor> = (0..shares.len())
        .map(|i| viridis(i, shares.len()))
        .collect();
    let labels: Vec<String> = shares
        .iter()
        .map(|s| format!("{} ({:.1}%)", s.label, s.percent))
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(PIE_START_ANGLE);
    pie.label_style(white_text(14));
    area.draw(&pie)?;

    Ok(())
}

fn draw_box_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    distributions: &[VillageDistribution],
) -> Result<()> {
    if distributions.is_empty() {
        return draw_empty_panel(area, title);
    }

    let labels: Vec<String> = distributions.iter().map(|d| d.village.clone()).collect();
    let quartiles: Vec<Quartiles> = distributions
        .iter()
        .map(|d| Quartiles::new(&d.values))
        .collect();

    // Whiskers reach the 1.5 IQR fences, which may lie outside the data.
    let (low, high) = distributions
        .iter()
        .flat_map(|d| d.values.iter().copied())
        .chain(quartiles.iter().flat_map(|q| {
            let [lower_fence, _, _, _, upper_fence] = q.values();
            [f64::from(lower_fence), f64::from(upper_fence)]
        }))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let range = padded_range(low, high);

    let mut chart = ChartBuilder::on(area)
        .caption(title, white_text(22))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0..labels.len() as i32).into_segmented(),
            range.start as f32..range.end as f32,
        )?;

    let format_label = |v: &SegmentValue<i32>| segment_label(&labels, v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(WHITE.mix(0.05))
        .bold_line_style(WHITE.mix(0.15))
        .axis_style(WHITE)
        .label_style(white_text(13))
        .axis_desc_style(white_text(16))
        .x_desc("Village")
        .y_desc("Waterborne Disease Cases")
        .x_labels(labels.len() + 1)
        .x_label_formatter(&format_label)
        .draw()?;

    chart.draw_series(quartiles.iter().enumerate().map(|(i, q)| {
        Boxplot::new_vertical(SegmentValue::CenterOf(i as i32), q)
            .width(30)
            .whisker_width(0.5)
            .style(SET2[i % SET2.len()])
    }))?;

    Ok(())
}
