//! Post-minus-pre mean differences for the three outcome metrics.

use super::{InterventionGroups, mean};
use crate::error::Result;
use crate::types::{HealthRecord, SummaryMetric};
use serde::Serialize;

pub const HEALTH_IMPROVEMENT: &str = "Health Improvement";
pub const ECONOMIC_BENEFITS: &str = "Economic Benefits";
pub const EDUCATIONAL_OUTCOMES: &str = "Educational Outcomes";

/// The three deltas, always in disease, economic, educational order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactSummary {
    pub metrics: [SummaryMetric; 3],
}

impl ImpactSummary {
    pub fn health_improvement(&self) -> f64 {
        self.metrics[0].value
    }

    pub fn economic_benefits(&self) -> f64 {
        self.metrics[1].value
    }

    pub fn educational_outcomes(&self) -> f64 {
        self.metrics[2].value
    }
}

/// Compute `mean(post) - mean(pre)` for each outcome metric.
///
/// These are raw descriptive differences; no test is applied to them.
pub fn summarize(groups: &InterventionGroups<'_>) -> Result<ImpactSummary> {
    let delta = |field: fn(&HealthRecord) -> f64| -> Result<f64> {
        Ok(mean(&groups.post_values(field))? - mean(&groups.pre_values(field))?)
    };

    Ok(ImpactSummary {
        metrics: [
            SummaryMetric {
                name: HEALTH_IMPROVEMENT,
                value: delta(|r| r.waterborne_disease_cases)?,
            },
            SummaryMetric {
                name: ECONOMIC_BENEFITS,
                value: delta(|r| r.economic_output)?,
            },
            SummaryMetric {
                name: EDUCATIONAL_OUTCOMES,
                value: delta(|r| r.school_attendance)?,
            },
        ],
    })
}
