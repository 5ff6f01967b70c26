//! Pre/post intervention comparison.
//!
//! Health records are split by their intervention phase and the disease case
//! counts of the two groups are compared with an independent two-sample
//! Student t-test (pooled variance, two-sided).

pub mod summary;

use crate::config::ALPHA;
use crate::error::{AnalysisError, Result};
use crate::types::{HealthRecord, InterventionPhase, Significance};
use serde::Serialize;
use anofox_statistics::StatError;
use anofox_statistics::parametric::ttest::{Alternative, TTestKind, t_test};
use anofox_statistics::utils::math;
use tracing::{debug, info};

/// Health records partitioned into the two comparison groups.
///
/// Records whose phase is neither `pre` nor `post` are in neither group.
#[derive(Debug, Clone)]
pub struct InterventionGroups<'a> {
    pub pre: Vec<&'a HealthRecord>,
    pub post: Vec<&'a HealthRecord>,
}

impl<'a> InterventionGroups<'a> {
    /// Split records by exact phase match.
    ///
    /// Fails with [`AnalysisError::MissingInterventionData`] when either
    /// group is empty; there is nothing to compare in that case.
    pub fn split(records: &'a [HealthRecord]) -> Result<Self> {
        let (pre, post) = records.iter().fold(
            (Vec::new(), Vec::new()),
            |(mut pre, mut post), record| {
                match record.intervention {
                    InterventionPhase::Pre => pre.push(record),
                    InterventionPhase::Post => post.push(record),
                    InterventionPhase::Other(_) => {}
                }
                (pre, post)
            },
        );

        debug!("Split health records: {} pre, {} post", pre.len(), post.len());

        if pre.is_empty() || post.is_empty() {
            return Err(AnalysisError::MissingInterventionData {
                pre: pre.len(),
                post: post.len(),
            });
        }

        Ok(Self { pre, post })
    }

    /// Values of one numeric field for the pre group.
    pub fn pre_values(&self, field: fn(&HealthRecord) -> f64) -> Vec<f64> {
        self.pre.iter().map(|&r| field(r)).collect()
    }

    /// Values of one numeric field for the post group.
    pub fn post_values(&self, field: fn(&HealthRecord) -> f64) -> Vec<f64> {
        self.post.iter().map(|&r| field(r)).collect()
    }
}

/// Result of a two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTestResult {
    pub statistic: f64,
    pub p_value: f64,
    pub df: f64,
}

/// Outcome of comparing disease cases before and after the intervention.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterventionComparison {
    pub pre_count: usize,
    pub post_count: usize,
    pub t_test: TTestResult,
    pub significance: Significance,
}

impl Significance {
    /// `Significant` when `p < ALPHA`. A NaN p-value is never significant.
    pub fn from_p_value(p_value: f64) -> Self {
        if p_value < ALPHA {
            Significance::Significant
        } else {
            Significance::NotSignificant
        }
    }
}

/// Compare waterborne disease cases between the pre and post groups.
pub fn compare_disease_cases(groups: &InterventionGroups<'_>) -> Result<InterventionComparison> {
    let pre = groups.pre_values(|r| r.waterborne_disease_cases);
    let post = groups.post_values(|r| r.waterborne_disease_cases);

    let t_test = student_t_test(&pre, &post)?;
    let significance = Significance::from_p_value(t_test.p_value);

    info!(
        "t = {:.4}, p = {:.4}, df = {} -> {:?}",
        t_test.statistic, t_test.p_value, t_test.df, significance
    );

    Ok(InterventionComparison {
        pre_count: pre.len(),
        post_count: post.len(),
        t_test,
        significance,
    })
}

/// Independent two-sample Student t-test with pooled variance, two-sided.
///
/// Degenerate inputs do not error:
/// - a group with fewer than two observations gives NaN for t and p
/// - zero pooled variance gives NaN when the means are equal, and an
///   infinite t with p = 0 when they differ
pub fn student_t_test(a: &[f64], b: &[f64]) -> Result<TTestResult> {
    match t_test(a, b, TTestKind::Student, Alternative::TwoSided, 0.0, None) {
        Ok(result) => Ok(TTestResult {
            statistic: result.statistic,
            p_value: result.p_value,
            df: result.df,
        }),
        Err(StatError::InsufficientData { needed, got }) => {
            debug!(
                "t-test needs {} observations per group, got {}; result is NaN",
                needed, got
            );
            Ok(TTestResult {
                statistic: f64::NAN,
                p_value: f64::NAN,
                df: (a.len() + b.len()) as f64 - 2.0,
            })
        }
        Err(e) => Err(AnalysisError::Statistics(e.to_string())),
    }
}

/// Arithmetic mean of a non-empty slice.
pub fn mean(values: &[f64]) -> Result<f64> {
    math::mean(values).map_err(|e| AnalysisError::Statistics(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(phase: &str, cases: f64) -> HealthRecord {
        HealthRecord {
            village: "A".to_string(),
            intervention: InterventionPhase::parse(phase),
            time_period: "2023".to_string(),
            waterborne_disease_cases: cases,
            economic_output: 0.0,
            school_attendance: 0.0,
        }
    }

    #[test]
    fn test_split_ignores_other_phases() {
        let records = vec![
            record("pre", 1.0),
            record("post", 2.0),
            record("Pre", 3.0),
            record("pre", 4.0),
        ];
        let groups = InterventionGroups::split(&records).unwrap();
        assert_eq!(groups.pre.len(), 2);
        assert_eq!(groups.post.len(), 1);
        assert_eq!(
            groups.pre_values(|r| r.waterborne_disease_cases),
            vec![1.0, 4.0]
        );
    }

    #[test]
    fn test_split_empty_post_is_fatal() {
        let records = vec![record("pre", 1.0), record("pre", 2.0)];
        let err = InterventionGroups::split(&records).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingInterventionData { pre: 2, post: 0 }
        ));
    }

    #[test]
    fn test_split_empty_input_is_fatal() {
        let err = InterventionGroups::split(&[]).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_INTERVENTION_DATA");
    }

    #[test]
    fn test_student_t_known_values() {
        // Pooled sd = 1, t = 7 / sqrt(2/3), df = 4
        let result = student_t_test(&[10.0, 12.0, 11.0], &[4.0, 5.0, 3.0]).unwrap();
        assert!((result.statistic - 8.573214099741124).abs() < 1e-9);
        assert_eq!(result.df, 4.0);
        assert!(result.p_value > 0.0009 && result.p_value < 0.0012);
    }

    #[test]
    fn test_student_t_symmetric() {
        let ab = student_t_test(&[1.0, 2.0, 4.0], &[2.0, 3.0, 3.5, 5.0]).unwrap();
        let ba = student_t_test(&[2.0, 3.0, 3.5, 5.0], &[1.0, 2.0, 4.0]).unwrap();
        assert!((ab.statistic + ba.statistic).abs() < 1e-12);
        assert!((ab.p_value - ba.p_value).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&ab.p_value));
    }

    #[test]
    fn test_student_t_identical_groups() {
        let result = student_t_test(&[5.0, 6.0, 7.0], &[5.0, 6.0, 7.0]).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert!((result.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_student_t_zero_variance() {
        let differ = student_t_test(&[3.0, 3.0], &[1.0, 1.0]).unwrap();
        assert!(differ.statistic.is_infinite());
        assert_eq!(differ.p_value, 0.0);

        let same = student_t_test(&[3.0, 3.0], &[3.0, 3.0]).unwrap();
        assert!(same.statistic.is_nan());
        assert!(same.p_value.is_nan());
    }

    #[test]
    fn test_student_t_too_few_observations() {
        let result = student_t_test(&[1.0], &[2.0]).unwrap();
        assert!(result.statistic.is_nan());
        assert!(result.p_value.is_nan());
        assert_eq!(result.df, 0.0);
        assert_eq!(Significance::from_p_value(result.p_value), Significance::NotSignificant);
    }

    #[test]
    fn test_student_t_single_observation_group() {
        let result = student_t_test(&[9.0], &[4.0, 5.0, 3.0]).unwrap();
        assert!(result.p_value.is_nan());
        assert_eq!(result.df, 2.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10.0, 12.0, 11.0]).unwrap(), 11.0);
        assert_eq!(mean(&[]).unwrap_err().error_code(), "STATISTICS_ERROR");
    }

    #[test]
    fn test_significance_threshold_is_strict() {
        assert_eq!(Significance::from_p_value(0.049), Significance::Significant);
        assert_eq!(Significance::from_p_value(0.05), Significance::NotSignificant);
        assert_eq!(Significance::from_p_value(0.5), Significance::NotSignificant);
    }

    #[test]
    fn test_compare_disease_cases_significant() {
        let records: Vec<HealthRecord> = [10.0, 12.0, 11.0]
            .iter()
            .map(|&c| record("pre", c))
            .chain([4.0, 5.0, 3.0].iter().map(|&c| record("post", c)))
            .collect();

        let groups = InterventionGroups::split(&records).unwrap();
        let comparison = compare_disease_cases(&groups).unwrap();
        assert_eq!(comparison.pre_count, 3);
        assert_eq!(comparison.post_count, 3);
        assert!(comparison.t_test.p_value < 0.05);
        assert_eq!(comparison.significance, Significance::Significant);
    }
}
