use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Column names
// ============================================================================

pub mod columns {
    pub const VILLAGE: &str = "village";
    pub const ACCESS_TO_CLEAN_WATER: &str = "access_to_clean_water";
    pub const CONTAMINANT_LEVEL: &str = "contaminant_level";
    pub const INTERVENTION: &str = "intervention";
    pub const TIME_PERIOD: &str = "time_period";
    pub const WATERBORNE_DISEASE_CASES: &str = "waterborne_disease_cases";
    pub const ECONOMIC_OUTPUT: &str = "economic_output";
    pub const SCHOOL_ATTENDANCE: &str = "school_attendance";
    pub const TIME: &str = "time";
}

// ============================================================================
// Records
// ============================================================================

/// One village observation from the water-quality table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterQualityRecord {
    pub village: String,
    /// Percentage of households with access to clean water (0-100 expected).
    pub access_to_clean_water: f64,
    /// `None` when the table has no contaminant column at all.
    pub contaminant_level: Option<f64>,
}

/// Which side of the intervention a health observation was taken on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionPhase {
    Pre,
    Post,
    /// Any label other than exactly `pre` or `post`. Such rows are kept for
    /// the charts but belong to neither comparison group.
    Other(String),
}

impl InterventionPhase {
    /// Exact, case-sensitive match on the raw label.
    pub fn parse(label: &str) -> Self {
        match label {
            "pre" => Self::Pre,
            "post" => Self::Post,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for InterventionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pre => write!(f, "pre"),
            Self::Post => write!(f, "post"),
            Self::Other(label) => write!(f, "{}", label),
        }
    }
}

/// One village observation from the health-outcomes table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub village: String,
    pub intervention: InterventionPhase,
    pub time_period: String,
    pub waterborne_disease_cases: f64,
    pub economic_output: f64,
    pub school_attendance: f64,
}

// ============================================================================
// Derived results
// ============================================================================

/// A named post-minus-pre mean difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetric {
    pub name: &'static str,
    pub value: f64,
}

/// Outcome of the pre/post disease case comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Significant,
    NotSignificant,
}

impl Significance {
    /// Sentence printed after the test statistics.
    pub fn verdict(&self) -> &'static str {
        match self {
            Self::Significant => {
                "The intervention had a statistically significant impact on reducing waterborne diseases."
            }
            Self::NotSignificant => {
                "The intervention did not have a statistically significant impact on reducing waterborne diseases."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_parse_exact() {
        assert_eq!(InterventionPhase::parse("pre"), InterventionPhase::Pre);
        assert_eq!(InterventionPhase::parse("post"), InterventionPhase::Post);
        assert_eq!(
            InterventionPhase::parse("Pre"),
            InterventionPhase::Other("Pre".to_string())
        );
        assert_eq!(
            InterventionPhase::parse(" post"),
            InterventionPhase::Other(" post".to_string())
        );
    }

    #[test]
    fn test_phase_display_round_trips_label() {
        assert_eq!(InterventionPhase::Other("mid".to_string()).to_string(), "mid");
        assert_eq!(InterventionPhase::Post.to_string(), "post");
    }

    #[test]
    fn test_verdict_text() {
        assert!(Significance::Significant.verdict().contains("had a statistically"));
        assert!(Significance::NotSignificant.verdict().contains("did not have"));
    }
}
