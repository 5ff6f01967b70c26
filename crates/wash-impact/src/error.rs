//! Error types for the impact analysis and live monitor.
//!
//! Every failure in this crate is fatal for the run that raised it: nothing is
//! retried and no partial results are reported. The variants exist so that the
//! binaries can say *what* went wrong (a missing column at startup, an empty
//! intervention group, a window that could not be opened) instead of surfacing
//! a bare lookup failure deep inside a computation.

use crate::config::ConfigValidationError;
use plotters::drawing::DrawingAreaErrorKind;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A required column is absent from an input table.
    #[error("Column '{column}' not found in {dataset} dataset")]
    ColumnNotFound { dataset: String, column: String },

    /// A required column still holds a missing value after forward-fill.
    ///
    /// This only happens for leading gaps: missing values before the first
    /// valid observation of a column.
    #[error("Column '{column}' has an unresolved missing value at row {row} (leading gap)")]
    UnresolvedMissing { column: String, row: usize },

    /// One of the intervention groups has no records.
    #[error("No pre or post intervention data available for comparison (pre: {pre}, post: {post})")]
    MissingInterventionData { pre: usize, post: usize },

    /// The live series has no seed point to continue from.
    #[error("Series loaded from '{0}' is empty")]
    EmptySeries(String),

    /// A statistical distribution could not be constructed.
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// Chart drawing failed.
    #[error("Failed to render chart: {0}")]
    Render(String),

    /// The on-screen window could not be created or updated.
    #[error("Display error: {0}")]
    Display(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Shorthand for [`AnalysisError::ColumnNotFound`].
    pub fn column_not_found(dataset: impl Into<String>, column: impl Into<String>) -> Self {
        AnalysisError::ColumnNotFound {
            dataset: dataset.into(),
            column: column.into(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, independent of the message text.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound { .. } => "COLUMN_NOT_FOUND",
            Self::UnresolvedMissing { .. } => "UNRESOLVED_MISSING",
            Self::MissingInterventionData { .. } => "MISSING_INTERVENTION_DATA",
            Self::EmptySeries(_) => "EMPTY_SERIES",
            Self::Statistics(_) => "STATISTICS_ERROR",
            Self::Render(_) => "RENDER_ERROR",
            Self::Display(_) => "DISPLAY_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error is caused by the contents of an input file rather
    /// than by the environment (filesystem, window system).
    pub fn is_data_error(&self) -> bool {
        match self {
            Self::ColumnNotFound { .. }
            | Self::UnresolvedMissing { .. }
            | Self::MissingInterventionData { .. }
            | Self::EmptySeries(_) => true,
            Self::WithContext { source, .. } => source.is_data_error(),
            _ => false,
        }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for AnalysisError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        AnalysisError::Render(err.to_string())
    }
}

impl From<minifb::Error> for AnalysisError {
    fn from(err: minifb::Error) -> Self {
        AnalysisError::Display(err.to_string())
    }
}

/// Errors are serialized as `{ code, message }` so the `--json` output of the
/// binaries stays machine readable on failure too.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            AnalysisError::column_not_found("health", "village").error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            AnalysisError::MissingInterventionData { pre: 0, post: 3 }.error_code(),
            "MISSING_INTERVENTION_DATA"
        );
    }

    #[test]
    fn test_is_data_error() {
        assert!(AnalysisError::EmptySeries("series.csv".to_string()).is_data_error());
        assert!(
            AnalysisError::UnresolvedMissing {
                column: "time".to_string(),
                row: 0
            }
            .is_data_error()
        );
        assert!(!AnalysisError::Display("no window".to_string()).is_data_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = AnalysisError::column_not_found("water quality", "access_to_clean_water");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("access_to_clean_water"));
    }

    #[test]
    fn test_with_context_preserves_code() {
        let error = AnalysisError::MissingInterventionData { pre: 2, post: 0 }
            .with_context("Comparing intervention phases");
        assert!(error.to_string().contains("Comparing intervention phases"));
        assert_eq!(error.error_code(), "MISSING_INTERVENTION_DATA");
        assert!(error.is_data_error());
    }

    #[test]
    fn test_config_error_conversion() {
        let error: AnalysisError = ConfigValidationError::EmptyPath("series").into();
        assert_eq!(error.error_code(), "INVALID_CONFIG");
        assert!(!error.is_data_error());
    }

    #[test]
    fn test_missing_intervention_message() {
        let error = AnalysisError::MissingInterventionData { pre: 0, post: 4 };
        assert!(
            error
                .to_string()
                .starts_with("No pre or post intervention data available for comparison")
        );
    }
}
