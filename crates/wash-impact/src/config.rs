//! Configuration for the dashboard and the live monitor.
//!
//! Analysis parameters (thresholds, alpha, frame count) are fixed constants.
//! The builders only carry where the input files live and how the result is
//! shown.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Villages with access below this percentage count as low-access.
pub const LOW_ACCESS_THRESHOLD: f64 = 50.0;

/// Significance level for the intervention t-test.
pub const ALPHA: f64 = 0.05;

/// Multiplier applied to `contaminant_level` when that column is present.
pub const CONTAMINANT_CONVERSION_FACTOR: f64 = 1.0;

/// Rows shown in the console preview of each raw table.
pub const PREVIEW_ROWS: usize = 5;

/// Number of ticks the live monitor runs before it stops appending.
pub const FRAME_COUNT: usize = 200;

/// Delay between two live monitor ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Default input file names, resolved against the working directory.
pub const DEFAULT_WATER_QUALITY_PATH: &str = "water_quality_india.csv";
pub const DEFAULT_HEALTH_PATH: &str = "health_outcomes_india.csv";
pub const DEFAULT_SERIES_PATH: &str = "water_quality_india_2024.csv";

/// Pixel size of the 2x2 dashboard figure.
pub const DASHBOARD_SIZE: (u32, u32) = (1500, 1200);

/// Pixel size of the live monitor figure.
pub const MONITOR_SIZE: (u32, u32) = (1200, 600);

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Input path for '{0}' must not be empty")]
    EmptyPath(&'static str),

    #[error("Invalid figure size {width}x{height} (both sides must be non-zero)")]
    InvalidFigureSize { width: u32, height: u32 },
}

/// Settings for the `impact-dashboard` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Water-quality CSV (village, access_to_clean_water, contaminant_level).
    pub water_quality_path: PathBuf,

    /// Health-outcomes CSV (village, intervention, time_period, ...).
    pub health_path: PathBuf,

    /// Figure size in pixels.
    pub figure_size: (u32, u32),

    /// Open a window with the charts after the console report.
    /// Default: true
    pub show_window: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            water_quality_path: PathBuf::from(DEFAULT_WATER_QUALITY_PATH),
            health_path: PathBuf::from(DEFAULT_HEALTH_PATH),
            figure_size: DASHBOARD_SIZE,
            show_window: true,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.water_quality_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("water_quality"));
        }
        if self.health_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("health"));
        }
        validate_size(self.figure_size)
    }
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    water_quality_path: Option<PathBuf>,
    health_path: Option<PathBuf>,
    figure_size: Option<(u32, u32)>,
    show_window: Option<bool>,
}

impl DashboardConfigBuilder {
    /// Set the water-quality CSV path.
    pub fn water_quality_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.water_quality_path = Some(path.into());
        self
    }

    /// Set the health-outcomes CSV path.
    pub fn health_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.health_path = Some(path.into());
        self
    }

    /// Set the figure size in pixels.
    pub fn figure_size(mut self, width: u32, height: u32) -> Self {
        self.figure_size = Some((width, height));
        self
    }

    /// Enable or disable the on-screen window.
    pub fn show_window(mut self, show: bool) -> Self {
        self.show_window = Some(show);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<DashboardConfig, ConfigValidationError> {
        let defaults = DashboardConfig::default();
        let config = DashboardConfig {
            water_quality_path: self
                .water_quality_path
                .unwrap_or(defaults.water_quality_path),
            health_path: self.health_path.unwrap_or(defaults.health_path),
            figure_size: self.figure_size.unwrap_or(defaults.figure_size),
            show_window: self.show_window.unwrap_or(defaults.show_window),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Settings for the `live-monitor` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seed time series CSV (time, access_to_clean_water).
    pub series_path: PathBuf,

    /// Fixed RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Figure size in pixels.
    pub figure_size: (u32, u32),
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            series_path: PathBuf::from(DEFAULT_SERIES_PATH),
            seed: None,
            figure_size: MONITOR_SIZE,
        }
    }
}

impl MonitorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.series_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath("series"));
        }
        validate_size(self.figure_size)
    }
}

/// Builder for [`MonitorConfig`].
#[derive(Debug, Default)]
pub struct MonitorConfigBuilder {
    series_path: Option<PathBuf>,
    seed: Option<u64>,
    figure_size: Option<(u32, u32)>,
}

impl MonitorConfigBuilder {
    /// Set the seed series CSV path.
    pub fn series_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.series_path = Some(path.into());
        self
    }

    /// Fix the random walk seed for a reproducible run.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the figure size in pixels.
    pub fn figure_size(mut self, width: u32, height: u32) -> Self {
        self.figure_size = Some((width, height));
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<MonitorConfig, ConfigValidationError> {
        let defaults = MonitorConfig::default();
        let config = MonitorConfig {
            series_path: self.series_path.unwrap_or(defaults.series_path),
            seed: self.seed,
            figure_size: self.figure_size.unwrap_or(defaults.figure_size),
        };

        config.validate()?;
        Ok(config)
    }
}

fn validate_size((width, height): (u32, u32)) -> Result<(), ConfigValidationError> {
    if width == 0 || height == 0 {
        return Err(ConfigValidationError::InvalidFigureSize { width, height });
    }
    Ok(())
}
