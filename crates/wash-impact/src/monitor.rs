//! Live monitor state: the growing series and the tick state machine.
//!
//! The series is an owned, append-only buffer. [`LiveMonitor::tick`] takes it
//! by value and hands it back with one more point, so nothing outside the
//! caller's loop ever holds the data.

use crate::charts::padded_range;
use crate::error::{AnalysisError, Result};
use crate::ingest::records::series_points;
use polars::prelude::DataFrame;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;
use tracing::{debug, info};

/// Ordered `(time, access_to_clean_water)` points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveSeries {
    points: Vec<(f64, f64)>,
}

/// Axis limits that fit every point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl LiveSeries {
    /// Start a series from seed points. `source` names where they came from
    /// and is only used in the error for an empty seed.
    pub fn new(source: &str, points: Vec<(f64, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(AnalysisError::EmptySeries(source.to_string()));
        }
        Ok(Self { points })
    }

    /// Build from a cleaned `time` / `access_to_clean_water` table.
    pub fn from_frame(source: &str, df: &DataFrame) -> Result<Self> {
        Self::new(source, series_points(df)?)
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent point. A series is never empty once constructed.
    pub fn last(&self) -> (f64, f64) {
        self.points[self.points.len() - 1]
    }

    /// Next random-walk point: time + 1, value + N(0, 1).
    pub fn next_point<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        let (time, value) = self.last();
        let step: f64 = rng.sample(StandardNormal);
        (time + 1.0, value + step)
    }

    /// Append one synthetic point and return the grown series.
    pub fn advance<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        let point = self.next_point(rng);
        self.points.push(point);
        self
    }

    /// Axis limits covering every point seen so far, with a small margin.
    pub fn bounds(&self) -> ViewBounds {
        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in &self.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }

        let x = padded_range(x_min, x_max);
        let y = padded_range(y_min, y_max);
        ViewBounds {
            x_min: x.start,
            x_max: x.end,
            y_min: y.start,
            y_max: y.end,
        }
    }
}

/// Animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    /// Created, not yet started.
    Idle,
    /// Ticking; `tick` counts completed ticks.
    Running { tick: usize },
    /// All frames done. Terminal.
    Finished,
}

/// Drives a [`LiveSeries`] through a fixed number of ticks.
#[derive(Debug, Clone)]
pub struct LiveMonitor {
    state: MonitorState,
    frames: usize,
}

impl LiveMonitor {
    pub fn new(frames: usize) -> Self {
        Self {
            state: MonitorState::Idle,
            frames,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.state == MonitorState::Finished
    }

    /// Idle -> Running. Has no effect in any other state.
    pub fn start(&mut self) {
        if self.state == MonitorState::Idle {
            info!("Live monitor started ({} frames)", self.frames);
            self.state = if self.frames == 0 {
                MonitorState::Finished
            } else {
                MonitorState::Running { tick: 0 }
            };
        }
    }

    /// Run one tick: append one synthetic point to `series` and return it.
    ///
    /// Outside `Running` the series comes back unchanged. The tick that
    /// completes the last frame moves the monitor to `Finished`.
    pub fn tick<R: Rng + ?Sized>(&mut self, series: LiveSeries, rng: &mut R) -> LiveSeries {
        let MonitorState::Running { tick } = self.state else {
            return series;
        };

        let series = series.advance(rng);
        let done = tick + 1;
        let (time, value) = series.last();
        debug!("Tick {}/{}: t = {}, value = {:.2}", done, self.frames, time, value);

        self.state = if done >= self.frames {
            info!("Live monitor finished after {} ticks", done);
            MonitorState::Finished
        } else {
            MonitorState::Running { tick: done }
        };
        series
    }
}
