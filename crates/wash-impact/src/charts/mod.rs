//! Chart rendering and the on-screen figure window.
//!
//! Drawing functions are generic over the plotters backend. The programs draw
//! into an in-memory RGB bitmap which [`FigureWindow`] pushes to a native
//! window; nothing is written to disk.

pub mod dashboard;
pub mod live;

use crate::error::Result;
use minifb::{Key, Window, WindowOptions};
use plotters::prelude::*;
use tracing::debug;

pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const FONT: &str = "sans-serif";

/// Text in the dark theme.
pub fn white_text<'a>(size: u32) -> TextStyle<'a> {
    (FONT, f64::from(size)).into_font().color(&WHITE)
}

/// Value axis range that always includes zero, padded by 10%.
///
/// An empty or all-zero input yields `0..1` so the axis is never empty.
pub fn zero_based_range(values: &[f64]) -> std::ops::Range<f64> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min == 0.0 && max == 0.0 {
        return 0.0..1.0;
    }
    let pad = (max - min) * 0.1;
    let lower = if min < 0.0 { min - pad } else { 0.0 };
    let upper = if max > 0.0 { max + pad } else { 0.0 };
    lower..upper
}

/// Fraction of the data span added on each side of a fitted axis.
pub const AXIS_MARGIN: f64 = 0.05;

/// Axis range fitted to `min..max` with a 5% margin on each side.
///
/// A zero-width span gets `max(|value| * 5%, 1)` of room either way so the
/// range is never empty.
pub fn padded_range(min: f64, max: f64) -> std::ops::Range<f64> {
    let span = max - min;
    if span > 0.0 {
        (min - span * AXIS_MARGIN)..(max + span * AXIS_MARGIN)
    } else {
        let room = (min.abs() * AXIS_MARGIN).max(1.0);
        (min - room)..(max + room)
    }
}

/// A native window showing a bitmap-rendered figure.
pub struct FigureWindow {
    window: Window,
    size: (u32, u32),
    rgb: Vec<u8>,
    argb: Vec<u32>,
}

impl FigureWindow {
    pub fn open(title: &str, size: (u32, u32)) -> Result<Self> {
        let (width, height) = (size.0 as usize, size.1 as usize);
        let mut window = Window::new(title, width, height, WindowOptions::default())?;
        window.set_target_fps(30);
        debug!("Opened window '{}' ({}x{})", title, width, height);

        Ok(Self {
            window,
            size,
            rgb: vec![0; width * height * 3],
            argb: vec![0; width * height],
        })
    }

    /// Open while the user has not closed the window or pressed Escape.
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Redraw the whole figure and show it.
    pub fn render<F>(&mut self, draw: F) -> Result<()>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>) -> Result<()>,
    {
        {
            let root = BitMapBackend::with_buffer(&mut self.rgb, self.size).into_drawing_area();
            draw(&root)?;
            root.present()?;
        }

        for (pixel, rgb) in self.argb.iter_mut().zip(self.rgb.chunks_exact(3)) {
            *pixel = (u32::from(rgb[0]) << 16) | (u32::from(rgb[1]) << 8) | u32::from(rgb[2]);
        }
        self.refresh()
    }

    /// Push the current frame again and process window events.
    pub fn refresh(&mut self) -> Result<()> {
        let (width, height) = (self.size.0 as usize, self.size.1 as usize);
        self.window.update_with_buffer(&self.argb, width, height)?;
        Ok(())
    }

    /// Keep the last frame on screen until the window is closed.
    pub fn hold(&mut self) -> Result<()> {
        while self.is_open() {
            self.refresh()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_based_range_empty() {
        assert_eq!(zero_based_range(&[]), 0.0..1.0);
    }

    #[test]
    fn test_zero_based_range_positive() {
        let range = zero_based_range(&[10.0, 40.0]);
        assert_eq!(range.start, 0.0);
        assert!(range.end > 40.0);
    }

    #[test]
    fn test_zero_based_range_mixed_signs() {
        let range = zero_based_range(&[-7.0, 25.0, 10.0]);
        assert!(range.start < -7.0);
        assert!(range.end > 25.0);
    }

    #[test]
    fn test_padded_range_does_not_force_zero() {
        let range = padded_range(10.0, 20.0);
        assert!((range.start - 9.5).abs() < 1e-12);
        assert!((range.end - 20.5).abs() < 1e-12);
    }

    #[test]
    fn test_padded_range_single_value() {
        let range = padded_range(80.0, 80.0);
        assert!((range.start - 76.0).abs() < 1e-12);
        assert!((range.end - 84.0).abs() < 1e-12);
        assert_eq!(padded_range(0.0, 0.0), -1.0..1.0);
    }

    #[test]
    fn test_zero_based_range_ignores_nan() {
        let range = zero_based_range(&[f64::NAN, -3.0]);
        assert!(range.start < -3.0);
        assert_eq!(range.end, 0.0);
    }
}
