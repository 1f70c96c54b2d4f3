//! Dashed latitude/longitude lines.

use super::canvas::Canvas;
use crate::colortables::Rgba;
use crate::error::{BjerknesError, Result};

const GRIDLINE_WIDTH: f32 = 0.8;
const GRIDLINE_DASH: [f32; 2] = [4.0, 4.0];

/// Multiples of `spacing` strictly inside `(lo, hi)`.
fn multiples_within(lo: f64, hi: f64, spacing: f64) -> Vec<f64> {
    let first = (lo / spacing).floor() as i64 + 1;
    let last = (hi / spacing).ceil() as i64 - 1;
    (first..=last).map(|k| k as f64 * spacing).collect()
}

impl Canvas {
    /// Draw meridians and parallels every `spacing` degrees. Returns the
    /// number of lines drawn; a second call on the same canvas draws none.
    pub fn gridlines(&mut self, spacing: f64, color: Rgba) -> Result<usize> {
        if spacing.is_nan() || spacing <= 0.0 {
            return Err(BjerknesError::InvalidParameter {
                param: "gridline_spacing".to_string(),
                message: format!("must be positive, got {}", spacing),
            });
        }
        if !self.record_overlay("gridlines") {
            return Ok(0);
        }

        let view = *self.view();
        let extent = view.extent;
        let (w, h) = (view.width as f32, view.height as f32);
        let mut drawn = 0;

        for lon in multiples_within(extent.lon_min, extent.lon_max, spacing) {
            let x = view.x_of(lon) as f32;
            self.stroke_pixels(&[(x, 0.0), (x, h)], false, color, GRIDLINE_WIDTH, Some(&GRIDLINE_DASH));
            drawn += 1;
        }
        for lat in multiples_within(extent.lat_min, extent.lat_max, spacing) {
            let y = view.y_of(lat) as f32;
            self.stroke_pixels(&[(0.0, y), (w, y)], false, color, GRIDLINE_WIDTH, Some(&GRIDLINE_DASH));
            drawn += 1;
        }
        Ok(drawn)
    }
}
