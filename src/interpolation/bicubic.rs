//! Bicubic (Catmull-Rom) interpolation.
//!
//! Uses the 4x4 neighbourhood around the sample point. Indices outside the
//! grid are clamped to the edge, so the border rows and columns are
//! repeated.

use super::common;
use super::Interpolator;
use crate::error::Result;

/// Bicubic interpolator
pub struct BicubicInterpolator;

/// Catmull-Rom weights for the points at offsets -1, 0, 1, 2.
fn catmull_rom_weights(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        (-t3 + 2.0 * t2 - t) / 2.0,
        (3.0 * t3 - 5.0 * t2 + 2.0) / 2.0,
        (-3.0 * t3 + 4.0 * t2 + t) / 2.0,
        (t3 - t2) / 2.0,
    ]
}

impl Interpolator for BicubicInterpolator {
    fn interpolate(&self, data: &[f32], shape: &[usize], indices: &[f64]) -> Result<f32> {
        let (rows, cols) = common::check_2d(data, shape, indices)?;
        let r = common::clamp_index(indices[0], rows);
        let c = common::clamp_index(indices[1], cols);

        let r0 = r.floor();
        let c0 = c.floor();
        let wr = catmull_rom_weights(r - r0);
        let wc = catmull_rom_weights(c - c0);

        let clamp_row = |i: f64| common::clamp_index(i, rows) as usize;
        let clamp_col = |i: f64| common::clamp_index(i, cols) as usize;

        let points = (0..4).flat_map(|i| {
            let row = clamp_row(r0 + i as f64 - 1.0);
            (0..4).map(move |j| {
                let col = clamp_col(c0 + j as f64 - 1.0);
                (data[row * cols + col], wr[i] * wc[j])
            })
        });
        Ok(common::weighted_sum(points))
    }

    fn name(&self) -> &str {
        "bicubic"
    }
}
