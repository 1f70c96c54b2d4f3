//! Bilinear interpolation.
//!
//! This method performs linear interpolation in two dimensions using
//! the four nearest grid points.

use super::common;
use super::Interpolator;
use crate::error::Result;

/// Bilinear interpolator
pub struct BilinearInterpolator;

impl Interpolator for BilinearInterpolator {
    fn interpolate(&self, data: &[f32], shape: &[usize], indices: &[f64]) -> Result<f32> {
        let (rows, cols) = common::check_2d(data, shape, indices)?;
        let r = common::clamp_index(indices[0], rows);
        let c = common::clamp_index(indices[1], cols);

        let r0 = r.floor() as usize;
        let c0 = c.floor() as usize;
        let r1 = (r0 + 1).min(rows - 1);
        let c1 = (c0 + 1).min(cols - 1);
        let (wr0, wr1) = common::linear_weight(r - r0 as f64);
        let (wc0, wc1) = common::linear_weight(c - c0 as f64);

        let at = |row: usize, col: usize| data[row * cols + col];
        Ok(common::weighted_sum(
            [
                (at(r0, c0), wr0 * wc0),
                (at(r0, c1), wr0 * wc1),
                (at(r1, c0), wr1 * wc0),
                (at(r1, c1), wr1 * wc1),
            ]
            .into_iter(),
        ))
    }

    fn name(&self) -> &str {
        "bilinear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bilinear_interpolation() {
        let data = [0.0, 10.0, 20.0, 30.0];
        let shape = [2, 2];
        let interp = BilinearInterpolator;
        assert_eq!(interp.interpolate(&data, &shape, &[0.0, 0.0]).unwrap(), 0.0);
        assert_eq!(interp.interpolate(&data, &shape, &[0.5, 0.5]).unwrap(), 15.0);
        assert_eq!(interp.interpolate(&data, &shape, &[1.0, 0.5]).unwrap(), 25.0);
        assert_eq!(interp.interpolate(&data, &shape, &[1.0, 1.0]).unwrap(), 30.0);
    }

    #[test]
    fn test_nan_neighbour_propagates() {
        let data = [0.0, f32::NAN, 20.0, 30.0];
        let interp = BilinearInterpolator;
        assert!(interp.interpolate(&data, &[2, 2], &[0.5, 0.5]).unwrap().is_nan());
        // a NaN with zero weight does not contribute
        assert_eq!(interp.interpolate(&data, &[2, 2], &[1.0, 0.0]).unwrap(), 20.0);
    }
}
