//! Nearest neighbor interpolation.
//!
//! This method selects the value of the nearest grid point. It is the
//! fastest method and the right one for categorical fields such as land use.

use super::common;
use super::Interpolator;
use crate::error::Result;

/// Nearest neighbor interpolator
pub struct NearestInterpolator;

impl Interpolator for NearestInterpolator {
    fn interpolate(&self, data: &[f32], shape: &[usize], indices: &[f64]) -> Result<f32> {
        let (rows, cols) = common::check_2d(data, shape, indices)?;
        let row = common::clamp_index(indices[0].round(), rows) as usize;
        let col = common::clamp_index(indices[1].round(), cols) as usize;
        Ok(data[row * cols + col])
    }

    fn name(&self) -> &str {
        "nearest"
    }
}
