//! Interpolation algorithms for spatial data.
//!
//! Interpolators sample a row-major 2-D array at fractional `[row, col]`
//! indices. Rendering uses them to resample a model grid onto image pixels.

pub mod bicubic;
pub mod bilinear;
pub mod common;
pub mod nearest;

use crate::error::{BjerknesError, Result};

/// Trait for interpolation methods
pub trait Interpolator: Send + Sync {
    /// Interpolate a value at the given fractional indices
    fn interpolate(&self, data: &[f32], shape: &[usize], indices: &[f64]) -> Result<f32>;

    /// Get the name of this interpolation method
    fn name(&self) -> &str;
}

/// Names accepted by [`get_interpolator`].
pub const INTERPOLATION_METHODS: [&str; 3] = ["nearest", "bilinear", "bicubic"];

/// Get an interpolator by name
pub fn get_interpolator(name: &str) -> Result<Box<dyn Interpolator>> {
    match name.to_lowercase().as_str() {
        "nearest" => Ok(Box::new(nearest::NearestInterpolator)),
        "bilinear" => Ok(Box::new(bilinear::BilinearInterpolator)),
        "bicubic" => Ok(Box::new(bicubic::BicubicInterpolator)),
        _ => Err(BjerknesError::InvalidParameter {
            param: "interpolation".to_string(),
            message: format!("Unknown interpolation method: {}", name),
        }),
    }
}
