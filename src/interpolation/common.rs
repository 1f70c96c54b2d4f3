//! Common utilities for interpolation algorithms.
//!
//! This module provides shared functionality used by various interpolation methods.

use crate::error::{BjerknesError, Result};

/// Map a coordinate value to a fractional index on a monotonic axis.
///
/// The axis may be ascending or descending. Returns `None` when the value
/// lies outside the axis.
pub fn coord_to_index(coord: f64, coord_values: &[f64]) -> Option<f64> {
    let n = coord_values.len();
    if n == 0 || !coord.is_finite() {
        return None;
    }
    if n == 1 {
        return (coord == coord_values[0]).then_some(0.0);
    }

    let first = coord_values[0];
    let last = coord_values[n - 1];
    let ascending = last > first;
    let (lo, hi) = if ascending { (first, last) } else { (last, first) };
    if coord < lo || coord > hi {
        return None;
    }

    let k = if ascending {
        coord_values.partition_point(|&v| v <= coord)
    } else {
        coord_values.partition_point(|&v| v >= coord)
    };
    let i = k.clamp(1, n - 1) - 1;
    let (v0, v1) = (coord_values[i], coord_values[i + 1]);
    let fraction = if v1 == v0 { 0.0 } else { (coord - v0) / (v1 - v0) };
    Some(i as f64 + fraction)
}

/// Clamp an index to valid bounds
pub fn clamp_index(index: f64, size: usize) -> f64 {
    index.max(0.0).min((size - 1) as f64)
}

/// Get the weight for linear interpolation
pub fn linear_weight(fraction: f64) -> (f64, f64) {
    (1.0 - fraction, fraction)
}

/// Check that `data` is a row-major 2-D array of `shape` and that two
/// fractional indices were given.
pub fn check_2d(data: &[f32], shape: &[usize], indices: &[f64]) -> Result<(usize, usize)> {
    if shape.len() != 2 || indices.len() != 2 {
        return Err(BjerknesError::Interpolation {
            message: format!(
                "expected 2-D shape and indices, got {} and {} dimensions",
                shape.len(),
                indices.len()
            ),
        });
    }
    let (rows, cols) = (shape[0], shape[1]);
    if rows == 0 || cols == 0 || data.len() != rows * cols {
        return Err(BjerknesError::Interpolation {
            message: format!(
                "data length {} does not match shape {}x{}",
                data.len(),
                rows,
                cols
            ),
        });
    }
    Ok((rows, cols))
}

/// Weighted sum over the contributing points; a NaN at any point with
/// non-zero weight makes the result NaN.
pub fn weighted_sum(points: impl Iterator<Item = (f32, f64)>) -> f32 {
    let mut sum = 0.0;
    for (value, weight) in points {
        if weight == 0.0 {
            continue;
        }
        if value.is_nan() {
            return f32::NAN;
        }
        sum += value as f64 * weight;
    }
    sum as f32
}
