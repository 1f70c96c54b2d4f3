//! Regular lat/lon grids.
//!
//! A [`Grid`] holds one 2-D field with rows along latitude and columns along
//! longitude. Either axis may run in either direction; missing values are
//! `NaN`.

use ndarray::{Array2, Zip};

use crate::error::{BjerknesError, Result};
use crate::geography::MapExtent;
use crate::interpolation::{common::coord_to_index, Interpolator};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub lons: Vec<f64>,
    pub lats: Vec<f64>,
    /// Shape `(lats.len(), lons.len())`.
    pub values: Array2<f32>,
}

fn check_axis(name: &str, axis: &[f64]) -> Result<()> {
    if axis.len() < 2 {
        return Err(BjerknesError::Geometry {
            message: format!("{} axis needs at least two points, got {}", name, axis.len()),
        });
    }
    if axis.iter().any(|v| !v.is_finite()) {
        return Err(BjerknesError::Geometry {
            message: format!("{} axis has non-finite coordinates", name),
        });
    }
    let ascending = axis.windows(2).all(|w| w[1] > w[0]);
    let descending = axis.windows(2).all(|w| w[1] < w[0]);
    if !(ascending || descending) {
        return Err(BjerknesError::Geometry {
            message: format!("{} axis is not strictly monotonic", name),
        });
    }
    Ok(())
}

impl Grid {
    pub fn new(lons: Vec<f64>, lats: Vec<f64>, values: Array2<f32>) -> Result<Self> {
        check_axis("longitude", &lons)?;
        check_axis("latitude", &lats)?;
        if values.dim() != (lats.len(), lons.len()) {
            return Err(BjerknesError::Geometry {
                message: format!(
                    "values have shape {:?} but the axes are {} lats x {} lons",
                    values.dim(),
                    lats.len(),
                    lons.len()
                ),
            });
        }
        Ok(Grid { lons, lats, values })
    }

    /// Build a grid by evaluating `f(lon, lat)` at every point.
    pub fn from_fn<F>(lons: Vec<f64>, lats: Vec<f64>, f: F) -> Result<Self>
    where
        F: Fn(f64, f64) -> f32,
    {
        let values = Array2::from_shape_fn((lats.len(), lons.len()), |(i, j)| f(lons[j], lats[i]));
        Self::new(lons, lats, values)
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn lon_range(&self) -> (f64, f64) {
        let (a, b) = (self.lons[0], self.lons[self.lons.len() - 1]);
        (a.min(b), a.max(b))
    }

    pub fn lat_range(&self) -> (f64, f64) {
        let (a, b) = (self.lats[0], self.lats[self.lats.len() - 1]);
        (a.min(b), a.max(b))
    }

    /// Bounding box of the grid points.
    pub fn extent(&self) -> MapExtent {
        let (lon_min, lon_max) = self.lon_range();
        let (lat_min, lat_max) = self.lat_range();
        MapExtent {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Minimum and maximum of the finite values, `None` if there are none.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn count_valid(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Shift a longitude into the grid's longitude span when it lies in
    /// another 360-degree window.
    pub fn wrap_lon(&self, lon: f64) -> f64 {
        let (lo, hi) = self.lon_range();
        if lon >= lo && lon <= hi {
            return lon;
        }
        let shifted = lo + (lon - lo).rem_euclid(360.0);
        if shifted <= hi {
            shifted
        } else {
            lon
        }
    }

    /// Fractional column index of a longitude, `None` outside the grid.
    pub fn col_index(&self, lon: f64) -> Option<f64> {
        coord_to_index(self.wrap_lon(lon), &self.lons)
    }

    /// Fractional row index of a latitude, `None` outside the grid.
    pub fn row_index(&self, lat: f64) -> Option<f64> {
        coord_to_index(lat, &self.lats)
    }

    /// Interpolate at fractional `(row, col)` indices; `NaN` on failure.
    pub fn sample_index(&self, row: f64, col: f64, interpolator: &dyn Interpolator) -> f32 {
        let shape = [self.lats.len(), self.lons.len()];
        match self.values.as_slice() {
            Some(data) => interpolator
                .interpolate(data, &shape, &[row, col])
                .unwrap_or(f32::NAN),
            None => {
                let owned: Vec<f32> = self.values.iter().copied().collect();
                interpolator
                    .interpolate(&owned, &shape, &[row, col])
                    .unwrap_or(f32::NAN)
            }
        }
    }

    /// Whether the longitudes close the globe, i.e. the gap between the last
    /// and first column is no wider than one grid step.
    pub fn is_cyclic(&self) -> bool {
        let (lo, hi) = self.lon_range();
        let step = (hi - lo) / (self.lons.len() - 1) as f64;
        hi - lo + step >= 360.0 - 1e-6
    }

    /// Value in the gap between the last and first columns of a cyclic grid,
    /// blended linearly from the two edge columns at `row`.
    ///
    /// `None` when the grid is not cyclic or `lon` is not in the gap.
    pub fn seam_sample(&self, row: f64, lon: f64, interpolator: &dyn Interpolator) -> Option<f32> {
        if !self.is_cyclic() {
            return None;
        }
        let (lo, hi) = self.lon_range();
        let shifted = lo + (lon - lo).rem_euclid(360.0);
        if shifted <= hi {
            return None;
        }
        let t = (shifted - hi) / (lo + 360.0 - hi);
        let last = (self.lons.len() - 1) as f64;
        let (hi_col, lo_col) = if self.lons[0] < self.lons[self.lons.len() - 1] {
            (last, 0.0)
        } else {
            (0.0, last)
        };
        let west = self.sample_index(row, hi_col, interpolator);
        let east = self.sample_index(row, lo_col, interpolator);
        if interpolator.name() == "nearest" {
            return Some(if t < 0.5 { west } else { east });
        }
        Some(((1.0 - t) * west as f64 + t * east as f64) as f32)
    }

    /// Interpolated value at a geographic point, `NaN` outside the grid.
    pub fn sample(&self, lon: f64, lat: f64, interpolator: &dyn Interpolator) -> f32 {
        match (self.row_index(lat), self.col_index(lon)) {
            (Some(row), Some(col)) => self.sample_index(row, col, interpolator),
            (Some(row), None) => self.seam_sample(row, lon, interpolator).unwrap_or(f32::NAN),
            _ => f32::NAN,
        }
    }

    /// Apply `f` to every value.
    pub fn map_values<F>(&self, f: F) -> Grid
    where
        F: Fn(f32) -> f32,
    {
        Grid {
            lons: self.lons.clone(),
            lats: self.lats.clone(),
            values: self.values.mapv(f),
        }
    }

    /// Whether two grids share the same coordinates.
    pub fn same_coords(&self, other: &Grid) -> bool {
        self.lons == other.lons && self.lats == other.lats
    }

    /// Wind speed from u and v components on the same grid.
    pub fn speed(u: &Grid, v: &Grid) -> Result<Grid> {
        if !u.same_coords(v) {
            return Err(BjerknesError::Geometry {
                message: "u and v components are on different grids".to_string(),
            });
        }
        let mut values = Array2::<f32>::zeros(u.values.dim());
        Zip::from(&mut values)
            .and(&u.values)
            .and(&v.values)
            .for_each(|s, &a, &b| *s = a.hypot(b));
        Ok(Grid {
            lons: u.lons.clone(),
            lats: u.lats.clone(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::{bilinear::BilinearInterpolator, nearest::NearestInterpolator};

    fn sample_grid() -> Grid {
        // lats descending, as in most GRIB-derived files
        Grid::from_fn(
            vec![100.0, 110.0, 120.0],
            vec![40.0, 30.0, 20.0],
            |lon, lat| (lon + lat) as f32,
        )
        .unwrap()
    }

    #[test]
    fn test_shape_checks() {
        let values = Array2::<f32>::zeros((2, 3));
        assert!(Grid::new(vec![0.0, 1.0], vec![0.0, 1.0], values.clone()).is_err());
        assert!(Grid::new(vec![0.0, 1.0, 1.0], vec![0.0, 1.0], values.clone()).is_err());
        assert!(Grid::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0], values).is_ok());
    }

    #[test]
    fn test_extent_and_range() {
        let grid = sample_grid();
        let extent = grid.extent();
        assert_eq!((extent.lon_min, extent.lon_max), (100.0, 120.0));
        assert_eq!((extent.lat_min, extent.lat_max), (20.0, 40.0));
        assert_eq!(grid.value_range(), Some((120.0, 160.0)));
    }

    #[test]
    fn test_sample_inside_and_outside() {
        let grid = sample_grid();
        assert_eq!(grid.sample(105.0, 35.0, &BilinearInterpolator), 140.0);
        assert_eq!(grid.sample(110.0, 30.0, &NearestInterpolator), 140.0);
        assert!(grid.sample(130.0, 30.0, &BilinearInterpolator).is_nan());
        assert!(grid.sample(110.0, 45.0, &BilinearInterpolator).is_nan());
    }

    #[test]
    fn test_longitude_wrapping() {
        let grid = Grid::from_fn(vec![0.0, 90.0, 180.0, 270.0], vec![-10.0, 10.0], |lon, _| {
            lon as f32
        })
        .unwrap();
        assert_eq!(grid.sample(-90.0, 0.0, &NearestInterpolator), 270.0);
    }

    #[test]
    fn test_global_grid_has_no_seam() {
        let lons: Vec<f64> = (0..360).map(f64::from).collect();
        let grid = Grid::from_fn(lons, vec![-10.0, 10.0], |lon, _| lon as f32).unwrap();
        assert!(grid.is_cyclic());

        let west = grid.sample(359.5, 0.0, &BilinearInterpolator);
        assert!((west - 179.5).abs() < 1e-3, "got {}", west);
        assert_eq!(grid.sample(-0.5, 0.0, &BilinearInterpolator), west);
        assert_eq!(grid.sample(359.25, 0.0, &NearestInterpolator), 359.0);
        assert_eq!(grid.sample(359.75, 0.0, &NearestInterpolator), 0.0);
        // still nothing outside the latitude span
        assert!(grid.sample(359.5, 20.0, &BilinearInterpolator).is_nan());
    }

    #[test]
    fn test_regional_grid_keeps_gap() {
        let grid = sample_grid();
        assert!(!grid.is_cyclic());
        assert_eq!(grid.seam_sample(1.0, 200.0, &BilinearInterpolator), None);
    }

    #[test]
    fn test_speed_and_valid_count() {
        let u = Grid::from_fn(vec![0.0, 1.0], vec![0.0, 1.0], |_, _| 3.0).unwrap();
        let v = u.map_values(|x| x + 1.0);
        let speed = Grid::speed(&u, &v).unwrap();
        assert!(speed.values.iter().all(|&s| s == 5.0));

        let masked = speed.map_values(|s| if s > 4.0 { f32::NAN } else { s });
        assert_eq!(masked.count_valid(), 0);
        assert_eq!(masked.value_range(), None);

        let other = Grid::from_fn(vec![0.0, 2.0], vec![0.0, 1.0], |_, _| 0.0).unwrap();
        assert!(Grid::speed(&u, &other).is_err());
    }
}
