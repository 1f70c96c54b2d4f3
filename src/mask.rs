//! Masking of gridded fields with geographic polygons.
//!
//! A [`MaskRegion`] is a set of polygons in lon/lat. [`grid_mask`] decides
//! for every grid point whether it lies inside the region, recursively
//! splitting the grid into quadrants so that blocks wholly inside or wholly
//! outside are resolved with a single polygon test. Points on the region's
//! boundary count as inside.

use geo::{
    Area, BoundingRect, Contains, Intersects, LineString, MultiPolygon, Point, Polygon, Rect,
};
use ndarray::{Array2, Zip};
use tracing::debug;

use crate::error::{BjerknesError, Result};
use crate::grid::Grid;
use crate::state::Dataset;

/// Blocks at or below this many cells are resolved point by point.
const MIN_BLOCK_CELLS: usize = 4;

/// A named set of polygons used to include grid cells or pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskRegion {
    pub name: String,
    pub polygons: MultiPolygon<f64>,
}

impl MaskRegion {
    pub fn new(name: &str, polygons: MultiPolygon<f64>) -> Self {
        MaskRegion {
            name: name.to_string(),
            polygons,
        }
    }

    pub fn from_polygon(name: &str, polygon: Polygon<f64>) -> Self {
        Self::new(name, MultiPolygon::new(vec![polygon]))
    }

    /// A region bounded by one closed outline.
    pub fn from_outline(name: &str, ring: &LineString<f64>) -> Self {
        Self::from_polygon(name, Polygon::new(ring.clone(), vec![]))
    }

    /// A rectangular region, mostly useful for tests and bbox clips.
    pub fn from_rect(name: &str, rect: Rect<f64>) -> Self {
        Self::from_polygon(name, rect.to_polygon())
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.0.is_empty()
    }

    /// Keep only the polygon with the largest area.
    pub fn largest(&self) -> MaskRegion {
        let largest = self
            .polygons
            .0
            .iter()
            .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
            .cloned();
        MaskRegion {
            name: self.name.clone(),
            polygons: MultiPolygon::new(largest.into_iter().collect()),
        }
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.polygons.bounding_rect()
    }

    /// Whether a point lies inside or on the boundary of the region.
    pub fn covers(&self, lon: f64, lat: f64) -> bool {
        let point = Point::new(lon, lat);
        self.polygons.0.iter().any(|p| p.intersects(&point))
    }

    fn block_inside(&self, block: &Polygon<f64>) -> bool {
        self.polygons.0.iter().any(|p| p.contains(block))
    }

    fn block_touches(&self, block: &Rect<f64>) -> bool {
        self.polygons.0.iter().any(|p| p.intersects(block))
    }
}

/// Longitude shift (a multiple of 360) that brings the grid's longitudes
/// next to the region.
fn longitude_shift(region: &MaskRegion, lons: &[f64]) -> f64 {
    let Some(rect) = region.bounding_rect() else {
        return 0.0;
    };
    let region_center = (rect.min().x + rect.max().x) / 2.0;
    let (lo, hi) = lons
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let grid_center = (lo + hi) / 2.0;
    360.0 * ((region_center - grid_center) / 360.0).round()
}

struct Subdivider<'a> {
    region: &'a MaskRegion,
    lons: Vec<f64>,
    lats: &'a [f64],
    mask: Array2<bool>,
}

impl Subdivider<'_> {
    fn block_rect(&self, rows: (usize, usize), cols: (usize, usize)) -> Rect<f64> {
        let min_max = |values: &[f64]| {
            values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        let (lon_min, lon_max) = min_max(&self.lons[cols.0..cols.1]);
        let (lat_min, lat_max) = min_max(&self.lats[rows.0..rows.1]);
        Rect::new((lon_min, lat_min), (lon_max, lat_max))
    }

    fn fill(&mut self, rows: (usize, usize), cols: (usize, usize)) {
        let n_rows = rows.1 - rows.0;
        let n_cols = cols.1 - cols.0;
        if n_rows == 0 || n_cols == 0 {
            return;
        }

        let rect = self.block_rect(rows, cols);
        if !self.region.block_touches(&rect) {
            return;
        }

        if n_rows * n_cols <= MIN_BLOCK_CELLS || n_rows == 1 || n_cols == 1 {
            for i in rows.0..rows.1 {
                for j in cols.0..cols.1 {
                    self.mask[[i, j]] = self.region.covers(self.lons[j], self.lats[i]);
                }
            }
            return;
        }

        if self.region.block_inside(&rect.to_polygon()) {
            self.mask
                .slice_mut(ndarray::s![rows.0..rows.1, cols.0..cols.1])
                .fill(true);
            return;
        }

        let mid_row = rows.0 + n_rows / 2;
        let mid_col = cols.0 + n_cols / 2;
        self.fill((rows.0, mid_row), (cols.0, mid_col));
        self.fill((rows.0, mid_row), (mid_col, cols.1));
        self.fill((mid_row, rows.1), (cols.0, mid_col));
        self.fill((mid_row, rows.1), (mid_col, cols.1));
    }
}

/// Boolean mask of shape `(lats.len(), lons.len())`, true inside the region.
pub fn grid_mask(region: &MaskRegion, lons: &[f64], lats: &[f64]) -> Array2<bool> {
    let mask = Array2::from_elem((lats.len(), lons.len()), false);
    if region.is_empty() || lons.is_empty() || lats.is_empty() {
        return mask;
    }

    let shift = longitude_shift(region, lons);
    let mut subdivider = Subdivider {
        region,
        lons: lons.iter().map(|lon| lon + shift).collect(),
        lats,
        mask,
    };
    subdivider.fill((0, lats.len()), (0, lons.len()));
    debug!(
        region = %region.name,
        inside = subdivider.mask.iter().filter(|&&m| m).count(),
        "Computed grid mask"
    );
    subdivider.mask
}

/// Mask from a single closed outline.
pub fn outline_mask(ring: &LineString<f64>, lons: &[f64], lats: &[f64]) -> Array2<bool> {
    grid_mask(&MaskRegion::from_outline("outline", ring), lons, lats)
}

/// Set every cell where `mask` is false to `NaN`.
pub fn apply_mask(grid: &Grid, mask: &Array2<bool>) -> Result<Grid> {
    if mask.dim() != grid.shape() {
        return Err(BjerknesError::Geometry {
            message: format!(
                "mask shape {:?} does not match grid shape {:?}",
                mask.dim(),
                grid.shape()
            ),
        });
    }
    let mut values = grid.values.clone();
    Zip::from(&mut values).and(mask).for_each(|v, &inside| {
        if !inside {
            *v = f32::NAN;
        }
    });
    Ok(Grid {
        lons: grid.lons.clone(),
        lats: grid.lats.clone(),
        values,
    })
}

/// Mask a grid with a region.
pub fn mask_grid(grid: &Grid, region: &MaskRegion) -> Result<Grid> {
    let mask = grid_mask(region, &grid.lons, &grid.lats);
    apply_mask(grid, &mask)
}

/// Mask every 2-D lat/lon slice of a variable, returning a new dataset.
pub fn mask_dataset(dataset: &Dataset, var: &str, region: &MaskRegion) -> Result<Dataset> {
    let meta = dataset.get_variable_metadata_checked(var)?;
    let (lat_axis, lon_axis) = dataset.lat_lon_axes(var)?;
    let lats = dataset.get_coordinate_checked(&meta.dimensions[lat_axis])?;
    let lons = dataset.get_coordinate_checked(&meta.dimensions[lon_axis])?;
    let mask = grid_mask(region, lons, lats);

    let mut masked = dataset.clone();
    let array = masked.variable_mut(var)?;
    for (ix, value) in array.indexed_iter_mut() {
        if !mask[[ix[lat_axis], ix[lon_axis]]] {
            *value = f32::NAN;
        }
    }
    Ok(masked)
}
