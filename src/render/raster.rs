//! Filled (raster) rendering of gridded fields.

use tiny_skia::{ColorU8, FillRule, Mask, Pixmap, PixmapPaint, Transform};
use tracing::debug;

use super::canvas::Canvas;
use crate::colortables::{ColorTable, Scale};
use crate::error::{BjerknesError, Result};
use crate::grid::Grid;
use crate::interpolation::Interpolator;
use crate::mask::MaskRegion;

impl Canvas {
    /// Color every map pixel from the grid value at its center.
    ///
    /// Relative tables are stretched over the grid's value range first.
    /// With `clip`, only pixels inside the region are drawn. Returns the
    /// number of pixels that received a color.
    pub fn fill_grid(
        &mut self,
        grid: &Grid,
        table: &ColorTable,
        resampling: &dyn Interpolator,
        clip: Option<&MaskRegion>,
    ) -> Result<usize> {
        self.fill_grid_with_opacity(grid, table, resampling, clip, 1.0)
    }

    pub fn fill_grid_with_opacity(
        &mut self,
        grid: &Grid,
        table: &ColorTable,
        resampling: &dyn Interpolator,
        clip: Option<&MaskRegion>,
        opacity: f32,
    ) -> Result<usize> {
        let table = match (table.scale, grid.value_range()) {
            (Scale::Relative, Some((lo, hi))) => table.fit_to(lo as f64, hi as f64),
            (Scale::Relative, None) => return Ok(0),
            (Scale::Absolute, _) => table.clone(),
        };

        let view = *self.view();
        let mut layer = Pixmap::new(self.width(), self.height()).ok_or_else(|| BjerknesError::Render {
            message: "cannot allocate the fill layer".to_string(),
        })?;

        let lons: Vec<f64> = (0..view.width).map(|px| view.pixel_center(px, 0).0).collect();
        let cols: Vec<Option<f64>> = lons.iter().map(|&lon| grid.col_index(lon)).collect();
        let cyclic = grid.is_cyclic();
        let rows: Vec<Option<f64>> = (0..view.height)
            .map(|py| grid.row_index(view.pixel_center(0, py).1))
            .collect();

        let width = self.width() as usize;
        let pixels = layer.pixels_mut();
        let mut colored = 0usize;
        for (py, row) in rows.iter().enumerate() {
            let Some(row) = row else { continue };
            for (px, col) in cols.iter().enumerate() {
                let value = match col {
                    Some(col) => grid.sample_index(*row, *col, resampling),
                    None if cyclic => match grid.seam_sample(*row, lons[px], resampling) {
                        Some(value) => value,
                        None => continue,
                    },
                    None => continue,
                };
                if let Some(color) = table.map(value as f64) {
                    let [r, g, b, a] = color.0;
                    pixels[py * width + px] = ColorU8::from_rgba(r, g, b, a).premultiply();
                    colored += 1;
                }
            }
        }

        let mask = match clip {
            Some(region) => self.region_mask(region)?,
            None => self.map_clip().clone(),
        };
        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            ..Default::default()
        };
        self.pixmap_mut()
            .draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), Some(&mask));

        debug!(
            colortable = %table.name,
            colored = colored,
            clipped = clip.is_some(),
            "Filled grid"
        );
        Ok(colored)
    }

    /// Mask of the map pixels inside a region.
    pub fn region_mask(&self, region: &MaskRegion) -> Result<Mask> {
        let mut mask = Mask::new(self.width(), self.height()).ok_or_else(|| BjerknesError::Render {
            message: "cannot allocate the clip mask".to_string(),
        })?;
        for polygon in &region.polygons.0 {
            if let Some(path) = self.polygon_path(polygon) {
                mask.fill_path(&path, FillRule::EvenOdd, true, Transform::identity());
            }
        }
        // keep the clip inside the map area
        let map_area = self.map_clip();
        for (m, area) in mask.data_mut().iter_mut().zip(map_area.data()) {
            *m = ((*m as u16 * *area as u16) / 255) as u8;
        }
        Ok(mask)
    }
}
