//! Wind barbs drawn as vector glyphs.
//!
//! Speeds are rounded to the nearest 5 units: a pennant is 50, a full barb
//! 10 and a half barb 5. The shaft points into the wind. Feathers turn
//! clockwise from the shaft in the northern hemisphere and are mirrored
//! south of the equator.

use tracing::debug;

use super::canvas::Canvas;
use crate::colortables::Rgba;
use crate::error::{BjerknesError, Result};
use crate::grid::Grid;
use crate::interpolation::bilinear::BilinearInterpolator;

// glyph proportions relative to the shaft length
const SPACING: f32 = 0.125;
const FEATHER: f32 = 0.4;
const PENNANT_WIDTH: f32 = 0.25;
const EMPTY_RADIUS: f32 = 0.15;

#[derive(Debug, Clone)]
pub struct BarbStyle {
    /// Barbs along the shorter side of the map.
    pub regrid: usize,
    /// Factor applied to u and v before counting feathers.
    pub scale: f64,
    /// Shaft length in pixels.
    pub length: f32,
    pub color: Rgba,
    pub line_width: f32,
}

impl Default for BarbStyle {
    fn default() -> Self {
        BarbStyle {
            regrid: 15,
            scale: 2.5,
            length: 28.0,
            color: Rgba::BLACK,
            line_width: 1.0,
        }
    }
}

/// Glyph parts for one rounded speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarbElements {
    pub pennants: u32,
    pub full: u32,
    pub half: bool,
}

impl BarbElements {
    pub fn for_speed(speed: f64) -> Self {
        let rounded = ((speed.abs() / 5.0).round() as u32) * 5;
        BarbElements {
            pennants: rounded / 50,
            full: (rounded % 50) / 10,
            half: rounded % 10 >= 5,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pennants == 0 && self.full == 0 && !self.half
    }
}

impl Canvas {
    /// Draw one barb at a pixel position from already scaled components.
    pub fn draw_barb(&mut self, x: f32, y: f32, u: f64, v: f64, southern: bool, style: &BarbStyle) {
        let len = style.length;
        let elements = BarbElements::for_speed(u.hypot(v));
        if elements.is_empty() {
            let r = EMPTY_RADIUS * len;
            let circle: Vec<(f32, f32)> = (0..16)
                .map(|k| {
                    let a = k as f32 * std::f32::consts::TAU / 16.0;
                    (x + r * a.cos(), y + r * a.sin())
                })
                .collect();
            self.stroke_pixels(&circle, true, style.color, style.line_width, None);
            return;
        }

        // upwind in pixel space, y grows southward
        let norm = u.hypot(v) as f32;
        let (dx, dy) = (-u as f32 / norm, v as f32 / norm);
        let (px, py) = if southern { (dy, -dx) } else { (-dy, dx) };

        let tip = (x + dx * len, y + dy * len);
        self.stroke_pixels(&[(x, y), tip], false, style.color, style.line_width, None);

        let along = |offset: f32| (tip.0 - dx * offset, tip.1 - dy * offset);
        let mut offset = 0.0;

        for _ in 0..elements.pennants {
            let a = along(offset);
            let b = along(offset + PENNANT_WIDTH * len);
            let mid = along(offset + PENNANT_WIDTH * len / 2.0);
            let apex = (mid.0 + px * FEATHER * len, mid.1 + py * FEATHER * len);
            self.fill_pixels(&[a, apex, b], style.color);
            offset += PENNANT_WIDTH * len;
        }
        if elements.pennants > 0 {
            offset += SPACING * len;
        }

        for _ in 0..elements.full {
            let base = along(offset);
            let end = (
                base.0 + px * FEATHER * len + dx * SPACING * len,
                base.1 + py * FEATHER * len + dy * SPACING * len,
            );
            self.stroke_pixels(&[base, end], false, style.color, style.line_width, None);
            offset += SPACING * len;
        }

        if elements.half {
            // a lone half barb is set off from the tip
            if elements.pennants == 0 && elements.full == 0 {
                offset += SPACING * len;
            }
            let base = along(offset);
            let end = (
                base.0 + px * FEATHER * len / 2.0 + dx * SPACING * len / 2.0,
                base.1 + py * FEATHER * len / 2.0 + dy * SPACING * len / 2.0,
            );
            self.stroke_pixels(&[base, end], false, style.color, style.line_width, None);
        }
    }

    /// Draw barbs from u/v grids thinned onto a regular lattice.
    ///
    /// Points where either component is missing are skipped. Returns the
    /// number of barbs drawn.
    pub fn wind_barbs(&mut self, u: &Grid, v: &Grid, style: &BarbStyle) -> Result<usize> {
        if !u.same_coords(v) {
            return Err(BjerknesError::Geometry {
                message: "u and v components are on different grids".to_string(),
            });
        }
        if style.regrid == 0 {
            return Err(BjerknesError::InvalidParameter {
                param: "regrid".to_string(),
                message: "at least one barb per side is required".to_string(),
            });
        }

        let view = *self.view();
        let extent = view.extent;
        let step = extent.width().min(extent.height()) / style.regrid as f64;
        let nx = (extent.width() / step).round().max(1.0) as usize;
        let ny = (extent.height() / step).round().max(1.0) as usize;

        let mut drawn = 0;
        for j in 0..ny {
            let lat = extent.lat_max - (j as f64 + 0.5) * step;
            for i in 0..nx {
                let lon = extent.lon_min + (i as f64 + 0.5) * step;
                let uu = u.sample(lon, lat, &BilinearInterpolator) as f64;
                let vv = v.sample(lon, lat, &BilinearInterpolator) as f64;
                if !uu.is_finite() || !vv.is_finite() {
                    continue;
                }
                let (x, y) = view.to_pixel(lon, lat);
                self.draw_barb(x, y, uu * style.scale, vv * style.scale, lat < 0.0, style);
                drawn += 1;
            }
        }

        debug!(
            barbs = drawn,
            regrid = style.regrid,
            scale = style.scale,
            "Drew wind barbs"
        );
        Ok(drawn)
    }
}
