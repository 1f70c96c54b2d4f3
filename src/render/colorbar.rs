//! Colorbars, on a chart's strip or as a standalone legend image.

use image::RgbaImage;
use tiny_skia::{Pixmap, Rect, Transform};

use super::canvas::{paint_of, pixmap_to_image, polyline_path, stroke_of, Canvas};
use crate::colortables::{ColorTable, Rgba, TableKind};
use crate::error::{BjerknesError, Result};

/// Largest standalone legend, per side.
const MAX_LEGEND_SIZE: u32 = 4096;

#[derive(Debug, Clone, Copy)]
struct BarArea {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

fn fill_box(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        pixmap.fill_rect(rect, &paint_of(color), Transform::identity(), None);
    }
}

fn fill_triangle(pixmap: &mut Pixmap, points: [(f32, f32); 3], color: Rgba) {
    if let Some(path) = polyline_path(&points, true) {
        pixmap.fill_path(
            &path,
            &paint_of(color),
            tiny_skia::FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

/// Draw `table` into `area`: equal boxes for bins and classes, extend
/// triangles for under/over colors, a gradient for continuous ramps.
fn draw_bar(pixmap: &mut Pixmap, table: &ColorTable, area: BarArea) {
    let BarArea { x, y, w, h } = area;
    let mid = y + h / 2.0;
    let mut outline = vec![(x, y), (x + w, y), (x + w, y + h), (x, y + h)];

    match &table.kind {
        TableKind::Discrete {
            colors,
            under,
            over,
            ..
        } => {
            let tri = h.min(w / 8.0);
            let left = if under.is_some() { x + tri } else { x };
            let right = if over.is_some() { x + w - tri } else { x + w };
            let cell = (right - left) / colors.len() as f32;
            for (i, color) in colors.iter().enumerate() {
                fill_box(pixmap, left + i as f32 * cell, y, cell + 0.5, h, *color);
            }
            outline = vec![(left, y), (right, y)];
            if let Some(color) = over {
                fill_triangle(pixmap, [(right, y), (x + w, mid), (right, y + h)], *color);
                outline.push((x + w, mid));
            }
            outline.push((right, y + h));
            outline.push((left, y + h));
            if let Some(color) = under {
                fill_triangle(pixmap, [(left, y + h), (x, mid), (left, y)], *color);
                outline.push((x, mid));
            }
        }
        TableKind::Continuous { stops } => {
            let (lo, hi) = (stops[0].0, stops[stops.len() - 1].0);
            let columns = w.ceil().max(1.0) as u32;
            for i in 0..columns {
                let t = (i as f64 + 0.5) / columns as f64;
                if let Some(color) = table.map(lo + t * (hi - lo)) {
                    fill_box(pixmap, x + i as f32, y, 1.0, h, color);
                }
            }
        }
        TableKind::Categorical { .. } => {
            let bins = table.bins();
            let cell = w / bins.len() as f32;
            for (i, bin) in bins.iter().enumerate() {
                fill_box(pixmap, x + i as f32 * cell, y, cell + 0.5, h, bin.color);
            }
        }
    }

    if let Some(path) = polyline_path(&outline, true) {
        pixmap.stroke_path(
            &path,
            &paint_of(Rgba::BLACK),
            &stroke_of(1.0, None),
            Transform::identity(),
            None,
        );
    }
}

impl Canvas {
    /// Draw the table's colorbar on the strip below the map.
    pub fn colorbar(&mut self, table: &ColorTable) -> Result<()> {
        let (strip_y, strip_h) = self.colorbar_area().ok_or_else(|| BjerknesError::Render {
            message: "canvas was created without a colorbar strip".to_string(),
        })?;
        let width = self.width() as f32;
        let area = BarArea {
            x: width * 0.05,
            y: strip_y as f32 + strip_h as f32 * 0.3,
            w: width * 0.9,
            h: strip_h as f32 * 0.4,
        };
        draw_bar(self.pixmap_mut(), table, area);
        Ok(())
    }
}

/// A white legend image holding only the table's colorbar.
pub fn colorbar_image(table: &ColorTable, width: u32, height: u32) -> Result<RgbaImage> {
    for (param, value) in [("width", width), ("height", height)] {
        if !(8..=MAX_LEGEND_SIZE).contains(&value) {
            return Err(BjerknesError::InvalidParameter {
                param: param.to_string(),
                message: format!("must be between 8 and {}, got {}", MAX_LEGEND_SIZE, value),
            });
        }
    }
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| BjerknesError::Render {
        message: format!("cannot allocate a {}x{} legend", width, height),
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);
    let (w, h) = (width as f32, height as f32);
    let area = BarArea {
        x: w * 0.04,
        y: h * 0.2,
        w: w * 0.92,
        h: h * 0.6,
    };
    draw_bar(&mut pixmap, table, area);
    Ok(pixmap_to_image(&pixmap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colortables::{get_color_table, Extend};
    use crate::geography::MapExtent;

    fn bands(extend: Extend) -> ColorTable {
        let mut colors = vec![Rgba::rgb(255, 0, 0), Rgba::rgb(0, 255, 0)];
        if extend.has_min() {
            colors.insert(0, Rgba::rgb(0, 0, 0));
        }
        if extend.has_max() {
            colors.push(Rgba::rgb(0, 0, 255));
        }
        ColorTable::from_levels_and_colors("bands", vec![0.0, 1.0, 2.0], colors, extend).unwrap()
    }

    #[test]
    fn test_discrete_boxes_are_equal() {
        let img = colorbar_image(&bands(Extend::Neither), 200, 50).unwrap();
        assert_eq!(img.get_pixel(50, 25).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(150, 25).0, [0, 255, 0, 255]);
        // margins stay white
        assert_eq!(img.get_pixel(100, 2).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_extend_triangles() {
        let img = colorbar_image(&bands(Extend::Both), 200, 50).unwrap();
        // triangle tips sit at the bar's ends on the center line
        assert_eq!(img.get_pixel(12, 25).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(187, 25).0, [0, 0, 255, 255]);
        // corners beside the tips are outside the triangles
        assert_eq!(img.get_pixel(10, 12).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_continuous_gradient() {
        let table = get_color_table("viridis").unwrap();
        let img = colorbar_image(&table, 300, 40).unwrap();
        let left = img.get_pixel(30, 20).0;
        let right = img.get_pixel(270, 20).0;
        assert_ne!(left, right);
        assert_ne!(left, [255, 255, 255, 255]);
    }

    #[test]
    fn test_legend_size_limits() {
        let table = bands(Extend::Neither);
        assert!(colorbar_image(&table, 4, 50).is_err());
        assert!(colorbar_image(&table, 200, MAX_LEGEND_SIZE + 1).is_err());
    }

    #[test]
    fn test_canvas_colorbar_needs_strip() {
        let extent = MapExtent::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let mut bare = Canvas::new(extent, 100, 100, false).unwrap();
        assert!(bare.colorbar(&bands(Extend::Neither)).is_err());

        let mut canvas = Canvas::new(extent, 200, 240, true).unwrap();
        canvas.colorbar(&bands(Extend::Neither)).unwrap();
        let (y, h) = canvas.colorbar_area().unwrap();
        let img = canvas.to_rgba_image();
        assert_eq!(img.get_pixel(50, y + h / 2).0, [255, 0, 0, 255]);
    }
}
