//! The figure canvas.
//!
//! A [`Canvas`] is created for one chart and owned by the call that renders
//! it. The map occupies the top of the figure; an optional strip below it
//! holds the colorbar. Map layers are clipped to the map area.

use geo::{BoundingRect, LineString, Polygon};
use image::RgbaImage;
use std::collections::HashSet;
use std::path::Path;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Paint, Path as SkPath, PathBuilder, Pixmap, Rect, Stroke,
    StrokeDash, Transform,
};
use tracing::debug;

use super::encode::{encode_image, OutputFormat};
use super::view::MapView;
use crate::boundaries::{BoundarySet, BoundaryStyle};
use crate::colortables::Rgba;
use crate::error::{BjerknesError, Result};
use crate::geography::MapExtent;

/// Height of the colorbar strip as a fraction of the figure height.
const COLORBAR_FRACTION: f32 = 0.1;
const COLORBAR_MIN_HEIGHT: u32 = 24;

pub(crate) fn paint_of(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r(), color.g(), color.b(), color.a());
    paint.anti_alias = true;
    paint
}

pub(crate) fn stroke_of(width: f32, dash: Option<&[f32]>) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        dash: dash.and_then(|d| StrokeDash::new(d.to_vec(), 0.0)),
        ..Default::default()
    }
}

/// Path through pixel points, `None` for fewer than two points.
pub(crate) fn polyline_path(points: &[(f32, f32)], closed: bool) -> Option<SkPath> {
    if points.len() < 2 {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(points[0].0, points[0].1);
    for &(x, y) in &points[1..] {
        pb.line_to(x, y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

pub(crate) fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, color) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = color.demultiply();
        *pixel = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

pub struct Canvas {
    view: MapView,
    pixmap: Pixmap,
    map_clip: Mask,
    colorbar_height: u32,
    overlays: HashSet<String>,
}

impl Canvas {
    /// A white figure of `width` x `height` pixels showing `extent`.
    pub fn new(extent: MapExtent, width: u32, height: u32, colorbar: bool) -> Result<Self> {
        let colorbar_height = if colorbar {
            ((height as f32 * COLORBAR_FRACTION) as u32).max(COLORBAR_MIN_HEIGHT)
        } else {
            0
        };
        if colorbar_height >= height {
            return Err(BjerknesError::Render {
                message: format!("figure height {} leaves no room for the map", height),
            });
        }
        let view = MapView::new(extent, width, height - colorbar_height)?;

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| BjerknesError::Render {
            message: format!("cannot allocate a {}x{} canvas", width, height),
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let mut map_clip = Mask::new(width, height).ok_or_else(|| BjerknesError::Render {
            message: "cannot allocate the map clip".to_string(),
        })?;
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, width as f32, view.height as f32) {
            map_clip.fill_path(
                &PathBuilder::from_rect(rect),
                FillRule::Winding,
                false,
                Transform::identity(),
            );
        }

        Ok(Canvas {
            view,
            pixmap,
            map_clip,
            colorbar_height,
            overlays: HashSet::new(),
        })
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The colorbar strip as `(y, height)`, if the canvas has one.
    pub fn colorbar_area(&self) -> Option<(u32, u32)> {
        (self.colorbar_height > 0).then_some((self.view.height, self.colorbar_height))
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub(crate) fn map_clip(&self) -> &Mask {
        &self.map_clip
    }

    /// Whether an overlay of that name has been drawn.
    pub fn has_overlay(&self, name: &str) -> bool {
        self.overlays.contains(name)
    }

    /// Record an overlay; false when it was already drawn.
    pub(crate) fn record_overlay(&mut self, name: &str) -> bool {
        self.overlays.insert(name.to_string())
    }

    /// Stroke a polyline given in pixels, clipped to the map.
    pub(crate) fn stroke_pixels(
        &mut self,
        points: &[(f32, f32)],
        closed: bool,
        color: Rgba,
        width: f32,
        dash: Option<&[f32]>,
    ) {
        if width <= 0.0 || color.is_transparent() {
            return;
        }
        if let Some(path) = polyline_path(points, closed) {
            self.pixmap.stroke_path(
                &path,
                &paint_of(color),
                &stroke_of(width, dash),
                Transform::identity(),
                Some(&self.map_clip),
            );
        }
    }

    /// Fill a polygon given in pixels, clipped to the map.
    pub(crate) fn fill_pixels(&mut self, points: &[(f32, f32)], color: Rgba) {
        if let Some(path) = polyline_path(points, true) {
            self.pixmap.fill_path(
                &path,
                &paint_of(color),
                FillRule::Winding,
                Transform::identity(),
                Some(&self.map_clip),
            );
        }
    }

    /// Pixel points of a line, shifted as a whole into the view's window.
    pub fn project_line(&self, line: &LineString<f64>) -> Vec<(f32, f32)> {
        let Some(rect) = line.bounding_rect() else {
            return Vec::new();
        };
        let shift = self.view.lon_shift((rect.min().x + rect.max().x) / 2.0);
        line.coords()
            .map(|c| {
                (
                    self.view.x_of(c.x + shift) as f32,
                    self.view.y_of(c.y) as f32,
                )
            })
            .collect()
    }

    /// Closed path of a polygon with its holes.
    pub fn polygon_path(&self, polygon: &Polygon<f64>) -> Option<SkPath> {
        let rect = polygon.bounding_rect()?;
        let shift = self.view.lon_shift((rect.min().x + rect.max().x) / 2.0);
        let mut pb = PathBuilder::new();
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            let mut coords = ring.coords();
            if let Some(first) = coords.next() {
                pb.move_to(
                    self.view.x_of(first.x + shift) as f32,
                    self.view.y_of(first.y) as f32,
                );
                for c in coords {
                    pb.line_to(self.view.x_of(c.x + shift) as f32, self.view.y_of(c.y) as f32);
                }
                pb.close();
            }
        }
        pb.finish()
    }

    /// Draw a boundary set. A set that was already drawn on this canvas is
    /// skipped and `false` is returned.
    pub fn add_boundaries(&mut self, set: &BoundarySet, style: &BoundaryStyle) -> bool {
        if !self.record_overlay(&set.name) {
            debug!(overlay = %set.name, "Overlay already drawn");
            return false;
        }
        let visible = set.within(&self.view.extent);

        if let Some(fill) = style.fill {
            let paint = paint_of(fill);
            for polygon in &visible.polygons.0 {
                if let Some(path) = self.polygon_path(polygon) {
                    self.pixmap.fill_path(
                        &path,
                        &paint,
                        FillRule::EvenOdd,
                        Transform::identity(),
                        Some(&self.map_clip),
                    );
                }
            }
        }

        for line in &visible.lines.0 {
            let points = self.project_line(line);
            self.stroke_pixels(&points, false, style.edge, style.width, style.dash.as_deref());
        }

        debug!(
            overlay = %set.name,
            lines = visible.lines.0.len(),
            polygons = visible.polygons.0.len(),
            "Drew boundary overlay"
        );
        true
    }

    /// Copy of the figure as straight-alpha RGBA.
    pub fn to_rgba_image(&self) -> RgbaImage {
        pixmap_to_image(&self.pixmap)
    }

    pub fn encode(&self, format: OutputFormat) -> Result<Vec<u8>> {
        encode_image(&self.to_rgba_image(), format)
    }

    /// Write the figure, the format following the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = OutputFormat::from_path(path)?;
        let bytes = self.encode(format)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn canvas() -> Canvas {
        Canvas::new(MapExtent::new(0.0, 10.0, 0.0, 10.0).unwrap(), 100, 100, false).unwrap()
    }

    fn square_set(name: &str) -> BoundarySet {
        BoundarySet::from_polygons(
            name,
            vec![polygon![(x: 2.0, y: 2.0), (x: 8.0, y: 2.0), (x: 8.0, y: 8.0), (x: 2.0, y: 8.0), (x: 2.0, y: 2.0)]],
        )
    }

    #[test]
    fn test_new_canvas_is_white() {
        let c = Canvas::new(MapExtent::new(0.0, 10.0, 0.0, 10.0).unwrap(), 50, 40, true).unwrap();
        let img = c.to_rgba_image();
        assert!(img.pixels().all(|p| p.0 == [255, 255, 255, 255]));
        let (y, h) = c.colorbar_area().unwrap();
        assert_eq!(y + h, 40);
        assert_eq!(c.view().height, y);
    }

    #[test]
    fn test_boundary_overlay_is_idempotent() {
        let set = square_set("province");
        let style = BoundaryStyle {
            fill: Some(Rgba::rgb(100, 100, 100)),
            ..BoundaryStyle::default()
        };
        let mut c = canvas();
        assert!(c.add_boundaries(&set, &style));
        let once = c.to_rgba_image();
        assert!(!c.add_boundaries(&set, &style));
        assert_eq!(once, c.to_rgba_image());
        assert!(c.has_overlay("province"));

        // the fill covers the square's interior, outside stays white
        assert_eq!(once.get_pixel(50, 50).0, [100, 100, 100, 255]);
        assert_eq!(once.get_pixel(5, 5).0, [255, 255, 255, 255]);
        // the edge runs along x = 20 px
        assert_ne!(once.get_pixel(20, 50).0, [100, 100, 100, 255]);
    }

    #[test]
    fn test_save_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        canvas().save(&path).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (100, 100));
        assert!(canvas().save(&dir.path().join("chart.gif")).is_err());
    }
}
