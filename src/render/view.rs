//! Plate carrée transform between lon/lat and map pixels.

use crate::error::{BjerknesError, Result};
use crate::geography::MapExtent;

/// The map area of a figure: an extent drawn north-up on `width` x `height`
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub extent: MapExtent,
    pub width: u32,
    pub height: u32,
}

impl MapView {
    pub fn new(extent: MapExtent, width: u32, height: u32) -> Result<Self> {
        extent.validate()?;
        if width == 0 || height == 0 {
            return Err(BjerknesError::Render {
                message: format!("map area of {}x{} pixels is empty", width, height),
            });
        }
        Ok(MapView {
            extent,
            width,
            height,
        })
    }

    /// Degrees per pixel along x and y.
    pub fn resolution(&self) -> (f64, f64) {
        (
            self.extent.width() / self.width as f64,
            self.extent.height() / self.height as f64,
        )
    }

    /// Pixel x of a longitude already in the extent's window.
    pub fn x_of(&self, lon: f64) -> f64 {
        (lon - self.extent.lon_min) / self.extent.width() * self.width as f64
    }

    pub fn y_of(&self, lat: f64) -> f64 {
        (self.extent.lat_max - lat) / self.extent.height() * self.height as f64
    }

    /// Pixel position of a point, with its longitude shifted into the view.
    pub fn to_pixel(&self, lon: f64, lat: f64) -> (f32, f32) {
        (
            self.x_of(self.extent.wrap_lon(lon)) as f32,
            self.y_of(lat) as f32,
        )
    }

    /// Lon/lat of the center of pixel `(px, py)`.
    pub fn pixel_center(&self, px: u32, py: u32) -> (f64, f64) {
        let (dx, dy) = self.resolution();
        (
            self.extent.lon_min + (px as f64 + 0.5) * dx,
            self.extent.lat_max - (py as f64 + 0.5) * dy,
        )
    }

    /// Multiple of 360 that moves a geometry centered at `lon` into the view.
    ///
    /// Whole geometries are shifted together so lines are not torn apart at
    /// the window edge.
    pub fn lon_shift(&self, lon: f64) -> f64 {
        self.extent.wrap_lon(lon) - lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_transform() {
        let view = MapView::new(MapExtent::new(100.0, 140.0, 20.0, 50.0).unwrap(), 400, 300).unwrap();
        assert_eq!(view.to_pixel(100.0, 50.0), (0.0, 0.0));
        assert_eq!(view.to_pixel(140.0, 20.0), (400.0, 300.0));
        assert_eq!(view.to_pixel(120.0, 35.0), (200.0, 150.0));
        let (lon, lat) = view.pixel_center(0, 0);
        assert!((lon - 100.05).abs() < 1e-9 && (lat - 49.95).abs() < 1e-9);
    }

    #[test]
    fn test_wrapped_longitudes() {
        let view = MapView::new(MapExtent::new(-180.0, 180.0, -90.0, 90.0).unwrap(), 360, 180).unwrap();
        assert_eq!(view.to_pixel(270.0, 0.0), (90.0, 90.0));
        assert_eq!(view.lon_shift(200.0), -360.0);
        assert_eq!(view.lon_shift(10.0), 0.0);
    }

    #[test]
    fn test_empty_view_is_rejected() {
        let extent = MapExtent::new(0.0, 10.0, 0.0, 10.0).unwrap();
        assert!(MapView::new(extent, 0, 10).is_err());
    }
}
