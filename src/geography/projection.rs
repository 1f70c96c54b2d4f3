//! Map extents and the plate carrée view.
//!
//! Charts are drawn on an equirectangular (plate carrée) grid. The only
//! projection choice is the center longitude, which decides which
//! 360-degree window longitudes are shifted into.

use geo::{coord, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BjerknesError, Result};

/// Center longitude of a global map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapProjection {
    /// Centered on Greenwich (0)
    Eurocentric,
    /// Centered on -90
    Americas,
    /// Centered on the dateline (180)
    Pacific,
    /// Any other center longitude
    Custom(f64),
}

impl MapProjection {
    pub fn center_longitude(&self) -> f64 {
        match self {
            MapProjection::Eurocentric => 0.0,
            MapProjection::Americas => -90.0,
            MapProjection::Pacific => 180.0,
            MapProjection::Custom(lon) => *lon,
        }
    }

    /// Shift a longitude into `[center - 180, center + 180)`.
    pub fn wrap(&self, lon: f64) -> f64 {
        let center = self.center_longitude();
        normalize_longitude(lon - center) + center
    }

    /// The whole globe as seen from this projection.
    pub fn global_extent(&self) -> MapExtent {
        let center = self.center_longitude();
        MapExtent {
            lon_min: center - 180.0,
            lon_max: center + 180.0,
            lat_min: -90.0,
            lat_max: 90.0,
        }
    }
}

impl FromStr for MapProjection {
    type Err = BjerknesError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "eurocentric" => Ok(MapProjection::Eurocentric),
            "americas" => Ok(MapProjection::Americas),
            "pacific" => Ok(MapProjection::Pacific),
            _ => lowered
                .strip_prefix("custom:")
                .and_then(|lon| lon.parse::<f64>().ok())
                .filter(|lon| lon.is_finite())
                .map(MapProjection::Custom)
                .ok_or_else(|| BjerknesError::InvalidParameter {
                    param: "projection".to_string(),
                    message: format!(
                        "Unknown map projection: {} (eurocentric, americas, pacific or custom:<lon>)",
                        s
                    ),
                }),
        }
    }
}

/// Normalize a longitude to `[-180, 180)`.
pub fn normalize_longitude(lon: f64) -> f64 {
    let normalized = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if normalized >= 180.0 {
        -180.0
    } else {
        normalized
    }
}

/// A lon/lat bounding box, `lon_min < lon_max` and `lat_min < lat_max`.
///
/// `lon_max` may exceed 180 for boxes that cross the dateline
/// (e.g. 110..200).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapExtent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl MapExtent {
    /// Build and validate an extent.
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Result<Self> {
        let extent = MapExtent {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        };
        extent.validate()?;
        Ok(extent)
    }

    /// Parse `lon_min,lat_min,lon_max,lat_max`.
    ///
    /// A box whose `lon_min` is east of `lon_max` crosses the dateline and
    /// is unwrapped by adding 360 to `lon_max`.
    pub fn parse_bbox(bbox: &str) -> Result<Self> {
        let parts: Vec<&str> = bbox.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BjerknesError::InvalidParameter {
                param: "bbox".to_string(),
                message: "Bounding box must be in format 'min_lon,min_lat,max_lon,max_lat'"
                    .to_string(),
            });
        }

        let names = ["min_lon", "min_lat", "max_lon", "max_lat"];
        let mut values = [0.0; 4];
        for (i, part) in parts.iter().enumerate() {
            values[i] = part
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| BjerknesError::InvalidParameter {
                    param: "bbox".to_string(),
                    message: format!("Invalid {}: {}", names[i], part),
                })?;
        }
        let [lon_min, lat_min, mut lon_max, lat_max] = values;
        if lon_min > lon_max && lon_max <= 0.0 {
            lon_max += 360.0;
        }

        Self::new(lon_min, lon_max, lat_min, lat_max).map_err(|e| BjerknesError::InvalidParameter {
            param: "bbox".to_string(),
            message: e.to_string(),
        })
    }

    /// Longitudes within [-360, 360] and increasing, latitudes within
    /// [-90, 90] and increasing.
    pub fn validate(&self) -> Result<()> {
        let lon_ok = (-360.0..=360.0).contains(&self.lon_min)
            && (-360.0..=360.0).contains(&self.lon_max)
            && self.lon_min < self.lon_max;
        if !lon_ok {
            return Err(BjerknesError::Projection {
                message: format!(
                    "longitude range {}..{} is not valid",
                    self.lon_min, self.lon_max
                ),
            });
        }
        let lat_ok = (-90.0..=90.0).contains(&self.lat_min)
            && (-90.0..=90.0).contains(&self.lat_max)
            && self.lat_min < self.lat_max;
        if !lat_ok {
            return Err(BjerknesError::Projection {
                message: format!(
                    "latitude range {}..{} is not valid",
                    self.lat_min, self.lat_max
                ),
            });
        }
        if self.lon_max - self.lon_min > 360.0 {
            return Err(BjerknesError::Projection {
                message: format!(
                    "longitude range {}..{} spans more than 360 degrees",
                    self.lon_min, self.lon_max
                ),
            });
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Area in square degrees.
    pub fn area(&self) -> f64 {
        self.width().abs() * self.height().abs()
    }

    /// Shift a longitude into the extent's 360-degree window
    /// `[lon_min, lon_min + 360)`.
    pub fn wrap_lon(&self, lon: f64) -> f64 {
        self.lon_min + (lon - self.lon_min).rem_euclid(360.0)
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let lon = self.wrap_lon(lon);
        lon <= self.lon_max && lat >= self.lat_min && lat <= self.lat_max
    }

    /// Whether the two extents share any area.
    pub fn intersects(&self, other: &MapExtent) -> bool {
        let lat_overlap = self.lat_min < other.lat_max && other.lat_min < self.lat_max;
        if !lat_overlap {
            return false;
        }
        // compare in this extent's window, trying both wrap positions
        let start = self.wrap_lon(other.lon_min);
        [start, start - 360.0]
            .iter()
            .any(|&s| s < self.lon_max && s + other.width() > self.lon_min)
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.lon_min, y: self.lat_min },
            coord! { x: self.lon_max, y: self.lat_max },
        )
    }
}

impl fmt::Display for MapExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.lon_min, self.lon_max, self.lat_min, self.lat_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        let extent = MapExtent::parse_bbox("10.5,20.5,30.5,40.5").unwrap();
        assert_eq!(extent.lon_min, 10.5);
        assert_eq!(extent.lat_min, 20.5);
        assert_eq!(extent.lon_max, 30.5);
        assert_eq!(extent.lat_max, 40.5);

        assert!(MapExtent::parse_bbox("10.5,20.5,30.5").is_err());
        assert!(MapExtent::parse_bbox("10.5,20.5,not_a_number,40.5").is_err());
        assert!(MapExtent::parse_bbox("10.5,-91.0,30.5,40.5").is_err());
        assert!(MapExtent::parse_bbox("10.5,20.5,30.5,91.0").is_err());
        assert!(MapExtent::parse_bbox("10.5,40.5,30.5,20.5").is_err());
    }

    #[test]
    fn test_parse_bbox_across_dateline() {
        let extent = MapExtent::parse_bbox("170,10,-170,20").unwrap();
        assert_eq!(extent.lon_min, 170.0);
        assert_eq!(extent.lon_max, 190.0);
        assert!(extent.contains(-175.0, 15.0));
        assert!(!extent.contains(0.0, 15.0));
    }

    #[test]
    fn test_validate_like_region_check() {
        assert!(MapExtent::new(73.0, 136.0, 15.0, 56.0).is_ok());
        assert!(MapExtent::new(136.0, 73.0, 15.0, 56.0).is_err());
        assert!(MapExtent::new(-400.0, 10.0, 15.0, 56.0).is_err());
        assert!(MapExtent::new(73.0, 136.0, 56.0, 15.0).is_err());
        assert!(matches!(
            MapExtent::new(73.0, 136.0, -95.0, 15.0),
            Err(BjerknesError::Projection { .. })
        ));
    }

    #[test]
    fn test_area_and_contains() {
        let extent = MapExtent::new(50.0, 150.0, 0.0, 65.0).unwrap();
        assert_eq!(extent.area(), 6500.0);
        assert!(extent.contains(116.4, 39.9));
        assert!(extent.contains(116.4 - 360.0, 39.9));
        assert!(!extent.contains(116.4, 70.0));
    }

    #[test]
    fn test_intersects() {
        let china = MapExtent::new(70.0, 140.0, 8.0, 60.0).unwrap();
        let pacific = MapExtent::new(130.0, 200.0, 0.0, 40.0).unwrap();
        let europe = MapExtent::new(-15.0, 35.0, 28.0, 72.0).unwrap();
        assert!(china.intersects(&pacific));
        assert!(!china.intersects(&europe));
        let west = MapExtent::new(-225.0, -205.0, 10.0, 20.0).unwrap();
        assert!(china.intersects(&west));
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(180.0), -180.0);
        assert_eq!(normalize_longitude(-180.0), -180.0);
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(370.0), 10.0);
        assert_eq!(normalize_longitude(-370.0), -10.0);
    }

    #[test]
    fn test_projection_parsing_and_wrap() {
        let pacific: MapProjection = "pacific".parse().unwrap();
        assert_eq!(pacific.wrap(-170.0), 190.0);
        assert_eq!(pacific.global_extent().lon_min, 0.0);
        let custom: MapProjection = "custom:105".parse().unwrap();
        assert_eq!(custom.center_longitude(), 105.0);
        assert!("mercator".parse::<MapProjection>().is_err());
        assert!("custom:east".parse::<MapProjection>().is_err());
    }
}
