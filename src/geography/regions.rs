//! Named map regions used by operational charts.

use serde::Serialize;

use super::projection::MapExtent;
use crate::error::{BjerknesError, Result};

/// A named lon/lat box. `alias` is the name used on NMC charts.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Region {
    pub name: &'static str,
    pub alias: &'static str,
    pub extent: MapExtent,
}

const fn region(
    name: &'static str,
    alias: &'static str,
    lon_min: f64,
    lon_max: f64,
    lat_min: f64,
    lat_max: f64,
) -> Region {
    Region {
        name,
        alias,
        extent: MapExtent {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        },
    }
}

/// China and its sub-regions.
pub const CHINA_REGIONS: [Region; 17] = [
    region("china", "中国", 70.0, 140.0, 8.0, 60.0),
    region("china_land", "中国陆地", 73.0, 136.0, 15.0, 56.0),
    region("china_and_surroundings", "中国及周边", 50.0, 160.0, 0.0, 70.0),
    region("east_sea", "东部海域", 115.0, 135.0, 20.0, 42.0),
    region("south_sea", "南部海域", 103.0, 125.0, 3.0, 28.0),
    region("north_china", "华北", 103.0, 129.0, 30.0, 50.0),
    region("winter_olympics", "冬奥", 114.0, 118.0, 39.0, 42.0),
    region("northeast", "东北", 103.0, 140.0, 32.0, 58.0),
    region("east_china", "华东", 107.0, 130.0, 20.0, 41.0),
    region("central_china", "华中", 100.0, 123.0, 22.0, 42.0),
    region("south_china", "华南", 100.0, 126.0, 12.0, 30.0),
    region("southwest", "西南", 90.0, 113.0, 18.0, 38.0),
    region("northwest", "西北", 89.0, 115.0, 27.0, 47.0),
    region("xinjiang", "新疆", 70.0, 101.0, 30.0, 52.0),
    region("tibet", "青藏", 68.0, 105.0, 18.0, 46.0),
    region("henan", "河南", 109.8, 117.0, 31.0, 37.5),
    region("sichuan_basin", "四川盆地", 102.5, 110.0, 27.5, 33.0),
];

/// Continental and global regions.
pub const GLOBAL_REGIONS: [Region; 10] = [
    region("global", "全球", -180.0, 180.0, -90.0, 90.0),
    region("asia", "亚洲", 35.0, 140.0, 5.0, 80.0),
    region("east_asia", "东亚", 90.0, 160.0, 5.0, 70.0),
    region("south_asia", "南亚", 65.0, 135.0, -10.0, 35.0),
    region("central_asia", "中亚", 25.0, 80.0, 10.0, 55.0),
    region("europe", "欧洲", -15.0, 35.0, 28.0, 72.0),
    region("africa", "非洲", -20.0, 55.0, -40.0, 40.0),
    region("north_america", "北美", 220.0, 305.0, 10.0, 65.0),
    region("south_america", "南美", 270.0, 330.0, -58.0, 14.0),
    region("australia", "澳洲", 110.0, 180.0, -50.0, 0.0),
];

/// Extent used when a chart names no region.
pub const DEFAULT_EXTENT: MapExtent = CHINA_REGIONS[1].extent;

/// All regions, China first.
pub fn regions() -> impl Iterator<Item = &'static Region> {
    CHINA_REGIONS.iter().chain(GLOBAL_REGIONS.iter())
}

/// Look a region up by name or chart alias.
pub fn region_extent(name: &str) -> Result<MapExtent> {
    let key = name.trim().to_lowercase();
    regions()
        .find(|r| r.name == key || r.alias == name.trim())
        .map(|r| r.extent)
        .ok_or_else(|| BjerknesError::InvalidParameter {
            param: "region".to_string(),
            message: format!(
                "{} is not a valid region name, select from {}",
                name,
                regions().map(|r| r.name).collect::<Vec<_>>().join(", ")
            ),
        })
}

/// The extent named by a region or given as a bounding box. At most one may
/// be set; with neither the caller picks its own default.
pub fn requested_extent(region: Option<&str>, bbox: Option<&str>) -> Result<Option<MapExtent>> {
    match (region, bbox) {
        (Some(_), Some(_)) => Err(BjerknesError::InvalidParameter {
            param: "region".to_string(),
            message: "region and bbox are mutually exclusive".to_string(),
        }),
        (Some(region), None) => region_extent(region).map(Some),
        (None, Some(bbox)) => MapExtent::parse_bbox(bbox).map(Some),
        (None, None) => Ok(None),
    }
}

/// Pick a contour interval from the size of the map: `coarse` when the
/// extent covers at least `threshold` square degrees (or no extent is
/// given), `fine` otherwise.
pub fn contour_interval_for(
    extent: Option<&MapExtent>,
    coarse: f64,
    fine: f64,
    threshold: f64,
) -> f64 {
    match extent {
        Some(extent) if extent.area() < threshold => fine,
        _ => coarse,
    }
}

/// Threshold used by operational charts, in square degrees.
pub const CONTOUR_AREA_THRESHOLD: f64 = 600.0;
