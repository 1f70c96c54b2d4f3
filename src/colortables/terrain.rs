//! Terrain height and radar reflectivity ramps.

use super::color::{from_unit_triplets, Rgba};
use super::registry::no_param;
use super::table::ColorTable;
use crate::error::Result;

/// Bottom of the ocean ramp, in metres.
pub const OCEAN_BOTTOM: f64 = -500.0;
/// Heights below this are colored as water. Slightly below sea level so
/// that land under sea level is still drawn as land.
pub const WATER_THRESHOLD: f64 = -99.0;
/// Top of the land ramp, in metres.
pub const LAND_TOP: f64 = 3650.0;

fn land_stops() -> Result<Vec<(f64, Rgba)>> {
    Ok(vec![
        (0.0, Rgba::parse("yellowgreen")?),
        (0.03, Rgba::parse("darkgreen")?),
        (0.08, Rgba::parse("forestgreen")?),
        (0.45, Rgba::parse("wheat")?),
        (0.60, Rgba::parse("tan")?),
        (0.95, Rgba::parse("sienna")?),
        (1.00, Rgba::parse("snow")?),
    ])
}

/// Ocean ramp below the water threshold and land ramp above it.
pub fn terrain(param: Option<&str>) -> Result<ColorTable> {
    no_param("terrain", param)?;
    let ocean = vec![
        (0.0, Rgba::parse("mediumblue")?),
        (0.8, Rgba::parse("deepskyblue")?),
        (1.0, Rgba::parse("#97b6e1")?),
    ];
    Ok(ColorTable::two_slope(
        "terrain",
        &ocean,
        &land_stops()?,
        OCEAN_BOTTOM,
        WATER_THRESHOLD,
        LAND_TOP,
    )?
    .with_label("Terrain Height", "m"))
}

/// Land ramp only, from the water threshold to the top of the land.
pub fn terrain_land(param: Option<&str>) -> Result<ColorTable> {
    no_param("terrain_land", param)?;
    let stops = land_stops()?
        .into_iter()
        .map(|(t, c)| (WATER_THRESHOLD + t * (LAND_TOP - WATER_THRESHOLD), c))
        .collect();
    Ok(ColorTable::continuous("terrain_land", stops)?.with_label("Terrain Height", "m"))
}

/// NCDC radar reflectivity, 0 to 70 dBZ in 5 dBZ nodes.
pub fn reflectivity_ncdc(param: Option<&str>) -> Result<ColorTable> {
    no_param("reflectivity_ncdc", param)?;
    let colors = from_unit_triplets(&[
        [0.0, 0.925, 0.925],
        [0.0, 0.627, 0.965],
        [0.0, 0.0, 0.965],
        [0.0, 1.0, 0.0],
        [0.0, 0.784, 0.0],
        [0.0, 0.565, 0.0],
        [1.0, 1.0, 0.0],
        [0.906, 0.753, 0.0],
        [1.0, 0.565, 0.0],
        [1.0, 0.0, 0.0],
        [0.839, 0.0, 0.0],
        [0.753, 0.0, 0.0],
        [1.0, 0.0, 1.0],
        [0.6, 0.333, 0.788],
        [0.923, 0.923, 0.923],
    ]);
    let positions: Vec<f64> = (0..colors.len()).map(|i| 5.0 * i as f64).collect();
    Ok(ColorTable::from_positions("reflectivity_ncdc", &positions, &colors)?
        .with_label("Reflectivity", "dBZ"))
}
