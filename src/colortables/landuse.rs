//! Land-use classifications.

use super::color::from_unit_triplets;
use super::registry::no_param;
use super::table::{Category, ColorTable};
use crate::error::Result;

fn categories(colors: &[[f64; 3]], labels: &[&str]) -> Vec<Category> {
    from_unit_triplets(colors)
        .into_iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (color, label))| Category {
            value: i as i32 + 1,
            color,
            label: label.to_string(),
        })
        .collect()
}

/// MODIS 21-class land use (20 IGBP classes plus lakes), values 1-21.
pub fn modis21(param: Option<&str>) -> Result<ColorTable> {
    no_param("landuse_modis21", param)?;
    let colors = [
        [0.0, 0.4, 0.0],
        [0.0, 0.4, 0.2],
        [0.2, 0.8, 0.2],
        [0.2, 0.8, 0.4],
        [0.2, 0.6, 0.2],
        [0.3, 0.7, 0.0],
        [0.82, 0.41, 0.12],
        [0.74, 0.71, 0.41],
        [1.0, 0.84, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 1.0],
        [1.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.7, 0.9, 0.3],
        [1.0, 1.0, 1.0],
        [0.914, 0.914, 0.7],
        [0.5, 0.7, 1.0],
        [1.0, 0.0, 0.74],
        [0.97, 0.5, 0.31],
        [0.91, 0.59, 0.48],
        [0.0, 0.0, 0.88],
    ];
    let labels = [
        "Evergreen Needleleaf Forest",
        "Evergreen Broadleaf Forest",
        "Deciduous Needleleaf Forest",
        "Deciduous Broadleaf Forest",
        "Mixed Forests",
        "Closed Shrublands",
        "Open Shrublands",
        "Woody Savannas",
        "Savannas",
        "Grasslands",
        "Permanent Wetlands",
        "Croplands",
        "Urban and Built-Up",
        "Cropland/Natural Vegetation Mosaic",
        "Snow and Ice",
        "Barren or Sparsely Vegetated",
        "Water",
        "Wooded Tundra",
        "Mixed Tundra",
        "Barren Tundra",
        "Lake",
    ];
    Ok(ColorTable::categorical("landuse_modis21", categories(&colors, &labels))?
        .with_label("MODIS Land Use", ""))
}

/// USGS 24-category land use, values 1-24.
pub fn usgs24(param: Option<&str>) -> Result<ColorTable> {
    no_param("landuse_usgs24", param)?;
    let colors = [
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [1.0, 1.0, 0.2],
        [1.0, 1.0, 0.3],
        [0.7, 0.9, 0.3],
        [0.7, 0.9, 0.3],
        [0.0, 1.0, 0.0],
        [0.3, 0.7, 0.0],
        [0.82, 0.41, 0.12],
        [1.0, 0.84, 0.0],
        [0.2, 0.8, 0.4],
        [0.2, 0.8, 0.2],
        [0.0, 0.4, 0.2],
        [0.0, 0.4, 0.0],
        [0.2, 0.6, 0.2],
        [0.0, 0.0, 0.88],
        [0.0, 1.0, 1.0],
        [0.2, 1.0, 1.0],
        [0.914, 0.914, 0.7],
        [0.86, 0.08, 0.23],
        [0.86, 0.08, 0.23],
        [0.97, 0.5, 0.31],
        [0.91, 0.59, 0.48],
        [1.0, 1.0, 1.0],
    ];
    let labels = [
        "Urban and Built-up Land",
        "Dryland Cropland and Pasture",
        "Irrigated Cropland and Pasture",
        "Mixed Dryland/Irrigated Cropland and Pasture",
        "Cropland/Grassland Mosaic",
        "Cropland/Woodland Mosaic",
        "Grassland",
        "Shrubland",
        "Mixed Shrubland/Grassland",
        "Savanna",
        "Deciduous Broadleaf Forest",
        "Deciduous Needleleaf Forest",
        "Evergreen Broadleaf",
        "Evergreen Needleleaf",
        "Mixed Forest",
        "Water Bodies",
        "Herbaceous Wetland",
        "Wooden Wetland",
        "Barren or Sparsely Vegetated",
        "Herbaceous Tundra",
        "Wooded Tundra",
        "Mixed Tundra",
        "Bare Ground Tundra",
        "Snow or Ice",
    ];
    Ok(ColorTable::categorical("landuse_usgs24", categories(&colors, &labels))?
        .with_label("USGS Land Use", ""))
}
