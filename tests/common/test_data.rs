//! Test data generation utilities.
//!
//! A small synoptic dataset (time, level, lat, lon) with known patterns,
//! available in memory or written to NetCDF, plus tiny shapefiles.

use ndarray::{ArrayD, IxDyn};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, PolygonRing, Polyline};
use std::collections::HashMap;
use std::path::Path;

use bjerknes::state::{Dataset, Dimension, Metadata, Variable};

pub const TIMES: [f64; 2] = [0.0, 6.0];
pub const LEVELS: [f64; 2] = [850.0, 500.0];

/// 50E..150E every 5 degrees
pub fn lons() -> Vec<f64> {
    (0..=20).map(|i| 50.0 + 5.0 * i as f64).collect()
}

/// 0N..65N every 5 degrees
pub fn lats() -> Vec<f64> {
    (0..=13).map(|i| 5.0 * i as f64).collect()
}

/// Geopotential height in dagpm: 150 at 850 hPa and a 560..592 ridge at 500
/// hPa, highest in the south.
fn gh(level: f64, lat: f64, lon: f64) -> f32 {
    if level >= 850.0 {
        (150.0 - 0.5 * lat + 0.05 * (lon - 100.0)) as f32
    } else {
        (592.0 - 0.5 * lat) as f32
    }
}

/// Westerlies strengthening with latitude
fn u(level: f64, lat: f64, _lon: f64) -> f32 {
    let scale = if level >= 850.0 { 0.4 } else { 0.8 };
    (scale * lat) as f32
}

fn v(_level: f64, _lat: f64, lon: f64) -> f32 {
    (0.1 * (lon - 100.0)) as f32
}

/// A low centred on 100E, 40N
fn mslp(lat: f64, lon: f64) -> f32 {
    let d2 = (lon - 100.0).powi(2) + (lat - 40.0).powi(2);
    (1020.0 - 30.0 * (-d2 / 400.0).exp()) as f32
}

/// 2 m temperature in degC, 35 at the equator falling to -17 at 65N
fn t2m(lat: f64, _lon: f64) -> f32 {
    (35.0 - 0.8 * lat) as f32
}

/// Potential temperature on the PV surface in K, 300 at the equator rising
/// to 378 at 65N
fn theta(lat: f64, _lon: f64) -> f32 {
    (300.0 + 1.2 * lat) as f32
}

type Field = (&'static str, Vec<&'static str>, Vec<f32>);

fn fields() -> Vec<Field> {
    let (lons, lats) = (lons(), lats());
    let four_d: Vec<(&'static str, fn(f64, f64, f64) -> f32)> = vec![("gh", gh), ("u", u), ("v", v)];
    let mut out = Vec::new();
    for (name, f) in four_d {
        let mut values = Vec::new();
        for t in 0..TIMES.len() {
            for &level in &LEVELS {
                for &lat in &lats {
                    for &lon in &lons {
                        values.push(f(level, lat, lon) + t as f32);
                    }
                }
            }
        }
        out.push((name, vec!["time", "level", "lat", "lon"], values));
    }

    let three_d: Vec<(&'static str, fn(f64, f64) -> f32)> =
        vec![("mslp", mslp), ("t2m", t2m), ("theta", theta)];
    for (name, f) in three_d {
        let mut values = Vec::new();
        for t in 0..TIMES.len() {
            for &lat in &lats {
                for &lon in &lons {
                    values.push(f(lat, lon) + t as f32);
                }
            }
        }
        out.push((name, vec!["time", "lat", "lon"], values));
    }
    out
}

/// The synoptic test dataset, in memory.
pub fn synoptic_dataset() -> Dataset {
    let coords: Vec<(&str, Vec<f64>)> = vec![
        ("time", TIMES.to_vec()),
        ("level", LEVELS.to_vec()),
        ("lat", lats()),
        ("lon", lons()),
    ];
    let sizes: HashMap<&str, usize> = coords.iter().map(|(n, v)| (*n, v.len())).collect();

    let mut metadata = Metadata::default();
    for (name, values) in &coords {
        metadata.dimensions.insert(
            name.to_string(),
            Dimension {
                name: name.to_string(),
                size: values.len(),
                is_unlimited: false,
            },
        );
        metadata.coordinates.insert(name.to_string(), values.clone());
    }

    let mut data = HashMap::new();
    for (name, dims, values) in fields() {
        let shape: Vec<usize> = dims.iter().map(|d| sizes[d]).collect();
        metadata.variables.insert(
            name.to_string(),
            Variable {
                name: name.to_string(),
                dimensions: dims.iter().map(|d| d.to_string()).collect(),
                shape: shape.clone(),
                attributes: HashMap::new(),
                dtype: "f32".to_string(),
            },
        );
        data.insert(
            name.to_string(),
            ArrayD::from_shape_vec(IxDyn(&shape), values).expect("shape matches values"),
        );
    }
    Dataset::new(metadata, data)
}

/// Write the synoptic test dataset to a NetCDF file.
#[cfg(feature = "netcdf")]
pub fn create_synoptic_nc(path: &Path) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    file.add_dimension("time", TIMES.len())?;
    file.add_dimension("level", LEVELS.len())?;
    file.add_dimension("lat", lats().len())?;
    file.add_dimension("lon", lons().len())?;
    file.add_attribute("title", "Synoptic Test Data")?;

    let coords: Vec<(&str, &str, Vec<f64>)> = vec![
        ("time", "hours since 2024-07-15 08:00:00", TIMES.to_vec()),
        ("level", "hPa", LEVELS.to_vec()),
        ("lat", "degrees_north", lats()),
        ("lon", "degrees_east", lons()),
    ];
    for (name, units, values) in coords {
        let mut var = file.add_variable::<f64>(name, &[name])?;
        var.put_attribute("units", units)?;
        var.put_values(&values, ..)?;
    }

    for (name, dims, values) in fields() {
        let mut var = file.add_variable::<f32>(name, &dims)?;
        var.put_attribute("_FillValue", -9999.0f32)?;
        var.put_values(&values, ..)?;
    }
    Ok(())
}

fn square(x0: f64, y0: f64, size: f64) -> shapefile::Polygon {
    shapefile::Polygon::new(PolygonRing::Outer(vec![
        Point::new(x0, y0),
        Point::new(x0, y0 + size),
        Point::new(x0 + size, y0 + size),
        Point::new(x0 + size, y0),
        Point::new(x0, y0),
    ]))
}

/// Write square polygons with a `NAME` attribute: `(name, x0, y0, size)`.
pub fn write_square_shapefile(path: &Path, squares: &[(&str, f64, f64, f64)]) {
    let table = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("NAME").expect("valid field name"), 20);
    let mut writer = shapefile::Writer::from_path(path, table).expect("Failed to create shapefile");
    for (name, x0, y0, size) in squares {
        let mut record = Record::default();
        record.insert(
            "NAME".to_string(),
            FieldValue::Character(Some(name.to_string())),
        );
        writer
            .write_shape_and_record(&square(*x0, *y0, *size), &record)
            .expect("Failed to write polygon");
    }
}

/// Write polylines given as (lon, lat) vertices.
pub fn write_line_shapefile(path: &Path, lines: &[Vec<(f64, f64)>]) {
    let table = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("NAME").expect("valid field name"), 8);
    let mut writer = shapefile::Writer::from_path(path, table).expect("Failed to create shapefile");
    for line in lines {
        let points = line.iter().map(|&(x, y)| Point::new(x, y)).collect();
        let mut record = Record::default();
        record.insert("NAME".to_string(), FieldValue::Character(Some("line".to_string())));
        writer
            .write_shape_and_record(&Polyline::new(points), &record)
            .expect("Failed to write polyline");
    }
}
