//! NetCDF data loading functionality.
//!
//! This module reads a NetCDF file into an in-memory [`Dataset`]. Every
//! numeric variable becomes an `f32` array with CF fill values turned into
//! `NaN` and packed values (`scale_factor`/`add_offset`) unpacked.

use ndarray::{ArrayD, IxDyn};
use netcdf::Attribute;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{BjerknesError, Result};
use crate::state::{AttributeValue, Dataset, Dimension, Metadata, Variable};

/// Load a NetCDF file into memory and validate it.
pub fn load_netcdf(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(BjerknesError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let file = netcdf::open(path)?;
    info!(
        path = %path.display(),
        variables = file.variables().count(),
        dimensions = file.dimensions().count(),
        "Opened NetCDF file"
    );

    let (metadata, data) = extract_dataset(&file)?;
    let dataset = Dataset::new(metadata, data);
    dataset.validate()?;
    Ok(dataset)
}

/// Extract metadata and data arrays from an open file
fn extract_dataset(file: &netcdf::File) -> Result<(Metadata, HashMap<String, ArrayD<f32>>)> {
    let mut global_attributes = HashMap::new();
    for attr in file.attributes() {
        global_attributes.insert(attr.name().to_string(), convert_attribute(&attr));
    }

    let mut dimensions = HashMap::new();
    for dim in file.dimensions() {
        dimensions.insert(
            dim.name().to_string(),
            Dimension {
                name: dim.name().to_string(),
                size: dim.len(),
                is_unlimited: dim.is_unlimited(),
            },
        );
    }

    let mut variables = HashMap::new();
    let mut coordinates = HashMap::new();
    let mut data = HashMap::new();

    for var in file.variables() {
        let name = var.name().to_string();
        let values: Vec<f64> = match var.get_values::<f64, _>(..) {
            Ok(values) => values,
            Err(e) => {
                warn!(variable = %name, error = %e, "Skipping non-numeric variable");
                continue;
            }
        };

        let var_dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|dim| dim.name().to_string())
            .collect();
        let var_shape: Vec<usize> = var.dimensions().iter().map(|dim| dim.len()).collect();

        let mut attributes = HashMap::new();
        for attr in var.attributes() {
            attributes.insert(attr.name().to_string(), convert_attribute(&attr));
        }

        // a coordinate variable shares its name with its only dimension
        if var_dims.len() == 1 && var_dims[0] == name {
            coordinates.insert(name.clone(), values.clone());
        }

        let unpacked = unpack_values(values, &attributes);
        let array = ArrayD::from_shape_vec(IxDyn(&var_shape), unpacked)?;
        debug!(variable = %name, shape = ?var_shape, "Loaded variable");

        variables.insert(
            name.clone(),
            Variable {
                name: name.clone(),
                dimensions: var_dims,
                shape: var_shape,
                attributes,
                dtype: format!("{:?}", var.vartype()),
            },
        );
        data.insert(name, array);
    }

    for (dim_name, dim) in &dimensions {
        if !coordinates.contains_key(dim_name) {
            coordinates.insert(dim_name.clone(), (0..dim.size).map(|i| i as f64).collect());
            warn!(dimension = %dim_name, "Created default coordinates");
        }
    }

    Ok((
        Metadata {
            global_attributes,
            dimensions,
            variables,
            coordinates,
        },
        data,
    ))
}

/// Convert a NetCDF attribute to our AttributeValue enum
fn convert_attribute(attr: &Attribute) -> AttributeValue {
    use netcdf::AttributeValue as Nc;

    match attr.value() {
        Ok(Nc::Str(s)) => AttributeValue::Text(s),
        Ok(Nc::Strs(s)) => AttributeValue::Text(s.join(", ")),
        Ok(Nc::Uchar(v)) => AttributeValue::Number(v as f64),
        Ok(Nc::Schar(v)) => AttributeValue::Number(v as f64),
        Ok(Nc::Short(v)) => AttributeValue::Number(v as f64),
        Ok(Nc::Ushort(v)) => AttributeValue::Number(v as f64),
        Ok(Nc::Int(v)) => AttributeValue::Number(v as f64),
        Ok(Nc::Uint(v)) => AttributeValue::Number(v as f64),
        Ok(Nc::Float(v)) => AttributeValue::Number(v as f64),
        Ok(Nc::Double(v)) => AttributeValue::Number(v),
        Ok(Nc::Shorts(v)) => AttributeValue::NumberArray(v.into_iter().map(f64::from).collect()),
        Ok(Nc::Ints(v)) => AttributeValue::NumberArray(v.into_iter().map(f64::from).collect()),
        Ok(Nc::Floats(v)) => AttributeValue::NumberArray(v.into_iter().map(f64::from).collect()),
        Ok(Nc::Doubles(v)) => AttributeValue::NumberArray(v),
        Ok(other) => AttributeValue::Text(format!("{:?}", other)),
        Err(e) => {
            warn!(attribute = attr.name(), error = %e, "Unreadable attribute");
            AttributeValue::Text(String::new())
        }
    }
}

/// Mask fill values and apply CF packing attributes.
pub fn unpack_values(values: Vec<f64>, attributes: &HashMap<String, AttributeValue>) -> Vec<f32> {
    let number = |key: &str| attributes.get(key).and_then(AttributeValue::as_number);
    let fills: Vec<f64> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|key| number(key))
        .collect();
    let scale = number("scale_factor").unwrap_or(1.0);
    let offset = number("add_offset").unwrap_or(0.0);

    values
        .into_iter()
        .map(|v| {
            if !v.is_finite() || fills.iter().any(|fill| v == *fill) {
                f32::NAN
            } else {
                (v * scale + offset) as f32
            }
        })
        .collect()
}
