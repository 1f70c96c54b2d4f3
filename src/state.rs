//! In-memory datasets and the shared application state.
//!
//! A [`Dataset`] holds every numeric variable of a file as an `f32` array
//! together with its metadata. Charts pull 2-D lat/lon [`Grid`]s out of it.

use ndarray::{Array2, ArrayD, Axis, IxDyn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::boundaries::BoundaryCatalog;
use crate::config::Config;
use crate::error::{BjerknesError, Result};
use crate::grid::Grid;

/// Metadata about a dimension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimension {
    /// Name of the dimension
    pub name: String,
    /// Size of the dimension
    pub size: usize,
    /// Whether this dimension is unlimited
    pub is_unlimited: bool,
}

/// Metadata about a variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Name of the variable
    pub name: String,
    /// Dimensions of the variable
    pub dimensions: Vec<String>,
    /// Shape of the variable (dimension sizes)
    pub shape: Vec<usize>,
    /// Variable attributes
    pub attributes: HashMap<String, AttributeValue>,
    /// Data type as string
    pub dtype: String,
}

/// Possible attribute values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// String attribute
    Text(String),
    /// Numeric attribute (stored as f64 for simplicity)
    Number(f64),
    /// Array of numbers
    NumberArray(Vec<f64>),
}

impl AttributeValue {
    /// First numeric value of the attribute, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(v) => Some(*v),
            AttributeValue::NumberArray(v) => v.first().copied(),
            AttributeValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Complete metadata for a dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// File-level attributes
    pub global_attributes: HashMap<String, AttributeValue>,
    /// Dimensions in the file
    pub dimensions: HashMap<String, Dimension>,
    /// Variables in the file
    pub variables: HashMap<String, Variable>,
    /// Coordinate values per dimension
    pub coordinates: HashMap<String, Vec<f64>>,
}

/// Which 2-D slice of a variable to extract.
///
/// Dimensions other than latitude and longitude are indexed at 0 unless
/// set here: `time_index` applies to dimensions whose name contains
/// "time", `level_index` (or the level nearest to `level_value`) to any
/// other dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSelector {
    #[serde(default)]
    pub time_index: Option<usize>,
    #[serde(default)]
    pub level_index: Option<usize>,
    #[serde(default)]
    pub level_value: Option<f64>,
}

impl GridSelector {
    pub fn at_time(time_index: usize) -> Self {
        GridSelector {
            time_index: Some(time_index),
            ..Default::default()
        }
    }

    pub fn at_level(mut self, level_value: f64) -> Self {
        self.level_value = Some(level_value);
        self
    }
}

/// Short description of a loaded dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub variables: usize,
    pub dimensions: usize,
    pub grid_variables: Vec<String>,
}

fn is_lat_name(name: &str) -> bool {
    let name = name.to_lowercase();
    name == "lat" || name == "latitude" || name == "lats" || name == "y_lat"
}

fn is_lon_name(name: &str) -> bool {
    let name = name.to_lowercase();
    name == "lon" || name == "longitude" || name == "lons" || name == "x_lon"
}

/// An in-memory gridded dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Dataset metadata
    pub metadata: Metadata,
    /// Loaded data arrays
    pub data: HashMap<String, ArrayD<f32>>,
}

impl Dataset {
    pub fn new(metadata: Metadata, data: HashMap<String, ArrayD<f32>>) -> Self {
        Self { metadata, data }
    }

    /// Assemble a dataset from 2-D grids sharing one lat/lon grid.
    pub fn from_grids(grids: Vec<(&str, Grid)>) -> Result<Self> {
        let Some((_, first)) = grids.first() else {
            return Err(BjerknesError::DataNotFound {
                message: "no grids given".to_string(),
            });
        };
        let (lats, lons) = (first.lats.clone(), first.lons.clone());

        let mut metadata = Metadata::default();
        for (name, values) in [("lat", &lats), ("lon", &lons)] {
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
        for (name, grid) in grids {
            if grid.lats != lats || grid.lons != lons {
                return Err(BjerknesError::Geometry {
                    message: format!("grid {} does not share the dataset coordinates", name),
                });
            }
            metadata.variables.insert(
                name.to_string(),
                Variable {
                    name: name.to_string(),
                    dimensions: vec!["lat".to_string(), "lon".to_string()],
                    shape: vec![lats.len(), lons.len()],
                    attributes: HashMap::new(),
                    dtype: "f32".to_string(),
                },
            );
            data.insert(name.to_string(), grid.values.into_dyn());
        }
        Ok(Dataset { metadata, data })
    }

    /// Get a variable's data array with error handling
    pub fn get_variable_checked(&self, name: &str) -> Result<&ArrayD<f32>> {
        self.data.get(name).ok_or_else(|| BjerknesError::DataNotFound {
            message: format!("Variable not found: {}", name),
        })
    }

    /// Get coordinate values for a dimension with error handling
    pub fn get_coordinate_checked(&self, name: &str) -> Result<&Vec<f64>> {
        self.metadata
            .coordinates
            .get(name)
            .ok_or_else(|| BjerknesError::DataNotFound {
                message: format!("Coordinate not found: {}", name),
            })
    }

    /// Get variable metadata with error handling
    pub fn get_variable_metadata_checked(&self, name: &str) -> Result<&Variable> {
        self.metadata
            .variables
            .get(name)
            .ok_or_else(|| BjerknesError::DataNotFound {
                message: format!("Variable metadata not found: {}", name),
            })
    }

    /// Check if a variable exists
    pub fn has_variable(&self, name: &str) -> bool {
        self.metadata.variables.contains_key(name) && self.data.contains_key(name)
    }

    fn coordinate_has_units(&self, dim: &str, units: &[&str]) -> bool {
        self.metadata
            .variables
            .get(dim)
            .and_then(|v| v.attributes.get("units"))
            .and_then(|u| u.as_text())
            .map(|u| units.contains(&u))
            .unwrap_or(false)
    }

    /// Positions of the latitude and longitude dimensions of a variable.
    pub fn lat_lon_axes(&self, var_name: &str) -> Result<(usize, usize)> {
        let var = self.get_variable_metadata_checked(var_name)?;
        let find = |by_name: fn(&str) -> bool, units: &[&str]| {
            var.dimensions
                .iter()
                .position(|d| by_name(d))
                .or_else(|| {
                    var.dimensions
                        .iter()
                        .position(|d| self.coordinate_has_units(d, units))
                })
        };
        let lat = find(is_lat_name, &["degrees_north", "degree_north", "degrees_N"]);
        let lon = find(is_lon_name, &["degrees_east", "degree_east", "degrees_E"]);
        match (lat, lon) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(BjerknesError::DataNotFound {
                message: format!(
                    "Variable {} has no latitude/longitude dimensions ({:?})",
                    var_name, var.dimensions
                ),
            }),
        }
    }

    /// Names of variables that have latitude and longitude dimensions.
    pub fn grid_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .metadata
            .variables
            .keys()
            .filter(|name| self.data.contains_key(*name) && self.lat_lon_axes(name).is_ok())
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Find the index of the coordinate nearest to `value`.
    pub fn find_coordinate_index(&self, dim_name: &str, value: f64) -> Result<usize> {
        let coords = self.get_coordinate_checked(dim_name)?;
        coords
            .iter()
            .enumerate()
            .min_by(|a, b| (a.1 - value).abs().total_cmp(&(b.1 - value).abs()))
            .map(|(i, _)| i)
            .ok_or_else(|| BjerknesError::DataNotFound {
                message: format!("Coordinate {} is empty", dim_name),
            })
    }

    /// Index into every non-horizontal dimension according to `selector`.
    fn slice_indices(&self, var_name: &str, selector: &GridSelector) -> Result<Vec<Option<usize>>> {
        let var = self.get_variable_metadata_checked(var_name)?;
        let (lat_axis, lon_axis) = self.lat_lon_axes(var_name)?;

        let mut indices = Vec::with_capacity(var.dimensions.len());
        for (axis, dim) in var.dimensions.iter().enumerate() {
            if axis == lat_axis || axis == lon_axis {
                indices.push(None);
                continue;
            }
            let size = var.shape[axis];
            let (param, index) = if dim.to_lowercase().contains("time") {
                ("time_index", selector.time_index.unwrap_or(0))
            } else if let Some(value) = selector.level_value {
                ("level", self.find_coordinate_index(dim, value)?)
            } else {
                ("level_index", selector.level_index.unwrap_or(0))
            };
            if index >= size {
                return Err(BjerknesError::InvalidParameter {
                    param: param.to_string(),
                    message: format!(
                        "index {} is out of range for dimension {} of size {}",
                        index, dim, size
                    ),
                });
            }
            indices.push(Some(index));
        }
        Ok(indices)
    }

    /// Extract a 2-D lat/lon grid of a variable.
    pub fn grid(&self, var_name: &str, selector: &GridSelector) -> Result<Grid> {
        let array = self.get_variable_checked(var_name)?;
        let var = self.get_variable_metadata_checked(var_name)?;
        let (lat_axis, lon_axis) = self.lat_lon_axes(var_name)?;
        let indices = self.slice_indices(var_name, selector)?;

        // drop the selected axes from the highest down so positions stay valid
        let mut view = array.view();
        for axis in (0..indices.len()).rev() {
            if let Some(index) = indices[axis] {
                view = view.index_axis_move(Axis(axis), index);
            }
        }
        let plane = view.into_dimensionality::<ndarray::Ix2>()?;
        let values: Array2<f32> = if lat_axis < lon_axis {
            plane.to_owned()
        } else {
            plane.t().to_owned()
        };

        let lats = self
            .get_coordinate_checked(&var.dimensions[lat_axis])?
            .clone();
        let lons = self
            .get_coordinate_checked(&var.dimensions[lon_axis])?
            .clone();
        Grid::new(lons, lats, values)
    }

    /// Mutable access to a variable's array.
    pub fn variable_mut(&mut self, name: &str) -> Result<&mut ArrayD<f32>> {
        self.data
            .get_mut(name)
            .ok_or_else(|| BjerknesError::DataNotFound {
                message: format!("Variable not found: {}", name),
            })
    }

    /// Number of elements in a variable.
    pub fn variable_len(&self, name: &str) -> Result<usize> {
        Ok(self.get_variable_checked(name)?.len())
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            variables: self.metadata.variables.len(),
            dimensions: self.metadata.dimensions.len(),
            grid_variables: self.grid_variables(),
        }
    }

    /// Validate that the dataset is consistent and ready for use
    pub fn validate(&self) -> Result<()> {
        if self.metadata.variables.is_empty() {
            return Err(BjerknesError::DataNotFound {
                message: "No variables found in the dataset".to_string(),
            });
        }

        for (var_name, var) in &self.metadata.variables {
            for dim_name in &var.dimensions {
                if !self.metadata.dimensions.contains_key(dim_name) {
                    return Err(BjerknesError::DataNotFound {
                        message: format!(
                            "Variable {} references non-existent dimension {}",
                            var_name, dim_name
                        ),
                    });
                }
            }
            if let Some(data) = self.data.get(var_name) {
                if data.shape() != var.shape.as_slice() {
                    return Err(BjerknesError::DataNotFound {
                        message: format!(
                            "Variable {} has inconsistent shape between metadata ({:?}) and data ({:?})",
                            var_name,
                            var.shape,
                            data.shape()
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Build a dynamic array from a shape and values.
pub fn array_from_vec(shape: &[usize], values: Vec<f32>) -> Result<ArrayD<f32>> {
    Ok(ArrayD::from_shape_vec(IxDyn(shape), values)?)
}

/// The main application state shared across all handlers
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Loaded dataset, if the server was started with one
    pub dataset: Option<Dataset>,
    /// Boundary sets for chart overlays
    pub boundaries: BoundaryCatalog,
    /// Server start time
    pub started: Instant,
}

impl AppState {
    pub fn new(config: Config, dataset: Option<Dataset>) -> Self {
        let boundaries = BoundaryCatalog::new(config.maps.clone());
        Self {
            config,
            dataset,
            boundaries,
            started: Instant::now(),
        }
    }

    /// Create a new AppState wrapped in an Arc for shared ownership
    pub fn new_shared(config: Config, dataset: Option<Dataset>) -> Arc<Self> {
        Arc::new(Self::new(config, dataset))
    }

    /// The loaded dataset, or `DataNotFound`.
    pub fn dataset_checked(&self) -> Result<&Dataset> {
        self.dataset.as_ref().ok_or_else(|| BjerknesError::DataNotFound {
            message: "No dataset is loaded".to_string(),
        })
    }
}
