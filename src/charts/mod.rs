//! Chart assembly.
//!
//! Each entry point builds its own [`Canvas`](crate::render::Canvas), draws
//! its layers in order and hands the canvas back to the caller.

pub mod field;
pub mod synoptic;
pub mod time;

use std::sync::Arc;
use tracing::{debug, warn};

use crate::boundaries::{BoundaryCatalog, BoundarySet, BoundaryStyle};
use crate::error::{BjerknesError, Result};
use crate::grid::Grid;
use crate::state::{Dataset, GridSelector};

pub use field::{FieldChart, FieldRequest};
pub use synoptic::{SynopticOptions, SynopticProduct, SynopticVariables};
pub use time::ModelTime;

/// A scalar field with optional level overrides for its layer.
#[derive(Debug, Clone)]
pub struct ChartField {
    pub grid: Grid,
    pub levels: Option<Vec<f64>>,
}

impl ChartField {
    pub fn new(grid: Grid) -> Self {
        ChartField { grid, levels: None }
    }

    pub fn with_levels(mut self, levels: Vec<f64>) -> Self {
        self.levels = Some(levels);
        self
    }

    /// The override levels, or `default()` when none were given.
    pub fn levels_or<F>(&self, default: F) -> Vec<f64>
    where
        F: FnOnce() -> Vec<f64>,
    {
        self.levels.clone().unwrap_or_else(default)
    }
}

/// u and v components on one grid.
#[derive(Debug, Clone)]
pub struct WindField {
    pub u: Grid,
    pub v: Grid,
    /// Levels of the speed fill.
    pub levels: Option<Vec<f64>>,
}

impl WindField {
    pub fn new(u: Grid, v: Grid) -> Result<Self> {
        if !u.same_coords(&v) {
            return Err(BjerknesError::Geometry {
                message: "u and v components are on different grids".to_string(),
            });
        }
        Ok(WindField { u, v, levels: None })
    }

    pub fn with_levels(mut self, levels: Vec<f64>) -> Self {
        self.levels = Some(levels);
        self
    }

    pub fn speed(&self) -> Result<Grid> {
        Grid::speed(&self.u, &self.v)
    }
}

/// Reads chart fields from a dataset at one time step.
pub struct ChartData<'a> {
    dataset: &'a Dataset,
    selector: GridSelector,
}

impl<'a> ChartData<'a> {
    pub fn new(dataset: &'a Dataset, selector: GridSelector) -> Self {
        ChartData { dataset, selector }
    }

    /// The same time step at another vertical level.
    pub fn at_level(&self, level_value: f64) -> ChartData<'a> {
        ChartData {
            dataset: self.dataset,
            selector: self.selector.at_level(level_value),
        }
    }

    pub fn has(&self, var: &str) -> bool {
        self.dataset.has_variable(var)
    }

    pub fn field(&self, var: &str) -> Result<ChartField> {
        Ok(ChartField::new(self.dataset.grid(var, &self.selector)?))
    }

    /// A field that may be absent from the dataset.
    pub fn optional_field(&self, var: Option<&str>) -> Result<Option<ChartField>> {
        match var {
            Some(var) if self.has(var) => self.field(var).map(Some),
            Some(var) => {
                debug!(variable = %var, "Optional chart field not in dataset");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn wind(&self, u: &str, v: &str) -> Result<WindField> {
        WindField::new(
            self.dataset.grid(u, &self.selector)?,
            self.dataset.grid(v, &self.selector)?,
        )
    }
}

/// A boundary set and the style it is drawn in.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub set: Arc<BoundarySet>,
    pub style: BoundaryStyle,
}

impl Overlay {
    pub fn new(set: Arc<BoundarySet>, style: BoundaryStyle) -> Self {
        Overlay { set, style }
    }

    /// Load a source from the catalog in its default style.
    pub fn from_catalog(catalog: &BoundaryCatalog, source: &str) -> Result<Self> {
        Ok(Overlay::new(catalog.get(source)?, BoundaryStyle::for_source(source)))
    }

    /// Overlays for explicitly requested sources; any failure is returned.
    pub fn requested(catalog: &BoundaryCatalog, sources: &[String]) -> Result<Vec<Self>> {
        sources
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Self::from_catalog(catalog, s))
            .collect()
    }

    /// Background overlays: sources whose shapefile is missing are skipped.
    pub fn background(catalog: &BoundaryCatalog, sources: &[&str]) -> Result<Vec<Self>> {
        let mut overlays = Vec::new();
        for source in sources {
            match Self::from_catalog(catalog, source) {
                Ok(overlay) => overlays.push(overlay),
                Err(BjerknesError::DataNotFound { message }) => {
                    warn!(source = %source, reason = %message, "Skipping background map");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(overlays)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapsConfig;
    use geo::polygon;

    fn grid(value: f32) -> Grid {
        Grid::from_fn(vec![0.0, 1.0, 2.0], vec![0.0, 1.0], move |_, _| value).unwrap()
    }

    #[test]
    fn test_optional_field() {
        let dataset = Dataset::from_grids(vec![("t2m", grid(1.0))]).unwrap();
        let data = ChartData::new(&dataset, GridSelector::default());
        assert!(data.optional_field(Some("t2m")).unwrap().is_some());
        assert!(data.optional_field(Some("theta_e")).unwrap().is_none());
        assert!(data.optional_field(None).unwrap().is_none());
        assert!(data.field("theta_e").is_err());
    }

    #[test]
    fn test_wind_field() {
        let dataset = Dataset::from_grids(vec![("u", grid(3.0)), ("v", grid(4.0))]).unwrap();
        let wind = ChartData::new(&dataset, GridSelector::default()).wind("u", "v").unwrap();
        assert_eq!(wind.speed().unwrap().values[[0, 0]], 5.0);

        let other = Grid::from_fn(vec![0.0, 1.0], vec![0.0, 1.0], |_, _| 0.0).unwrap();
        assert!(WindField::new(grid(1.0), other).is_err());
    }

    #[test]
    fn test_levels_or_default() {
        let field = ChartField::new(grid(0.0));
        assert_eq!(field.levels_or(|| vec![1.0, 2.0]), vec![1.0, 2.0]);
        let field = field.with_levels(vec![5.0]);
        assert_eq!(field.levels_or(|| vec![1.0, 2.0]), vec![5.0]);
    }

    #[test]
    fn test_background_skips_missing_maps() {
        let dir = tempfile::tempdir().unwrap();
        let maps = MapsConfig {
            maps_dir: dir.path().to_path_buf(),
            ..MapsConfig::default()
        };
        let catalog = BoundaryCatalog::new(maps);
        catalog.insert(BoundarySet::from_polygons(
            "province",
            vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)]],
        ));

        let overlays = Overlay::background(&catalog, &["coastline", "province"]).unwrap();
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].set.name, "province");

        assert!(Overlay::requested(&catalog, &["coastline".to_string()]).is_err());
        assert!(Overlay::background(&catalog, &["no_such_source"]).is_err());
    }
}
