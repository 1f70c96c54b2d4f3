//! Single-field map charts.

use std::time::Instant;
use tracing::{debug, info};

use super::Overlay;
use crate::boundaries::BoundaryCatalog;
use crate::colortables::{self, ColorTable, Rgba, TableKind};
use crate::config::RenderConfig;
use crate::error::{BjerknesError, Result};
use crate::geography::{
    contour_interval_for, regions::CONTOUR_AREA_THRESHOLD, requested_extent, MapExtent,
};
use crate::grid::Grid;
use crate::interpolation::{get_interpolator, Interpolator};
use crate::mask::{mask_grid, MaskRegion};
use crate::render::{contour_levels, Canvas, ContourStyle};
use crate::state::{Dataset, GridSelector};

/// Gridline color: gray at half opacity.
const GRIDLINE_COLOR: Rgba = Rgba([128, 128, 128, 128]);

/// A filled map of one field with optional mask, overlays and contours.
pub struct FieldChart {
    /// Map extent; the grid's own extent when unset.
    pub extent: Option<MapExtent>,
    pub width: u32,
    pub height: u32,
    pub table: ColorTable,
    pub resampling: Box<dyn Interpolator>,
    /// Cells outside the region are dropped and pixels outside it clipped.
    pub mask: Option<MaskRegion>,
    pub overlays: Vec<Overlay>,
    pub contour: Option<(Grid, ContourStyle)>,
    pub gridline_spacing: Option<f64>,
    pub colorbar: bool,
}

/// Default resampling for a table: class codes must not be blended.
fn default_resampling(table: &ColorTable) -> &'static str {
    match table.kind {
        TableKind::Categorical { .. } => "nearest",
        _ => "bilinear",
    }
}

impl FieldChart {
    pub fn new(table: ColorTable, width: u32, height: u32) -> Result<Self> {
        let resampling = get_interpolator(default_resampling(&table))?;
        Ok(FieldChart {
            extent: None,
            width,
            height,
            table,
            resampling,
            mask: None,
            overlays: Vec::new(),
            contour: None,
            gridline_spacing: None,
            colorbar: true,
        })
    }

    /// Defaults from the render configuration; `colortable` overrides the
    /// configured table. Categorical tables keep nearest resampling.
    pub fn from_config(config: &RenderConfig, colortable: Option<&str>) -> Result<Self> {
        let table = colortables::get_color_table(colortable.unwrap_or(&config.colortable))?;
        let mut chart = Self::new(table, config.width, config.height)?;
        if !matches!(chart.table.kind, TableKind::Categorical { .. }) {
            chart.resampling = get_interpolator(&config.resampling)?;
        }
        chart.gridline_spacing = config.gridlines.then_some(config.gridline_spacing);
        chart.colorbar = config.colorbar;
        Ok(chart)
    }

    pub fn with_extent(mut self, extent: MapExtent) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn with_mask(mut self, region: MaskRegion) -> Self {
        self.mask = Some(region);
        self
    }

    pub fn with_overlays(mut self, overlays: Vec<Overlay>) -> Self {
        self.overlays = overlays;
        self
    }

    /// Contour a second field. Without an interval, one is picked from the
    /// size of the map.
    pub fn with_contour(mut self, grid: Grid, interval: Option<f64>) -> Self {
        let interval = interval.unwrap_or_else(|| {
            contour_interval_for(self.extent.as_ref(), 4.0, 2.0, CONTOUR_AREA_THRESHOLD)
        });
        let levels = match grid.value_range() {
            Some((lo, hi)) => contour_levels(lo as f64, hi as f64, interval),
            None => Vec::new(),
        };
        self.contour = Some((grid, ContourStyle::new(levels, Rgba::BLACK, 1.0)));
        self
    }

    /// Draw the chart. Layers go fill, contours, overlays, gridlines and
    /// colorbar.
    pub fn render(&self, grid: &Grid) -> Result<Canvas> {
        let start = Instant::now();
        let extent = self.extent.unwrap_or_else(|| grid.extent());
        let mut canvas = Canvas::new(extent, self.width, self.height, self.colorbar)?;

        let masked;
        let field = match &self.mask {
            Some(region) => {
                masked = mask_grid(grid, region)?;
                &masked
            }
            None => grid,
        };
        canvas.fill_grid(field, &self.table, self.resampling.as_ref(), self.mask.as_ref())?;

        if let Some((contour_grid, style)) = &self.contour {
            canvas.contour(contour_grid, style)?;
        }
        for overlay in &self.overlays {
            canvas.add_boundaries(&overlay.set, &overlay.style);
        }
        if let Some(spacing) = self.gridline_spacing {
            canvas.gridlines(spacing, GRIDLINE_COLOR)?;
        }
        if self.colorbar {
            let table = match grid.value_range() {
                Some((lo, hi)) if self.table.scale == colortables::Scale::Relative => {
                    self.table.fit_to(lo as f64, hi as f64)
                }
                _ => self.table.clone(),
            };
            canvas.colorbar(&table)?;
        }

        debug!(
            colortable = %self.table.name,
            overlays = self.overlays.len(),
            masked = self.mask.is_some(),
            "Assembled field chart"
        );
        info!(
            width = self.width,
            height = self.height,
            duration_ms = start.elapsed().as_millis() as u64,
            "Rendered field chart"
        );
        Ok(canvas)
    }
}

/// Everything needed to draw one field chart from a dataset. Shared by the
/// `render` subcommand and the `/chart` endpoint.
#[derive(Debug, Clone, Default)]
pub struct FieldRequest {
    pub var: String,
    pub time_index: Option<usize>,
    pub level_index: Option<usize>,
    /// Level coordinate value; the nearest level is used.
    pub level: Option<f64>,
    pub colortable: Option<String>,
    pub resampling: Option<String>,
    pub region: Option<String>,
    pub bbox: Option<String>,
    /// Boundary source name or shapefile path.
    pub mask: Option<String>,
    pub mask_attribute: Option<String>,
    pub mask_values: Vec<String>,
    pub boundaries: Vec<String>,
    pub contour_var: Option<String>,
    pub contour_interval: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub gridlines: Option<bool>,
    pub colorbar: Option<bool>,
}

impl FieldRequest {
    pub fn new(var: &str) -> Self {
        FieldRequest {
            var: var.to_string(),
            ..Default::default()
        }
    }

    pub fn selector(&self) -> GridSelector {
        GridSelector {
            time_index: self.time_index,
            level_index: self.level_index,
            level_value: self.level,
        }
    }

    /// The requested map extent: a named region or a bounding box.
    pub fn extent(&self) -> Result<Option<MapExtent>> {
        requested_extent(self.region.as_deref(), self.bbox.as_deref())
    }

    /// Build the chart for this request without drawing it.
    pub fn chart(&self, dataset: &Dataset, catalog: &BoundaryCatalog, config: &RenderConfig) -> Result<FieldChart> {
        let mut chart = FieldChart::from_config(config, self.colortable.as_deref())?;
        if let Some(resampling) = &self.resampling {
            chart.resampling = get_interpolator(resampling)?;
        }
        if let Some(width) = self.width {
            chart.width = width;
        }
        if let Some(height) = self.height {
            chart.height = height;
        }
        if let Some(gridlines) = self.gridlines {
            chart.gridline_spacing = gridlines.then_some(config.gridline_spacing);
        }
        if let Some(colorbar) = self.colorbar {
            chart.colorbar = colorbar;
        }
        chart.extent = self.extent()?;

        if let Some(source) = &self.mask {
            let region = catalog.mask_region(source, self.mask_attribute.as_deref(), &self.mask_values)?;
            if region.is_empty() {
                return Err(BjerknesError::DataNotFound {
                    message: format!("mask {} selects no polygons", source),
                });
            }
            chart = chart.with_mask(region);
        }
        chart = chart.with_overlays(Overlay::requested(catalog, &self.boundaries)?);

        if let Some(var) = &self.contour_var {
            let grid = dataset.grid(var, &self.selector())?;
            chart = chart.with_contour(grid, self.contour_interval);
        }
        Ok(chart)
    }

    /// Read the field and draw the chart.
    pub fn render(&self, dataset: &Dataset, catalog: &BoundaryCatalog, config: &RenderConfig) -> Result<Canvas> {
        let grid = dataset.grid(&self.var, &self.selector())?;
        self.chart(dataset, catalog, config)?.render(&grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, Rect};

    fn ramp() -> Grid {
        Grid::from_fn(
            (0..=20).map(|i| i as f64).collect(),
            (0..=10).map(|i| i as f64).collect(),
            |lon, _| lon as f32,
        )
        .unwrap()
    }

    fn chart() -> FieldChart {
        let table = ColorTable::from_levels_and_colors(
            "halves",
            vec![0.0, 10.0, 20.0],
            vec![Rgba::rgb(255, 0, 0), Rgba::rgb(0, 0, 255)],
            colortables::Extend::Neither,
        )
        .unwrap();
        FieldChart::new(table, 200, 130).unwrap()
    }

    #[test]
    fn test_render_fills_map_and_colorbar() {
        let canvas = chart().render(&ramp()).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (200, 130));
        let img = canvas.to_rgba_image();
        let (y, h) = canvas.colorbar_area().unwrap();
        assert_eq!(img.get_pixel(20, 50).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(180, 50).0, [0, 0, 255, 255]);
        assert_eq!(img.get_pixel(40, y + h / 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_mask_clips_fill() {
        let region = MaskRegion::from_rect(
            "west",
            Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 8.0, y: 10.0 }),
        );
        let mut chart = chart().with_mask(region);
        chart.colorbar = false;
        let img = chart.render(&ramp()).unwrap().to_rgba_image();
        assert_eq!(img.get_pixel(20, 50).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(150, 50).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_from_config() {
        let config = RenderConfig::default();
        let chart = FieldChart::from_config(&config, Some("temperature_nws")).unwrap();
        assert_eq!(chart.table.name, "temperature_nws");
        assert_eq!(chart.gridline_spacing, Some(config.gridline_spacing));
        assert!(FieldChart::from_config(&config, Some("no_such_table")).is_err());
    }

    #[test]
    fn test_categorical_tables_default_to_nearest() {
        let config = RenderConfig::default();
        let chart = FieldChart::from_config(&config, Some("landuse_modis21")).unwrap();
        assert_eq!(chart.resampling.name(), "nearest");
        let chart = FieldChart::from_config(&config, Some("temperature_nws")).unwrap();
        assert_eq!(chart.resampling.name(), config.resampling);

        let dataset = Dataset::from_grids(vec![("lu", ramp())]).unwrap();
        let catalog = BoundaryCatalog::new(crate::config::MapsConfig::default());
        let mut request = FieldRequest::new("lu");
        request.colortable = Some("landuse_usgs24".to_string());
        let chart = request.chart(&dataset, &catalog, &config).unwrap();
        assert_eq!(chart.resampling.name(), "nearest");
        request.resampling = Some("bilinear".to_string());
        let chart = request.chart(&dataset, &catalog, &config).unwrap();
        assert_eq!(chart.resampling.name(), "bilinear");
    }

    #[test]
    fn test_request_extent() {
        let mut request = FieldRequest::new("t2m");
        assert_eq!(request.extent().unwrap(), None);
        request.bbox = Some("100,20,120,40".to_string());
        assert_eq!(request.extent().unwrap().unwrap().lon_max, 120.0);
        request.region = Some("china".to_string());
        assert!(request.extent().is_err());
    }

    #[test]
    fn test_request_render() {
        let dataset = Dataset::from_grids(vec![("t2m", ramp())]).unwrap();
        let catalog = BoundaryCatalog::new(crate::config::MapsConfig::default());
        let mut request = FieldRequest::new("t2m");
        request.colortable = Some("temperature_nws".to_string());
        request.width = Some(120);
        request.height = Some(90);
        request.colorbar = Some(false);
        let canvas = request.render(&dataset, &catalog, &RenderConfig::default()).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (120, 90));

        request.var = "missing".to_string();
        assert!(matches!(
            request.render(&dataset, &catalog, &RenderConfig::default()),
            Err(BjerknesError::DataNotFound { .. })
        ));
    }

    #[test]
    fn test_contour_levels_follow_interval() {
        let chart = chart().with_contour(ramp(), Some(5.0));
        let (_, style) = chart.contour.as_ref().unwrap();
        assert_eq!(style.levels, vec![0.0, 5.0, 10.0, 15.0, 20.0]);
        assert!(chart.render(&ramp()).is_ok());
    }
}
