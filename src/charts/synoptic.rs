//! Synoptic analysis charts.
//!
//! Layer order follows the operational charts: background land, the filled
//! field, wind barbs, contour lines, then boundary lines and gridlines on
//! top.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::info;

use super::{ChartData, ChartField, Overlay, WindField};
use crate::colortables::{arange, get_color_table, ColorTable, Rgba};
use crate::error::{BjerknesError, Result};
use crate::geography::MapExtent;
use crate::interpolation::bilinear::BilinearInterpolator;
use crate::render::{BarbStyle, Canvas, ContourStyle};

const PURPLE: Rgba = Rgba([128, 0, 128, 255]);
const GRIDLINE_COLOR: Rgba = Rgba([128, 128, 128, 128]);

/// The synoptic chart products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynopticProduct {
    /// 500-hPa height, 850-hPa wind and sea level pressure.
    Gh500Uv850Mslp,
    /// 850-hPa wind speed and barbs.
    Uv850,
    /// 850-hPa wind with optional pressure, height and theta-e lines.
    Wind850,
    /// Potential temperature on the PV surface with optional pressure and
    /// height lines.
    ThetaOnPv,
}

impl SynopticProduct {
    pub const ALL: [SynopticProduct; 4] = [
        SynopticProduct::Gh500Uv850Mslp,
        SynopticProduct::Uv850,
        SynopticProduct::Wind850,
        SynopticProduct::ThetaOnPv,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SynopticProduct::Gh500Uv850Mslp => "gh500_uv850_mslp",
            SynopticProduct::Uv850 => "uv850",
            SynopticProduct::Wind850 => "wind850",
            SynopticProduct::ThetaOnPv => "theta_on_pv",
        }
    }

    pub fn default_extent(&self) -> MapExtent {
        match self {
            SynopticProduct::Gh500Uv850Mslp => MapExtent {
                lon_min: 50.0,
                lon_max: 150.0,
                lat_min: 0.0,
                lat_max: 65.0,
            },
            SynopticProduct::Uv850 | SynopticProduct::Wind850 | SynopticProduct::ThetaOnPv => MapExtent {
                lon_min: 73.0,
                lon_max: 136.0,
                lat_min: 18.0,
                lat_max: 54.0,
            },
        }
    }
}

impl fmt::Display for SynopticProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SynopticProduct {
    type Err = BjerknesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BjerknesError::InvalidParameter {
                param: "product".to_string(),
                message: format!(
                    "unknown product {}, select from {}",
                    s,
                    Self::ALL.map(|p| p.name()).join(", ")
                ),
            })
    }
}

/// Figure settings shared by the synoptic products.
#[derive(Debug, Clone)]
pub struct SynopticOptions {
    /// Map extent; the product's default when unset.
    pub extent: Option<MapExtent>,
    pub width: u32,
    pub height: u32,
    /// Barbs along the shorter map side; the product's default when unset.
    pub regrid: Option<usize>,
    /// Drawn beneath the data, e.g. land fill.
    pub background: Vec<Overlay>,
    /// Drawn above the data, e.g. coastlines and provinces.
    pub overlays: Vec<Overlay>,
    pub gridline_spacing: Option<f64>,
    pub colorbar: bool,
}

impl Default for SynopticOptions {
    fn default() -> Self {
        SynopticOptions {
            extent: None,
            width: 1000,
            height: 750,
            regrid: None,
            background: Vec::new(),
            overlays: Vec::new(),
            gridline_spacing: Some(15.0),
            colorbar: true,
        }
    }
}

impl SynopticOptions {
    fn canvas(&self, product: SynopticProduct, colorbar: bool) -> Result<Canvas> {
        let extent = self.extent.unwrap_or_else(|| product.default_extent());
        let mut canvas = Canvas::new(extent, self.width, self.height, colorbar && self.colorbar)?;
        for overlay in &self.background {
            canvas.add_boundaries(&overlay.set, &overlay.style);
        }
        Ok(canvas)
    }

    fn finish(&self, canvas: &mut Canvas, table: Option<&ColorTable>) -> Result<()> {
        for overlay in &self.overlays {
            canvas.add_boundaries(&overlay.set, &overlay.style);
        }
        if let Some(spacing) = self.gridline_spacing {
            canvas.gridlines(spacing, GRIDLINE_COLOR)?;
        }
        if let (Some(table), Some(_)) = (table, canvas.colorbar_area()) {
            canvas.colorbar(table)?;
        }
        Ok(())
    }
}

/// Dataset variable names and levels of the synoptic fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynopticVariables {
    pub gh: String,
    pub u: String,
    pub v: String,
    pub mslp: String,
    pub theta_e: Option<String>,
    /// Potential temperature on the PV surface.
    pub theta: String,
    pub gh_level: f64,
    pub wind_level: f64,
}

impl Default for SynopticVariables {
    fn default() -> Self {
        SynopticVariables {
            gh: "gh".to_string(),
            u: "u".to_string(),
            v: "v".to_string(),
            mslp: "mslp".to_string(),
            theta_e: None,
            theta: "theta".to_string(),
            gh_level: 500.0,
            wind_level: 850.0,
        }
    }
}

fn gh500_levels() -> Vec<f64> {
    let mut levels = arange(480.0, 584.0, 8.0);
    levels.extend(arange(580.0, 604.0, 4.0));
    levels
}

fn speed_fill(canvas: &mut Canvas, wind: &WindField) -> Result<ColorTable> {
    let levels = wind.levels.clone().unwrap_or_else(|| arange(4.0, 40.0, 4.0));
    let table = get_color_table("wind_speed_nws")?.with_levels(levels)?;
    canvas.fill_grid(&wind.speed()?, &table, &BilinearInterpolator, None)?;
    Ok(table)
}

/// 500-hPa height contours, 850-hPa wind barbs and filled sea level
/// pressure. Every field is optional.
pub fn gh500_uv850_mslp(
    gh500: Option<&ChartField>,
    uv850: Option<&WindField>,
    mslp: Option<&ChartField>,
    options: &SynopticOptions,
) -> Result<Canvas> {
    let product = SynopticProduct::Gh500Uv850Mslp;
    let mut canvas = options.canvas(product, mslp.is_some())?;

    let mut table = None;
    if let Some(mslp) = mslp {
        let levels = mslp.levels_or(|| arange(960.0, 1065.0, 5.0));
        let mslp_table = get_color_table("mslp_nws")?.with_levels(levels)?;
        canvas.fill_grid_with_opacity(&mslp.grid, &mslp_table, &BilinearInterpolator, None, 0.8)?;
        table = Some(mslp_table);
    }

    if let Some(wind) = uv850 {
        let style = BarbStyle {
            regrid: options.regrid.unwrap_or(20),
            length: 24.0,
            ..Default::default()
        };
        canvas.wind_barbs(&wind.u, &wind.v, &style)?;
    }

    if let Some(gh) = gh500 {
        let style = ContourStyle::new(gh.levels_or(gh500_levels), PURPLE, 2.0).with_highlight(588.0, 3.5);
        canvas.contour(&gh.grid, &style)?;
    }

    options.finish(&mut canvas, table.as_ref())?;
    Ok(canvas)
}

/// 850-hPa wind speed fill and barbs with optional height contours.
pub fn uv850(uv850: &WindField, gh850: Option<&ChartField>, options: &SynopticOptions) -> Result<Canvas> {
    let mut canvas = options.canvas(SynopticProduct::Uv850, true)?;
    let table = speed_fill(&mut canvas, uv850)?;

    let style = BarbStyle {
        regrid: options.regrid.unwrap_or(15),
        length: 28.0,
        ..Default::default()
    };
    canvas.wind_barbs(&uv850.u, &uv850.v, &style)?;

    if let Some(gh) = gh850 {
        let style = ContourStyle::new(gh.levels_or(|| arange(80.0, 180.0, 4.0)), PURPLE, 2.0);
        canvas.contour(&gh.grid, &style)?;
    }

    options.finish(&mut canvas, Some(&table))?;
    Ok(canvas)
}

/// 850-hPa wind with optional sea level pressure, 500-hPa height and
/// equivalent potential temperature lines. Barbs show unscaled speeds.
pub fn wind850(
    wind: &WindField,
    mslp: Option<&ChartField>,
    gh500: Option<&ChartField>,
    theta_e: Option<&ChartField>,
    options: &SynopticOptions,
) -> Result<Canvas> {
    let mut canvas = options.canvas(SynopticProduct::Wind850, true)?;
    let table = speed_fill(&mut canvas, wind)?;

    let style = BarbStyle {
        regrid: options.regrid.unwrap_or(15),
        scale: 1.0,
        length: 28.0,
        ..Default::default()
    };
    canvas.wind_barbs(&wind.u, &wind.v, &style)?;

    if let Some(mslp) = mslp {
        let style = ContourStyle::new(mslp.levels_or(|| arange(960.0, 1060.0, 4.0)), Rgba::BLACK, 1.0);
        canvas.contour(&mslp.grid, &style)?;
    }
    if let Some(gh) = gh500 {
        let style = ContourStyle::new(gh.levels_or(|| arange(480.0, 600.0, 2.0)), Rgba::WHITE, 1.0)
            .with_dash(vec![6.0, 4.0]);
        canvas.contour(&gh.grid, &style)?;
    }
    if let Some(theta_e) = theta_e {
        let levels = theta_e.levels_or(|| arange(280.0, 360.0, 4.0));
        let (lo, hi) = (levels[0], levels[levels.len() - 1]);
        let colors = get_color_table("turbo")?.fit_to(lo, hi);
        let style = ContourStyle::new(levels, Rgba::BLACK, 0.8).with_table(colors);
        canvas.contour(&theta_e.grid, &style)?;
    }

    options.finish(&mut canvas, Some(&table))?;
    Ok(canvas)
}

/// Filled potential temperature on the PV surface (300..396 K every 4) with
/// optional sea level pressure and dashed white 500-hPa height lines.
pub fn theta_on_pv(
    theta: &ChartField,
    mslp: Option<&ChartField>,
    gh500: Option<&ChartField>,
    options: &SynopticOptions,
) -> Result<Canvas> {
    let mut canvas = options.canvas(SynopticProduct::ThetaOnPv, true)?;

    let levels = theta.levels_or(|| arange(300.0, 400.0, 4.0));
    let table = get_color_table("turbo")?
        .with_levels(levels)?
        .renamed("theta_on_pv")
        .with_label("Potential Temperature", "K");
    canvas.fill_grid(&theta.grid, &table, &BilinearInterpolator, None)?;

    if let Some(mslp) = mslp {
        let style = ContourStyle::new(mslp.levels_or(|| arange(960.0, 1060.0, 4.0)), Rgba::BLACK, 1.0);
        canvas.contour(&mslp.grid, &style)?;
    }
    if let Some(gh) = gh500 {
        let style = ContourStyle::new(gh.levels_or(|| arange(480.0, 600.0, 2.0)), Rgba::WHITE, 1.0)
            .with_dash(vec![6.0, 4.0]);
        canvas.contour(&gh.grid, &style)?;
    }

    options.finish(&mut canvas, Some(&table))?;
    Ok(canvas)
}

/// Read the product's fields from a dataset and draw it.
pub fn render_product(
    product: SynopticProduct,
    data: &ChartData<'_>,
    vars: &SynopticVariables,
    options: &SynopticOptions,
) -> Result<Canvas> {
    let start = Instant::now();
    let upper = data.at_level(vars.gh_level);
    let lower = data.at_level(vars.wind_level);

    let canvas = match product {
        SynopticProduct::Gh500Uv850Mslp => {
            let gh = upper.optional_field(Some(&vars.gh))?;
            let mslp = data.optional_field(Some(&vars.mslp))?;
            let wind = match (lower.has(&vars.u), lower.has(&vars.v)) {
                (true, true) => Some(lower.wind(&vars.u, &vars.v)?),
                _ => None,
            };
            if gh.is_none() && mslp.is_none() && wind.is_none() {
                return Err(BjerknesError::DataNotFound {
                    message: format!(
                        "none of {}, {}/{} or {} is in the dataset",
                        vars.gh, vars.u, vars.v, vars.mslp
                    ),
                });
            }
            gh500_uv850_mslp(gh.as_ref(), wind.as_ref(), mslp.as_ref(), options)?
        }
        SynopticProduct::Uv850 => {
            let wind = lower.wind(&vars.u, &vars.v)?;
            let gh = lower.optional_field(Some(&vars.gh))?;
            uv850(&wind, gh.as_ref(), options)?
        }
        SynopticProduct::Wind850 => {
            let wind = lower.wind(&vars.u, &vars.v)?;
            let mslp = data.optional_field(Some(&vars.mslp))?;
            let gh = upper.optional_field(Some(&vars.gh))?;
            let theta_e = lower.optional_field(vars.theta_e.as_deref())?;
            wind850(&wind, mslp.as_ref(), gh.as_ref(), theta_e.as_ref(), options)?
        }
        SynopticProduct::ThetaOnPv => {
            let theta = data.field(&vars.theta)?;
            let mslp = data.optional_field(Some(&vars.mslp))?;
            let gh = upper.optional_field(Some(&vars.gh))?;
            theta_on_pv(&theta, mslp.as_ref(), gh.as_ref(), options)?
        }
    };

    info!(
        product = %product,
        width = options.width,
        height = options.height,
        duration_ms = start.elapsed().as_millis() as u64,
        "Rendered synoptic chart"
    );
    Ok(canvas)
}
