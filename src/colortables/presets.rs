//! Product presets and general-purpose gradients.

use super::color::{from_rgb_triplets, parse_colors, sample_gradient, Rgba};
use super::nws2018;
use super::registry::{no_param, numeric_param};
use super::table::{arange, ColorTable, Extend, TableKind};
use crate::error::{BjerknesError, Result};

/// Colors sampled per gradient ramp; enough for smooth rendering.
const GRADIENT_SAMPLES: usize = 64;

/// Drop levels (and their colors) below `min_level`, keeping at least two.
fn from_min_level(
    name: &str,
    levels: Vec<f64>,
    colors: Vec<Rgba>,
    min_level: Option<f64>,
) -> Result<ColorTable> {
    let (levels, colors) = match min_level {
        Some(min) => {
            let start = levels.partition_point(|&l| l < min);
            if levels.len() - start < 2 {
                return Err(BjerknesError::InvalidParameter {
                    param: name.to_string(),
                    message: format!("minimum level {} leaves fewer than two levels", min),
                });
            }
            (levels[start..].to_vec(), colors[start..].to_vec())
        }
        None => (levels, colors),
    };
    ColorTable::from_levels_and_colors(name, levels, colors, Extend::Max)
}

fn optional_min_level(name: &str, param: Option<&str>) -> Result<Option<f64>> {
    param
        .map(|_| numeric_param(name, param, 0.0))
        .transpose()
}

/// Accumulated rainfall as drawn on NMC charts; the parameter is an
/// optional minimum level.
pub fn nmc_accumulated_rainfall(param: Option<&str>) -> Result<ColorTable> {
    let name = "nmc_accumulated_rainfall";
    let levels = vec![0.1, 10.0, 25.0, 50.0, 100.0, 250.0, 400.0, 600.0, 800.0, 1000.0];
    let colors = from_rgb_triplets(&[
        [161, 241, 141],
        [61, 186, 61],
        [96, 184, 255],
        [0, 0, 255],
        [250, 0, 250],
        [128, 0, 64],
        [255, 170, 0],
        [255, 102, 0],
        [230, 0, 0],
        [80, 45, 10],
    ]);
    Ok(
        from_min_level(name, levels, colors, optional_min_level(name, param)?)?
            .with_label("Accumulated Rainfall", "mm"),
    )
}

/// Accumulated rainfall in ECMWF chart colors; the parameter is an optional
/// minimum level.
pub fn ecmf_accumulated_rainfall(param: Option<&str>) -> Result<ColorTable> {
    let name = "ecmf_accumulated_rainfall";
    let levels = vec![0.5, 10.0, 30.0, 50.0, 70.0, 100.0, 130.0, 160.0];
    let colors = parse_colors(&[
        "#a7aaaa", "#5cc8d7", "#3076bc", "#6aaa43", "#f5832a", "#ee2f2d", "#8350a0", "#231f20",
    ])?;
    Ok(
        from_min_level(name, levels, colors, optional_min_level(name, param)?)?
            .with_label("Accumulated Rainfall", "mm"),
    )
}

/// Hourly precipitation on the upper 90% of the Blues ramp.
pub fn qpf_1h_blues(param: Option<&str>) -> Result<ColorTable> {
    no_param("qpf_1h_blues", param)?;
    let levels = vec![0.1, 4.0, 13.0, 25.0, 60.0, 120.0, 250.0];
    let gradient = colorgrad::blues();
    let n = levels.len();
    let colors = (0..n)
        .map(|i| {
            let t = 0.1 + 0.9 * i as f64 / (n - 1) as f64;
            Rgba(gradient.at(t).to_rgba8())
        })
        .collect();
    Ok(
        ColorTable::from_levels_and_colors("qpf_1h_blues", levels, colors, Extend::Max)?
            .with_label("Precipitation", "mm"),
    )
}

/// 2 m temperature with hard steps at 0, 5, 20 and 30 degrees.
pub fn temperature_2m(param: Option<&str>) -> Result<ColorTable> {
    no_param("temperature_2m", param)?;
    let positions = [
        -45.0, -30.0, -20.0, -10.0, -5.0, 0.0, 0.0, 5.0, 5.0, 10.0, 20.0, 20.0, 30.0, 30.0, 40.0,
        45.0,
    ];
    let colors = from_rgb_triplets(&[
        [61, 2, 57],
        [250, 0, 252],
        [9, 0, 121],
        [94, 157, 248],
        [46, 94, 127],
        [6, 249, 251],
        [254, 254, 254],
        [32, 178, 170],
        [11, 244, 11],
        [0, 97, 3],
        [173, 255, 47],
        [254, 254, 0],
        [255, 140, 0],
        [255, 99, 61],
        [90, 3, 3],
        [253, 253, 253],
    ]);
    Ok(ColorTable::from_positions("temperature_2m", &positions, &colors)?
        .with_label("2m Temperature", "degC"))
}

/// Line colors for 500-hPa height contours every 4 dagpm from 480 to 600.
/// Charts draw the 588 line thicker.
pub fn z_500_contour(param: Option<&str>) -> Result<ColorTable> {
    no_param("z_500_contour", param)?;
    let mut levels = arange(480.0, 580.0, 4.0);
    levels.extend(arange(580.0, 604.0, 4.0));
    Ok(
        ColorTable::segmented("z_500_contour", levels, &[Rgba::rgb(128, 0, 128)], Extend::Neither)?
            .with_label("500 hPa Geopotential Height", "dagpm"),
    )
}

/// Forecast probability in percent, on the probability ramp without its
/// white end.
pub fn probability_forecast(param: Option<&str>) -> Result<ColorTable> {
    no_param("probability_forecast", param)?;
    let levels = vec![
        1.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 95.0, 100.0,
    ];
    let anchors = parse_colors(&nws2018::PROBABILITY_COLORS[1..])?;
    Ok(
        ColorTable::segmented("probability_forecast", levels, &anchors, Extend::Max)?
            .with_label("Probability", "%"),
    )
}

/// Summer temperature, 0 to 34 degC every 2 degrees.
pub fn ndfd_t_summer(param: Option<&str>) -> Result<ColorTable> {
    no_param("ndfd_t_summer", param)?;
    let summer = nws2018::temperature(None)?.truncate(0.0, 34.0)?;
    let TableKind::Discrete {
        mut colors, over, ..
    } = summer.kind
    else {
        return Err(BjerknesError::InvalidColorTable {
            name: "ndfd_t_summer".to_string(),
            message: "temperature curve is not discrete".to_string(),
        });
    };
    colors.extend(over);
    Ok(
        ColorTable::from_levels_and_colors("ndfd_t_summer", arange(0.0, 35.0, 2.0), colors, Extend::Max)?
            .with_label("Temperature", "degC"),
    )
}

fn gradient_table(name: &str, param: Option<&str>, gradient: colorgrad::Gradient) -> Result<ColorTable> {
    no_param(name, param)?;
    ColorTable::relative_ramp(name, &sample_gradient(&gradient, GRADIENT_SAMPLES))
}

pub fn viridis(param: Option<&str>) -> Result<ColorTable> {
    gradient_table("viridis", param, colorgrad::viridis())
}

pub fn plasma(param: Option<&str>) -> Result<ColorTable> {
    gradient_table("plasma", param, colorgrad::plasma())
}

pub fn inferno(param: Option<&str>) -> Result<ColorTable> {
    gradient_table("inferno", param, colorgrad::inferno())
}

pub fn magma(param: Option<&str>) -> Result<ColorTable> {
    gradient_table("magma", param, colorgrad::magma())
}

pub fn cividis(param: Option<&str>) -> Result<ColorTable> {
    gradient_table("cividis", param, colorgrad::cividis())
}

pub fn turbo(param: Option<&str>) -> Result<ColorTable> {
    gradient_table("turbo", param, colorgrad::turbo())
}

pub fn rdbu(param: Option<&str>) -> Result<ColorTable> {
    gradient_table("rdbu", param, colorgrad::rd_bu())
}

pub fn spectral(param: Option<&str>) -> Result<ColorTable> {
    gradient_table("spectral", param, colorgrad::spectral())
}

pub fn blues(param: Option<&str>) -> Result<ColorTable> {
    gradient_table("blues", param, colorgrad::blues())
}
