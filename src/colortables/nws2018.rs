//! NWS 2018 standard color curves.
//!
//! Each curve is a short list of anchor colors spread over the published
//! bounds. Unit variants rescale the bounds, not the colors.

use super::color::parse_colors;
use super::registry::{choice_param, no_param};
use super::table::{arange, linspace, ColorTable, Extend};
use crate::error::Result;

const TEMPERATURE_COLORS: [&str; 38] = [
    "#91003f", "#ce1256", "#e7298a", "#df65b0", "#ff73df", "#ffbee8", "#ffffff", "#dadaeb",
    "#bcbddc", "#9e9ac8", "#756bb1", "#54278f", "#0d007d", "#0d3d9c", "#0066c2", "#299eff",
    "#4ac7ff", "#73d7ff", "#adffff", "#30cfc2", "#009996", "#125757", "#066d2c", "#31a354",
    "#74c476", "#a1d99b", "#d3ffbe", "#ffffb3", "#ffeda0", "#fed176", "#feae2a", "#fd8d3c",
    "#fc4e2a", "#e31a1c", "#b10026", "#800026", "#590042", "#280028",
];

/// Temperature in `C` (default), `F` or `K`.
pub fn temperature(param: Option<&str>) -> Result<ColorTable> {
    let units = choice_param("nws_temperature", param, &["c", "f", "k"], "c")?;
    let (bounds, label) = match units.as_str() {
        "f" => (linspace(-60.0, 120.0, 37), "degF"),
        "k" => (linspace(223.0, 323.0, 51), "K"),
        _ => (linspace(-50.0, 50.0, 51), "degC"),
    };
    let anchors = parse_colors(&TEMPERATURE_COLORS)?;
    Ok(
        ColorTable::segmented("nws_temperature", bounds, &anchors, Extend::Both)?
            .with_label("Temperature", label),
    )
}

/// Dew point in `C` (default), `F` or `K`.
pub fn dewpoint(param: Option<&str>) -> Result<ColorTable> {
    let units = choice_param("nws_dewpoint", param, &["c", "f", "k"], "c")?;
    let celsius = vec![
        -18.0, -13.0, -8.0, -3.0, 2.0, 7.0, 10.0, 13.0, 16.0, 19.0, 22.0, 25.0, 28.0,
    ];
    let (bounds, label) = match units.as_str() {
        "f" => (
            vec![
                0.0, 10.0, 20.0, 30.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0,
            ],
            "degF",
        ),
        "k" => (celsius.iter().map(|c| c + 273.0).collect(), "K"),
        _ => (celsius, "degC"),
    };
    let colors = parse_colors(&[
        "#3b2204", "#543005", "#8c520a", "#bf812d", "#cca854", "#dfc27d", "#e6d9b5", "#d3ebe7",
        "#a9dbd3", "#72b8ad", "#318c85", "#01665f", "#003c30", "#002921",
    ])?;
    Ok(
        ColorTable::from_levels_and_colors("nws_dewpoint", bounds, colors, Extend::Both)?
            .with_label("Dew Point Temperature", label),
    )
}

pub fn relative_humidity(param: Option<&str>) -> Result<ColorTable> {
    no_param("nws_relative_humidity", param)?;
    let colors = parse_colors(&[
        "#910022", "#a61122", "#bd2e24", "#d44e33", "#e36d42", "#fa8f43", "#fcad58", "#fed884",
        "#fff2aa", "#e6f49d", "#bce378", "#71b55c", "#26914b", "#00572e",
    ])?;
    let bounds = vec![
        0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0,
    ];
    Ok(
        ColorTable::from_levels_and_colors("nws_relative_humidity", bounds, colors, Extend::Neither)?
            .with_label("Relative Humidity", "%"),
    )
}

/// Wind speed in `m/s` (default), `kn`, `mph` or `km/h`. The published
/// bounds are in mph and converted with the customary round factors.
pub fn wind(param: Option<&str>) -> Result<ColorTable> {
    let units = choice_param(
        "nws_wind",
        param,
        &["m/s", "ms", "kn", "knots", "mph", "km/h", "kph"],
        "m/s",
    )?;
    let (scale, label) = match units.as_str() {
        "kn" | "knots" => (1.0, "kn"),
        "mph" => (1.0, "mph"),
        "km/h" | "kph" => (1.5, "km/h"),
        _ => (0.5, "m/s"),
    };
    let bounds = [
        0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 60.0, 70.0, 80.0, 100.0,
        120.0, 140.0,
    ]
    .iter()
    .map(|b| b * scale)
    .collect();
    let colors = parse_colors(&[
        "#103f78", "#225ea8", "#1d91c0", "#41b6c4", "#7fcdbb", "#b4d79e", "#dfff9e", "#ffffa6",
        "#ffe873", "#ffc400", "#ffaa00", "#ff5900", "#ff0000", "#a80000", "#6e0000", "#ffbee8",
        "#ff73df",
    ])?;
    Ok(
        ColorTable::from_levels_and_colors("nws_wind", bounds, colors, Extend::Max)?
            .with_label("Wind Speed", label),
    )
}

pub fn cloud(param: Option<&str>) -> Result<ColorTable> {
    no_param("nws_cloud", param)?;
    let colors = parse_colors(&[
        "#24a0f2", "#4eb0f2", "#80b7f8", "#a0c8ff", "#d2e1ff", "#e1e1e1", "#c9c9c9", "#a5a5a5",
        "#6e6e6e", "#505050",
    ])?;
    Ok(
        ColorTable::from_levels_and_colors("nws_cloud", arange(0.0, 101.0, 10.0), colors, Extend::Neither)?
            .with_label("Cloud Cover", "%"),
    )
}

/// Precipitation amount in `mm` (default) or `in`.
pub fn precipitation(param: Option<&str>) -> Result<ColorTable> {
    let units = choice_param("nws_precipitation", param, &["mm", "in"], "mm")?;
    let scale = if units == "in" { 1.0 } else { 25.4 };
    let bounds = [
        0.0, 0.01, 0.1, 0.25, 0.5, 1.0, 1.5, 2.0, 3.0, 4.0, 6.0, 8.0, 10.0, 15.0, 20.0, 30.0,
    ]
    .iter()
    .map(|b| b * scale)
    .collect();
    let colors = parse_colors(&[
        "#ffffff", "#c7e9c0", "#a1d99b", "#74c476", "#31a353", "#006d2c", "#fffa8a", "#ffcc4f",
        "#fe8d3c", "#fc4e2a", "#d61a1c", "#ad0026", "#700026", "#3b0030", "#4c0073", "#ffdbff",
    ])?;
    Ok(
        ColorTable::from_levels_and_colors("nws_precipitation", bounds, colors, Extend::Max)?
            .with_label("Precipitation", &units),
    )
}

/// Probability of precipitation for `rain` (default), `snow` or `ice`.
pub fn pop(param: Option<&str>) -> Result<ColorTable> {
    let ptype = choice_param("nws_pop", param, &["rain", "snow", "ice"], "rain")?;
    let (colors, label) = match ptype.as_str() {
        "snow" => (
            [
                "#f5f5f5", "#e3ebff", "#bdd6ff", "#94b8ff", "#66a3ff", "#3690ff", "#0a7afa",
                "#006bd6", "#004ead", "#002487",
            ],
            "Probability of Snow",
        ),
        "ice" => (
            [
                "#f5f5f5", "#ffd9ed", "#ffaafa", "#ff83f9", "#ff57f7", "#ff37f5", "#e619f9",
                "#d500fd", "#a200ad", "#640087",
            ],
            "Probability of Ice",
        ),
        _ => (
            [
                "#f5f5f5", "#e2f6da", "#d5f2ca", "#c0ebaf", "#98df7b", "#6fd349", "#43c634",
                "#23b70b", "#139e07", "#0b8403",
            ],
            "Probability of Precipitation",
        ),
    };
    Ok(ColorTable::from_levels_and_colors(
        "nws_pop",
        linspace(0.0, 100.0, 11),
        parse_colors(&colors)?,
        Extend::Neither,
    )?
    .with_label(label, "%"))
}

/// Snow amount in inches.
pub fn snow(param: Option<&str>) -> Result<ColorTable> {
    no_param("nws_snow", param)?;
    let colors = parse_colors(&[
        "#ffffff", "#bdd7e7", "#6baed6", "#3182bd", "#08519c", "#082694", "#ffff96", "#ffc400",
        "#ff8700", "#db1400", "#9e0000", "#690000", "#360000",
    ])?;
    let bounds = vec![
        0.0, 0.1, 1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 12.0, 18.0, 24.0, 30.0, 36.0,
    ];
    Ok(
        ColorTable::from_levels_and_colors("nws_snow", bounds, colors, Extend::Max)?
            .with_label("Snow Amount", "in"),
    )
}

pub fn wave_height(param: Option<&str>) -> Result<ColorTable> {
    no_param("nws_wave_height", param)?;
    let colors = parse_colors(&[
        "#ebfdff", "#abedf5", "#78cdd6", "#4bb8c4", "#55b59f", "#86d483", "#b0e890", "#ddff99",
        "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026", "#800026", "#5c002f",
        "#330023",
    ])?;
    let bounds = vec![
        0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 10.0, 12.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 50.0,
        60.0,
    ];
    Ok(
        ColorTable::from_levels_and_colors("nws_wave_height", bounds, colors, Extend::Max)?
            .with_label("Wave Height", "ft"),
    )
}

/// Radar reflectivity, 40 bins from 0 to 80 dBZ.
pub fn reflectivity(param: Option<&str>) -> Result<ColorTable> {
    no_param("nws_reflectivity", param)?;
    let anchors = parse_colors(&[
        "#00ecec", "#01b5f3", "#0021f6", "#00de20", "#00cb00", "#079300", "#fdf900", "#ebb700",
        "#fd9500", "#ff0400", "#d50000", "#c80021", "#ea11f4", "#6e3d90", "#000000",
    ])?;
    Ok(
        ColorTable::segmented("nws_reflectivity", linspace(0.0, 80.0, 41), &anchors, Extend::Neither)?
            .with_label("Reflectivity", "dBZ"),
    )
}

/// Radar radial velocity, 16 bins from -20 to 20 m/s.
pub fn radial_velocity(param: Option<&str>) -> Result<ColorTable> {
    no_param("nws_radial_velocity", param)?;
    let anchors = parse_colors(&[
        "#90009f", "#29b72d", "#00ed00", "#00cc00", "#00b100", "#008f00", "#0c740c", "#7d9177",
        "#947a77", "#810303", "#a10000", "#bc0000", "#dd0000", "#f30000", "#ff0000",
    ])?;
    Ok(ColorTable::segmented(
        "nws_radial_velocity",
        linspace(-20.0, 20.0, 17),
        &anchors,
        Extend::Neither,
    )?
    .with_label("Radial Velocity", "m/s"))
}

pub(super) const PROBABILITY_COLORS: [&str; 11] = [
    "#ffffff", "#d7e3ee", "#b5caff", "#8fb3ff", "#7f97ff", "#abcf63", "#e8f59e", "#fffa14",
    "#ffd121", "#ffa30a", "#ff4c00",
];

/// Ensemble probability on a 0-1 scale in 0.05 steps.
pub fn probability(param: Option<&str>) -> Result<ColorTable> {
    no_param("nws_probability", param)?;
    let anchors = parse_colors(&PROBABILITY_COLORS)?;
    Ok(
        ColorTable::segmented("nws_probability", linspace(0.0, 1.05, 22), &anchors, Extend::Neither)?
            .with_label("Probability", ""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_units() {
        let c = temperature(None).unwrap();
        assert_eq!(c.levels().len(), 51);
        assert_eq!(c.value_range(), (-50.0, 50.0));
        assert_eq!(c.extend(), Extend::Both);

        let f = temperature(Some("F")).unwrap();
        assert_eq!(f.levels().len(), 37);
        assert_eq!(f.units.as_deref(), Some("degF"));

        assert!(temperature(Some("rankine")).is_err());
    }

    #[test]
    fn test_wind_unit_scaling() {
        let ms = wind(None).unwrap();
        assert_eq!(ms.value_range(), (0.0, 70.0));
        let kn = wind(Some("kn")).unwrap();
        assert_eq!(kn.value_range(), (0.0, 140.0));
        let kmh = wind(Some("km/h")).unwrap();
        assert_eq!(kmh.value_range(), (0.0, 210.0));
    }

    #[test]
    fn test_precipitation_inches_and_millimetres() {
        let mm = precipitation(None).unwrap();
        let inches = precipitation(Some("in")).unwrap();
        assert!((mm.value_range().1 - 762.0).abs() < 1e-9);
        assert_eq!(inches.value_range().1, 30.0);
    }

    #[test]
    fn test_pop_types_differ() {
        let rain = pop(None).unwrap();
        let snow = pop(Some("snow")).unwrap();
        assert_ne!(rain.map(95.0), snow.map(95.0));
        assert_eq!(rain.map(5.0), snow.map(5.0));
    }

    #[test]
    fn test_resampled_reflectivity_endpoints() {
        let table = reflectivity(None).unwrap();
        assert_eq!(table.bins().len(), 40);
        assert_eq!(table.map(0.0).unwrap().to_hex(), "#00ecec");
        assert_eq!(table.map(79.9).unwrap().to_hex(), "#000000");
    }
}
