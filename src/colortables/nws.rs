//! NWS standard color scales for precipitation, temperature, wind,
//! humidity, pressure and height fields.
//!
//! Discrete scales follow `from_levels_and_colors` semantics: `Extend::Max`
//! tables carry one color more than they have bins.

use super::color::{from_rgb_triplets, from_unit_triplets, parse_colors};
use super::registry::{accumulation_hours, no_param, numeric_param};
use super::table::{arange, ColorTable, Extend};
use crate::error::Result;

fn concat(parts: &[Vec<f64>]) -> Vec<f64> {
    parts.iter().flatten().copied().collect()
}

/// MetPy gallery precipitation palette.
pub fn precipitation_metpy(param: Option<&str>) -> Result<ColorTable> {
    no_param("precipitation_metpy", param)?;
    let colors = from_unit_triplets(&[
        [1.0, 1.0, 1.0],
        [0.3137, 0.8157, 0.8157],
        [0.0, 1.0, 1.0],
        [0.0, 0.8784, 0.5020],
        [0.0, 0.7529, 0.0],
        [0.5020, 0.8784, 0.0],
        [1.0, 1.0, 0.0],
        [1.0, 0.6275, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.1255, 0.5020],
        [0.9412, 0.2510, 1.0],
        [0.5020, 0.1255, 1.0],
        [0.2510, 0.2510, 1.0],
        [0.1255, 0.1255, 0.5020],
        [0.1255, 0.1255, 0.1255],
        [0.5020, 0.5020, 0.5020],
        [0.8784, 0.8784, 0.8784],
        [0.9333, 0.8314, 0.7373],
        [0.8549, 0.6510, 0.4706],
        [0.6275, 0.4235, 0.2353],
        [0.4, 0.2, 0.0],
    ]);
    let levels = vec![
        0.0, 1.0, 2.5, 5.0, 7.5, 10.0, 15.0, 20.0, 30.0, 40.0, 50.0, 70.0, 100.0, 150.0, 200.0,
        250.0, 300.0, 400.0, 500.0, 600.0, 750.0,
    ];
    Ok(
        ColorTable::from_levels_and_colors("precipitation_metpy", levels, colors, Extend::Max)?
            .with_label("Precipitation", "mm"),
    )
}

pub fn precipitation_nws(param: Option<&str>) -> Result<ColorTable> {
    let hours = accumulation_hours("precipitation_nws", param)?;
    let levels = match hours {
        1 | 3 => vec![
            0.01, 1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 10.0, 15.0, 20.0, 30.0, 40.0, 60.0, 80.0, 100.0,
        ],
        6 => vec![
            0.01, 1.0, 3.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0, 60.0, 80.0, 100.0,
            120.0,
        ],
        _ => vec![
            0.1, 2.5, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0, 75.0, 100.0, 150.0, 200.0,
            250.0,
        ],
    };
    let colors = parse_colors(&[
        "#04e9e7", "#019ff4", "#0300f4", "#02fd02", "#01c501", "#008e00", "#fdf802", "#e5bc00",
        "#fd9500", "#fd0000", "#d40000", "#bc0000", "#f800fd", "#dd1c77", "#9854c6",
    ])?;
    Ok(
        ColorTable::from_levels_and_colors("precipitation_nws", levels, colors, Extend::Max)?
            .with_label("Precipitation", "mm"),
    )
}

pub fn rain_nws(param: Option<&str>) -> Result<ColorTable> {
    let hours = accumulation_hours("rain_nws", param)?;
    let levels = match hours {
        24 => vec![0.1, 10.0, 25.0, 50.0, 100.0, 250.0, 800.0],
        6 => vec![0.1, 4.0, 13.0, 25.0, 60.0, 120.0, 800.0],
        _ => vec![0.01, 2.0, 7.0, 13.0, 30.0, 60.0, 800.0],
    };
    let colors = from_rgb_triplets(&[
        [144, 238, 144],
        [0, 127, 0],
        [135, 206, 250],
        [0, 0, 255],
        [255, 0, 255],
        [127, 0, 0],
    ]);
    Ok(
        ColorTable::from_levels_and_colors("rain_nws", levels, colors, Extend::Neither)?
            .with_label("Rainfall", "mm"),
    )
}

pub fn qpf_nws(param: Option<&str>) -> Result<ColorTable> {
    let hours = accumulation_hours("qpf_nws", param)?;
    let levels = match hours {
        24 => concat(&[
            vec![0.0, 0.1, 0.5, 1.0],
            arange(2.5, 25.0, 2.5),
            arange(25.0, 50.0, 5.0),
            arange(50.0, 150.0, 10.0),
            arange(150.0, 475.0, 25.0),
        ]),
        6 => concat(&[
            vec![0.0, 0.1, 0.5],
            arange(1.0, 4.0, 1.0),
            arange(4.0, 13.0, 1.5),
            arange(13.0, 25.0, 2.0),
            arange(25.0, 60.0, 2.5),
            arange(60.0, 105.0, 5.0),
        ]),
        _ => concat(&[
            vec![0.0, 0.01, 0.1],
            arange(0.5, 2.0, 0.5),
            arange(2.0, 8.0, 1.0),
            arange(8.0, 20.0, 2.0),
            arange(20.0, 55.0, 2.5),
            arange(55.0, 100.0, 5.0),
        ]),
    };
    let colors = parse_colors(&[
        "#FFFFFF", "#BABABA", "#A6A1A1", "#7E7E7E", "#6C6C6C", "#B2F8B0", "#94F397", "#56EE6C",
        "#2EB045", "#249C3B", "#2562C6", "#347EE4", "#54A1EB", "#94CEF4", "#B2EEF6", "#FDF8B2",
        "#FDE688", "#FDBC5C", "#FD9E42", "#FB6234", "#FB3D2D", "#DD2826", "#BA1B21", "#9F1A1D",
        "#821519", "#624038", "#88645C", "#B08880", "#C49C94", "#F0DAD1", "#CBC4D9", "#A99CC1",
        "#9687B6", "#715C99", "#65538B", "#73146F", "#881682", "#AA19A4", "#BB1BB5", "#C61CC0",
        "#D71ECF",
    ])?;
    Ok(
        ColorTable::from_levels_and_colors("qpf_nws", levels, colors, Extend::Max)?
            .with_label("Quantitative Precipitation Forecast", "mm"),
    )
}

pub fn sleet_nws(param: Option<&str>) -> Result<ColorTable> {
    let hours = accumulation_hours("sleet_nws", param)?;
    let levels = match hours {
        24 => vec![0.1, 10.0, 25.0, 50.0, 100.0, 250.0],
        6 => vec![0.1, 4.0, 13.0, 25.0, 60.0, 120.0],
        _ => vec![0.1, 2.0, 7.0, 13.0, 30.0, 60.0],
    };
    let colors = from_rgb_triplets(&[
        [253, 216, 213],
        [251, 174, 185],
        [247, 109, 163],
        [211, 41, 146],
        [146, 1, 122],
        [81, 0, 108],
    ]);
    Ok(
        ColorTable::from_levels_and_colors("sleet_nws", levels, colors, Extend::Max)?
            .with_label("Sleet", "mm"),
    )
}

pub fn snow_nws(param: Option<&str>) -> Result<ColorTable> {
    let hours = accumulation_hours("snow_nws", param)?;
    let levels = match hours {
        24 => vec![0.1, 2.5, 5.0, 10.0, 20.0, 30.0],
        6 => vec![0.1, 1.0, 3.0, 5.0, 10.0, 15.0],
        _ => vec![0.1, 1.0, 2.0, 4.0, 8.0, 12.0],
    };
    let colors = from_rgb_triplets(&[
        [234, 234, 234],
        [200, 200, 200],
        [154, 154, 154],
        [108, 108, 108],
        [58, 58, 58],
        [6, 6, 6],
    ]);
    Ok(
        ColorTable::from_levels_and_colors("snow_nws", levels, colors, Extend::Max)?
            .with_label("Snowfall", "mm"),
    )
}

/// Classes: none, rain, freezing rain, snow, wet snow, sleet, ice pellets.
pub fn precipitation_type_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("precipitation_type_nws", param)?;
    let colors = parse_colors(&[
        "#FFFFFF", "#4169E1", "#DC143C", "#708090", "#228B22", "#EE82EE", "#FFD700",
    ])?;
    let levels = vec![0.0, 1.0, 3.0, 5.0, 6.0, 7.0, 8.0];
    Ok(
        ColorTable::from_levels_and_colors("precipitation_type_nws", levels, colors, Extend::Max)?
            .with_label("Precipitation Type", ""),
    )
}

pub fn qsf_nws(param: Option<&str>) -> Result<ColorTable> {
    let hours = accumulation_hours("qsf_nws", param)?;
    let levels = match hours {
        24 => concat(&[vec![0.1], arange(0.5, 15.0, 0.5), arange(15.0, 43.0, 1.0)]),
        6 => concat(&[vec![0.1], arange(0.5, 20.0, 0.5), arange(20.0, 38.0, 1.0)]),
        _ => concat(&[vec![0.01], arange(0.5, 25.0, 0.5), arange(25.0, 33.0, 1.0)]),
    };
    let colors = parse_colors(&[
        "#BBBBBB", "#949494", "#6D6D6D", "4F4F52", "#97D0F6", "#76B5FA", "#50A5F1", "#4097EC",
        "2F7FE4", "#256AE5", "#1C64CA", "#155BBB", "#400A80", "4F0687", "#5A0888", "#6A0785",
        "#860C83", "#9F0F81", "C9117C", "#C9117C", "#E31B73", "#E31B73", "#F33E96", "FC5DAD",
        "#FD6CB1", "#F883BA", "#ED8EBF", "#EC93C5", "EA9ACA", "#D7A8D1", "#D3B0D3", "#BFC6DC",
        "#B3D4E8", "A5E4E9", "#9BEFF0", "#92F9F7", "#90F2F0", "#7ED9D8", "76B5C6", "#6FBBC3",
        "#7DB5C4", "#7FB2C6", "#89B1CB", "88ABC8", "#8CA8CB", "#91A8D3", "#92A8CF", "#95A0DB",
        "98A3D4", "#A19DDE", "#A39CD9", "#A99CD2", "#AB95E7", "AF95ED", "#B394E3", "#BA8DE8",
        "#BA90E8", "#BF8DEC",
    ])?;
    Ok(
        ColorTable::from_levels_and_colors("qsf_nws", levels, colors, Extend::Max)?
            .with_label("Quantitative Snow Forecast", "mm"),
    )
}

fn snow_depth_levels() -> Vec<f64> {
    concat(&[
        vec![0.0, 0.1, 0.5],
        arange(1.0, 12.0, 1.0),
        arange(12.0, 60.0, 4.0),
        arange(60.0, 100.0, 10.0),
        arange(100.0, 1100.0, 100.0),
    ])
}

const SNOW_DEPTH_COLORS: [&str; 40] = [
    "#FFFFFF", "#E0E0E0", "#C6C6C6", "#ADADAD", "#949494", "#A8E6F0", "#72BDD4", "#3F96B7",
    "#126F9C", "#0C47AA", "#2D63B6", "#4F80C3", "#749ECF", "#99BCDC", "#BFDAE9", "#C7ABD7",
    "#BF93CE", "#B77DC4", "#AE66BC", "#A650B2", "#9E3AA9", "#851547", "#942359", "#A4326C",
    "#B3427E", "#C35191", "#D462A4", "#E9A5B5", "#E69A9F", "#E48E8A", "#E18175", "#DF7660",
    "#DC6A4D", "#DA8056", "#DF946C", "#E4A781", "#EABB98", "#F0CFB0", "#F5E4C6", "#FAF8DE",
];

pub fn snow_depth_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("snow_depth_nws", param)?;
    let colors = parse_colors(&SNOW_DEPTH_COLORS)?;
    Ok(
        ColorTable::from_levels_and_colors("snow_depth_nws", snow_depth_levels(), colors, Extend::Max)?
            .with_label("Snow Depth", "cm"),
    )
}

pub fn snow_density_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("snow_density_nws", param)?;
    let colors = parse_colors(&SNOW_DEPTH_COLORS)?;
    Ok(ColorTable::from_levels_and_colors(
        "snow_density_nws",
        snow_depth_levels(),
        colors,
        Extend::Max,
    )?
    .with_label("Snow Density", "kg m-3"))
}

/// 2-m temperature; the repeated positions at 0, 5, 20 and 30 degrees are
/// hard color steps.
pub fn temperature_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("temperature_nws", param)?;
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
    let positions = [
        -45.0, -30.0, -20.0, -10.0, -5.0, 0.0, 0.0, 5.0, 5.0, 10.0, 20.0, 20.0, 30.0, 30.0, 40.0,
        45.0,
    ];
    Ok(ColorTable::from_positions("temperature_nws", &positions, &colors)?
        .with_label("Temperature", "degC"))
}

pub fn temperature_trend_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("temperature_trend_nws", param)?;
    let colors = parse_colors(&[
        "#Fcdcf7", "#F795E7", "#F378E0", "#F059D8", "#EC2ACE", "#C022A8", "#A01F8C", "#811C70",
        "#6B195E", "#54154B", "#342799", "#402FA8", "#4A40BB", "#6E60D0", "#7E6EDF", "#9D89F3",
        "#BCB0F7", "#DDDDFE", "#DDDDFE", "#B2F8B0", "#94F397", "#78F384", "#56EE6C", "#42CE5A",
        "#2EB045", "#249C3B", "#2562C6", "#2C6CDF", "#4492EB", "#54A1EB", "#78B5F2", "#94CEF4",
        "#B2EEF6", "#FFFFFF", "#FDFCFC", "#FDFFB1", "#FDE099", "#FDC083", "#FDA56D", "#FD8858",
        "#FC6D46", "#FB5337", "#E5372A", "#CD3126", "#B72B22", "#A0251F", "#8C1F1B", "#761A18",
        "#621215", "#4E0F12", "#624039", "#74524A", "#88645C", "#9C766E", "#B08880", "#C49C94",
        "#DDBAB2", "#EEDAD0", "#F8EEE4", "#FDE4E4", "#FDC4C6", "#F29E9E", "#E28082", "#DD6466",
        "#DD6466", "#BF4345", "#AE3335",
    ])?;
    let levels = concat(&[
        arange(-42.0, -18.0, 2.0),
        arange(-18.0, -3.0, 1.0),
        arange(-3.0, 0.0, 0.5),
        arange(0.5, 3.0, 0.5),
        arange(3.0, 18.0, 1.0),
        arange(18.0, 43.0, 2.0),
    ]);
    Ok(
        ColorTable::from_levels_and_colors("temperature_trend_nws", levels, colors, Extend::Both)?
            .with_label("Temperature Change", "degC"),
    )
}

pub fn wind_speed_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("wind_speed_nws", param)?;
    let colors = from_rgb_triplets(&[
        [255, 255, 255],
        [99, 99, 99],
        [28, 99, 207],
        [177, 238, 239],
        [60, 206, 77],
        [197, 254, 189],
        [251, 249, 173],
        [163, 14, 19],
        [95, 61, 54],
        [221, 186, 177],
        [241, 218, 209],
        [209, 83, 80],
    ]);
    let positions = [
        0.0, 3.6, 3.6, 10.8, 10.8, 17.2, 17.2, 24.5, 24.5, 32.7, 32.7, 42.0,
    ];
    Ok(ColorTable::from_positions("wind_speed_nws", &positions, &colors)?
        .with_label("Wind Speed", "m/s"))
}

/// High-level wind speed; the parameter sets the first level (default 6,
/// levels 1.5 apart).
pub fn high_wind_speed_nws(param: Option<&str>) -> Result<ColorTable> {
    let start = numeric_param("high_wind_speed_nws", param, 6.0)?;
    let colors = parse_colors(&[
        "#DEEBF7", "#B7EBFA", "#91D1F5", "#52A2EF", "#2F80E2", "#1F61D0", "#41AB5D", "#3ECE4D",
        "#54EE60", "#76F678", "#B4F8B1", "#C6FDBC", "#FDF6B2", "#FDE687", "#F7BD50", "#FC6123",
        "#FB5E24", "#F73A1E", "#E21D19", "#C11015", "#9D0E11", "#633B33", "#785144", "#8C645A",
        "#B48A82", "#DFBDB5", "#F1DBD4", "#FDC4C5", "#F0A1A4", "#E67F81", "#DB6464", "#D75052",
    ])?;
    let levels = (0..colors.len()).map(|i| start + 1.5 * i as f64).collect();
    Ok(
        ColorTable::from_levels_and_colors("high_wind_speed_nws", levels, colors, Extend::Max)?
            .with_label("Wind Speed", "m/s"),
    )
}

pub fn relative_humidity_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("relative_humidity_nws", param)?;
    let colors = from_rgb_triplets(&[
        [99, 68, 46],
        [125, 84, 54],
        [153, 98, 62],
        [168, 115, 79],
        [181, 137, 99],
        [206, 178, 148],
        [218, 198, 178],
        [221, 215, 198],
        [185, 199, 170],
        [170, 193, 156],
        [135, 187, 138],
        [108, 165, 145],
        [79, 105, 143],
        [79, 98, 143],
        [157, 24, 177],
        [121, 20, 97],
    ]);
    let levels = vec![
        0.0, 1.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 65.0, 70.0, 75.0, 80.0, 85.0, 90.0,
        99.0,
    ];
    Ok(
        ColorTable::from_levels_and_colors("relative_humidity_nws", levels, colors, Extend::Max)?
            .with_label("Relative Humidity", "%"),
    )
}

pub fn cloud_cover_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("cloud_cover_nws", param)?;
    let colors = parse_colors(&[
        "#000000", "#3C3C3C", "#7C7C7C", "#BFBFBF", "#E3E3E3", "#FFFFFF",
    ])?;
    Ok(
        ColorTable::from_positions("cloud_cover_nws", &[0.0, 25.0, 50.0, 75.0, 90.0, 100.0], &colors)?
            .with_label("Total Cloud Cover", "%"),
    )
}

pub fn visibility_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("visibility_nws", param)?;
    let colors = parse_colors(&[
        "#31007E", "#0032B3", "#007DFF", "#00BDFF", "#FF2290", "#FFAED7", "#FFFF00", "#FF9800",
        "#17D78B", "2AA92A", "53FF00",
    ])?;
    let levels = vec![0.0, 0.05, 0.2, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 40.0];
    Ok(
        ColorTable::from_levels_and_colors("visibility_nws", levels, colors, Extend::Max)?
            .with_label("Visibility", "km"),
    )
}

pub fn mslp_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("mslp_nws", param)?;
    let colors = parse_colors(&[
        "#FD90EB", "#EB78E5", "#EF53E0", "#F11FD3", "#F11FD3", "#A20E9B", "#880576", "#6D0258",
        "#5F0853", "#2A0DA8", "#2F1AA7", "#3D27B4", "#3F3CB6", "#6D5CDE", "#A28CF9", "#C1B3FF",
        "#DDDCFE", "#1861DB", "#206CE5", "#2484F4", "#52A5EE", "#91D4FF", "#B2EFF8", "#DEFEFF",
        "#C9FDBD", "#91F78B", "#53ED54", "#1DB31E", "#0CA104", "#FFF9A4", "#FFE27F", "#FAC235",
        "#FF9D04", "#FF5E00", "#F83302", "#E01304", "#A20200", "#603329", "#8C6653", "#B18981",
        "#DDC0B3", "#F8A3A2", "#DD6663", "#CA3C3B", "#A1241D", "#6C6F6D", "#8A8A8A", "#AAAAAA",
        "#C5C5C5", "#D5D5D5", "#E7E3E4",
    ])?;
    Ok(
        ColorTable::from_levels_and_colors("mslp_nws", arange(940.0, 1067.5, 2.5), colors, Extend::Max)?
            .with_label("Mean Sea Level Pressure", "hPa"),
    )
}

/// Geopotential height; the parameter sets the first level (default 488,
/// levels 2.5 apart).
pub fn height_nws(param: Option<&str>) -> Result<ColorTable> {
    let start = numeric_param("height_nws", param, 488.0)?;
    let colors = parse_colors(&[
        "#333637", "#50514C", "#676467", "#888888", "#9F9F9F", "#B3ADB3", "#C5C5C3", "#DBDBE6",
        "#B2AEE5", "#7C70D2", "#6E60CF", "#483FB8", "#32289A", "#2C6CDF", "#347DE2", "#4493EB",
        "#54A1EB", "#95CFF5", "#B2F8B0", "#95F398", "#56EC6B", "#2EB146", "#249D3B", "#624039",
        "#74524A", "#89645C", "#9A736A", "#AE8781", "#C49C94", "#DDBBB3", "#FDF9B3", "#FDE788",
        "#FDBD5C", "#FD9F43", "#FB6234", "#FB3D2D", "#DD2826", "#BB1B21", "#9F181D", "#F29F9F",
        "#E38183", "#D55B58", "#CF5251", "#C54043",
    ])?;
    let levels = (0..colors.len()).map(|i| start + 2.5 * i as f64).collect();
    Ok(
        ColorTable::from_levels_and_colors("height_nws", levels, colors, Extend::Max)?
            .with_label("Geopotential Height", "dagpm"),
    )
}

pub fn vertical_velocity_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("vertical_velocity_nws", param)?;
    let colors = parse_colors(&[
        "#9D0001", "#C90101", "#F10202", "#FF3333", "#FF8585", "#FFBABA", "#FEDDDD", "#FFFFFF",
        "#E1E1FF", "#BABAFF", "#8484FF", "#2C2CF7", "#0404F1", "#0101C8", "#020299",
    ])?;
    let levels = vec![
        -30.0, -20.0, -10.0, -5.0, -2.5, -1.0, -0.5, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0,
    ];
    Ok(
        ColorTable::from_levels_and_colors("vertical_velocity_nws", levels, colors, Extend::Both)?
            .with_label("Vertical Velocity", "Pa/s"),
    )
}

/// Precipitable water. 55 colors over 55 levels only line up with an upper
/// extension, so the table extends at the top only.
pub fn precipitable_water_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("precipitable_water_nws", param)?;
    let colors = parse_colors(&[
        "#C5C5C5", "#B5B5B5", "#A1A1A1", "#8B8B8B", "#787878", "#636363", "#505050", "#3B3B3B",
        "#5B431F", "#6D583B", "#866441", "#9C7B46", "#B28C5D", "#CA9D64", "#D8AC7D", "#B9B5FF",
        "#A7A8E1", "#989ACD", "#8686C6", "#6B6CA4", "#5A5B91", "#474880", "#016362", "#1D6C59",
        "#2C774E", "#398545", "#589A39", "#6FA720", "#8BB41A", "#A29E54", "#AEAD43", "#C4C732",
        "#D9DB18", "#F0EC11", "#E96F57", "#C55645", "#B04035", "#9D2527", "#8A121C", "#7B0007",
        "#7A0076", "#8E0096", "#AE00B8", "#C300C0", "#E200E1", "#A002DB", "#7901DD", "#6201DE",
        "#3C00DC", "#2500D9", "#0028DD", "#004ED6", "#0571E0", "#0C98E7", "#02B8DD",
    ])?;
    let levels = concat(&[arange(0.0, 25.0, 1.0), arange(26.0, 86.0, 2.0)]);
    Ok(
        ColorTable::from_levels_and_colors("precipitable_water_nws", levels, colors, Extend::Max)?
            .with_label("Precipitable Water", "mm"),
    )
}

pub fn specific_humidity_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("specific_humidity_nws", param)?;
    let colors = parse_colors(&[
        "#FFFFB3", "#463F35", "#F3F1D7", "#E5F4E6", "#124E19", "#62A1AC", "#1A2F2E", "#656596",
        "#302361", "#D3B8DA", "#845574",
    ])?;
    let positions = [0.0, 4.0, 8.0, 8.0, 12.0, 12.0, 16.0, 16.0, 20.0, 20.0, 24.0];
    Ok(
        ColorTable::from_positions("specific_humidity_nws", &positions, &colors)?
            .with_label("Specific Humidity", "g/kg"),
    )
}

pub fn high_temperature_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("high_temperature_nws", param)?;
    let colors = parse_colors(&[
        "#EDC4EF", "#F25AB1", "#F31E83", "#EA2283", "#C6478D", "#BD68B4", "#6C429B", "#CACEEB",
        "#484BB0", "#387DF0", "#1FFBFD", "#66EAAE", "#159929", "#FDFE89", "#F09450", "#BF231B",
        "#A83750", "#E27185", "#F5B3F0", "#9550AA",
    ])?;
    let positions = [
        -60.0, -50.0, -40.0, -35.0, -30.0, -25.0, -20.0, -15.0, -10.0, -5.0, 0.0, 0.0, 5.0, 10.0,
        15.0, 20.0, 25.0, 30.0, 35.0, 40.0,
    ];
    Ok(
        ColorTable::from_positions("high_temperature_nws", &positions, &colors)?
            .with_label("Temperature", "degC"),
    )
}

/// Upper-air equivalent potential temperature. 17 levels extended at both
/// ends take 18 colors; the trailing color of the published list is unused.
pub fn high_thermal_temperature_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("high_thermal_temperature_nws", param)?;
    let colors = parse_colors(&[
        "#996035", "#F2DACD", "#1E6EC8", "#AAFFFF", "#01F6E2", "#00FF00", "#03E19F", "#26BC0D",
        "#88DB07", "#FFFF13", "#FFE100", "#264CFF", "#FF7F00", "#FF0000", "#B5003C", "#7F0067",
        "#9868B4", "#F2EBF5",
    ])?;
    let levels = vec![
        270.0, 280.0, 285.0, 290.0, 295.0, 300.0, 305.0, 310.0, 315.0, 320.0, 330.0, 335.0, 340.0,
        345.0, 350.0, 355.0, 360.0,
    ];
    Ok(ColorTable::from_levels_and_colors(
        "high_thermal_temperature_nws",
        levels,
        colors,
        Extend::Both,
    )?
    .with_label("Equivalent Potential Temperature", "K"))
}

pub fn cape_nws(param: Option<&str>) -> Result<ColorTable> {
    no_param("cape_nws", param)?;
    let colors = parse_colors(&[
        "#FFFFFF", "#1E68E4", "#479BEC", "#22FBFB", "#1CD78B", "#1CAE30", "#52C636", "#BAEA41",
        "#FEFF4A", "#FA8D2C", "#FD3B4B", "#A40F4D", "#5A0B76", "#F1EBF5",
    ])?;
    let positions = [
        0.0, 100.0, 150.0, 500.0, 900.0, 1300.0, 1500.0, 1800.0, 2000.0, 2850.0, 3600.0, 3900.0,
        4200.0, 4950.0,
    ];
    Ok(ColorTable::from_positions("cape_nws", &positions, &colors)?
        .with_label("Convective Available Potential Energy", "J/kg"))
}
