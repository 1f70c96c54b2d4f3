//! Air Quality Index scales (AirNow categories).

use super::color::parse_colors;
use super::registry::choice_param;
use super::table::{ColorTable, Extend};
use crate::error::Result;

/// AQI categories for `pm25` (default, micrograms per cubic metre) or `o3`
/// (ppb). Values beyond the last category keep the hazardous color.
pub fn aqi(param: Option<&str>) -> Result<ColorTable> {
    let pollutant = choice_param("aqi", param, &["pm25", "o3"], "pm25")?;
    let (ticks, label, units) = match pollutant.as_str() {
        "o3" => (
            vec![0.0, 55.0, 71.0, 86.0, 106.0, 201.0, 300.0],
            "Ozone",
            "ppb",
        ),
        _ => (
            vec![0.0, 12.1, 35.5, 55.5, 150.5, 250.5, 300.0],
            "PM 2.5",
            "ug m-3",
        ),
    };
    // good, moderate, sensitive groups, unhealthy, hazardous, very unhealthy
    let colors = parse_colors(&[
        "#00e400", "#ffff00", "#ff7e00", "#ff0000", "#99004c", "#4c0026", "#4c0026",
    ])?;
    Ok(
        ColorTable::from_levels_and_colors("aqi", ticks, colors, Extend::Max)?
            .with_label(label, units),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pm25_categories() {
        let table = aqi(None).unwrap();
        assert_eq!(table.map(5.0).unwrap().to_hex(), "#00e400");
        assert_eq!(table.map(40.0).unwrap().to_hex(), "#ff7e00");
        assert_eq!(table.map(500.0).unwrap().to_hex(), "#4c0026");
    }

    #[test]
    fn test_ozone_breaks() {
        let table = aqi(Some("o3")).unwrap();
        assert_eq!(table.levels()[1], 55.0);
        assert!(aqi(Some("co")).is_err());
    }
}
