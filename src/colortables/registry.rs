//! Process-wide registry of named color tables.
//!
//! Tables are looked up by a spec string `name[:param][_r]`. The optional
//! parameter is handed to the table builder (an accumulation period, a start
//! value, a unit), and an `_r` suffix on the name returns the reversed table.

use once_cell::sync::Lazy;
use serde::Serialize;

use super::table::ColorTable;
use super::{airquality, landuse, nws, nws2018, presets, terrain};
use crate::error::{BjerknesError, Result};

/// Builds a table, given the optional parameter from the spec string.
pub type TableBuilder = fn(Option<&str>) -> Result<ColorTable>;

struct Entry {
    name: &'static str,
    description: &'static str,
    builder: TableBuilder,
}

/// Summary of one registered table.
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub description: String,
    pub kind: String,
    pub label: Option<String>,
    pub units: Option<String>,
    pub levels: usize,
}

pub struct ColorTableRegistry {
    entries: Vec<Entry>,
}

macro_rules! entry {
    ($name:expr, $builder:path, $description:expr) => {
        Entry {
            name: $name,
            description: $description,
            builder: $builder,
        }
    };
}

static REGISTRY: Lazy<ColorTableRegistry> = Lazy::new(ColorTableRegistry::builtin);

/// The process-wide registry.
pub fn registry() -> &'static ColorTableRegistry {
    &REGISTRY
}

/// Look up a table spec in the process-wide registry.
pub fn get_color_table(spec: &str) -> Result<ColorTable> {
    registry().get(spec)
}

impl ColorTableRegistry {
    fn builtin() -> Self {
        let entries = vec![
            // NWS standard scales
            entry!("precipitation_metpy", nws::precipitation_metpy, "Precipitation (MetPy NWS sample), in"),
            entry!("precipitation_nws", nws::precipitation_nws, "NWS precipitation for 1/3/6/24 h accumulations, in"),
            entry!("rain_nws", nws::rain_nws, "NWS rain amount, in"),
            entry!("qpf_nws", nws::qpf_nws, "NWS quantitative precipitation forecast, in"),
            entry!("sleet_nws", nws::sleet_nws, "NWS sleet accumulation, in"),
            entry!("snow_nws", nws::snow_nws, "NWS snow accumulation, in"),
            entry!("precipitation_type_nws", nws::precipitation_type_nws, "NWS precipitation type"),
            entry!("qsf_nws", nws::qsf_nws, "NWS quantitative snowfall forecast, in"),
            entry!("snow_depth_nws", nws::snow_depth_nws, "NWS snow depth, in"),
            entry!("snow_density_nws", nws::snow_density_nws, "NWS snow density ratio"),
            entry!("temperature_nws", nws::temperature_nws, "NWS temperature, degF"),
            entry!("temperature_trend_nws", nws::temperature_trend_nws, "NWS temperature change, degF"),
            entry!("wind_speed_nws", nws::wind_speed_nws, "NWS wind speed, kn"),
            entry!("high_wind_speed_nws", nws::high_wind_speed_nws, "High wind speed with configurable start, m/s"),
            entry!("relative_humidity_nws", nws::relative_humidity_nws, "NWS relative humidity, %"),
            entry!("cloud_cover_nws", nws::cloud_cover_nws, "NWS sky cover, %"),
            entry!("visibility_nws", nws::visibility_nws, "NWS visibility, mi"),
            entry!("mslp_nws", nws::mslp_nws, "Mean sea level pressure, hPa"),
            entry!("height_nws", nws::height_nws, "Geopotential height with configurable start, dagpm"),
            entry!("vertical_velocity_nws", nws::vertical_velocity_nws, "Vertical velocity"),
            entry!("precipitable_water_nws", nws::precipitable_water_nws, "Precipitable water, mm"),
            entry!("specific_humidity_nws", nws::specific_humidity_nws, "Specific humidity, g/kg"),
            entry!("high_temperature_nws", nws::high_temperature_nws, "High temperature, degC"),
            entry!("high_thermal_temperature_nws", nws::high_thermal_temperature_nws, "Thermal temperature, degC"),
            entry!("cape_nws", nws::cape_nws, "Convective available potential energy, J/kg"),
            // NWS 2018 standard color curves
            entry!("nws_temperature", nws2018::temperature, "NWS 2018 temperature curve (C, F or K)"),
            entry!("nws_dewpoint", nws2018::dewpoint, "NWS 2018 dew point curve (C, F or K)"),
            entry!("nws_relative_humidity", nws2018::relative_humidity, "NWS 2018 relative humidity curve, %"),
            entry!("nws_wind", nws2018::wind, "NWS 2018 wind curve (m/s, kn, mph or km/h)"),
            entry!("nws_cloud", nws2018::cloud, "NWS 2018 sky cover curve, %"),
            entry!("nws_precipitation", nws2018::precipitation, "NWS 2018 precipitation curve (mm or in)"),
            entry!("nws_pop", nws2018::pop, "NWS 2018 probability of precipitation (rain, snow or ice), %"),
            entry!("nws_snow", nws2018::snow, "NWS 2018 snow amount curve, in"),
            entry!("nws_wave_height", nws2018::wave_height, "NWS 2018 wave height curve, ft"),
            entry!("nws_reflectivity", nws2018::reflectivity, "NWS 2018 radar reflectivity curve, dBZ"),
            entry!("nws_radial_velocity", nws2018::radial_velocity, "NWS 2018 radial velocity curve, kn"),
            entry!("nws_probability", nws2018::probability, "NWS 2018 probability curve, fraction"),
            // terrain and radar
            entry!("terrain", terrain::terrain, "Terrain height with ocean below the water threshold, m"),
            entry!("terrain_land", terrain::terrain_land, "Terrain height, land ramp only, m"),
            entry!("reflectivity", terrain::reflectivity_ncdc, "NCDC radar reflectivity, dBZ"),
            // classifications
            entry!("landuse_modis21", landuse::modis21, "MODIS 21-class land use"),
            entry!("landuse_usgs24", landuse::usgs24, "USGS 24-category land use"),
            entry!("aqi", airquality::aqi, "Air quality index categories (pm25 or o3)"),
            // product presets
            entry!("nmc_accumulated_rainfall", presets::nmc_accumulated_rainfall, "NMC accumulated rainfall, mm"),
            entry!("ecmf_accumulated_rainfall", presets::ecmf_accumulated_rainfall, "ECMWF accumulated rainfall, mm"),
            entry!("qpf_1h_blues", presets::qpf_1h_blues, "Hourly precipitation on a blue ramp, mm"),
            entry!("temperature_2m", presets::temperature_2m, "2 m temperature, degC"),
            entry!("z_500_contour", presets::z_500_contour, "500 hPa height contour lines, dagpm"),
            entry!("probability_forecast", presets::probability_forecast, "Forecast probability, %"),
            entry!("ndfd_t_summer", presets::ndfd_t_summer, "NDFD summer temperature, degC"),
            // general-purpose gradients, stretched over the data range
            entry!("viridis", presets::viridis, "Viridis gradient"),
            entry!("plasma", presets::plasma, "Plasma gradient"),
            entry!("inferno", presets::inferno, "Inferno gradient"),
            entry!("magma", presets::magma, "Magma gradient"),
            entry!("cividis", presets::cividis, "Cividis gradient"),
            entry!("turbo", presets::turbo, "Turbo gradient"),
            entry!("rdbu", presets::rdbu, "Red-blue diverging gradient"),
            entry!("spectral", presets::spectral, "Spectral diverging gradient"),
            entry!("blues", presets::blues, "Blues sequential gradient"),
        ];
        ColorTableRegistry { entries }
    }

    /// Registered table names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    pub fn contains(&self, spec: &str) -> bool {
        let (name, _, _) = split_spec(spec);
        self.find(name).is_some()
    }

    /// Summaries of every registered table built with its default parameter.
    pub fn describe(&self) -> Vec<TableInfo> {
        self.entries
            .iter()
            .filter_map(|e| {
                (e.builder)(None).ok().map(|table| TableInfo {
                    name: e.name.to_string(),
                    description: e.description.to_string(),
                    kind: table.kind_name().to_string(),
                    label: table.label.clone(),
                    units: table.units.clone(),
                    levels: table.levels().len(),
                })
            })
            .collect()
    }

    /// Build the table named by `spec`.
    pub fn get(&self, spec: &str) -> Result<ColorTable> {
        let (name, param, reversed) = split_spec(spec);
        let entry = self
            .find(name)
            .ok_or_else(|| BjerknesError::UnknownColorTable {
                name: spec.to_string(),
            })?;
        let table = (entry.builder)(param)?;
        Ok(if reversed { table.reversed() } else { table })
    }

    fn find(&self, name: &str) -> Option<&Entry> {
        let lowered = name.to_lowercase();
        self.entries.iter().find(|e| e.name == lowered)
    }
}

/// Split `name[_r][:param]` into its parts. The `_r` suffix may sit on the
/// name or after the parameter (`qpf_nws_r:6`, `qpf_nws:6_r`).
fn split_spec(spec: &str) -> (&str, Option<&str>, bool) {
    let spec = spec.trim();
    let (name, param) = match spec.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (spec, None),
    };

    let mut reversed = false;
    let name = match name.strip_suffix("_r") {
        Some(stripped) => {
            reversed = true;
            stripped
        }
        None => name,
    };
    let param = param.map(|p| match p.strip_suffix("_r") {
        Some(stripped) => {
            reversed = true;
            stripped
        }
        None => p,
    });
    (name, param.filter(|p| !p.is_empty()), reversed)
}

/// Accumulation period in hours, e.g. `6` or `6h`; defaults to 24.
pub fn accumulation_hours(table: &str, param: Option<&str>) -> Result<u32> {
    match param {
        None => Ok(24),
        Some(p) => p
            .trim()
            .trim_end_matches(['h', 'H'])
            .parse::<u32>()
            .map_err(|_| BjerknesError::InvalidParameter {
                param: table.to_string(),
                message: format!("'{}' is not an accumulation period in hours", p),
            }),
    }
}

/// Reject a parameter on a table that takes none.
pub fn no_param(table: &str, param: Option<&str>) -> Result<()> {
    match param {
        None => Ok(()),
        Some(p) => Err(BjerknesError::InvalidParameter {
            param: table.to_string(),
            message: format!("table takes no parameter, got '{}'", p),
        }),
    }
}

/// A numeric parameter with a default.
pub fn numeric_param(table: &str, param: Option<&str>, default: f64) -> Result<f64> {
    match param {
        None => Ok(default),
        Some(p) => p
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| BjerknesError::InvalidParameter {
                param: table.to_string(),
                message: format!("'{}' is not a number", p),
            }),
    }
}

/// One of a fixed set of choices (case-insensitive), with a default.
pub fn choice_param(
    table: &str,
    param: Option<&str>,
    choices: &[&str],
    default: &str,
) -> Result<String> {
    let value = param.unwrap_or(default).trim().to_lowercase();
    if choices.iter().any(|c| c.to_lowercase() == value) {
        Ok(value)
    } else {
        Err(BjerknesError::InvalidParameter {
            param: table.to_string(),
            message: format!(
                "'{}' is not one of {}",
                param.unwrap_or(default),
                choices.join(", ")
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colortables::table::TableKind;

    #[test]
    fn test_every_table_builds_and_validates() {
        let reg = registry();
        for name in reg.names() {
            let table = reg.get(name).unwrap_or_else(|e| panic!("{}: {}", name, e));
            table.validate().unwrap();
            assert!(!table.bins().is_empty(), "{} has no bins", name);
            for pair in table.bins().windows(2) {
                if let TableKind::Categorical { .. } = table.kind {
                    continue;
                }
                assert_eq!(pair[0].upper, pair[1].lower, "{} bins not contiguous", name);
            }
        }
    }

    #[test]
    fn test_describe_lists_every_table() {
        let reg = registry();
        assert_eq!(reg.describe().len(), reg.names().len());
    }

    #[test]
    fn test_unknown_table() {
        assert!(matches!(
            get_color_table("no_such_table"),
            Err(BjerknesError::UnknownColorTable { .. })
        ));
    }

    #[test]
    fn test_parameterised_lookup() {
        let six = get_color_table("precipitation_nws:6").unwrap();
        let day = get_color_table("precipitation_nws").unwrap();
        assert_ne!(six.levels(), day.levels());
        assert!(matches!(
            get_color_table("precipitation_nws:soon"),
            Err(BjerknesError::InvalidParameter { .. })
        ));
        assert!(get_color_table("mslp_nws:3").is_err());
    }

    #[test]
    fn test_reversed_suffix() {
        let table = get_color_table("viridis_r").unwrap();
        assert_eq!(table.name, "viridis_r");
        let param_first = get_color_table("aqi:o3_r").unwrap();
        assert_eq!(param_first.name, "aqi_r");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(registry().contains("Terrain"));
        assert!(registry().contains("nws_wind:kn"));
        assert!(!registry().contains("rainbow"));
    }

    #[test]
    fn test_param_helpers() {
        assert_eq!(accumulation_hours("t", Some("6h")).unwrap(), 6);
        assert_eq!(accumulation_hours("t", None).unwrap(), 24);
        assert_eq!(numeric_param("t", Some("560"), 488.0).unwrap(), 560.0);
        assert!(numeric_param("t", Some("nan"), 0.0).is_err());
        assert_eq!(choice_param("t", Some("F"), &["c", "f", "k"], "c").unwrap(), "f");
        assert!(choice_param("t", Some("R"), &["c", "f", "k"], "c").is_err());
    }
}
