//! Model run time stamps.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::error::{BjerknesError, Result};

/// A model initial time and forecast hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelTime {
    pub init: NaiveDateTime,
    pub fhour: u32,
}

impl ModelTime {
    pub fn new(init: NaiveDateTime, fhour: u32) -> Self {
        ModelTime { init, fhour }
    }

    /// Parse an initial time written as `YYYYMMDDHH`.
    pub fn parse(init: &str, fhour: u32) -> Result<Self> {
        let init = init.trim();
        let invalid = || BjerknesError::InvalidParameter {
            param: "init".to_string(),
            message: format!("{} is not an initial time of the form YYYYMMDDHH", init),
        };
        if init.len() != 10 || !init.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let init = NaiveDateTime::parse_from_str(&format!("{}00", init), "%Y%m%d%H%M")
            .map_err(|_| invalid())?;
        Ok(ModelTime { init, fhour })
    }

    pub fn valid_time(&self) -> NaiveDateTime {
        self.init + Duration::hours(self.fhour as i64)
    }

    /// Chart file name, e.g. `uv850_2024071508_024.png`.
    pub fn file_name(&self, product: &str, extension: &str) -> String {
        format!(
            "{}_{}_{:03}.{}",
            product,
            self.init.format("%Y%m%d%H"),
            self.fhour,
            extension
        )
    }

    /// Initial, forecast hour and valid time labels. With an accumulation
    /// period the valid label spans the period.
    pub fn labels(&self, accumulation_hours: u32) -> (String, String, String) {
        let valid = self.valid_time();
        let initial = self.init.format("Initial: %Y/%m/%dT%H").to_string();
        let fhour = format!("FHour: {:03}", self.fhour);
        let valid = if accumulation_hours == 0 {
            valid.format("Valid: %m/%dT%H").to_string()
        } else {
            let begin = valid - Duration::hours(accumulation_hours as i64);
            format!(
                "{}{}",
                begin.format("Valid: %m/%dT%H"),
                valid.format(" to %dT%H")
            )
        };
        (initial, fhour, valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_valid_time() {
        let t = ModelTime::parse("2024071520", 30).unwrap();
        assert_eq!(t.valid_time().format("%Y%m%d%H").to_string(), "2024071602");
        assert!(ModelTime::parse("20240715", 0).is_err());
        assert!(ModelTime::parse("2024071599", 0).is_err());
        assert!(ModelTime::parse("2024x71508", 0).is_err());
    }

    #[test]
    fn test_file_name() {
        let t = ModelTime::parse("2024071508", 24).unwrap();
        assert_eq!(t.file_name("uv850", "png"), "uv850_2024071508_024.png");
    }

    #[test]
    fn test_labels() {
        let t = ModelTime::parse("2018082008", 24).unwrap();
        let (initial, fhour, valid) = t.labels(0);
        assert_eq!(initial, "Initial: 2018/08/20T08");
        assert_eq!(fhour, "FHour: 024");
        assert_eq!(valid, "Valid: 08/21T08");
        assert_eq!(t.labels(6).2, "Valid: 08/21T02 to 21T08");
    }
}
