//! GMT color palette (`.cpt`) files.
//!
//! Each data row holds a segment `z0 c0 z1 c1` where a color is either three
//! whitespace-separated components or one `r/g/b` token. A `# COLOR_MODEL =
//! HSV` header switches components to hue (degrees), saturation and value.
//! Background, foreground and NaN rows (`B`, `F`, `N`) are ignored.

use std::fs;
use std::path::Path;

use super::color::Rgba;
use super::table::{ColorTable, Scale};
use crate::error::{BjerknesError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColorModel {
    Rgb,
    Hsv,
}

fn hsv_to_rgba(h: f64, s: f64, v: f64) -> Rgba {
    let h = (h / 360.0).rem_euclid(1.0) * 6.0;
    let i = h.floor();
    let f = h - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match i as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgba::from_unit(r, g, b)
}

fn to_color(model: ColorModel, c: &[f64]) -> Rgba {
    match model {
        ColorModel::Rgb => Rgba::from_unit(c[0] / 255.0, c[1] / 255.0, c[2] / 255.0),
        ColorModel::Hsv => hsv_to_rgba(c[0], c[1], c[2]),
    }
}

/// Parse the text of a `.cpt` file into a relative continuous table.
///
/// Stop positions are normalised to [0, 1] over the file's value range;
/// segments whose end colors differ from the next segment's start keep a
/// hard step.
pub fn parse_cpt(text: &str, name: &str) -> Result<ColorTable> {
    let invalid = |message: String| BjerknesError::InvalidColorTable {
        name: name.to_string(),
        message,
    };

    let mut model = ColorModel::Rgb;
    let mut stops: Vec<(f64, Rgba)> = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some(last) = comment.split_whitespace().last() {
                if last.trim_start_matches('+').eq_ignore_ascii_case("hsv") {
                    model = ColorModel::Hsv;
                }
            }
            continue;
        }
        if matches!(line.chars().next(), Some('B' | 'F' | 'N')) {
            continue;
        }

        let fields: Vec<f64> = line
            .split_whitespace()
            .flat_map(|token| token.split('/'))
            .take(8)
            .map(|v| v.parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| invalid(format!("line {}: {}", lineno + 1, e)))?;
        if fields.len() < 8 {
            return Err(invalid(format!(
                "line {}: expected 8 values, found {}",
                lineno + 1,
                fields.len()
            )));
        }

        let start = (fields[0], to_color(model, &fields[1..4]));
        let end = (fields[4], to_color(model, &fields[5..8]));
        if stops.last() != Some(&start) {
            stops.push(start);
        }
        stops.push(end);
    }

    if stops.len() < 2 {
        return Err(invalid("no color segments".to_string()));
    }

    let lo = stops[0].0;
    let hi = stops[stops.len() - 1].0;
    if !(hi > lo) {
        return Err(invalid(format!("empty value range {}..{}", lo, hi)));
    }
    let stops = stops
        .into_iter()
        .map(|(z, c)| ((z - lo) / (hi - lo), c))
        .collect();

    let mut table = ColorTable::continuous(name, stops)?;
    table.scale = Scale::Relative;
    Ok(table)
}

/// Read a `.cpt` file; the table is named after the file stem.
pub fn load_cpt<P: AsRef<Path>>(path: P) -> Result<ColorTable> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("cpt");
    parse_cpt(&text, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RGB_CPT: &str = "\
# Two segment palette
# COLOR_MODEL = RGB
0   0 0 0      50  255 255 255
50  255 255 255  100 255 0 0
B 0 0 0
F 255 255 255
N 128 128 128
";

    #[test]
    fn test_parse_rgb_palette() {
        let table = parse_cpt(RGB_CPT, "bw").unwrap();
        assert_eq!(table.scale, Scale::Relative);
        assert_eq!(table.levels(), vec![0.0, 0.5, 1.0]);
        assert_eq!(table.map(0.5), Some(Rgba::WHITE));
        assert_eq!(table.map(1.0), Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn test_hard_step_between_segments() {
        let text = "0 0/0/255 1 0/0/255\n1 255/0/0 2 255/0/0\n";
        let table = parse_cpt(text, "step").unwrap();
        assert_eq!(table.levels(), vec![0.0, 0.5, 0.5, 1.0]);
        assert_eq!(table.map(0.49), Some(Rgba::rgb(0, 0, 255)));
        assert_eq!(table.map(0.51), Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn test_parse_hsv_palette() {
        let text = "# COLOR_MODEL = +HSV\n0 0 1 1 10 120 1 1\n";
        let table = parse_cpt(text, "hsv").unwrap();
        assert_eq!(table.map(0.0), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(table.map(1.0), Some(Rgba::rgb(0, 255, 0)));
    }

    #[test]
    fn test_malformed_palette() {
        assert!(parse_cpt("0 0 0 0 1 1 1\n", "short").is_err());
        assert!(parse_cpt("# only comments\n", "empty").is_err());
        assert!(parse_cpt("0 a 0 0 1 1 1 1\n", "nan").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(RGB_CPT.as_bytes()).unwrap();
        let table = load_cpt(file.path()).unwrap();
        assert_eq!(table.bins().len(), 2);
    }
}
