//! RGBA colors and color-string parsing.

use colorgrad::{Color, CustomGradient};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{BjerknesError, Result};

/// An 8-bit RGBA color (straight, not premultiplied, alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);
    pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba([r, g, b, a])
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba([r, g, b, 255])
    }

    /// Build an opaque color from unit-range components.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([to_u8(r), to_u8(g), to_u8(b), 255])
    }

    /// Parse a color string.
    ///
    /// Accepts `#RRGGBB`, `#RRGGBBAA`, `#RGB`, bare hex digits without the
    /// leading `#` (several published NWS tables omit it) and CSS color names
    /// such as `darkcyan`.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let is_bare_hex = matches!(trimmed.len(), 3 | 6 | 8)
            && trimmed.chars().all(|c| c.is_ascii_hexdigit());
        let normalized = if is_bare_hex {
            format!("#{}", trimmed)
        } else {
            trimmed.to_string()
        };

        let color = Color::from_html(&normalized).map_err(|e| BjerknesError::InvalidParameter {
            param: "color".to_string(),
            message: format!("cannot parse color '{}': {}", s, e),
        })?;
        Ok(Rgba(color.to_rgba8()))
    }

    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }

    pub fn a(&self) -> u8 {
        self.0[3]
    }

    pub fn is_transparent(&self) -> bool {
        self.0[3] == 0
    }

    pub fn with_alpha(self, alpha: u8) -> Self {
        Rgba([self.0[0], self.0[1], self.0[2], alpha])
    }

    /// Hex notation; alpha is only written when the color is not opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0;
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Perceived brightness (HSP model) on a 0-255 scale.
    pub fn luminance(&self) -> f64 {
        let [r, g, b, _] = self.0;
        let (r, g, b) = (r as f64, g as f64, b as f64);
        (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt()
    }

    /// The gray with the same perceived brightness.
    pub fn to_gray(&self) -> Self {
        let l = self.luminance().round().clamp(0.0, 255.0) as u8;
        Rgba([l, l, l, self.0[3]])
    }

    /// Linear interpolation between two colors, `t` in [0, 1].
    pub fn lerp(a: Rgba, b: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0u8; 4];
        for (i, channel) in out.iter_mut().enumerate() {
            let start = a.0[i] as f64;
            let end = b.0[i] as f64;
            *channel = (start + (end - start) * t).round() as u8;
        }
        Rgba(out)
    }

    fn to_colorgrad(self) -> Color {
        let [r, g, b, a] = self.0;
        Color::from_rgba8(r, g, b, a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a list of color strings.
pub fn parse_colors(colors: &[&str]) -> Result<Vec<Rgba>> {
    colors.iter().map(|c| Rgba::parse(c)).collect()
}

/// Opaque colors from 0-255 RGB triplets.
pub fn from_rgb_triplets(colors: &[[u8; 3]]) -> Vec<Rgba> {
    colors.iter().map(|&[r, g, b]| Rgba::rgb(r, g, b)).collect()
}

/// Opaque colors from unit-range RGB triplets.
pub fn from_unit_triplets(colors: &[[f64; 3]]) -> Vec<Rgba> {
    colors
        .iter()
        .map(|&[r, g, b]| Rgba::from_unit(r, g, b))
        .collect()
}

/// Resample a color ramp to `n` evenly spaced colors.
///
/// The ramp is treated as a linear gradient through the given colors, the
/// same way a segmented colormap with `n` entries is derived from a short
/// list of anchor colors.
pub fn resample(colors: &[Rgba], n: usize) -> Result<Vec<Rgba>> {
    if colors.is_empty() {
        return Err(BjerknesError::InvalidParameter {
            param: "colors".to_string(),
            message: "cannot resample an empty color list".to_string(),
        });
    }
    if n == 0 {
        return Ok(Vec::new());
    }
    if colors.len() == 1 || n == 1 {
        return Ok(vec![colors[0]; n]);
    }
    if colors.len() == n {
        return Ok(colors.to_vec());
    }

    let anchors: Vec<Color> = colors.iter().map(|c| c.to_colorgrad()).collect();
    let gradient = CustomGradient::new()
        .colors(&anchors)
        .domain(&[0.0, 1.0])
        .build()
        .map_err(|e| BjerknesError::Render {
            message: format!("failed to build gradient: {}", e),
        })?;

    Ok((0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            Rgba(gradient.at(t).to_rgba8())
        })
        .collect())
}

/// Sample `n` colors from a colorgrad gradient over its [0, 1] domain.
pub fn sample_gradient(gradient: &colorgrad::Gradient, n: usize) -> Vec<Rgba> {
    let n = n.max(2);
    (0..n)
        .map(|i| Rgba(gradient.at(i as f64 / (n - 1) as f64).to_rgba8()))
        .collect()
}
