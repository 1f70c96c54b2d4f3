//! Color table model: value ranges mapped to colors.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::color::{resample, Rgba};
use crate::error::{BjerknesError, Result};

/// Which out-of-range values of a discrete table still receive a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extend {
    Neither,
    Min,
    Max,
    Both,
}

impl Extend {
    pub fn from_flags(min: bool, max: bool) -> Self {
        match (min, max) {
            (false, false) => Extend::Neither,
            (true, false) => Extend::Min,
            (false, true) => Extend::Max,
            (true, true) => Extend::Both,
        }
    }

    pub fn has_min(self) -> bool {
        matches!(self, Extend::Min | Extend::Both)
    }

    pub fn has_max(self) -> bool {
        matches!(self, Extend::Max | Extend::Both)
    }

    /// Number of colors needed beyond one per bin.
    pub fn extra_colors(self) -> usize {
        self.has_min() as usize + self.has_max() as usize
    }
}

impl FromStr for Extend {
    type Err = BjerknesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "neither" => Ok(Extend::Neither),
            "min" => Ok(Extend::Min),
            "max" => Ok(Extend::Max),
            "both" => Ok(Extend::Both),
            _ => Err(BjerknesError::InvalidParameter {
                param: "extend".to_string(),
                message: format!("'{}' is not one of neither, min, max, both", s),
            }),
        }
    }
}

/// Whether a table's values are data values or a [0, 1] ramp that is
/// stretched over the data range at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Absolute,
    Relative,
}

/// One class of a categorical table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub value: i32,
    pub color: Rgba,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TableKind {
    /// Bins between strictly increasing `levels`; `colors[i]` fills
    /// `[levels[i], levels[i + 1])`, the top level is inclusive.
    Discrete {
        levels: Vec<f64>,
        colors: Vec<Rgba>,
        under: Option<Rgba>,
        over: Option<Rgba>,
    },
    /// Piecewise-linear ramp. A repeated position is a hard color step.
    Continuous { stops: Vec<(f64, Rgba)> },
    /// Integer classes, e.g. land-use types.
    Categorical { categories: Vec<Category> },
}

/// A contiguous value range and the color it maps to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTable {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    pub scale: Scale,
    #[serde(flatten)]
    pub kind: TableKind,
}

impl ColorTable {
    /// Build a discrete table the way `from_levels_and_colors` does: with
    /// `Extend::Min` the first color is the under color, with `Extend::Max`
    /// the last color is the over color.
    pub fn from_levels_and_colors(
        name: &str,
        levels: Vec<f64>,
        colors: Vec<Rgba>,
        extend: Extend,
    ) -> Result<Self> {
        let expected = levels.len().saturating_sub(1) + extend.extra_colors();
        if levels.len() < 2 || colors.len() != expected {
            return Err(BjerknesError::InvalidColorTable {
                name: name.to_string(),
                message: format!(
                    "{} levels with extend {:?} need {} colors, got {}",
                    levels.len(),
                    extend,
                    expected,
                    colors.len()
                ),
            });
        }

        let mut colors = colors;
        let over = if extend.has_max() { colors.pop() } else { None };
        let under = if extend.has_min() {
            Some(colors.remove(0))
        } else {
            None
        };

        let table = ColorTable {
            name: name.to_string(),
            label: None,
            units: None,
            scale: Scale::Absolute,
            kind: TableKind::Discrete {
                levels,
                colors,
                under,
                over,
            },
        };
        table.validate()?;
        Ok(table)
    }

    /// Build a discrete table by spreading an anchor ramp over the bins
    /// (plus the under/over colors the extension needs).
    pub fn segmented(name: &str, levels: Vec<f64>, anchors: &[Rgba], extend: Extend) -> Result<Self> {
        let n = levels.len().saturating_sub(1) + extend.extra_colors();
        let colors = resample(anchors, n)?;
        Self::from_levels_and_colors(name, levels, colors, extend)
    }

    /// Build a continuous table from (position, color) stops.
    pub fn continuous(name: &str, stops: Vec<(f64, Rgba)>) -> Result<Self> {
        let table = ColorTable {
            name: name.to_string(),
            label: None,
            units: None,
            scale: Scale::Absolute,
            kind: TableKind::Continuous { stops },
        };
        table.validate()?;
        Ok(table)
    }

    /// Build a continuous table from colors and their positions.
    pub fn from_positions(name: &str, positions: &[f64], colors: &[Rgba]) -> Result<Self> {
        if positions.len() != colors.len() {
            return Err(BjerknesError::InvalidColorTable {
                name: name.to_string(),
                message: format!(
                    "{} positions for {} colors",
                    positions.len(),
                    colors.len()
                ),
            });
        }
        Self::continuous(
            name,
            positions.iter().copied().zip(colors.iter().copied()).collect(),
        )
    }

    /// A [0, 1] ramp through evenly spaced colors, stretched to the data at
    /// render time.
    pub fn relative_ramp(name: &str, colors: &[Rgba]) -> Result<Self> {
        if colors.len() < 2 {
            return Err(BjerknesError::InvalidColorTable {
                name: name.to_string(),
                message: "a ramp needs at least two colors".to_string(),
            });
        }
        let n = colors.len() - 1;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, c)| (i as f64 / n as f64, *c))
            .collect();
        let mut table = Self::continuous(name, stops)?;
        table.scale = Scale::Relative;
        Ok(table)
    }

    /// Two linear ramps joined at `vcenter`: `low` spans `vmin..vcenter`
    /// and `high` spans `vcenter..vmax`. Stop positions are given in [0, 1]
    /// within each half.
    pub fn two_slope(
        name: &str,
        low: &[(f64, Rgba)],
        high: &[(f64, Rgba)],
        vmin: f64,
        vcenter: f64,
        vmax: f64,
    ) -> Result<Self> {
        if !(vmin < vcenter && vcenter < vmax) {
            return Err(BjerknesError::InvalidColorTable {
                name: name.to_string(),
                message: format!(
                    "two-slope bounds must satisfy vmin < vcenter < vmax, got {} {} {}",
                    vmin, vcenter, vmax
                ),
            });
        }
        let mut stops = Vec::with_capacity(low.len() + high.len());
        for &(t, c) in low {
            stops.push((vmin + t * (vcenter - vmin), c));
        }
        for &(t, c) in high {
            stops.push((vcenter + t * (vmax - vcenter), c));
        }
        Self::continuous(name, stops)
    }

    pub fn categorical(name: &str, categories: Vec<Category>) -> Result<Self> {
        let table = ColorTable {
            name: name.to_string(),
            label: None,
            units: None,
            scale: Scale::Absolute,
            kind: TableKind::Categorical { categories },
        };
        table.validate()?;
        Ok(table)
    }

    pub fn with_label(mut self, label: &str, units: &str) -> Self {
        self.label = Some(label.to_string());
        self.units = Some(units.to_string());
        self
    }

    pub fn renamed(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Short name of the table kind.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TableKind::Discrete { .. } => "discrete",
            TableKind::Continuous { .. } => "continuous",
            TableKind::Categorical { .. } => "categorical",
        }
    }

    /// Extension of a discrete table; continuous tables clamp at both ends.
    pub fn extend(&self) -> Extend {
        match &self.kind {
            TableKind::Discrete { under, over, .. } => {
                Extend::from_flags(under.is_some(), over.is_some())
            }
            TableKind::Continuous { .. } => Extend::Both,
            TableKind::Categorical { .. } => Extend::Neither,
        }
    }

    /// Break points of the table: discrete levels, continuous stop positions
    /// or category values.
    pub fn levels(&self) -> Vec<f64> {
        match &self.kind {
            TableKind::Discrete { levels, .. } => levels.clone(),
            TableKind::Continuous { stops } => stops.iter().map(|(p, _)| *p).collect(),
            TableKind::Categorical { categories } => {
                categories.iter().map(|c| c.value as f64).collect()
            }
        }
    }

    /// Check the structural invariants of the table.
    pub fn validate(&self) -> Result<()> {
        let fail = |message: String| BjerknesError::InvalidColorTable {
            name: self.name.clone(),
            message,
        };

        match &self.kind {
            TableKind::Discrete { levels, colors, .. } => {
                if levels.len() < 2 {
                    return Err(fail("a discrete table needs at least two levels".to_string()));
                }
                if levels.iter().any(|l| !l.is_finite()) {
                    return Err(fail("levels must be finite".to_string()));
                }
                if let Some(w) = levels.windows(2).find(|w| w[1] <= w[0]) {
                    return Err(fail(format!(
                        "levels must be strictly increasing ({} then {})",
                        w[0], w[1]
                    )));
                }
                if colors.len() != levels.len() - 1 {
                    return Err(fail(format!(
                        "{} bins but {} colors",
                        levels.len() - 1,
                        colors.len()
                    )));
                }
            }
            TableKind::Continuous { stops } => {
                if stops.len() < 2 {
                    return Err(fail("a continuous table needs at least two stops".to_string()));
                }
                if stops.iter().any(|(p, _)| !p.is_finite()) {
                    return Err(fail("stop positions must be finite".to_string()));
                }
                if let Some(w) = stops.windows(2).find(|w| w[1].0 < w[0].0) {
                    return Err(fail(format!(
                        "stop positions must not decrease ({} then {})",
                        w[0].0, w[1].0
                    )));
                }
                if stops[0].0 >= stops[stops.len() - 1].0 {
                    return Err(fail("stops span an empty range".to_string()));
                }
            }
            TableKind::Categorical { categories } => {
                if categories.is_empty() {
                    return Err(fail("no categories".to_string()));
                }
                let mut values: Vec<i32> = categories.iter().map(|c| c.value).collect();
                values.sort_unstable();
                if values.windows(2).any(|w| w[0] == w[1]) {
                    return Err(fail("duplicate category values".to_string()));
                }
            }
        }
        Ok(())
    }

    /// Color for a data value; `None` means the value is not drawn.
    pub fn map(&self, value: f64) -> Option<Rgba> {
        if !value.is_finite() {
            return None;
        }

        match &self.kind {
            TableKind::Discrete {
                levels,
                colors,
                under,
                over,
            } => {
                let last = levels.len() - 1;
                if value < levels[0] {
                    return *under;
                }
                if value > levels[last] {
                    return *over;
                }
                if value == levels[last] {
                    return over.or_else(|| colors.last().copied());
                }
                // first level strictly greater than the value closes the bin
                let upper = levels.partition_point(|&l| l <= value);
                colors.get(upper - 1).copied()
            }
            TableKind::Continuous { stops } => {
                let first = stops[0];
                let last = stops[stops.len() - 1];
                if value <= first.0 {
                    return Some(first.1);
                }
                if value >= last.0 {
                    return Some(last.1);
                }
                let k = stops.partition_point(|(p, _)| *p <= value);
                let (p0, c0) = stops[k - 1];
                let (p1, c1) = stops[k];
                let t = (value - p0) / (p1 - p0);
                Some(Rgba::lerp(c0, c1, t))
            }
            TableKind::Categorical { categories } => {
                let class = value.round() as i32;
                categories
                    .iter()
                    .find(|c| c.value == class)
                    .map(|c| c.color)
            }
        }
    }

    /// The table as contiguous value ranges, lowest first.
    pub fn bins(&self) -> Vec<Bin> {
        match &self.kind {
            TableKind::Discrete {
                levels,
                colors,
                under,
                over,
            } => {
                let mut bins = Vec::with_capacity(colors.len() + 2);
                if let Some(color) = under {
                    bins.push(Bin {
                        lower: f64::NEG_INFINITY,
                        upper: levels[0],
                        color: *color,
                    });
                }
                for (i, color) in colors.iter().enumerate() {
                    bins.push(Bin {
                        lower: levels[i],
                        upper: levels[i + 1],
                        color: *color,
                    });
                }
                if let Some(color) = over {
                    bins.push(Bin {
                        lower: levels[levels.len() - 1],
                        upper: f64::INFINITY,
                        color: *color,
                    });
                }
                bins
            }
            TableKind::Continuous { stops } => stops
                .windows(2)
                .filter(|w| w[1].0 > w[0].0)
                .map(|w| Bin {
                    lower: w[0].0,
                    upper: w[1].0,
                    color: Rgba::lerp(w[0].1, w[1].1, 0.5),
                })
                .collect(),
            TableKind::Categorical { categories } => {
                let mut sorted = categories.clone();
                sorted.sort_by_key(|c| c.value);
                sorted
                    .iter()
                    .map(|c| Bin {
                        lower: c.value as f64 - 0.5,
                        upper: c.value as f64 + 0.5,
                        color: c.color,
                    })
                    .collect()
            }
        }
    }

    /// Lowest and highest break of the table.
    pub fn value_range(&self) -> (f64, f64) {
        match &self.kind {
            TableKind::Discrete { levels, .. } => (levels[0], levels[levels.len() - 1]),
            TableKind::Continuous { stops } => (stops[0].0, stops[stops.len() - 1].0),
            TableKind::Categorical { categories } => {
                let min = categories.iter().map(|c| c.value).min().unwrap_or(0);
                let max = categories.iter().map(|c| c.value).max().unwrap_or(0);
                (min as f64 - 0.5, max as f64 + 0.5)
            }
        }
    }

    /// Stretch a relative table over `[vmin, vmax]`; absolute tables are
    /// returned unchanged.
    pub fn fit_to(&self, vmin: f64, vmax: f64) -> ColorTable {
        if self.scale == Scale::Absolute || !(vmax > vmin) {
            return self.clone();
        }
        let (lo, hi) = self.value_range();
        let span = hi - lo;
        let rescale = |p: f64| vmin + (p - lo) / span * (vmax - vmin);

        let kind = match &self.kind {
            TableKind::Continuous { stops } => TableKind::Continuous {
                stops: stops.iter().map(|(p, c)| (rescale(*p), *c)).collect(),
            },
            TableKind::Discrete {
                levels,
                colors,
                under,
                over,
            } => TableKind::Discrete {
                levels: levels.iter().map(|p| rescale(*p)).collect(),
                colors: colors.clone(),
                under: *under,
                over: *over,
            },
            other => other.clone(),
        };

        ColorTable {
            name: self.name.clone(),
            label: self.label.clone(),
            units: self.units.clone(),
            scale: Scale::Absolute,
            kind,
        }
    }

    /// The table with its color order reversed; under and over colors trade
    /// places.
    pub fn reversed(&self) -> ColorTable {
        let kind = match &self.kind {
            TableKind::Discrete {
                levels,
                colors,
                under,
                over,
            } => {
                let mut colors = colors.clone();
                colors.reverse();
                TableKind::Discrete {
                    levels: levels.clone(),
                    colors,
                    under: *over,
                    over: *under,
                }
            }
            TableKind::Continuous { stops } => {
                let lo = stops[0].0;
                let hi = stops[stops.len() - 1].0;
                TableKind::Continuous {
                    stops: stops.iter().rev().map(|(p, c)| (lo + hi - p, *c)).collect(),
                }
            }
            TableKind::Categorical { categories } => {
                let mut colors: Vec<Rgba> = categories.iter().map(|c| c.color).collect();
                colors.reverse();
                TableKind::Categorical {
                    categories: categories
                        .iter()
                        .zip(colors)
                        .map(|(c, color)| Category {
                            value: c.value,
                            color,
                            label: c.label.clone(),
                        })
                        .collect(),
                }
            }
        };

        ColorTable {
            name: format!("{}_r", self.name),
            label: self.label.clone(),
            units: self.units.clone(),
            scale: self.scale,
            kind,
        }
    }

    /// The table with every color replaced by the gray of equal perceived
    /// brightness.
    pub fn grayscale(&self) -> ColorTable {
        let gray = |c: &Rgba| c.to_gray();
        let kind = match &self.kind {
            TableKind::Discrete {
                levels,
                colors,
                under,
                over,
            } => TableKind::Discrete {
                levels: levels.clone(),
                colors: colors.iter().map(gray).collect(),
                under: under.as_ref().map(gray),
                over: over.as_ref().map(gray),
            },
            TableKind::Continuous { stops } => TableKind::Continuous {
                stops: stops.iter().map(|(p, c)| (*p, gray(c))).collect(),
            },
            TableKind::Categorical { categories } => TableKind::Categorical {
                categories: categories
                    .iter()
                    .map(|c| Category {
                        value: c.value,
                        color: gray(&c.color),
                        label: c.label.clone(),
                    })
                    .collect(),
            },
        };

        ColorTable {
            name: format!("{}_gray", self.name),
            label: self.label.clone(),
            units: self.units.clone(),
            scale: self.scale,
            kind,
        }
    }

    /// Keep the part of the table between `cmin` and `cmax`.
    ///
    /// For discrete tables the bins just outside the kept range become the
    /// under and over colors.
    pub fn truncate(&self, cmin: f64, cmax: f64) -> Result<ColorTable> {
        if !(cmin < cmax) {
            return Err(BjerknesError::InvalidParameter {
                param: "truncate".to_string(),
                message: format!("empty range {}..{}", cmin, cmax),
            });
        }

        let kind = match &self.kind {
            TableKind::Discrete {
                levels,
                colors,
                under,
                over,
            } => {
                let keep: Vec<usize> = (0..levels.len())
                    .filter(|&i| levels[i] >= cmin && levels[i] <= cmax)
                    .collect();
                if keep.len() < 2 {
                    return Err(BjerknesError::InvalidParameter {
                        param: "truncate".to_string(),
                        message: format!(
                            "fewer than two levels of {} fall within {}..{}",
                            self.name, cmin, cmax
                        ),
                    });
                }
                let first = keep[0];
                let last = keep[keep.len() - 1];
                let new_under = if first > 0 {
                    Some(colors[first - 1])
                } else {
                    *under
                };
                let new_over = if last < levels.len() - 1 {
                    Some(colors[last])
                } else {
                    *over
                };
                TableKind::Discrete {
                    levels: levels[first..=last].to_vec(),
                    colors: colors[first..last].to_vec(),
                    under: new_under,
                    over: new_over,
                }
            }
            TableKind::Continuous { stops } => {
                let (lo, hi) = self.value_range();
                let cmin = cmin.max(lo);
                let cmax = cmax.min(hi);
                if !(cmin < cmax) {
                    return Err(BjerknesError::InvalidParameter {
                        param: "truncate".to_string(),
                        message: format!("range does not overlap {}", self.name),
                    });
                }
                let mut new_stops = Vec::new();
                if let Some(c) = self.map(cmin) {
                    new_stops.push((cmin, c));
                }
                new_stops.extend(
                    stops
                        .iter()
                        .filter(|(p, _)| *p > cmin && *p < cmax)
                        .copied(),
                );
                if let Some(c) = self.map(cmax) {
                    new_stops.push((cmax, c));
                }
                TableKind::Continuous { stops: new_stops }
            }
            TableKind::Categorical { categories } => TableKind::Categorical {
                categories: categories
                    .iter()
                    .filter(|c| (c.value as f64) >= cmin && (c.value as f64) <= cmax)
                    .cloned()
                    .collect(),
            },
        };

        let table = ColorTable {
            name: self.name.clone(),
            label: self.label.clone(),
            units: self.units.clone(),
            scale: self.scale,
            kind,
        };
        table.validate()?;
        Ok(table)
    }

    /// Re-bin the table onto new levels.
    ///
    /// Discrete tables keep their colors when the bin count matches and
    /// resample them otherwise. Continuous tables are sampled at the bin
    /// midpoints, their end colors becoming under and over colors.
    pub fn with_levels(&self, new_levels: Vec<f64>) -> Result<ColorTable> {
        if new_levels.len() < 2 {
            return Err(BjerknesError::InvalidParameter {
                param: "levels".to_string(),
                message: "at least two levels are required".to_string(),
            });
        }
        let nbins = new_levels.len() - 1;

        let kind = match &self.kind {
            TableKind::Discrete {
                colors,
                under,
                over,
                ..
            } => TableKind::Discrete {
                levels: new_levels.clone(),
                colors: resample(colors, nbins)?,
                under: *under,
                over: *over,
            },
            TableKind::Continuous { .. } => {
                let table = self.fit_to(new_levels[0], new_levels[nbins]);
                let colors = new_levels
                    .windows(2)
                    .map(|w| table.map((w[0] + w[1]) / 2.0).unwrap_or(Rgba::TRANSPARENT))
                    .collect();
                TableKind::Discrete {
                    levels: new_levels.clone(),
                    colors,
                    under: table.map(f64::MIN),
                    over: table.map(f64::MAX),
                }
            }
            TableKind::Categorical { .. } => {
                return Err(BjerknesError::InvalidParameter {
                    param: "levels".to_string(),
                    message: format!("categorical table {} cannot be re-binned", self.name),
                })
            }
        };

        let table = ColorTable {
            name: self.name.clone(),
            label: self.label.clone(),
            units: self.units.clone(),
            scale: Scale::Absolute,
            kind,
        };
        table.validate()?;
        Ok(table)
    }

    /// `n` colors sampled evenly across the value range, for legends.
    pub fn ramp(&self, n: usize) -> Vec<Rgba> {
        let (lo, hi) = self.value_range();
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let v = lo + (hi - lo) * i as f64 / (n - 1) as f64;
                self.map(v).unwrap_or(Rgba::TRANSPARENT)
            })
            .collect()
    }
}

/// Evenly spaced values in `[start, stop)`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step - 1e-9).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (stop - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rain() -> ColorTable {
        ColorTable::from_levels_and_colors(
            "rain",
            vec![0.1, 10.0, 25.0],
            vec![Rgba::rgb(0, 255, 0), Rgba::rgb(0, 0, 255), Rgba::rgb(255, 0, 0)],
            Extend::Max,
        )
        .unwrap()
    }

    #[test]
    fn test_discrete_mapping() {
        let table = rain();
        assert_eq!(table.map(0.0), None);
        assert_eq!(table.map(0.1), Some(Rgba::rgb(0, 255, 0)));
        assert_eq!(table.map(9.99), Some(Rgba::rgb(0, 255, 0)));
        assert_eq!(table.map(10.0), Some(Rgba::rgb(0, 0, 255)));
        assert_eq!(table.map(25.0), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(table.map(300.0), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(table.map(f64::NAN), None);
        assert_eq!(table.extend(), Extend::Max);
    }

    #[test]
    fn test_top_level_inclusive_without_extension() {
        let table = ColorTable::from_levels_and_colors(
            "t",
            vec![0.0, 1.0, 2.0],
            vec![Rgba::BLACK, Rgba::WHITE],
            Extend::Neither,
        )
        .unwrap();
        assert_eq!(table.map(2.0), Some(Rgba::WHITE));
        assert_eq!(table.map(2.5), None);
        assert_eq!(table.map(-0.5), None);
    }

    #[test]
    fn test_color_count_mismatch_is_rejected() {
        let result = ColorTable::from_levels_and_colors(
            "bad",
            vec![0.0, 1.0, 2.0],
            vec![Rgba::BLACK],
            Extend::Both,
        );
        assert!(matches!(
            result,
            Err(BjerknesError::InvalidColorTable { .. })
        ));
    }

    #[test]
    fn test_levels_must_increase() {
        let result = ColorTable::from_levels_and_colors(
            "bad",
            vec![0.0, 2.0, 1.0],
            vec![Rgba::BLACK, Rgba::WHITE],
            Extend::Neither,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_continuous_with_hard_step() {
        let table = ColorTable::from_positions(
            "step",
            &[0.0, 5.0, 5.0, 10.0],
            &[Rgba::BLACK, Rgba::BLACK, Rgba::WHITE, Rgba::WHITE],
        )
        .unwrap();
        assert_eq!(table.map(4.99), Some(Rgba::BLACK));
        assert_eq!(table.map(5.0), Some(Rgba::WHITE));
        assert_eq!(table.map(-100.0), Some(Rgba::BLACK));
        assert_eq!(table.map(100.0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_continuous_interpolates() {
        let table =
            ColorTable::from_positions("ramp", &[0.0, 10.0], &[Rgba::BLACK, Rgba::WHITE]).unwrap();
        assert_eq!(table.map(5.0), Some(Rgba::rgb(128, 128, 128)));
    }

    #[test]
    fn test_bins_are_contiguous() {
        let table = ColorTable::from_levels_and_colors(
            "both",
            vec![0.0, 1.0, 2.0],
            vec![Rgba::BLACK, Rgba::WHITE, Rgba::BLACK, Rgba::WHITE],
            Extend::Both,
        )
        .unwrap();
        let bins = table.bins();
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].lower, f64::NEG_INFINITY);
        assert_eq!(bins[3].upper, f64::INFINITY);
        for pair in bins.windows(2) {
            assert_eq!(pair[0].upper, pair[1].lower);
        }
    }

    #[test]
    fn test_reversed_swaps_extensions() {
        let table = rain().reversed();
        assert_eq!(table.name, "rain_r");
        assert_eq!(table.extend(), Extend::Min);
        assert_eq!(table.map(0.1), Some(Rgba::rgb(0, 0, 255)));
        assert_eq!(table.map(0.0), Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn test_reversed_continuous_mirrors_positions() {
        let table =
            ColorTable::from_positions("ramp", &[0.0, 2.0, 10.0], &[Rgba::BLACK, Rgba::WHITE, Rgba::BLACK])
                .unwrap()
                .reversed();
        assert_eq!(table.levels(), vec![0.0, 8.0, 10.0]);
        assert_eq!(table.map(8.0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_grayscale() {
        let table = rain().grayscale();
        for bin in table.bins() {
            assert_eq!(bin.color.r(), bin.color.g());
            assert_eq!(bin.color.g(), bin.color.b());
        }
    }

    #[test]
    fn test_truncate_discrete() {
        let table = ColorTable::from_levels_and_colors(
            "t",
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![
                Rgba::rgb(1, 1, 1),
                Rgba::rgb(2, 2, 2),
                Rgba::rgb(3, 3, 3),
                Rgba::rgb(4, 4, 4),
            ],
            Extend::Neither,
        )
        .unwrap();
        let truncated = table.truncate(1.0, 3.0).unwrap();
        assert_eq!(truncated.levels(), vec![1.0, 2.0, 3.0]);
        assert_eq!(truncated.map(0.5), Some(Rgba::rgb(1, 1, 1)));
        assert_eq!(truncated.map(1.5), Some(Rgba::rgb(2, 2, 2)));
        assert_eq!(truncated.map(3.5), Some(Rgba::rgb(4, 4, 4)));
        assert!(table.truncate(3.5, 3.9).is_err());
    }

    #[test]
    fn test_fit_relative_table() {
        let table = ColorTable::relative_ramp("ramp", &[Rgba::BLACK, Rgba::WHITE]).unwrap();
        let fitted = table.fit_to(100.0, 200.0);
        assert_eq!(fitted.scale, Scale::Absolute);
        assert_eq!(fitted.value_range(), (100.0, 200.0));
        assert_eq!(fitted.map(200.0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_with_levels_from_continuous() {
        let table =
            ColorTable::from_positions("ramp", &[0.0, 10.0], &[Rgba::BLACK, Rgba::WHITE]).unwrap();
        let discrete = table.with_levels(vec![0.0, 5.0, 10.0]).unwrap();
        assert_eq!(discrete.kind_name(), "discrete");
        assert_eq!(discrete.map(2.0), Some(Rgba::rgb(64, 64, 64)));
        assert_eq!(discrete.extend(), Extend::Both);
    }

    #[test]
    fn test_categorical() {
        let table = ColorTable::categorical(
            "lu",
            vec![
                Category {
                    value: 1,
                    color: Rgba::BLACK,
                    label: "Forest".to_string(),
                },
                Category {
                    value: 2,
                    color: Rgba::WHITE,
                    label: "Snow".to_string(),
                },
            ],
        )
        .unwrap();
        assert_eq!(table.map(1.2), Some(Rgba::BLACK));
        assert_eq!(table.map(2.0), Some(Rgba::WHITE));
        assert_eq!(table.map(7.0), None);
        assert_eq!(table.value_range(), (0.5, 2.5));
    }

    #[test]
    fn test_arange_and_linspace() {
        assert_eq!(arange(150.0, 475.0, 25.0).len(), 13);
        assert_eq!(arange(4.0, 13.0, 1.5).len(), 6);
        assert_eq!(arange(940.0, 1067.5, 2.5).len(), 51);
        assert_eq!(linspace(-50.0, 50.0, 51)[25], 0.0);
    }
}
