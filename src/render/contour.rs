//! Contour (isoline) overlays using marching squares.
//!
//! Lines are traced in grid index space, joined into polylines, converted to
//! lon/lat through the grid axes and only then projected onto the canvas.

use geo::{coord, Coord, LineString};
use std::collections::HashMap;
use tracing::debug;

use super::canvas::Canvas;
use crate::colortables::{ColorTable, Rgba};
use crate::error::{BjerknesError, Result};
use crate::grid::Grid;

/// A line piece inside one grid cell, in `(col, row)` index space.
pub type Segment = (Coord<f64>, Coord<f64>);

/// A traced isoline in index space.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub level: f64,
    pub points: Vec<Coord<f64>>,
    pub closed: bool,
}

/// How a contour overlay is drawn.
#[derive(Debug, Clone)]
pub struct ContourStyle {
    pub levels: Vec<f64>,
    pub color: Rgba,
    pub width: f32,
    /// One level drawn with its own line width, e.g. the 588 dagpm line.
    pub highlight: Option<(f64, f32)>,
    pub dash: Option<Vec<f32>>,
    /// Chaikin smoothing passes.
    pub smoothing: u32,
    /// Per-level colors; levels the table does not color use `color`.
    pub table: Option<ColorTable>,
}

impl Default for ContourStyle {
    fn default() -> Self {
        ContourStyle {
            levels: Vec::new(),
            color: Rgba::BLACK,
            width: 1.0,
            highlight: None,
            dash: None,
            smoothing: 1,
            table: None,
        }
    }
}

impl ContourStyle {
    pub fn new(levels: Vec<f64>, color: Rgba, width: f32) -> Self {
        ContourStyle {
            levels,
            color,
            width,
            ..Default::default()
        }
    }

    pub fn with_highlight(mut self, level: f64, width: f32) -> Self {
        self.highlight = Some((level, width));
        self
    }

    pub fn with_dash(mut self, dash: Vec<f32>) -> Self {
        self.dash = Some(dash);
        self
    }

    pub fn with_table(mut self, table: ColorTable) -> Self {
        self.table = Some(table);
        self
    }

    fn width_for(&self, level: f64) -> f32 {
        match self.highlight {
            Some((h, width)) if (h - level).abs() < 1e-6 => width,
            _ => self.width,
        }
    }

    fn color_for(&self, level: f64) -> Rgba {
        self.table
            .as_ref()
            .and_then(|t| t.map(level))
            .unwrap_or(self.color)
    }
}

/// Multiples of `interval` within `[min, max]`.
pub fn contour_levels(min: f64, max: f64, interval: f64) -> Vec<f64> {
    if interval.is_nan() || interval <= 0.0 || min.is_nan() || max.is_nan() || max <= min {
        return Vec::new();
    }
    let first = (min / interval).ceil() as i64;
    let last = (max / interval).floor() as i64;
    (first..=last).map(|k| k as f64 * interval).collect()
}

fn interpolate_edge(p1: Coord<f64>, p2: Coord<f64>, v1: f64, v2: f64, level: f64) -> Coord<f64> {
    if (v2 - v1).abs() < 1e-12 {
        return coord! { x: (p1.x + p2.x) / 2.0, y: (p1.y + p2.y) / 2.0 };
    }
    let t = ((level - v1) / (v2 - v1)).clamp(0.0, 1.0);
    coord! { x: p1.x + t * (p2.x - p1.x), y: p1.y + t * (p2.y - p1.y) }
}

/// Segments where `data` (row-major, `rows` x `cols`) crosses `level`.
///
/// Cells with a NaN corner are skipped. Saddle cells are resolved with the
/// mean of the four corners.
pub fn march_squares(data: &[f32], rows: usize, cols: usize, level: f64) -> Vec<Segment> {
    if rows < 2 || cols < 2 || data.len() != rows * cols {
        return Vec::new();
    }
    let mut segments = Vec::new();
    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            let tl = data[r * cols + c] as f64;
            let tr = data[r * cols + c + 1] as f64;
            let bl = data[(r + 1) * cols + c] as f64;
            let br = data[(r + 1) * cols + c + 1] as f64;
            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut case = 0u8;
            if tl >= level {
                case |= 1;
            }
            if tr >= level {
                case |= 2;
            }
            if br >= level {
                case |= 4;
            }
            if bl >= level {
                case |= 8;
            }
            if case == 0 || case == 15 {
                continue;
            }

            let (x, y) = (c as f64, r as f64);
            let p_tl = coord! { x: x, y: y };
            let p_tr = coord! { x: x + 1.0, y: y };
            let p_bl = coord! { x: x, y: y + 1.0 };
            let p_br = coord! { x: x + 1.0, y: y + 1.0 };
            let top = interpolate_edge(p_tl, p_tr, tl, tr, level);
            let right = interpolate_edge(p_tr, p_br, tr, br, level);
            let bottom = interpolate_edge(p_bl, p_br, bl, br, level);
            let left = interpolate_edge(p_tl, p_bl, tl, bl, level);

            let center_above = (tl + tr + bl + br) / 4.0 >= level;
            match case {
                1 | 14 => segments.push((left, top)),
                2 | 13 => segments.push((top, right)),
                3 | 12 => segments.push((left, right)),
                4 | 11 => segments.push((right, bottom)),
                6 | 9 => segments.push((top, bottom)),
                7 | 8 => segments.push((left, bottom)),
                // tl and br above
                5 if center_above => {
                    segments.push((top, right));
                    segments.push((left, bottom));
                }
                5 => {
                    segments.push((left, top));
                    segments.push((right, bottom));
                }
                // tr and bl above
                10 if center_above => {
                    segments.push((left, top));
                    segments.push((right, bottom));
                }
                10 => {
                    segments.push((top, right));
                    segments.push((left, bottom));
                }
                _ => {}
            }
        }
    }
    segments
}

type PointKey = (u64, u64);

fn key(p: Coord<f64>) -> PointKey {
    (p.x.to_bits(), p.y.to_bits())
}

/// Join cell segments into polylines.
///
/// Neighboring cells compute shared edge crossings from the same corner
/// values, so matching endpoints are bit-identical.
pub fn join_segments(segments: &[Segment], level: f64) -> Vec<Contour> {
    let mut by_point: HashMap<PointKey, Vec<usize>> = HashMap::new();
    for (i, (a, b)) in segments.iter().enumerate() {
        by_point.entry(key(*a)).or_default().push(i);
        by_point.entry(key(*b)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let next_from = |p: Coord<f64>, used: &mut [bool]| -> Option<Coord<f64>> {
        let candidates = by_point.get(&key(p))?;
        let &i = candidates.iter().find(|&&i| !used[i])?;
        used[i] = true;
        let (a, b) = segments[i];
        Some(if key(a) == key(p) { b } else { a })
    };

    let mut contours = Vec::new();
    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (a, b) = segments[start];

        let mut forward = vec![a, b];
        while let Some(p) = next_from(forward[forward.len() - 1], &mut used) {
            forward.push(p);
        }
        let closed = forward.len() > 3 && key(forward[0]) == key(forward[forward.len() - 1]);

        let points = if closed {
            forward
        } else {
            let mut backward = Vec::new();
            let mut head = a;
            while let Some(p) = next_from(head, &mut used) {
                backward.push(p);
                head = p;
            }
            backward.reverse();
            backward.extend(forward);
            backward
        };

        contours.push(Contour {
            level,
            points,
            closed,
        });
    }
    contours
}

/// Chaikin corner cutting. Open lines keep their end points.
pub fn smooth(points: &[(f32, f32)], closed: bool, passes: u32) -> Vec<(f32, f32)> {
    let mut points = points.to_vec();
    if closed && points.len() > 1 && points[0] == points[points.len() - 1] {
        points.pop();
    }
    if points.len() < 3 {
        return points;
    }
    for _ in 0..passes {
        let n = points.len();
        let pairs = if closed { n } else { n - 1 };
        let mut next = Vec::with_capacity(pairs * 2 + 2);
        if !closed {
            next.push(points[0]);
        }
        for i in 0..pairs {
            let (x1, y1) = points[i];
            let (x2, y2) = points[(i + 1) % n];
            next.push((0.75 * x1 + 0.25 * x2, 0.75 * y1 + 0.25 * y2));
            next.push((0.25 * x1 + 0.75 * x2, 0.25 * y1 + 0.75 * y2));
        }
        if !closed {
            next.push(points[n - 1]);
        }
        points = next;
    }
    points
}

/// Coordinate value at a fractional index along an axis.
fn axis_value(axis: &[f64], index: f64) -> f64 {
    let last = axis.len() - 1;
    let i0 = (index.floor().max(0.0) as usize).min(last);
    let i1 = (i0 + 1).min(last);
    let t = index - i0 as f64;
    axis[i0] + t * (axis[i1] - axis[i0])
}

impl Contour {
    /// The line in lon/lat through the grid's axes.
    pub fn to_geographic(&self, grid: &Grid) -> LineString<f64> {
        self.points
            .iter()
            .map(|p| coord! { x: axis_value(&grid.lons, p.x), y: axis_value(&grid.lats, p.y) })
            .collect::<Vec<_>>()
            .into()
    }
}

/// Trace every level of a grid.
pub fn trace(grid: &Grid, levels: &[f64]) -> Vec<Contour> {
    let (rows, cols) = grid.shape();
    let data: Vec<f32> = grid.values.iter().copied().collect();
    levels
        .iter()
        .flat_map(|&level| join_segments(&march_squares(&data, rows, cols, level), level))
        .collect()
}

impl Canvas {
    /// Draw isolines of a grid. Returns the number of lines drawn.
    pub fn contour(&mut self, grid: &Grid, style: &ContourStyle) -> Result<usize> {
        if style.width <= 0.0 {
            return Err(BjerknesError::InvalidParameter {
                param: "contour_width".to_string(),
                message: format!("line width must be positive, got {}", style.width),
            });
        }
        let contours = trace(grid, &style.levels);
        for contour in &contours {
            let line = contour.to_geographic(grid);
            let points = smooth(&self.project_line(&line), contour.closed, style.smoothing);
            self.stroke_pixels(
                &points,
                contour.closed,
                style.color_for(contour.level),
                style.width_for(contour.level),
                style.dash.as_deref(),
            );
        }
        debug!(
            levels = style.levels.len(),
            lines = contours.len(),
            "Drew contours"
        );
        Ok(contours.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geography::MapExtent;

    /// A cone peaking at (5, 5) with value 10 - distance.
    fn cone() -> Grid {
        Grid::from_fn(
            (0..=10).map(|i| i as f64).collect(),
            (0..=10).map(|i| i as f64).collect(),
            |lon, lat| (10.0 - ((lon - 5.0).powi(2) + (lat - 5.0).powi(2)).sqrt()) as f32,
        )
        .unwrap()
    }

    #[test]
    fn test_contour_levels() {
        assert_eq!(contour_levels(3.0, 17.0, 5.0), vec![5.0, 10.0, 15.0]);
        assert_eq!(contour_levels(-4.0, 4.0, 4.0), vec![-4.0, 0.0, 4.0]);
        assert!(contour_levels(1.0, 1.0, 1.0).is_empty());
        assert!(contour_levels(0.0, 10.0, 0.0).is_empty());
    }

    #[test]
    fn test_single_cell_crossing() {
        // left column below, right column above
        let data = [0.0, 2.0, 0.0, 2.0];
        let segments = march_squares(&data, 2, 2, 1.0);
        assert_eq!(segments.len(), 1);
        let (a, b) = segments[0];
        assert_eq!(a.x, 0.5);
        assert_eq!(b.x, 0.5);
    }

    #[test]
    fn test_nan_cells_are_skipped() {
        let data = [0.0, 2.0, f32::NAN, 2.0];
        assert!(march_squares(&data, 2, 2, 1.0).is_empty());
    }

    #[test]
    fn test_ring_around_peak_is_closed() {
        let contours = trace(&cone(), &[7.0]);
        assert_eq!(contours.len(), 1);
        let ring = &contours[0];
        assert!(ring.closed);
        // every vertex lies near radius 3 from the peak
        let line = ring.to_geographic(&cone());
        for c in line.coords() {
            let r = ((c.x - 5.0).powi(2) + (c.y - 5.0).powi(2)).sqrt();
            assert!((r - 3.0).abs() < 0.25, "vertex at radius {}", r);
        }
    }

    #[test]
    fn test_open_line_is_joined_end_to_end() {
        let ramp = Grid::from_fn(
            (0..5).map(|i| i as f64).collect(),
            (0..5).map(|i| i as f64).collect(),
            |lon, _| lon as f32,
        )
        .unwrap();
        let contours = trace(&ramp, &[1.5]);
        assert_eq!(contours.len(), 1);
        assert!(!contours[0].closed);
        assert_eq!(contours[0].points.len(), 5);
    }

    #[test]
    fn test_smoothing_keeps_open_end_points() {
        let pts = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)];
        let smoothed = smooth(&pts, false, 2);
        assert_eq!(smoothed[0], (0.0, 0.0));
        assert_eq!(smoothed[smoothed.len() - 1], (10.0, 10.0));
        assert!(smoothed.len() > pts.len());
    }

    #[test]
    fn test_canvas_contour_draws_ring() {
        let mut canvas =
            Canvas::new(MapExtent::new(0.0, 10.0, 0.0, 10.0).unwrap(), 100, 100, false).unwrap();
        let style = ContourStyle::new(vec![7.0], Rgba::BLACK, 2.0).with_highlight(7.0, 4.0);
        assert_eq!(canvas.contour(&cone(), &style).unwrap(), 1);
        let img = canvas.to_rgba_image();
        // the ring passes 3 degrees (30 px) east of the center
        assert_ne!(img.get_pixel(80, 50).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(50, 50).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(5, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_level_colors_from_table() {
        let table = ColorTable::from_levels_and_colors(
            "two",
            vec![0.0, 5.0, 10.0],
            vec![Rgba::rgb(255, 0, 0), Rgba::rgb(0, 0, 255)],
            crate::colortables::Extend::Neither,
        )
        .unwrap();
        let style = ContourStyle::default().with_table(table);
        assert_eq!(style.color_for(2.0), Rgba::rgb(255, 0, 0));
        assert_eq!(style.color_for(7.0), Rgba::rgb(0, 0, 255));
        assert_eq!(style.color_for(20.0), Rgba::BLACK);
    }
}
