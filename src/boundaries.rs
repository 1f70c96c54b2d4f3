//! Map boundary sets read from shapefiles.
//!
//! A [`BoundarySet`] holds the line work (coastlines, borders, rivers) and
//! the polygons (for land fills and masks) of one shapefile. Sets are
//! immutable once loaded; the [`BoundaryCatalog`] resolves the configured
//! source names to files and keeps loaded sets for its lifetime.

use geo::{coord, BoundingRect, Coord, LineString, MultiLineString, MultiPolygon, Polygon, Rect};
use parking_lot::RwLock;
use shapefile::dbase::FieldValue;
use shapefile::{PolygonRing, Shape};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::colortables::Rgba;
use crate::config::MapsConfig;
use crate::error::{BjerknesError, Result};
use crate::geography::MapExtent;
use crate::mask::MaskRegion;

/// Line and polygon geometries of one boundary source.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySet {
    pub name: String,
    pub lines: MultiLineString<f64>,
    pub polygons: MultiPolygon<f64>,
}

/// Counts reported after loading a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryStatistics {
    pub line_count: usize,
    pub polygon_count: usize,
    pub vertex_count: usize,
}

trait PointXY {
    fn coord(&self) -> Coord<f64>;
}

impl PointXY for shapefile::Point {
    fn coord(&self) -> Coord<f64> {
        coord! { x: self.x, y: self.y }
    }
}

impl PointXY for shapefile::PointM {
    fn coord(&self) -> Coord<f64> {
        coord! { x: self.x, y: self.y }
    }
}

impl PointXY for shapefile::PointZ {
    fn coord(&self) -> Coord<f64> {
        coord! { x: self.x, y: self.y }
    }
}

fn line_of<P: PointXY>(points: &[P]) -> LineString<f64> {
    LineString::new(points.iter().map(PointXY::coord).collect())
}

/// Outer rings start a polygon, inner rings become holes of the last one.
fn polygons_of<P: PointXY>(rings: &[PolygonRing<P>]) -> Vec<Polygon<f64>> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => polygons.push(Polygon::new(line_of(points), vec![])),
            PolygonRing::Inner(points) => match polygons.last_mut() {
                Some(polygon) => polygon.interiors_push(line_of(points)),
                None => polygons.push(Polygon::new(line_of(points), vec![])),
            },
        }
    }
    polygons
}

/// Geometries of a shape as (lines, polygons); `None` for unsupported types.
fn shape_geometries(shape: &Shape) -> Option<(Vec<LineString<f64>>, Vec<Polygon<f64>>)> {
    fn from_polygons(polygons: Vec<Polygon<f64>>) -> (Vec<LineString<f64>>, Vec<Polygon<f64>>) {
        let lines = polygons
            .iter()
            .flat_map(|p| std::iter::once(p.exterior().clone()).chain(p.interiors().iter().cloned()))
            .collect();
        (lines, polygons)
    }

    match shape {
        Shape::Polygon(p) => Some(from_polygons(polygons_of(p.rings()))),
        Shape::PolygonM(p) => Some(from_polygons(polygons_of(p.rings()))),
        Shape::PolygonZ(p) => Some(from_polygons(polygons_of(p.rings()))),
        Shape::Polyline(l) => Some((l.parts().iter().map(|p| line_of(p)).collect(), vec![])),
        Shape::PolylineM(l) => Some((l.parts().iter().map(|p| line_of(p)).collect(), vec![])),
        Shape::PolylineZ(l) => Some((l.parts().iter().map(|p| line_of(p)).collect(), vec![])),
        Shape::NullShape => Some((vec![], vec![])),
        _ => None,
    }
}

impl BoundarySet {
    pub fn new(name: &str, lines: MultiLineString<f64>, polygons: MultiPolygon<f64>) -> Self {
        BoundarySet {
            name: name.to_string(),
            lines,
            polygons,
        }
    }

    /// A set built from polygons; their rings become the line work.
    pub fn from_polygons(name: &str, polygons: Vec<Polygon<f64>>) -> Self {
        let lines = polygons
            .iter()
            .flat_map(|p| std::iter::once(p.exterior().clone()).chain(p.interiors().iter().cloned()))
            .collect();
        Self::new(name, MultiLineString::new(lines), MultiPolygon::new(polygons))
    }

    /// Read every supported shape of a shapefile.
    pub fn from_shapefile(name: &str, path: &Path) -> Result<Self> {
        let shapes = shapefile::read_shapes(path)?;
        let mut lines = Vec::new();
        let mut polygons = Vec::new();
        let mut skipped = 0usize;

        for shape in &shapes {
            match shape_geometries(shape) {
                Some((l, p)) => {
                    lines.extend(l);
                    polygons.extend(p);
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(
                overlay = name,
                path = %path.display(),
                skipped = skipped,
                "Skipped unsupported shape types"
            );
        }

        let set = Self::new(name, MultiLineString::new(lines), MultiPolygon::new(polygons));
        let stats = set.statistics();
        info!(
            overlay = name,
            path = %path.display(),
            lines = stats.line_count,
            polygons = stats.polygon_count,
            vertices = stats.vertex_count,
            "Loaded boundary set"
        );
        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.0.is_empty() && self.polygons.0.is_empty()
    }

    pub fn statistics(&self) -> BoundaryStatistics {
        let line_vertices: usize = self.lines.0.iter().map(|l| l.0.len()).sum();
        BoundaryStatistics {
            line_count: self.lines.0.len(),
            polygon_count: self.polygons.0.len(),
            vertex_count: line_vertices,
        }
    }

    /// Geometries whose bounding box meets the extent, in any 360-degree
    /// window.
    pub fn within(&self, extent: &MapExtent) -> BoundarySet {
        let meets = |rect: Option<Rect<f64>>| {
            rect.map_or(false, |r| {
                extent.intersects(&MapExtent {
                    lon_min: r.min().x,
                    lon_max: r.max().x,
                    lat_min: r.min().y,
                    lat_max: r.max().y,
                })
            })
        };
        let lines = self
            .lines
            .0
            .iter()
            .filter(|l| meets(l.bounding_rect()))
            .cloned()
            .collect();
        let polygons = self
            .polygons
            .0
            .iter()
            .filter(|p| meets(p.bounding_rect()))
            .cloned()
            .collect();
        Self::new(&self.name, MultiLineString::new(lines), MultiPolygon::new(polygons))
    }

    /// Mask region made of all polygons of the set.
    pub fn to_mask_region(&self) -> MaskRegion {
        MaskRegion::new(&self.name, self.polygons.clone())
    }
}

fn field_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Character(Some(s)) => Some(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => Some(format_number(*n)),
        FieldValue::Float(Some(n)) => Some(format_number(*n as f64)),
        FieldValue::Double(n) => Some(format_number(*n)),
        FieldValue::Integer(n) => Some(n.to_string()),
        _ => None,
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Read the polygons whose `attribute` equals one of `values` into a mask
/// region.
pub fn read_region_from_shapefile(path: &Path, attribute: &str, values: &[String]) -> Result<MaskRegion> {
    let mut reader = shapefile::Reader::from_path(path)?;
    let mut polygons = Vec::new();
    let mut saw_attribute = false;

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;
        let Some(value) = record.get(attribute) else {
            continue;
        };
        saw_attribute = true;
        let matches = field_text(value).map_or(false, |text| values.iter().any(|v| v.trim() == text));
        if !matches {
            continue;
        }
        if let Some((_, p)) = shape_geometries(&shape) {
            polygons.extend(p);
        }
    }

    if !saw_attribute {
        return Err(BjerknesError::Geometry {
            message: format!("{} has no attribute named {}", path.display(), attribute),
        });
    }
    if polygons.is_empty() {
        return Err(BjerknesError::Geometry {
            message: format!(
                "no polygon in {} has {} in {:?}",
                path.display(),
                attribute,
                values
            ),
        });
    }

    let name = values.join("+");
    debug!(region = %name, polygons = polygons.len(), "Read mask region");
    Ok(MaskRegion::new(&name, MultiPolygon::new(polygons)))
}

/// Drawing style of a boundary overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryStyle {
    pub edge: Rgba,
    /// Line width in pixels
    pub width: f32,
    pub fill: Option<Rgba>,
    /// Dash pattern in pixels (on, off, ...)
    pub dash: Option<Vec<f32>>,
}

impl Default for BoundaryStyle {
    fn default() -> Self {
        BoundaryStyle {
            edge: Rgba([0, 0, 0, 255]),
            width: 1.0,
            fill: None,
            dash: None,
        }
    }
}

impl BoundaryStyle {
    pub fn province() -> Self {
        BoundaryStyle {
            edge: Rgba([0, 139, 139, 255]),
            width: 1.0,
            ..Default::default()
        }
    }

    pub fn nation() -> Self {
        BoundaryStyle {
            width: 1.5,
            ..Default::default()
        }
    }

    pub fn coastline() -> Self {
        BoundaryStyle {
            width: 0.75,
            ..Default::default()
        }
    }

    pub fn county() -> Self {
        BoundaryStyle {
            edge: Rgba([128, 128, 128, 255]),
            width: 0.5,
            ..Default::default()
        }
    }

    pub fn river() -> Self {
        BoundaryStyle {
            edge: Rgba([30, 144, 255, 255]),
            width: 0.8,
            ..Default::default()
        }
    }

    /// Grey land fill without edges.
    pub fn land_fill() -> Self {
        BoundaryStyle {
            edge: Rgba([0, 0, 0, 0]),
            width: 0.0,
            fill: Some(Rgba::from_unit(0.6, 0.6, 0.6)),
            dash: None,
        }
    }

    /// Style for a configured source name.
    pub fn for_source(source: &str) -> Self {
        match source {
            "province" => Self::province(),
            "nation" | "country" => Self::nation(),
            "coastline" => Self::coastline(),
            "county" => Self::county(),
            "river" | "river_high" => Self::river(),
            "land" => Self::land_fill(),
            _ => Self::default(),
        }
    }
}

/// Named boundary sources with loaded sets kept for reuse.
pub struct BoundaryCatalog {
    maps: MapsConfig,
    loaded: RwLock<HashMap<String, Arc<BoundarySet>>>,
}

impl BoundaryCatalog {
    pub fn new(maps: MapsConfig) -> Self {
        BoundaryCatalog {
            maps,
            loaded: RwLock::new(HashMap::new()),
        }
    }

    /// Configured source names and whether their shapefile exists.
    pub fn sources(&self) -> Vec<(String, bool)> {
        self.maps
            .sources
            .keys()
            .map(|name| {
                let exists = self.maps.path_for(name).map_or(false, |p| p.exists());
                (name.clone(), exists)
            })
            .collect()
    }

    /// Shapefile of a source name, or the name itself when it is a `.shp`
    /// path.
    pub fn resolve(&self, source: &str) -> Result<PathBuf> {
        if let Some(path) = self.maps.path_for(source) {
            return Ok(path);
        }
        let path = PathBuf::from(source);
        if path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("shp")) {
            return Ok(path);
        }
        Err(BjerknesError::InvalidParameter {
            param: "boundaries".to_string(),
            message: format!(
                "unknown boundary source {}; known sources: {}",
                source,
                self.maps.sources.keys().cloned().collect::<Vec<_>>().join(", ")
            ),
        })
    }

    /// Register an in-memory set under its name.
    pub fn insert(&self, set: BoundarySet) -> Arc<BoundarySet> {
        let set = Arc::new(set);
        self.loaded.write().insert(set.name.clone(), set.clone());
        set
    }

    /// Load (or reuse) the set of a source.
    pub fn get(&self, source: &str) -> Result<Arc<BoundarySet>> {
        if let Some(set) = self.loaded.read().get(source) {
            return Ok(set.clone());
        }
        let path = self.resolve(source)?;
        if !path.exists() {
            return Err(BjerknesError::DataNotFound {
                message: format!("boundary shapefile not found: {}", path.display()),
            });
        }
        let set = BoundarySet::from_shapefile(source, &path)?;
        Ok(self.insert(set))
    }

    /// Mask region of a source, optionally filtered by attribute values.
    pub fn mask_region(&self, source: &str, attribute: Option<&str>, values: &[String]) -> Result<MaskRegion> {
        match attribute {
            Some(attribute) => read_region_from_shapefile(&self.resolve(source)?, attribute, values),
            None => Ok(self.get(source)?.to_mask_region()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use shapefile::dbase::{FieldName, Record, TableWriterBuilder};

    fn square(x0: f64, y0: f64, size: f64) -> shapefile::Polygon {
        shapefile::Polygon::new(PolygonRing::Outer(vec![
            shapefile::Point::new(x0, y0),
            shapefile::Point::new(x0, y0 + size),
            shapefile::Point::new(x0 + size, y0 + size),
            shapefile::Point::new(x0 + size, y0),
            shapefile::Point::new(x0, y0),
        ]))
    }

    fn write_provinces(path: &Path) {
        let table = TableWriterBuilder::new()
            .add_character_field(FieldName::try_from("NAME").unwrap(), 20);
        let mut writer = shapefile::Writer::from_path(path, table).unwrap();
        for (name, x0) in [("henan", 110.0), ("hubei", 120.0)] {
            let mut record = Record::default();
            record.insert("NAME".to_string(), FieldValue::Character(Some(name.to_string())));
            writer.write_shape_and_record(&square(x0, 30.0, 5.0), &record).unwrap();
        }
    }

    #[test]
    fn test_read_polygon_shapefile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prov.shp");
        write_provinces(&path);

        let set = BoundarySet::from_shapefile("province", &path).unwrap();
        assert_eq!(set.polygons.0.len(), 2);
        assert_eq!(set.lines.0.len(), 2);
        assert_eq!(set.statistics().vertex_count, 10);
    }

    #[test]
    fn test_region_from_attribute() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prov.shp");
        write_provinces(&path);

        let region = read_region_from_shapefile(&path, "NAME", &["hubei".to_string()]).unwrap();
        assert_eq!(region.polygons.0.len(), 1);
        assert!(region.covers(122.0, 32.0));
        assert!(!region.covers(112.0, 32.0));

        assert!(matches!(
            read_region_from_shapefile(&path, "NAME", &["tibet".to_string()]),
            Err(BjerknesError::Geometry { .. })
        ));
        assert!(matches!(
            read_region_from_shapefile(&path, "CODE", &["1".to_string()]),
            Err(BjerknesError::Geometry { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(BoundarySet::from_shapefile("x", Path::new("/nonexistent/x.shp")).is_err());
    }

    #[test]
    fn test_catalog_resolution_and_cache() {
        let dir = tempfile::tempdir().unwrap();
        write_provinces(&dir.path().join("bou2_4p.shp"));
        let catalog = BoundaryCatalog::new(MapsConfig {
            maps_dir: dir.path().to_path_buf(),
            ..Default::default()
        });

        let first = catalog.get("province").unwrap();
        let second = catalog.get("province").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(matches!(
            catalog.get("nation"),
            Err(BjerknesError::DataNotFound { .. })
        ));
        assert!(matches!(
            catalog.resolve("lakes"),
            Err(BjerknesError::InvalidParameter { .. })
        ));
        assert!(catalog
            .sources()
            .contains(&("province".to_string(), true)));

        let region = catalog
            .mask_region("province", Some("NAME"), &["henan".to_string()])
            .unwrap();
        assert!(region.covers(112.0, 32.0));
    }

    #[test]
    fn test_within_extent() {
        let set = BoundarySet::from_polygons(
            "test",
            vec![
                polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)],
                polygon![(x: 50.0, y: 0.0), (x: 51.0, y: 0.0), (x: 51.0, y: 1.0), (x: 50.0, y: 0.0)],
            ],
        );
        let extent = MapExtent::new(-5.0, 5.0, -5.0, 5.0).unwrap();
        let clipped = set.within(&extent);
        assert_eq!(clipped.polygons.0.len(), 1);
        assert_eq!(clipped.lines.0.len(), 1);
        assert_eq!(BoundaryStyle::for_source("province").width, 1.0);
        assert!(BoundaryStyle::land_fill().fill.is_some());
        assert_eq!(BoundaryStyle::for_source("land"), BoundaryStyle::land_fill());
    }
}
