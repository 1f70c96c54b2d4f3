//! Geographic helpers: map extents, the center-longitude projection and
//! named regions.

pub mod projection;
pub mod regions;

pub use projection::{normalize_longitude, MapExtent, MapProjection};
pub use regions::{
    contour_interval_for, region_extent, regions, requested_extent, Region, DEFAULT_EXTENT,
};
