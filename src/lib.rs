//! # bjerknes
//!
//! Meteorological chart rendering.
//!
//! This library provides the building blocks of operational weather charts:
//! a registry of named color tables, masking of gridded fields by polygons
//! or shapefiles, boundary overlays, and assembly of synoptic and single
//! field charts into PNG or JPEG images.
//!
//! ## Architecture
//!
//! - **Data Layer**: NetCDF files are loaded into an in-memory [`Dataset`]
//!   and sliced into 2-D [`grid::Grid`]s
//! - **Styling**: [`colortables`] maps values to colors, [`boundaries`]
//!   reads and styles shapefile overlays, [`mask`] drops cells outside a
//!   region
//! - **Rendering**: [`render::Canvas`] draws fills, contours, wind barbs,
//!   overlays and colorbars; [`charts`] composes them into products
//! - **API Layer**: the same charts are served over HTTP by [`server`]

pub mod boundaries;
pub mod charts;
pub mod colortables;
pub mod config;
#[cfg(feature = "netcdf")]
pub mod data_loader;
pub mod error;
pub mod geography;
pub mod grid;
pub mod handlers;
pub mod interpolation;
pub mod logging;
pub mod mask;
pub mod render;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{BjerknesError, Result};
pub use logging::{
    create_http_trace_layer, generate_request_id, init_tracing, log_error, log_operation_end,
    log_operation_start, log_request_error, log_timed_operation,
};
pub use server::create_router;
pub use state::{AppState, AttributeValue, Dataset, Dimension, GridSelector, Metadata, Variable};
