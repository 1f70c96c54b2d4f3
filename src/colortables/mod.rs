//! Named color tables for meteorological fields.
//!
//! A table maps data values to colors, either through discrete bins
//! (`levels` plus one color per bin and optional under/over colors), a
//! piecewise-linear ramp, or integer classes. Tables are looked up by name
//! through the process-wide [`ColorTableRegistry`].

pub mod airquality;
pub mod color;
pub mod cpt;
pub mod landuse;
pub mod nws;
pub mod nws2018;
pub mod presets;
pub mod registry;
pub mod table;
pub mod terrain;

pub use color::Rgba;
pub use cpt::{load_cpt, parse_cpt};
pub use registry::{get_color_table, registry, ColorTableRegistry, TableInfo};
pub use table::{arange, linspace, Bin, Category, ColorTable, Extend, Scale, TableKind};
