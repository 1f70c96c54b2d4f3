//! Figure rendering.
//!
//! A [`Canvas`] is an owned raster figure. Layers are added with
//! `fill_grid`, `contour`, `wind_barbs`, `add_boundaries`, `gridlines` and
//! `colorbar`, in painting order, and the result is encoded to PNG or JPEG.

pub mod barbs;
pub mod canvas;
pub mod colorbar;
pub mod contour;
pub mod encode;
pub mod gridlines;
pub mod raster;
pub mod view;

pub use barbs::{BarbElements, BarbStyle};
pub use canvas::Canvas;
pub use colorbar::colorbar_image;
pub use contour::{contour_levels, ContourStyle};
pub use encode::{encode_image, OutputFormat};
pub use view::MapView;
