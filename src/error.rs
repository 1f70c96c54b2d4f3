//! Error types for bjerknes.
//!
//! Every fallible operation in the crate returns [`BjerknesError`]. Chart
//! generation has no partial-success state: the first failure propagates to
//! the caller.

use thiserror::Error;

/// The main error type for bjerknes operations.
#[derive(Error, Debug)]
pub enum BjerknesError {
    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Array shape errors
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Shapefile reading errors
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// Image encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// Lookup of a color table name that is not registered
    #[error("Unknown color table: {name}")]
    UnknownColorTable { name: String },

    /// A color table whose breaks and colors do not line up
    #[error("Invalid color table {name}: {message}")]
    InvalidColorTable { name: String, message: String },

    /// Geometry errors (malformed shapes, mismatched grids)
    #[error("Geometry error: {message}")]
    Geometry { message: String },

    /// Map extent and projection errors
    #[error("Projection error: {message}")]
    Projection { message: String },

    /// Interpolation errors
    #[error("Interpolation error: {message}")]
    Interpolation { message: String },

    /// Rendering errors
    #[error("Render error: {message}")]
    Render { message: String },

    /// Server errors
    #[error("Server error: {message}")]
    Server { message: String },
}

impl BjerknesError {
    /// Whether the error was caused by the caller's input rather than by
    /// missing data or an internal failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BjerknesError::InvalidParameter { .. }
                | BjerknesError::UnknownColorTable { .. }
                | BjerknesError::Projection { .. }
                | BjerknesError::Geometry { .. }
        )
    }
}

/// Convenience type alias for Results with BjerknesError
pub type Result<T> = std::result::Result<T, BjerknesError>;
