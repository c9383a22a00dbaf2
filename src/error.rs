#![warn(missing_docs)]
//! csgeo specific error structures
use thiserror::Error;

/// csgeo specific Result type
pub type CsgResult<T> = std::result::Result<T, CsgError>;

/// Errors that can be returned by various csgeo functions.
///
/// All of these are construction- or setup-time errors. Queries during transport never fail: numerical
/// degeneracies are reported as sentinel values and points outside the world as an invalid
/// [`VolumeId`](crate::types::VolumeId).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsgError {
    /// invalid surface definition (wrong number of coefficients, non-finite values, ...)
    #[error("Surface:{0}")]
    Surface(String),
    /// invalid volume definition (bad face references, duplicated faces, ...)
    #[error("Volume:{0}")]
    Volume(String),
    /// malformed postfix logic expression of a volume
    #[error("Logic:{0}")]
    Logic(String),
    /// errors while freezing the complete geometry
    #[error("Geometry:{0}")]
    Geometry(String),
    /// invalid configuration values
    #[error("Config:{0}")]
    Config(String),
    /// errors while rasterizing a geometry
    #[error("Raster:{0}")]
    Raster(String),
    /// errors console io
    #[error("Console:{0}")]
    Console(String),
    /// errors not falling in one of the categories above
    #[error("Csg Error:Other:{0}")]
    Other(String),
}

impl std::convert::From<String> for CsgError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
