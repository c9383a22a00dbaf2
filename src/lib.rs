//! This is the documentation for the **csgeo** package: a surface based constructive solid geometry (CSG) engine
//! for particle transport.
//!
//! A geometry consists of analytic surfaces and of volumes, each given by a list of bounding surfaces (its faces) and
//! a postfix logic expression over the senses of the faces. Geometries are assembled with a
//! [`GeoBuilder`](construct::GeoBuilder) and frozen into an immutable [`GeoParams`](geo_params::GeoParams), which any
//! number of [`Navigator`](navigator::Navigator)s query concurrently: which volume contains a point, how far is the
//! next boundary along a ray, and which volume lies behind it.
#![allow(clippy::module_name_repetitions)]

pub mod collection;
pub mod config;
pub mod console;
pub mod construct;
pub mod error;
pub mod geo_params;
pub mod intersect;
pub mod logic;
pub mod navigator;
pub mod opaque_id;
pub mod propagator;
pub mod raster;
pub mod sense_calculator;
pub mod surface;
pub mod testgeo;
pub mod types;
pub mod utils;
pub mod volume;

pub use construct::GeoBuilder;
pub use geo_params::GeoParams;
pub use navigator::Navigator;

/// Return the version information of the currently built csgeo library.
#[must_use]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_owned()
}
