//! Module for handling analytic surfaces
//!
//! This module contains the [`SurfacePrimitive`] trait implemented by every concrete surface kind, and the closed
//! set of kinds ([`SurfaceType`]) the compact surface store is able to dispatch on.
//!
//! Every surface is the zero set of an implicit function `f`. The "inside" of a surface is where `f < 0`, the
//! "outside" where `f > 0`; the outward normal is the normalized gradient of `f`.

mod cone_aligned;
mod cyl_aligned;
mod cyl_centered;
mod general_quadric;
mod plane;
mod plane_aligned;
mod quadratic;
mod simple_quadric;
mod sphere;
mod sphere_centered;
pub mod surfaces;

pub use cone_aligned::{ConeAligned, ConeX, ConeY, ConeZ};
pub use cyl_aligned::{CylAligned, CylX, CylY, CylZ};
pub use cyl_centered::{CCylX, CCylY, CCylZ, CylCentered};
pub use general_quadric::GeneralQuadric;
pub use plane::Plane;
pub use plane_aligned::{PlaneAligned, PlaneX, PlaneY, PlaneZ};
pub use simple_quadric::SimpleQuadric;
pub use sphere::Sphere;
pub use sphere_centered::SphereCentered;
pub use surfaces::{SurfaceAction, SurfaceData, Surfaces};

use crate::{
    config::Tolerance,
    types::{Axis, SignedSense, SurfaceState},
};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use strum::{Display, EnumIter, EnumString};

/// Distance returned for "this surface cannot be reached".
#[must_use]
pub const fn no_intersection() -> f64 {
    f64::MAX
}

/// The closed set of surface kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    /// plane perpendicular to the x axis
    Px,
    /// plane perpendicular to the y axis
    Py,
    /// plane perpendicular to the z axis
    Pz,
    /// cylinder along the x axis through the origin
    Cxc,
    /// cylinder along the y axis through the origin
    Cyc,
    /// cylinder along the z axis through the origin
    Czc,
    /// sphere centered at the origin
    Sc,
    /// cylinder parallel to the x axis
    Cx,
    /// cylinder parallel to the y axis
    Cy,
    /// cylinder parallel to the z axis
    Cz,
    /// general plane
    P,
    /// sphere
    S,
    /// cone with its axis parallel to x
    Kx,
    /// cone with its axis parallel to y
    Ky,
    /// cone with its axis parallel to z
    Kz,
    /// quadric without cross terms
    Sq,
    /// general quadric
    Gq,
}
impl SurfaceType {
    /// Number of real coefficients stored for a surface of this kind.
    #[must_use]
    pub const fn num_reals(self) -> usize {
        match self {
            Self::Px | Self::Py | Self::Pz | Self::Cxc | Self::Cyc | Self::Czc | Self::Sc => 1,
            Self::Cx | Self::Cy | Self::Cz => 3,
            Self::P | Self::S | Self::Kx | Self::Ky | Self::Kz => 4,
            Self::Sq => 7,
            Self::Gq => 10,
        }
    }
    /// Maximum number of intersections of a straight line with a surface of this kind.
    #[must_use]
    pub const fn num_intersections(self) -> usize {
        match self {
            Self::Px | Self::Py | Self::Pz | Self::P => 1,
            _ => 2,
        }
    }
}

/// Compile-time axis selector for the axis-aligned surface kinds.
pub trait AxisTag: Copy + Default + Debug + PartialEq + Send + Sync + 'static {
    /// The selected axis.
    const AXIS: Axis;
}
/// Selects the x axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XAxis;
/// Selects the y axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YAxis;
/// Selects the z axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZAxis;
impl AxisTag for XAxis {
    const AXIS: Axis = Axis::X;
}
impl AxisTag for YAxis {
    const AXIS: Axis = Axis::Y;
}
impl AxisTag for ZAxis {
    const AXIS: Axis = Axis::Z;
}

/// Trait for handling analytic surfaces.
///
/// A surface kind such as [`PlaneX`] or [`Sphere`] has to implement this trait in order to be stored in
/// [`SurfaceData`] and used for navigation. All functions are pure and never allocate.
pub trait SurfacePrimitive: Copy + Debug {
    /// Kind tag of this surface.
    const SURFACE_TYPE: SurfaceType;
    /// Fixed-size list of intersection distances. Unused slots contain [`no_intersection()`].
    type Intersections: AsRef<[f64]>;

    /// Reconstruct the surface from its stored coefficients.
    ///
    /// The slice must have exactly [`SurfaceType::num_reals`] entries.
    fn from_reals(data: &[f64]) -> Self;
    /// Coefficients of the surface as stored in the compact surface table.
    fn reals(&self) -> Vec<f64>;
    /// Value of the implicit surface function at the given position.
    fn calc_value(&self, pos: &Point3<f64>) -> f64;
    /// Characteristic magnitude of the surface function used to scale the "on" tolerance band.
    fn sense_scale(&self) -> f64 {
        1.0
    }
    /// Determine the sense of the position relative to this surface.
    fn calc_sense(&self, pos: &Point3<f64>, tolerance: &Tolerance) -> SignedSense {
        tolerance.classify(self.calc_value(pos), self.sense_scale())
    }
    /// Calculate all possible straight-line intersections with this surface.
    ///
    /// All valid distances are `>= 0`. If `on_surface` is [`SurfaceState::On`] the root at distance zero is
    /// suppressed.
    fn calc_intersections(
        &self,
        pos: &Point3<f64>,
        dir: &Vector3<f64>,
        on_surface: SurfaceState,
    ) -> Self::Intersections;
    /// Calculate the outward unit normal at a position.
    fn calc_normal(&self, pos: &Point3<f64>) -> Vector3<f64>;
}

/// Normalize a gradient. At singular points of a surface (sphere center, cone apex) there is no defined normal
/// and the z axis is returned.
fn normalize_gradient(gradient: Vector3<f64>) -> Vector3<f64> {
    gradient.try_normalize(0.0).unwrap_or_else(Vector3::z)
}
