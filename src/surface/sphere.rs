//! Spherical surface
//!
//! This module implements a sphere with a given center and radius.
use super::{
    normalize_gradient, quadratic::calc_quadric_intersections, SurfacePrimitive, SurfaceType,
};
use crate::types::SurfaceState;
use nalgebra::{Point3, Vector3};

/// A sphere with an arbitrary center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    origin: Point3<f64>,
    radius_sq: f64,
}
impl Sphere {
    /// Create a new [`Sphere`] from its center and radius.
    #[must_use]
    pub fn new(origin: Point3<f64>, radius: f64) -> Self {
        Self {
            origin,
            radius_sq: radius * radius,
        }
    }
    /// Returns the center of this [`Sphere`].
    #[must_use]
    pub const fn origin(&self) -> Point3<f64> {
        self.origin
    }
    /// Returns the squared radius of this [`Sphere`].
    #[must_use]
    pub const fn radius_sq(&self) -> f64 {
        self.radius_sq
    }
}
impl SurfacePrimitive for Sphere {
    const SURFACE_TYPE: SurfaceType = SurfaceType::S;
    type Intersections = [f64; 2];

    fn from_reals(data: &[f64]) -> Self {
        debug_assert_eq!(data.len(), 4);
        Self {
            origin: Point3::new(data[0], data[1], data[2]),
            radius_sq: data[3],
        }
    }
    fn reals(&self) -> Vec<f64> {
        vec![self.origin.x, self.origin.y, self.origin.z, self.radius_sq]
    }
    fn calc_value(&self, pos: &Point3<f64>) -> f64 {
        (pos - self.origin).norm_squared() - self.radius_sq
    }
    fn sense_scale(&self) -> f64 {
        self.radius_sq
    }
    fn calc_intersections(
        &self,
        pos: &Point3<f64>,
        dir: &Vector3<f64>,
        on_surface: SurfaceState,
    ) -> Self::Intersections {
        let rel_pos = pos - self.origin;
        calc_quadric_intersections(
            dir.norm_squared(),
            rel_pos.dot(dir),
            rel_pos.norm_squared() - self.radius_sq,
            on_surface,
        )
    }
    fn calc_normal(&self, pos: &Point3<f64>) -> Vector3<f64> {
        normalize_gradient(pos - self.origin)
    }
}
