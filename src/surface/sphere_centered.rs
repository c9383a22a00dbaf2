//! Sphere centered at the origin.
use super::{
    normalize_gradient, quadratic::calc_quadric_intersections, SurfacePrimitive, SurfaceType,
};
use crate::types::SurfaceState;
use nalgebra::{Point3, Vector3};

/// Sphere centered at the coordinate origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCentered {
    radius_sq: f64,
}
impl SphereCentered {
    /// Create a new origin-centered sphere with the given radius.
    #[must_use]
    pub fn new(radius: f64) -> Self {
        Self {
            radius_sq: radius * radius,
        }
    }
    /// Returns the squared radius.
    #[must_use]
    pub const fn radius_sq(&self) -> f64 {
        self.radius_sq
    }
}
impl SurfacePrimitive for SphereCentered {
    const SURFACE_TYPE: SurfaceType = SurfaceType::Sc;
    type Intersections = [f64; 2];

    fn from_reals(data: &[f64]) -> Self {
        debug_assert_eq!(data.len(), 1);
        Self { radius_sq: data[0] }
    }
    fn reals(&self) -> Vec<f64> {
        vec![self.radius_sq]
    }
    fn calc_value(&self, pos: &Point3<f64>) -> f64 {
        pos.coords.norm_squared() - self.radius_sq
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
        calc_quadric_intersections(
            dir.norm_squared(),
            pos.coords.dot(dir),
            self.calc_value(pos),
            on_surface,
        )
    }
    fn calc_normal(&self, pos: &Point3<f64>) -> Vector3<f64> {
        normalize_gradient(pos.coords)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{config::Tolerance, surface::no_intersection, types::SignedSense};
    use approx::assert_relative_eq;

    #[test]
    fn sense() {
        let tol = Tolerance::default();
        let s = SphereCentered::new(3.0);
        assert_eq!(s.calc_sense(&Point3::new(1.0, 1.0, 1.0), &tol), SignedSense::Inside);
        assert_eq!(s.calc_sense(&Point3::new(0.0, 3.0, 0.0), &tol), SignedSense::On);
        assert_eq!(s.calc_sense(&Point3::new(3.0, 3.0, 0.0), &tol), SignedSense::Outside);
    }
    #[test]
    fn intersect() {
        let s = SphereCentered::new(2.0);
        let d = s.calc_intersections(&Point3::new(-5.0, 0.0, 0.0), &Vector3::x(), SurfaceState::Off);
        assert_relative_eq!(d[0], 3.0);
        assert_relative_eq!(d[1], 7.0);
        let d = s.calc_intersections(&Point3::origin(), &Vector3::z(), SurfaceState::Off);
        assert_eq!(d[0], no_intersection());
        assert_relative_eq!(d[1], 2.0);
    }
    #[test]
    fn zero_radius() {
        let s = SphereCentered::new(0.0);
        let d = s.calc_intersections(&Point3::new(-5.0, 0.0, 0.0), &Vector3::x(), SurfaceState::Off);
        assert_eq!(d, [no_intersection(); 2]);
        let d = s.calc_intersections(&Point3::origin(), &Vector3::x(), SurfaceState::Off);
        assert_eq!(d, [no_intersection(); 2]);
    }
    #[test]
    fn normal() {
        let s = SphereCentered::new(2.0);
        assert_relative_eq!(s.calc_normal(&Point3::new(0.0, 0.0, -2.0)), -Vector3::z());
    }
}
