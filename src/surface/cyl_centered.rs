//! Cylinders along a coordinate axis through the origin.
use super::{
    normalize_gradient, quadratic::calc_quadric_intersections, AxisTag, SurfacePrimitive,
    SurfaceType, XAxis, YAxis, ZAxis,
};
use crate::types::{Axis, SurfaceState};
use nalgebra::{Point3, Vector3};
use std::marker::PhantomData;

/// Infinite cylinder whose axis is a coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylCentered<A: AxisTag> {
    radius_sq: f64,
    axis: PhantomData<A>,
}
/// Cylinder around the x axis.
pub type CCylX = CylCentered<XAxis>;
/// Cylinder around the y axis.
pub type CCylY = CylCentered<YAxis>;
/// Cylinder around the z axis.
pub type CCylZ = CylCentered<ZAxis>;

impl<A: AxisTag> CylCentered<A> {
    /// Create a new cylinder with the given radius.
    #[must_use]
    pub fn new(radius: f64) -> Self {
        Self::from_radius_sq(radius * radius)
    }
    /// Create a new cylinder from its squared radius.
    #[must_use]
    pub const fn from_radius_sq(radius_sq: f64) -> Self {
        Self {
            radius_sq,
            axis: PhantomData,
        }
    }
    /// Returns the squared radius.
    #[must_use]
    pub const fn radius_sq(&self) -> f64 {
        self.radius_sq
    }
}

impl<A: AxisTag> SurfacePrimitive for CylCentered<A> {
    const SURFACE_TYPE: SurfaceType = match A::AXIS {
        Axis::X => SurfaceType::Cxc,
        Axis::Y => SurfaceType::Cyc,
        Axis::Z => SurfaceType::Czc,
    };
    type Intersections = [f64; 2];

    fn from_reals(data: &[f64]) -> Self {
        debug_assert_eq!(data.len(), 1);
        Self::from_radius_sq(data[0])
    }
    fn reals(&self) -> Vec<f64> {
        vec![self.radius_sq]
    }
    fn calc_value(&self, pos: &Point3<f64>) -> f64 {
        let (u, v) = A::AXIS.perpendicular();
        let (u, v) = (pos[u.index()], pos[v.index()]);
        v.mul_add(v, u * u) - self.radius_sq
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
        let (u, v) = A::AXIS.perpendicular();
        let (pu, pv) = (pos[u.index()], pos[v.index()]);
        let (du, dv) = (dir[u.index()], dir[v.index()]);
        let a = du.mul_add(du, dv * dv);
        let half_b = du.mul_add(pu, dv * pv);
        calc_quadric_intersections(a, half_b, self.calc_value(pos), on_surface)
    }
    fn calc_normal(&self, pos: &Point3<f64>) -> Vector3<f64> {
        let mut normal = pos.coords;
        normal[A::AXIS.index()] = 0.0;
        normalize_gradient(normal)
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
        let c = CCylZ::new(2.0);
        assert_eq!(c.radius_sq(), 4.0);
        assert_eq!(c.calc_sense(&Point3::new(1.0, 1.0, 100.0), &tol), SignedSense::Inside);
        assert_eq!(c.calc_sense(&Point3::new(2.0, 0.0, -7.0), &tol), SignedSense::On);
        assert_eq!(c.calc_sense(&Point3::new(0.0, 2.5, 0.0), &tol), SignedSense::Outside);
        let c = CCylX::new(2.0);
        assert_eq!(c.calc_sense(&Point3::new(100.0, 1.0, 1.0), &tol), SignedSense::Inside);
    }
    #[test]
    fn intersect() {
        let c = CCylY::new(1.0);
        let d = c.calc_intersections(&Point3::new(-3.0, 5.0, 0.0), &Vector3::x(), SurfaceState::Off);
        assert_relative_eq!(d[0], 2.0);
        assert_relative_eq!(d[1], 4.0);
        let d = c.calc_intersections(&Point3::new(1.0, 0.0, 0.0), &-Vector3::x(), SurfaceState::On);
        assert_relative_eq!(d[0], 2.0);
        assert_eq!(d[1], no_intersection());
    }
    #[test]
    fn intersect_along_axis() {
        let c = CCylZ::new(1.0);
        let d = c.calc_intersections(&Point3::new(0.5, 0.0, 0.0), &Vector3::z(), SurfaceState::Off);
        assert_eq!(d, [no_intersection(); 2]);
    }
    #[test]
    fn normal() {
        let c = CCylZ::new(1.0);
        assert_relative_eq!(c.calc_normal(&Point3::new(0.0, -1.0, 3.0)), -Vector3::y());
    }
}
