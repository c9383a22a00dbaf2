//! Double cones with the axis parallel to a coordinate axis.
use super::{
    normalize_gradient, quadratic::calc_quadric_intersections, AxisTag, SurfacePrimitive,
    SurfaceType, XAxis, YAxis, ZAxis,
};
use crate::types::{Axis, SurfaceState};
use nalgebra::{Point3, Vector3};
use std::marker::PhantomData;

/// Infinite double cone `(u-u0)² + (v-v0)² = t² (a-a0)²` where `a` is the cone axis and `t` the tangent of the
/// half opening angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeAligned<A: AxisTag> {
    origin: Point3<f64>,
    tangent_sq: f64,
    axis: PhantomData<A>,
}
/// Cone along the x axis.
pub type ConeX = ConeAligned<XAxis>;
/// Cone along the y axis.
pub type ConeY = ConeAligned<YAxis>;
/// Cone along the z axis.
pub type ConeZ = ConeAligned<ZAxis>;

impl<A: AxisTag> ConeAligned<A> {
    /// Create a new cone from its apex and the tangent of its half opening angle.
    #[must_use]
    pub fn new(origin: Point3<f64>, tangent: f64) -> Self {
        Self {
            origin,
            tangent_sq: tangent * tangent,
            axis: PhantomData,
        }
    }
    /// Returns the apex of this cone.
    #[must_use]
    pub const fn origin(&self) -> Point3<f64> {
        self.origin
    }
    /// Returns the squared tangent of the half opening angle.
    #[must_use]
    pub const fn tangent_sq(&self) -> f64 {
        self.tangent_sq
    }
}

impl<A: AxisTag> SurfacePrimitive for ConeAligned<A> {
    const SURFACE_TYPE: SurfaceType = match A::AXIS {
        Axis::X => SurfaceType::Kx,
        Axis::Y => SurfaceType::Ky,
        Axis::Z => SurfaceType::Kz,
    };
    type Intersections = [f64; 2];

    fn from_reals(data: &[f64]) -> Self {
        debug_assert_eq!(data.len(), 4);
        Self {
            origin: Point3::new(data[0], data[1], data[2]),
            tangent_sq: data[3],
            axis: PhantomData,
        }
    }
    fn reals(&self) -> Vec<f64> {
        vec![self.origin.x, self.origin.y, self.origin.z, self.tangent_sq]
    }
    fn calc_value(&self, pos: &Point3<f64>) -> f64 {
        let rel = pos - self.origin;
        let (u, v) = A::AXIS.perpendicular();
        let (u, v, a) = (rel[u.index()], rel[v.index()], rel[A::AXIS.index()]);
        self.tangent_sq.mul_add(-a * a, v.mul_add(v, u * u))
    }
    fn calc_intersections(
        &self,
        pos: &Point3<f64>,
        dir: &Vector3<f64>,
        on_surface: SurfaceState,
    ) -> Self::Intersections {
        let rel = pos - self.origin;
        let mut scaled_dir = *dir;
        scaled_dir[A::AXIS.index()] *= -self.tangent_sq;
        let a = scaled_dir.dot(dir);
        let half_b = scaled_dir.dot(&rel);
        calc_quadric_intersections(a, half_b, self.calc_value(pos), on_surface)
    }
    fn calc_normal(&self, pos: &Point3<f64>) -> Vector3<f64> {
        let mut gradient = pos - self.origin;
        gradient[A::AXIS.index()] *= -self.tangent_sq;
        normalize_gradient(gradient)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{config::Tolerance, types::SignedSense};
    use approx::assert_relative_eq;

    #[test]
    fn construct() {
        let k = ConeY::new(Point3::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(k.reals(), vec![1.0, 2.0, 3.0, 0.25]);
        assert_eq!(ConeY::from_reals(&k.reals()), k);
        assert_eq!(ConeX::SURFACE_TYPE, SurfaceType::Kx);
    }
    #[test]
    fn sense() {
        let tol = Tolerance::default();
        let k = ConeZ::new(Point3::origin(), 1.0);
        assert_eq!(k.calc_sense(&Point3::new(0.5, 0.0, 1.0), &tol), SignedSense::Inside);
        assert_eq!(k.calc_sense(&Point3::new(0.5, 0.0, -1.0), &tol), SignedSense::Inside);
        assert_eq!(k.calc_sense(&Point3::new(1.0, 0.0, 1.0), &tol), SignedSense::On);
        assert_eq!(k.calc_sense(&Point3::new(2.0, 0.0, 1.0), &tol), SignedSense::Outside);
    }
    #[test]
    fn intersect() {
        let k = ConeZ::new(Point3::origin(), 1.0);
        let d = k.calc_intersections(&Point3::new(-3.0, 0.0, 1.0), &Vector3::x(), SurfaceState::Off);
        assert_relative_eq!(d[0], 2.0);
        assert_relative_eq!(d[1], 4.0);
        let k = ConeX::new(Point3::new(1.0, 0.0, 0.0), 0.5);
        let d = k.calc_intersections(&Point3::new(3.0, 0.0, 0.0), &Vector3::y(), SurfaceState::Off);
        assert_relative_eq!(d[1], 1.0);
    }
    #[test]
    fn normal() {
        let k = ConeZ::new(Point3::origin(), 1.0);
        let n = k.calc_normal(&Point3::new(1.0, 0.0, 1.0));
        assert_relative_eq!(n, Vector3::new(1.0, 0.0, -1.0).normalize());
        assert_eq!(k.calc_normal(&Point3::origin()), Vector3::z());
    }
}
