//! Cylinders parallel to a coordinate axis.
use super::{
    normalize_gradient, quadratic::calc_quadric_intersections, AxisTag, SurfacePrimitive,
    SurfaceType, XAxis, YAxis, ZAxis,
};
use crate::types::{Axis, SurfaceState};
use nalgebra::{Point3, Vector3};
use std::marker::PhantomData;

/// Infinite cylinder parallel to a coordinate axis with an arbitrary center line.
///
/// The center is given by the two coordinates perpendicular to the axis, e.g. `(y, z)` for [`CylX`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylAligned<A: AxisTag> {
    center_u: f64,
    center_v: f64,
    radius_sq: f64,
    axis: PhantomData<A>,
}
/// Cylinder parallel to the x axis.
pub type CylX = CylAligned<XAxis>;
/// Cylinder parallel to the y axis.
pub type CylY = CylAligned<YAxis>;
/// Cylinder parallel to the z axis.
pub type CylZ = CylAligned<ZAxis>;

impl<A: AxisTag> CylAligned<A> {
    /// Create a new cylinder through the given point with the given radius.
    ///
    /// The coordinate of `origin` along the cylinder axis is ignored.
    #[must_use]
    pub fn new(origin: Point3<f64>, radius: f64) -> Self {
        let (u, v) = A::AXIS.perpendicular();
        Self {
            center_u: origin[u.index()],
            center_v: origin[v.index()],
            radius_sq: radius * radius,
            axis: PhantomData,
        }
    }
    /// Returns the squared radius.
    #[must_use]
    pub const fn radius_sq(&self) -> f64 {
        self.radius_sq
    }
    fn relative(&self, pos: &Point3<f64>) -> (f64, f64) {
        let (u, v) = A::AXIS.perpendicular();
        (pos[u.index()] - self.center_u, pos[v.index()] - self.center_v)
    }
}

impl<A: AxisTag> SurfacePrimitive for CylAligned<A> {
    const SURFACE_TYPE: SurfaceType = match A::AXIS {
        Axis::X => SurfaceType::Cx,
        Axis::Y => SurfaceType::Cy,
        Axis::Z => SurfaceType::Cz,
    };
    type Intersections = [f64; 2];

    fn from_reals(data: &[f64]) -> Self {
        debug_assert_eq!(data.len(), 3);
        Self {
            center_u: data[0],
            center_v: data[1],
            radius_sq: data[2],
            axis: PhantomData,
        }
    }
    fn reals(&self) -> Vec<f64> {
        vec![self.center_u, self.center_v, self.radius_sq]
    }
    fn calc_value(&self, pos: &Point3<f64>) -> f64 {
        let (u, v) = self.relative(pos);
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
        let (u_axis, v_axis) = A::AXIS.perpendicular();
        let (u, v) = self.relative(pos);
        let (du, dv) = (dir[u_axis.index()], dir[v_axis.index()]);
        let a = du.mul_add(du, dv * dv);
        let half_b = du.mul_add(u, dv * v);
        calc_quadric_intersections(a, half_b, self.calc_value(pos), on_surface)
    }
    fn calc_normal(&self, pos: &Point3<f64>) -> Vector3<f64> {
        let (u_axis, v_axis) = A::AXIS.perpendicular();
        let (u, v) = self.relative(pos);
        let mut normal = Vector3::zeros();
        normal[u_axis.index()] = u;
        normal[v_axis.index()] = v;
        normalize_gradient(normal)
    }
}
