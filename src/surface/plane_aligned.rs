//! Axis-aligned plane
//!
//! An infinitely large flat surface perpendicular to one of the coordinate axes. The normal points along the
//! positive axis, so points with a larger coordinate than the plane position are "outside".
use super::{no_intersection, AxisTag, SurfacePrimitive, SurfaceType, XAxis, YAxis, ZAxis};
use crate::types::{Axis, SurfaceState};
use nalgebra::{Point3, Vector3};
use std::marker::PhantomData;

/// Axis-aligned plane with positive-facing normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneAligned<A: AxisTag> {
    position: f64,
    axis: PhantomData<A>,
}
/// Plane `x = position`.
pub type PlaneX = PlaneAligned<XAxis>;
/// Plane `y = position`.
pub type PlaneY = PlaneAligned<YAxis>;
/// Plane `z = position`.
pub type PlaneZ = PlaneAligned<ZAxis>;

impl<A: AxisTag> PlaneAligned<A> {
    /// Create a new plane intersecting its axis at the given position.
    #[must_use]
    pub const fn new(position: f64) -> Self {
        Self {
            position,
            axis: PhantomData,
        }
    }
    /// Returns the axis intercept of this plane.
    #[must_use]
    pub const fn position(&self) -> f64 {
        self.position
    }
    const fn index() -> usize {
        A::AXIS.index()
    }
}

impl<A: AxisTag> SurfacePrimitive for PlaneAligned<A> {
    const SURFACE_TYPE: SurfaceType = match A::AXIS {
        Axis::X => SurfaceType::Px,
        Axis::Y => SurfaceType::Py,
        Axis::Z => SurfaceType::Pz,
    };
    type Intersections = [f64; 1];

    fn from_reals(data: &[f64]) -> Self {
        debug_assert_eq!(data.len(), 1);
        Self::new(data[0])
    }
    fn reals(&self) -> Vec<f64> {
        vec![self.position]
    }
    fn calc_value(&self, pos: &Point3<f64>) -> f64 {
        pos[Self::index()] - self.position
    }
    fn sense_scale(&self) -> f64 {
        self.position.abs().max(1.0)
    }
    fn calc_intersections(
        &self,
        pos: &Point3<f64>,
        dir: &Vector3<f64>,
        on_surface: SurfaceState,
    ) -> Self::Intersections {
        let i = Self::index();
        if on_surface == SurfaceState::Off && dir[i] != 0.0 {
            let dist = (self.position - pos[i]) / dir[i];
            if dist > 0.0 {
                return [dist];
            }
        }
        [no_intersection()]
    }
    fn calc_normal(&self, _pos: &Point3<f64>) -> Vector3<f64> {
        let mut normal = Vector3::zeros();
        normal[Self::index()] = 1.0;
        normal
    }
}
