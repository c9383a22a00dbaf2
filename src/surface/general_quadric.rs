//! General quadric surface.
use super::{
    normalize_gradient, quadratic::calc_quadric_intersections, SurfacePrimitive, SurfaceType,
};
use crate::types::SurfaceState;
use nalgebra::{Point3, Vector3};

/// Quadric `a x² + b y² + c z² + d xy + e yz + f zx + g x + h y + i z + j = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralQuadric {
    second: Vector3<f64>,
    cross: Vector3<f64>,
    first: Vector3<f64>,
    zeroth: f64,
}
impl GeneralQuadric {
    /// Create a new [`GeneralQuadric`] from the coefficients of the square terms `(a, b, c)`, the cross terms
    /// `(d, e, f)` for `(xy, yz, zx)`, the linear terms `(g, h, i)` and the constant `j`.
    #[must_use]
    pub const fn new(
        second: Vector3<f64>,
        cross: Vector3<f64>,
        first: Vector3<f64>,
        zeroth: f64,
    ) -> Self {
        Self {
            second,
            cross,
            first,
            zeroth,
        }
    }
    /// Value of the quadratic part of the surface function for the given vector.
    fn quadratic_form(&self, v: &Vector3<f64>) -> f64 {
        self.second.dot(&v.component_mul(v))
            + self.cross.x * v.x * v.y
            + self.cross.y * v.y * v.z
            + self.cross.z * v.z * v.x
    }
    fn gradient(&self, pos: &Point3<f64>) -> Vector3<f64> {
        let (x, y, z) = (pos.x, pos.y, pos.z);
        let (d, e, f) = (self.cross.x, self.cross.y, self.cross.z);
        Vector3::new(
            2.0 * self.second.x * x + d * y + f * z,
            2.0 * self.second.y * y + d * x + e * z,
            2.0 * self.second.z * z + e * y + f * x,
        ) + self.first
    }
}

impl SurfacePrimitive for GeneralQuadric {
    const SURFACE_TYPE: SurfaceType = SurfaceType::Gq;
    type Intersections = [f64; 2];

    fn from_reals(data: &[f64]) -> Self {
        debug_assert_eq!(data.len(), 10);
        Self {
            second: Vector3::new(data[0], data[1], data[2]),
            cross: Vector3::new(data[3], data[4], data[5]),
            first: Vector3::new(data[6], data[7], data[8]),
            zeroth: data[9],
        }
    }
    fn reals(&self) -> Vec<f64> {
        self.second
            .iter()
            .chain(self.cross.iter())
            .chain(self.first.iter())
            .copied()
            .chain(std::iter::once(self.zeroth))
            .collect()
    }
    fn calc_value(&self, pos: &Point3<f64>) -> f64 {
        self.quadratic_form(&pos.coords) + self.first.dot(&pos.coords) + self.zeroth
    }
    fn sense_scale(&self) -> f64 {
        self.zeroth.abs().max(1.0)
    }
    fn calc_intersections(
        &self,
        pos: &Point3<f64>,
        dir: &Vector3<f64>,
        on_surface: SurfaceState,
    ) -> Self::Intersections {
        let a = self.quadratic_form(dir);
        let half_b = 0.5 * self.gradient(pos).dot(dir);
        calc_quadric_intersections(a, half_b, self.calc_value(pos), on_surface)
    }
    fn calc_normal(&self, pos: &Point3<f64>) -> Vector3<f64> {
        normalize_gradient(self.gradient(pos))
    }
}
