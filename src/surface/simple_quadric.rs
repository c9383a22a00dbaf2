//! Axis-aligned quadric surfaces without cross terms.
use super::{
    normalize_gradient, quadratic::calc_quadric_intersections, SurfacePrimitive, SurfaceType,
};
use crate::types::SurfaceState;
use nalgebra::{Point3, Vector3};

/// Quadric `a x² + b y² + c z² + d x + e y + f z + g = 0`.
///
/// This covers ellipsoids, elliptical cylinders and hyperboloids whose principal axes are parallel to the coordinate
/// axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleQuadric {
    second: Vector3<f64>,
    first: Vector3<f64>,
    zeroth: f64,
}
impl SimpleQuadric {
    /// Create a new [`SimpleQuadric`] from its second order `(a, b, c)`, first order `(d, e, f)` and constant `g`
    /// coefficients.
    #[must_use]
    pub const fn new(second: Vector3<f64>, first: Vector3<f64>, zeroth: f64) -> Self {
        Self {
            second,
            first,
            zeroth,
        }
    }
    /// Create an ellipsoid with the given center and semi-axes.
    #[must_use]
    pub fn ellipsoid(origin: Point3<f64>, radii: Vector3<f64>) -> Self {
        let second = radii.map(|r| 1.0 / (r * r));
        let first = -2.0 * second.component_mul(&origin.coords);
        let zeroth = second.dot(&origin.coords.component_mul(&origin.coords)) - 1.0;
        Self::new(second, first, zeroth)
    }
    fn gradient(&self, pos: &Point3<f64>) -> Vector3<f64> {
        2.0 * self.second.component_mul(&pos.coords) + self.first
    }
}

impl SurfacePrimitive for SimpleQuadric {
    const SURFACE_TYPE: SurfaceType = SurfaceType::Sq;
    type Intersections = [f64; 2];

    fn from_reals(data: &[f64]) -> Self {
        debug_assert_eq!(data.len(), 7);
        Self {
            second: Vector3::new(data[0], data[1], data[2]),
            first: Vector3::new(data[3], data[4], data[5]),
            zeroth: data[6],
        }
    }
    fn reals(&self) -> Vec<f64> {
        self.second
            .iter()
            .chain(self.first.iter())
            .copied()
            .chain(std::iter::once(self.zeroth))
            .collect()
    }
    fn calc_value(&self, pos: &Point3<f64>) -> f64 {
        let p = pos.coords;
        self.second.dot(&p.component_mul(&p)) + self.first.dot(&p) + self.zeroth
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
        let a = self.second.dot(&dir.component_mul(dir));
        let half_b = 0.5 * self.gradient(pos).dot(dir);
        calc_quadric_intersections(a, half_b, self.calc_value(pos), on_surface)
    }
    fn calc_normal(&self, pos: &Point3<f64>) -> Vector3<f64> {
        normalize_gradient(self.gradient(pos))
    }
}
