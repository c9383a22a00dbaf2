//! Flat surface
//!
//! An infinitely large flat surface with arbitrary orientation, described by its unit normal `n` and its
//! displacement `d` such that `n·x = d` on the surface.
use super::{no_intersection, SurfacePrimitive, SurfaceType};
use crate::{
    error::{CsgError, CsgResult},
    types::SurfaceState,
};
use nalgebra::{Point3, Vector3};

/// An infinitely large flat surface with arbitrary orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vector3<f64>,
    displacement: f64,
}
impl Plane {
    /// Create a new [`Plane`] through the given point. The normal vector is normalized and points "outside".
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the normal vector has zero length or is not finite.
    ///   - the point is not finite.
    pub fn new(normal: Vector3<f64>, point: Point3<f64>) -> CsgResult<Self> {
        if normal.iter().any(|c| !c.is_finite()) {
            return Err(CsgError::Surface("plane normal must be finite".into()));
        }
        if point.iter().any(|c| !c.is_finite()) {
            return Err(CsgError::Surface("plane point must be finite".into()));
        }
        let Some(normal) = normal.try_normalize(0.0) else {
            return Err(CsgError::Surface("plane normal must not be zero".into()));
        };
        Ok(Self {
            normal,
            displacement: normal.dot(&point.coords),
        })
    }
    /// Returns the unit normal of this [`Plane`].
    #[must_use]
    pub const fn normal(&self) -> Vector3<f64> {
        self.normal
    }
    /// Returns the displacement of this [`Plane`] along its normal.
    #[must_use]
    pub const fn displacement(&self) -> f64 {
        self.displacement
    }
}

impl SurfacePrimitive for Plane {
    const SURFACE_TYPE: SurfaceType = SurfaceType::P;
    type Intersections = [f64; 1];

    fn from_reals(data: &[f64]) -> Self {
        debug_assert_eq!(data.len(), 4);
        Self {
            normal: Vector3::new(data[0], data[1], data[2]),
            displacement: data[3],
        }
    }
    fn reals(&self) -> Vec<f64> {
        vec![self.normal.x, self.normal.y, self.normal.z, self.displacement]
    }
    fn calc_value(&self, pos: &Point3<f64>) -> f64 {
        self.normal.dot(&pos.coords) - self.displacement
    }
    fn sense_scale(&self) -> f64 {
        self.displacement.abs().max(1.0)
    }
    fn calc_intersections(
        &self,
        pos: &Point3<f64>,
        dir: &Vector3<f64>,
        on_surface: SurfaceState,
    ) -> Self::Intersections {
        let n_dir = self.normal.dot(dir);
        if on_surface == SurfaceState::Off && n_dir != 0.0 {
            let dist = -self.calc_value(pos) / n_dir;
            if dist > 0.0 {
                return [dist];
            }
        }
        [no_intersection()]
    }
    fn calc_normal(&self, _pos: &Point3<f64>) -> Vector3<f64> {
        self.normal
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{config::Tolerance, types::SignedSense};
    use approx::assert_relative_eq;

    #[test]
    fn new() {
        assert!(Plane::new(Vector3::zeros(), Point3::origin()).is_err());
        assert!(Plane::new(Vector3::new(f64::NAN, 0.0, 1.0), Point3::origin()).is_err());
        assert!(Plane::new(Vector3::z(), Point3::new(0.0, f64::INFINITY, 0.0)).is_err());
        let p = Plane::new(Vector3::new(0.0, 0.0, 2.0), Point3::new(1.0, 1.0, 3.0)).unwrap();
        assert_eq!(p.normal(), Vector3::z());
        assert_eq!(p.displacement(), 3.0);
        assert_eq!(Plane::from_reals(&p.reals()), p);
    }
    #[test]
    fn sense() {
        let tol = Tolerance::default();
        let p = Plane::new(Vector3::new(1.0, 1.0, 0.0), Point3::origin()).unwrap();
        assert_eq!(p.calc_sense(&Point3::new(1.0, 0.0, 0.0), &tol), SignedSense::Outside);
        assert_eq!(p.calc_sense(&Point3::new(-1.0, -1.0, 5.0), &tol), SignedSense::Inside);
        assert_eq!(p.calc_sense(&Point3::new(1.0, -1.0, 5.0), &tol), SignedSense::On);
    }
    #[test]
    fn intersect() {
        let p = Plane::new(Vector3::new(1.0, 1.0, 0.0), Point3::new(1.0, 1.0, 0.0)).unwrap();
        let d = p.calc_intersections(&Point3::origin(), &Vector3::x(), SurfaceState::Off);
        assert_relative_eq!(d[0], 2.0, max_relative = 1e-12);
        let d = p.calc_intersections(&Point3::origin(), &-Vector3::x(), SurfaceState::Off);
        assert_eq!(d, [no_intersection()]);
        let d = p.calc_intersections(&Point3::origin(), &Vector3::z(), SurfaceState::Off);
        assert_eq!(d, [no_intersection()]);
        let d = p.calc_intersections(&Point3::new(2.0, 0.0, 0.0), &-Vector3::x(), SurfaceState::On);
        assert_eq!(d, [no_intersection()]);
    }
    #[test]
    fn normal() {
        let p = Plane::new(Vector3::new(0.0, -3.0, 0.0), Point3::origin()).unwrap();
        assert_eq!(p.calc_normal(&Point3::new(1.0, 2.0, 3.0)), -Vector3::y());
    }
}
