//! Straight-line propagation helper
use crate::{navigator::Navigator, surface::no_intersection, types::VolumeId};

/// Result of a single [`LinearPropagator::propagate`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Propagation {
    /// distance travelled, [`no_intersection()`] if the track can travel without limit
    pub distance: f64,
    /// volume after the step, invalid if the track left the modeled world
    pub volume: VolumeId,
    /// true if the track ended the step on a boundary and entered `volume`
    pub boundary: bool,
}

/// Moves a [`Navigator`] either to the next boundary (and across it) or by a limited distance.
pub struct LinearPropagator<'n, 'a> {
    nav: &'n mut Navigator<'a>,
}
impl<'n, 'a> LinearPropagator<'n, 'a> {
    /// Create a propagator for a located navigator.
    pub fn new(nav: &'n mut Navigator<'a>) -> Self {
        Self { nav }
    }
    /// Travel up to `max_distance`.
    ///
    /// If the boundary is reached first, the navigator crosses it into the neighboring volume. The navigator is not
    /// moved if the step is unbounded (no boundary and an infinite limit, or outside of all volumes).
    pub fn propagate(&mut self, max_distance: f64) -> Propagation {
        let step = self.nav.next_step(max_distance);
        if step.is_boundary() {
            self.nav.move_to_boundary();
            let volume = self.nav.cross_boundary();
            return Propagation {
                distance: step.distance,
                volume,
                boundary: true,
            };
        }
        if step.distance < no_intersection() {
            self.nav.move_internal(step.distance);
        }
        Propagation {
            distance: step.distance,
            volume: self.nav.current_volume(),
            boundary: false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testgeo;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn boundary_and_limit() {
        let geo = testgeo::two_volumes(1.5).unwrap();
        let mut nav = Navigator::new(&geo);
        nav.locate(Point3::new(-1.0, 0.0, 0.0), Vector3::x());
        let mut p = LinearPropagator::new(&mut nav);
        let result = p.propagate(1.0);
        assert_eq!(result.distance, 1.0);
        assert_eq!(result.volume, geo.find_volume("inside"));
        assert!(!result.boundary);
        let result = p.propagate(10.0);
        assert_abs_diff_eq!(result.distance, 1.5, epsilon = 1e-12);
        assert_eq!(result.volume, geo.find_volume("outside"));
        assert!(result.boundary);
        let result = p.propagate(no_intersection());
        assert_eq!(result.distance, no_intersection());
        assert!(!result.boundary);
        assert_abs_diff_eq!(nav.pos(), Point3::new(1.5, 0.0, 0.0), epsilon = 1e-12);
    }
    #[test]
    fn leave_world() {
        let geo = testgeo::concentric_spheres(1.0, 2.0).unwrap();
        let mut nav = Navigator::new(&geo);
        nav.locate(Point3::new(0.0, 0.0, 1.5), Vector3::z());
        let result = LinearPropagator::new(&mut nav).propagate(no_intersection());
        assert_abs_diff_eq!(result.distance, 0.5, epsilon = 1e-12);
        assert!(result.boundary);
        assert!(!result.volume.is_valid());
        assert!(nav.is_outside());
        let result = LinearPropagator::new(&mut nav).propagate(1.0);
        assert_eq!(result.distance, no_intersection());
        assert_abs_diff_eq!(nav.pos(), Point3::new(0.0, 0.0, 2.0), epsilon = 1e-12);
    }
}
