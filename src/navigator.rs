//! Track view of a single particle
//!
//! A [`Navigator`] follows one straight-line track through a frozen [`GeoParams`]. It cycles through three states:
//!
//! - [`NavState::Located`]: the current volume is known.
//! - [`NavState::Stepped`]: the distance to the next boundary (or a smaller step limit) has been computed.
//! - [`NavState::Crossed`]: the position has been moved exactly onto the boundary. The crossed surface and the side
//!   of it the track continues on are pinned until [`Navigator::cross_boundary`] finds the neighboring volume.
//!
//! Every navigator owns its scratch storage, so any number of them can share one geometry across threads.
use crate::{
    geo_params::GeoParams,
    intersect::{find_next_boundary, IntersectScratch},
    logic::LogicEvaluator,
    sense_calculator::{sense_from_direction, OnFace, SenseCalculator},
    surface::{no_intersection, surfaces::CalcNormal},
    types::{FaceId, Sense, SurfaceId, UniverseId, VolumeId},
};
use log::warn;
use nalgebra::{Point3, Vector3};

/// Result of [`Navigator::next_step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// distance to travel
    pub distance: f64,
    /// face of the current volume reached after `distance`, invalid if the step ends inside the volume
    pub face: FaceId,
}
impl Step {
    /// Returns true if the step ends on the boundary of the current volume.
    #[must_use]
    pub const fn is_boundary(&self) -> bool {
        self.face.is_valid()
    }
}

/// State of a [`Navigator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavState {
    /// the current volume is known
    Located,
    /// a step has been computed and not yet taken
    Stepped(Step),
    /// the position is on the boundary, the new volume is not determined yet
    Crossed,
}

/// Navigation state of a single track.
#[derive(Debug, Clone)]
pub struct Navigator<'a> {
    geo: &'a GeoParams,
    pos: Point3<f64>,
    dir: Vector3<f64>,
    volume: VolumeId,
    on_face: OnFace,
    pinned: Option<(SurfaceId, Sense)>,
    state: NavState,
    scratch: IntersectScratch,
}
impl<'a> Navigator<'a> {
    /// Create a navigator for the given geometry.
    ///
    /// The navigator is outside of all volumes until [`Navigator::locate`] is called.
    #[must_use]
    pub fn new(geo: &'a GeoParams) -> Self {
        Self {
            geo,
            pos: Point3::origin(),
            dir: Vector3::z(),
            volume: VolumeId::invalid(),
            on_face: OnFace::none(),
            pinned: None,
            state: NavState::Located,
            scratch: IntersectScratch::new(geo.max_faces(), geo.max_intersections()),
        }
    }
    /// Find the volume containing `pos`.
    ///
    /// Volumes are tried in id order and the first one claiming the point wins. A point exactly on a face is
    /// assigned to the side `dir` is heading to. If the navigator has just been moved onto a boundary (see
    /// [`Navigator::move_to_boundary`]) and is asked to locate the very same position and direction, this is the
    /// same as [`Navigator::cross_boundary`].
    ///
    /// Returns the invalid [`VolumeId`] if no volume claims the point.
    pub fn locate(&mut self, pos: Point3<f64>, dir: Vector3<f64>) -> VolumeId {
        if self.state == NavState::Crossed && pos == self.pos && dir == self.dir {
            return self.cross_boundary();
        }
        self.pos = pos;
        self.dir = dir;
        self.pinned = None;
        let geo = self.geo;
        let found = find_volume(
            geo,
            geo.universe_volumes(UniverseId::new(0)).iter(),
            &self.pos,
            &self.dir,
            None,
            self.scratch.senses_mut(),
        );
        self.set_location(found);
        self.volume
    }
    /// Compute the next step, limited to `max_distance`.
    ///
    /// The returned face is only valid if the boundary of the current volume is reached within `max_distance`.
    /// Outside of all volumes the step is infinite ([`no_intersection()`]). If the track sits on a face of the
    /// current volume but now heads back across it (e.g. after [`Navigator::set_dir`]), a zero length step onto
    /// that face is returned.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if called right after [`Navigator::move_to_boundary`] or with a non-positive limit.
    pub fn next_step(&mut self, max_distance: f64) -> Step {
        debug_assert!(max_distance > 0.0, "step limit must be positive");
        debug_assert!(
            self.state != NavState::Crossed,
            "boundary must be crossed before the next step"
        );
        let step = if self.is_outside() {
            Step {
                distance: no_intersection(),
                face: FaceId::invalid(),
            }
        } else if self.heads_back() && self.leaves_by_turning() {
            Step {
                distance: 0.0,
                face: self.on_face.id(),
            }
        } else {
            let geo = self.geo;
            let view = geo.volumes().get(self.volume);
            let hit = find_next_boundary(
                geo.surfaces(),
                &view,
                &self.pos,
                &self.dir,
                self.on_face,
                geo.config(),
                &mut self.scratch,
            );
            if hit.is_valid() && hit.distance <= max_distance {
                Step {
                    distance: hit.distance,
                    face: hit.face,
                }
            } else {
                Step {
                    distance: max_distance,
                    face: FaceId::invalid(),
                }
            }
        };
        self.state = NavState::Stepped(step);
        step
    }
    /// Move exactly onto the boundary found by the last [`Navigator::next_step`].
    ///
    /// The crossed surface is pinned together with the side the track continues on.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the last step does not end on a boundary.
    pub fn move_to_boundary(&mut self) {
        debug_assert!(
            matches!(self.state, NavState::Stepped(step) if step.is_boundary()),
            "no boundary to move to"
        );
        let NavState::Stepped(step) = self.state else {
            return;
        };
        if !step.is_boundary() {
            return;
        }
        self.pos += step.distance * self.dir;
        let surface = self.geo.volumes().get(self.volume).get_surface(step.face);
        let normal = self
            .geo
            .surfaces()
            .apply(surface, &mut CalcNormal::new(&self.pos));
        let sense = sense_from_direction(&normal, &self.dir);
        self.pinned = Some((surface, sense));
        self.on_face = OnFace::new(step.face, sense);
        self.state = NavState::Crossed;
    }
    /// Determine the volume on the other side of the boundary reached by [`Navigator::move_to_boundary`].
    ///
    /// Only the volumes bounded by the crossed surface are evaluated, with the sense of the crossed surface taken
    /// from the pinned value. If none of them claims the point, all volumes are searched. Returns the new volume,
    /// invalid if the track left the modeled world.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the navigator is not on a boundary.
    pub fn cross_boundary(&mut self) -> VolumeId {
        debug_assert!(self.state == NavState::Crossed, "not on a boundary");
        let Some((surface, _)) = self.pinned else {
            return self.volume;
        };
        let geo = self.geo;
        let current = self.volume;
        let (pos, dir, pinned) = (self.pos, self.dir, self.pinned);
        let senses = self.scratch.senses_mut();
        let neighbors = geo.connectivity().volumes(surface);
        let mut found = find_volume(
            geo,
            neighbors.iter().copied().filter(|v| *v != current),
            &pos,
            &dir,
            pinned,
            senses,
        );
        if found.is_none() && neighbors.iter().any(|v| *v != current) {
            warn!(
                "no volume connected to surface '{}' claims the point after crossing, searching all volumes",
                geo.surface_label(surface)
            );
            found = find_volume(
                geo,
                geo.universe_volumes(UniverseId::new(0)).iter(),
                &pos,
                &dir,
                pinned,
                senses,
            );
        }
        self.set_location(found);
        self.volume
    }
    /// Move by `distance` along the current direction without leaving the current volume.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the move would reach or pass the boundary found by the last step.
    pub fn move_internal(&mut self, distance: f64) {
        debug_assert!(distance >= 0.0, "negative move");
        debug_assert!(self.state != NavState::Crossed, "cannot move along a boundary crossing");
        if let NavState::Stepped(step) = self.state {
            debug_assert!(
                if step.is_boundary() {
                    distance < step.distance
                } else {
                    distance <= step.distance
                },
                "internal move of {distance} beyond the step of {}",
                step.distance
            );
        }
        self.pos += distance * self.dir;
        self.on_face = OnFace::none();
        self.pinned = None;
        self.state = NavState::Located;
    }
    /// Change the direction of the track.
    ///
    /// A pending step is discarded.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the boundary has not been crossed yet.
    pub fn set_dir(&mut self, dir: Vector3<f64>) {
        debug_assert!(self.state != NavState::Crossed, "boundary must be crossed first");
        self.dir = dir;
        if matches!(self.state, NavState::Stepped(_)) {
            self.state = NavState::Located;
        }
    }
    /// Outward normal of the surface the track is on, `None` if not on a surface.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.pinned.map(|(surface, _)| {
            self.geo
                .surfaces()
                .apply(surface, &mut CalcNormal::new(&self.pos))
        })
    }
    /// The current volume, invalid if outside the modeled world.
    #[must_use]
    pub const fn current_volume(&self) -> VolumeId {
        self.volume
    }
    /// Returns true if the track is outside of all volumes.
    #[must_use]
    pub const fn is_outside(&self) -> bool {
        !self.volume.is_valid()
    }
    /// Current state.
    #[must_use]
    pub const fn state(&self) -> NavState {
        self.state
    }
    /// The face of the current volume the track is on.
    #[must_use]
    pub const fn on_face(&self) -> OnFace {
        self.on_face
    }
    /// Current position.
    #[must_use]
    pub const fn pos(&self) -> Point3<f64> {
        self.pos
    }
    /// Current direction.
    #[must_use]
    pub const fn dir(&self) -> Vector3<f64> {
        self.dir
    }
    /// The geometry this navigator walks through.
    #[must_use]
    pub const fn geometry(&self) -> &'a GeoParams {
        self.geo
    }
    fn set_location(&mut self, found: Option<(VolumeId, OnFace)>) {
        let (volume, on_face) = found.unwrap_or((VolumeId::invalid(), OnFace::none()));
        self.volume = volume;
        self.on_face = on_face;
        self.pinned = if on_face.is_some() {
            let surface = self.geo.volumes().get(volume).get_surface(on_face.id());
            Some((surface, on_face.sense()))
        } else {
            None
        };
        self.state = NavState::Located;
    }
    /// Returns true if flipping the side of the current face leaves the current volume.
    ///
    /// Otherwise the face does not bound the volume at this point, and the track simply continues on the other side
    /// of it.
    fn leaves_by_turning(&mut self) -> bool {
        let geo = self.geo;
        let view = geo.volumes().get(self.volume);
        if !view.internal_surfaces() {
            return true;
        }
        let flipped = OnFace::new(self.on_face.id(), self.on_face.sense().flip());
        let mut calc = SenseCalculator::new(
            geo.surfaces(),
            &self.pos,
            geo.config().tolerance(),
            self.scratch.senses_mut(),
        )
        .with_direction(&self.dir);
        let result = calc.calc(&view, flipped);
        if !LogicEvaluator::new(view.logic()).evaluate(result.senses) {
            return true;
        }
        self.on_face = flipped;
        self.pinned = Some((view.get_surface(flipped.id()), flipped.sense()));
        false
    }
    fn heads_back(&self) -> bool {
        match self.normal() {
            Some(normal) if self.on_face.is_some() => {
                sense_from_direction(&normal, &self.dir) != self.on_face.sense()
            }
            _ => false,
        }
    }
}

/// Test a volume for the current point.
///
/// The pinned surface (if the volume is bounded by it) provides the hint for the sense calculation. Every other face
/// the point is on gets its sense from the direction, so a track through an edge or corner ends up in the volume it
/// is heading into. Returns the face the point is on if the volume claims it.
fn try_volume(
    geo: &GeoParams,
    volume: VolumeId,
    pos: &Point3<f64>,
    dir: &Vector3<f64>,
    pinned: Option<(SurfaceId, Sense)>,
    senses: &mut [Sense],
) -> Option<OnFace> {
    let view = geo.volumes().get(volume);
    let hint = pinned.map_or_else(OnFace::none, |(surface, sense)| {
        let face = view.find_face(surface);
        if face.is_valid() {
            OnFace::new(face, sense)
        } else {
            OnFace::none()
        }
    });
    let mut calc =
        SenseCalculator::new(geo.surfaces(), pos, geo.config().tolerance(), senses).with_direction(dir);
    let result = calc.calc(&view, hint);
    LogicEvaluator::new(view.logic())
        .evaluate(result.senses)
        .then_some(result.face)
}

fn find_volume(
    geo: &GeoParams,
    candidates: impl IntoIterator<Item = VolumeId>,
    pos: &Point3<f64>,
    dir: &Vector3<f64>,
    pinned: Option<(SurfaceId, Sense)>,
    senses: &mut [Sense],
) -> Option<(VolumeId, OnFace)> {
    candidates
        .into_iter()
        .find_map(|volume| try_volume(geo, volume, pos, dir, pinned, senses).map(|face| (volume, face)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        construct::{GeoBuilder, VolumeInput},
        logic::Logic,
        surface::{PlaneX, PlaneY, PlaneZ, Sphere, SphereCentered},
        testgeo,
        utils::test_helper::test_helper::check_warnings,
    };
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
    use rayon::prelude::*;
    use std::str::FromStr;

    /// Follow a track to the end of the world, returning the visited volumes and the step lengths.
    fn track(geo: &GeoParams, pos: Point3<f64>, dir: Vector3<f64>) -> Vec<(String, f64)> {
        let mut nav = Navigator::new(geo);
        nav.locate(pos, dir);
        let mut result = Vec::new();
        while !nav.is_outside() {
            let step = nav.next_step(no_intersection());
            result.push((geo.id_to_label(nav.current_volume()).to_owned(), step.distance));
            if !step.is_boundary() {
                break;
            }
            nav.move_to_boundary();
            nav.cross_boundary();
        }
        result
    }
    fn assert_track(actual: &[(String, f64)], expected: &[(&str, f64)]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?}");
        for ((label, distance), (exp_label, exp_distance)) in actual.iter().zip(expected) {
            assert_eq!(label, exp_label);
            if *exp_distance == no_intersection() {
                assert_eq!(*distance, no_intersection());
            } else {
                assert_abs_diff_eq!(*distance, *exp_distance, epsilon = 1e-10);
            }
        }
    }
    /// Sphere "inner" whose only neighbor "shell" is empty by mistake, all inside "world".
    fn inconsistent() -> GeoParams {
        let mut b = GeoBuilder::new();
        let s0 = b.insert_primitive("inner.s", &SphereCentered::new(1.0)).unwrap();
        let s1 = b.insert_primitive("shell.s", &SphereCentered::new(0.5)).unwrap();
        let s2 = b.insert_primitive("world.s", &SphereCentered::new(3.0)).unwrap();
        for (label, faces, logic) in [
            ("inner", vec![s0], "0"),
            ("shell", vec![s0, s1], "0 ~ 1 &"),
            ("world", vec![s2], "0"),
        ] {
            b.insert_volume(&VolumeInput {
                label: label.into(),
                faces,
                logic: Logic::from_str(logic).unwrap(),
            })
            .unwrap();
        }
        b.build().unwrap()
    }

    #[test]
    fn new() {
        let geo = testgeo::one_volume().unwrap();
        let nav = Navigator::new(&geo);
        assert!(nav.is_outside());
        assert_eq!(nav.state(), NavState::Located);
        assert!(!nav.on_face().is_some());
        assert!(nav.normal().is_none());
    }
    #[test]
    fn locate_one_volume() {
        let geo = testgeo::one_volume().unwrap();
        let mut nav = Navigator::new(&geo);
        assert_eq!(nav.locate(Point3::new(1.0, 2.0, 3.0), Vector3::x()), VolumeId::new(0));
        assert!(!nav.is_outside());
        let step = nav.next_step(10.0);
        assert_eq!(step.distance, 10.0);
        assert!(!step.is_boundary());
        nav.move_internal(10.0);
        assert_abs_diff_eq!(nav.pos(), Point3::new(11.0, 2.0, 3.0));
        assert_eq!(nav.current_volume(), VolumeId::new(0));
    }
    #[test]
    fn locate_outside() {
        let geo = testgeo::concentric_spheres(1.0, 2.0).unwrap();
        let mut nav = Navigator::new(&geo);
        assert!(!nav.locate(Point3::new(3.0, 0.0, 0.0), Vector3::x()).is_valid());
        assert!(nav.is_outside());
        let step = nav.next_step(1.0);
        assert_eq!(step.distance, no_intersection());
        assert!(!step.is_boundary());
    }
    #[test]
    fn locate_on_face() {
        let geo = testgeo::five_volumes().unwrap();
        let mut nav = Navigator::new(&geo);
        // on the plane x = 0 between "a" and "b"
        let pos = Point3::origin();
        assert_eq!(nav.locate(pos, Vector3::x()), geo.find_volume("b"));
        assert_eq!(nav.on_face(), OnFace::new(FaceId::new(5), Sense::Outside));
        assert_abs_diff_eq!(nav.normal().unwrap(), Vector3::x(), epsilon = 1e-12);
        let step = nav.next_step(10.0);
        assert_eq!(step.face, FaceId::new(0));
        assert_abs_diff_eq!(step.distance, 2.0);

        assert_eq!(nav.locate(pos, -Vector3::x()), geo.find_volume("a"));
        assert_eq!(nav.on_face(), OnFace::new(FaceId::new(5), Sense::Inside));
        let step = nav.next_step(10.0);
        assert_eq!(step.face, FaceId::new(0));
        assert_abs_diff_eq!(step.distance, 2.0);
    }
    #[test]
    fn track_through_spheres() {
        let geo = testgeo::five_volumes().unwrap();
        let steps = track(&geo, Point3::new(1.0, -1.9, 0.0), Vector3::y());
        assert_track(
            &steps,
            &[
                ("b", 0.15),
                ("d", 1.5),
                ("b", 0.5),
                ("c", 1.5),
                ("b", 0.25),
                ("exterior", no_intersection()),
            ],
        );
    }
    #[test]
    fn track_through_halves() {
        let geo = testgeo::five_volumes().unwrap();
        let steps = track(&geo, Point3::new(-1.0, 0.0, 0.0), Vector3::x());
        assert_track(
            &steps,
            &[("a", 1.0), ("b", 2.0), ("exterior", no_intersection())],
        );
    }
    #[test]
    fn track_into_box() {
        let geo = testgeo::five_volumes().unwrap();
        let steps = track(&geo, Point3::new(-1.0, -5.0, 0.0), Vector3::y());
        assert_track(
            &steps,
            &[("exterior", 3.0), ("a", 4.0), ("exterior", no_intersection())],
        );
    }
    #[test]
    fn leave_world() {
        testing_logger::setup();
        let geo = testgeo::concentric_spheres(1.0, 2.0).unwrap();
        let steps = track(&geo, Point3::origin(), Vector3::z());
        assert_track(&steps, &[("inner", 1.0), ("shell", 1.0)]);
        check_warnings(vec![]);
    }
    #[test]
    fn states() {
        let geo = testgeo::two_volumes(1.5).unwrap();
        let mut nav = Navigator::new(&geo);
        nav.locate(Point3::origin(), Vector3::x());
        assert_matches!(nav.state(), NavState::Located);
        let step = nav.next_step(10.0);
        assert_matches!(nav.state(), NavState::Stepped(s) if s == step);
        assert_abs_diff_eq!(step.distance, 1.5, epsilon = 1e-12);
        nav.move_to_boundary();
        assert_matches!(nav.state(), NavState::Crossed);
        assert_abs_diff_eq!(nav.pos(), Point3::new(1.5, 0.0, 0.0), epsilon = 1e-12);
        assert_eq!(nav.current_volume(), geo.find_volume("inside"));
        assert_abs_diff_eq!(nav.normal().unwrap(), Vector3::x(), epsilon = 1e-12);
        assert_eq!(nav.cross_boundary(), geo.find_volume("outside"));
        assert_matches!(nav.state(), NavState::Located);
        assert_eq!(nav.on_face(), OnFace::new(FaceId::new(0), Sense::Outside));
        // the sphere cannot be hit again on the way out
        let step = nav.next_step(10.0);
        assert!(!step.is_boundary());
        assert_eq!(step.distance, 10.0);
        nav.move_internal(5.0);
        assert_matches!(nav.state(), NavState::Located);
        assert!(!nav.on_face().is_some());
        assert!(nav.normal().is_none());
    }
    #[test]
    fn short_step() {
        let geo = testgeo::two_volumes(1.5).unwrap();
        let mut nav = Navigator::new(&geo);
        nav.locate(Point3::origin(), Vector3::x());
        let step = nav.next_step(1.0);
        assert!(!step.is_boundary());
        assert_eq!(step.distance, 1.0);
        nav.move_internal(1.0);
        let step = nav.next_step(1.0);
        assert!(step.is_boundary());
        assert_abs_diff_eq!(step.distance, 0.5, epsilon = 1e-12);
    }
    #[test]
    fn set_dir_discards_step() {
        let geo = testgeo::two_volumes(1.5).unwrap();
        let mut nav = Navigator::new(&geo);
        nav.locate(Point3::origin(), Vector3::x());
        nav.next_step(10.0);
        nav.set_dir(Vector3::y());
        assert_matches!(nav.state(), NavState::Located);
        assert_eq!(nav.dir(), Vector3::y());
    }
    #[test]
    fn turn_around_on_face() {
        let geo = testgeo::five_volumes().unwrap();
        let mut nav = Navigator::new(&geo);
        nav.locate(Point3::new(-1.0, 0.0, 0.0), Vector3::x());
        nav.next_step(10.0);
        nav.move_to_boundary();
        assert_eq!(nav.cross_boundary(), geo.find_volume("b"));
        nav.set_dir(-Vector3::x());
        let step = nav.next_step(10.0);
        assert_eq!(step.distance, 0.0);
        assert_eq!(step.face, nav.on_face().id());
        nav.move_to_boundary();
        assert_eq!(nav.cross_boundary(), geo.find_volume("a"));
        assert_eq!(nav.pos(), Point3::origin());
    }
    #[test]
    fn turn_around_on_plane_outside_box() {
        testing_logger::setup();
        let geo = testgeo::five_volumes().unwrap();
        let mut nav = Navigator::new(&geo);
        // on the plane y = 2, but beyond the box
        let exterior = geo.find_volume("exterior");
        assert_eq!(nav.locate(Point3::new(5.0, 2.0, 0.0), -Vector3::y()), exterior);
        assert_eq!(nav.on_face(), OnFace::new(FaceId::new(3), Sense::Inside));
        nav.set_dir(Vector3::y());
        let step = nav.next_step(10.0);
        assert!(!step.is_boundary());
        assert_eq!(step.distance, 10.0);
        assert_eq!(nav.on_face(), OnFace::new(FaceId::new(3), Sense::Outside));
        nav.move_internal(10.0);
        assert_eq!(nav.current_volume(), exterior);
        check_warnings(vec![]);
    }
    #[test]
    fn cross_through_edge() {
        testing_logger::setup();
        let geo = testgeo::five_volumes().unwrap();
        let a = geo.find_volume("a");
        let dir = Vector3::new(-1.0, -1.0, 0.0).normalize();
        let mut nav = Navigator::new(&geo);
        assert_eq!(nav.locate(Point3::new(1.0, 3.0, 0.0), dir), geo.find_volume("exterior"));
        let step = nav.next_step(no_intersection());
        assert!(step.is_boundary());
        assert_abs_diff_eq!(step.distance, 2.0_f64.sqrt(), epsilon = 1e-12);
        nav.move_to_boundary();
        assert_abs_diff_eq!(nav.pos(), Point3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
        assert_eq!(nav.cross_boundary(), a);
        // the track continues in "a" up to the plane x = -2
        let step = nav.next_step(no_intersection());
        assert!(step.is_boundary());
        assert_abs_diff_eq!(step.distance, 2.0 * 2.0_f64.sqrt(), epsilon = 1e-10);
        nav.move_internal(0.1);
        let mut fresh = Navigator::new(&geo);
        assert_eq!(fresh.locate(nav.pos(), dir), a);
        check_warnings(vec![]);
    }
    #[test]
    fn locate_on_edge() {
        let geo = testgeo::five_volumes().unwrap();
        let mut nav = Navigator::new(&geo);
        let pos = Point3::new(0.0, 2.0, 0.0);
        let down_left = Vector3::new(-1.0, -1.0, 0.0).normalize();
        assert_eq!(nav.locate(pos, down_left), geo.find_volume("a"));
        let down_right = Vector3::new(1.0, -1.0, 0.0).normalize();
        assert_eq!(nav.locate(pos, down_right), geo.find_volume("b"));
        let up_right = Vector3::new(1.0, 1.0, 0.0).normalize();
        assert_eq!(nav.locate(pos, up_right), geo.find_volume("exterior"));
    }
    #[test]
    fn zero_direction() {
        let geo = testgeo::two_volumes(1.5).unwrap();
        let mut nav = Navigator::new(&geo);
        assert_eq!(nav.locate(Point3::new(0.5, 0.0, 0.0), Vector3::zeros()), geo.find_volume("inside"));
        let step = nav.next_step(10.0);
        assert!(!step.is_boundary());
        assert_eq!(step.distance, 10.0);
        let geo = testgeo::five_volumes().unwrap();
        let mut nav = Navigator::new(&geo);
        assert_eq!(nav.locate(Point3::new(5.0, 0.0, 0.0), Vector3::zeros()), geo.find_volume("exterior"));
        let step = nav.next_step(no_intersection());
        assert!(!step.is_boundary());
        assert_eq!(step.distance, no_intersection());
    }
    #[test]
    fn repeated_crossing() {
        let geo = testgeo::concentric_spheres(1.0, 2.0).unwrap();
        let mut nav = Navigator::new(&geo);
        let dir = Vector3::new(1.0, 1.0, 1.0).normalize();
        nav.locate(Point3::origin(), dir);
        nav.next_step(no_intersection());
        nav.move_to_boundary();
        let shell = geo.find_volume("shell");
        for _ in 0..1000 {
            let mut crossing = nav.clone();
            assert_eq!(crossing.cross_boundary(), shell);
            let mut crossing = nav.clone();
            assert_eq!(crossing.locate(nav.pos(), dir), shell);
            assert_eq!(crossing.on_face(), OnFace::new(FaceId::new(0), Sense::Outside));
        }
    }
    #[test]
    fn fallback_search() {
        testing_logger::setup();
        let geo = inconsistent();
        let mut nav = Navigator::new(&geo);
        nav.locate(Point3::origin(), Vector3::x());
        assert_eq!(nav.current_volume(), geo.find_volume("inner"));
        nav.next_step(10.0);
        nav.move_to_boundary();
        assert_eq!(nav.cross_boundary(), geo.find_volume("world"));
        check_warnings(vec![
            "no volume connected to surface 'inner.s' claims the point after crossing, searching all volumes",
        ]);
    }
    #[test]
    fn insertion_order() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let points: Vec<Point3<f64>> = (0..200)
            .map(|_| {
                Point3::new(
                    rng.random_range(-3.0..3.0),
                    rng.random_range(-3.0..3.0),
                    rng.random_range(-3.0..3.0),
                )
            })
            .collect();
        let labels = |geo: &GeoParams| -> Vec<String> {
            let mut nav = Navigator::new(geo);
            points
                .iter()
                .map(|p| geo.id_to_label(nav.locate(*p, Vector3::x())).to_owned())
                .collect()
        };
        let reference = labels(&testgeo::five_volumes().unwrap());
        let mut volumes = vec![
            ("exterior", vec![0, 1, 2, 3, 4, 5], "0 ~ 1 & 2 ~ & 3 & 4 ~ & 5 & ~"),
            ("a", vec![0, 2, 3, 4, 5, 6], "0 ~ 1 ~ & 2 & 3 ~ & 4 & 5 &"),
            ("b", vec![1, 2, 3, 4, 5, 6, 7, 8], "0 1 ~ & 2 & 3 ~ & 4 & 5 ~ & 6 ~ & 7 ~ &"),
            ("c", vec![7], "0"),
            ("d", vec![8], "0"),
        ];
        for _ in 0..5 {
            volumes.shuffle(&mut rng);
            let mut b = GeoBuilder::new();
            b.insert_primitive("x.lo", &PlaneX::new(-2.0)).unwrap();
            b.insert_primitive("x.hi", &PlaneX::new(2.0)).unwrap();
            b.insert_primitive("y.lo", &PlaneY::new(-2.0)).unwrap();
            b.insert_primitive("y.hi", &PlaneY::new(2.0)).unwrap();
            b.insert_primitive("z.lo", &PlaneZ::new(-2.0)).unwrap();
            b.insert_primitive("z.hi", &PlaneZ::new(2.0)).unwrap();
            b.insert_primitive("mid", &PlaneX::new(0.0)).unwrap();
            b.insert_primitive("c.s", &Sphere::new(Point3::new(1.0, 1.0, 0.0), 0.75))
                .unwrap();
            b.insert_primitive("d.s", &Sphere::new(Point3::new(1.0, -1.0, 0.0), 0.75))
                .unwrap();
            for (label, faces, logic) in &volumes {
                b.insert_volume(&VolumeInput {
                    label: (*label).to_owned(),
                    faces: faces.iter().copied().map(SurfaceId::new).collect(),
                    logic: Logic::from_str(logic).unwrap(),
                })
                .unwrap();
            }
            assert_eq!(labels(&b.build().unwrap()), reference);
        }
    }
    #[test]
    fn concurrent_tracks() {
        let geo = testgeo::five_volumes().unwrap();
        let crossings: Vec<usize> = (0..64)
            .into_par_iter()
            .map(|i| {
                let y = -1.9 + 3.8 * f64::from(i) / 64.0;
                track(&geo, Point3::new(-3.0, y, 0.1), Vector3::x()).len()
            })
            .collect();
        let serial: Vec<usize> = (0..64)
            .map(|i| {
                let y = -1.9 + 3.8 * f64::from(i) / 64.0;
                track(&geo, Point3::new(-3.0, y, 0.1), Vector3::x()).len()
            })
            .collect();
        assert_eq!(crossings, serial);
        assert!(crossings.iter().all(|n| *n >= 4));
    }
    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no boundary to move to")]
    fn move_without_step() {
        let geo = testgeo::two_volumes(1.5).unwrap();
        let mut nav = Navigator::new(&geo);
        nav.locate(Point3::origin(), Vector3::x());
        nav.move_to_boundary();
    }
    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "internal move")]
    fn move_beyond_boundary() {
        let geo = testgeo::two_volumes(1.5).unwrap();
        let mut nav = Navigator::new(&geo);
        nav.locate(Point3::origin(), Vector3::x());
        nav.next_step(10.0);
        nav.move_internal(2.0);
    }
}
