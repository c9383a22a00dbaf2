//! Search of the next boundary along a straight line
//!
//! All faces of the current volume are intersected with the ray. For a volume whose logic is a plain intersection
//! of face senses, the nearest crossing of any face leaves the volume. For a volume with internal surfaces, the
//! crossings are tested in distance order until one of them actually changes the volume membership.
use crate::{
    config::GeoConfig,
    logic::LogicEvaluator,
    sense_calculator::{sense_from_direction, OnFace, SenseCalculator},
    surface::{
        no_intersection,
        surfaces::{CalcIntersections, CalcNormal, Surfaces},
    },
    types::{FaceId, Sense, SurfaceState},
    volume::VolumeView,
};
use nalgebra::{Point3, Vector3};

/// Crossing of a face at a given distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// crossed face, invalid if the ray never leaves the volume
    pub face: FaceId,
    /// distance to the crossing, [`no_intersection()`] if the ray never leaves the volume
    pub distance: f64,
}
impl Default for Intersection {
    fn default() -> Self {
        Self::none()
    }
}
impl Intersection {
    /// "No crossing at all".
    #[must_use]
    pub const fn none() -> Self {
        Self {
            face: FaceId::invalid(),
            distance: no_intersection(),
        }
    }
    /// Returns true if a crossing was found.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.face.is_valid()
    }
}

/// Preallocated per-navigator storage for the boundary search.
#[derive(Debug, Clone, Default)]
pub struct IntersectScratch {
    faces: Vec<FaceId>,
    distances: Vec<f64>,
    order: Vec<usize>,
    senses: Vec<Sense>,
}
impl IntersectScratch {
    /// Create storage for volumes with up to `max_faces` faces and `max_intersections` line intersections.
    #[must_use]
    pub fn new(max_faces: usize, max_intersections: usize) -> Self {
        Self {
            faces: vec![FaceId::invalid(); max_intersections],
            distances: vec![no_intersection(); max_intersections],
            order: Vec::with_capacity(max_intersections),
            senses: vec![Sense::Outside; max_faces],
        }
    }
    /// Scratch storage for face senses.
    pub(crate) fn senses_mut(&mut self) -> &mut [Sense] {
        &mut self.senses
    }
}

fn is_candidate(distance: f64) -> bool {
    distance > 0.0 && distance < no_intersection()
}

/// Find the nearest crossing of the volume's boundary.
///
/// The face the point is currently on (if any) only contributes its "far" intersections. Distances within the
/// configured tolerance tie; a tie is won by the hinted face if allowed by the configuration, otherwise by the lowest
/// face id.
pub fn find_next_boundary(
    surfaces: Surfaces<'_>,
    volume: &VolumeView<'_>,
    pos: &Point3<f64>,
    dir: &Vector3<f64>,
    on_face: OnFace,
    config: &GeoConfig,
    scratch: &mut IntersectScratch,
) -> Intersection {
    debug_assert!(scratch.distances.len() >= volume.max_intersections());
    let mut count = 0;
    for (index, surface) in volume.faces().iter().enumerate() {
        let face = FaceId::new(index);
        let on_surface = if face == on_face.id() {
            SurfaceState::On
        } else {
            SurfaceState::Off
        };
        let written = surfaces.apply(
            *surface,
            &mut CalcIntersections::new(pos, dir, on_surface, &mut scratch.distances[count..]),
        );
        scratch.faces[count..count + written].fill(face);
        count += written;
    }
    if volume.internal_surfaces() {
        find_complex(surfaces, volume, pos, dir, on_face, config, scratch, count)
    } else {
        find_simple(on_face, config, scratch, count)
    }
}

fn find_simple(
    on_face: OnFace,
    config: &GeoConfig,
    scratch: &IntersectScratch,
    count: usize,
) -> Intersection {
    let tolerance = config.tolerance();
    let prefer_hint = config.prefer_hinted_face_on_tie() && on_face.is_some();
    let mut best = Intersection::none();
    for (&face, &distance) in scratch.faces[..count].iter().zip(&scratch.distances[..count]) {
        if !is_candidate(distance) {
            continue;
        }
        let candidate = Intersection { face, distance };
        if !best.is_valid() {
            best = candidate;
        } else if tolerance.is_tie(distance, best.distance) {
            let candidate_wins = if prefer_hint && face == on_face.id() {
                true
            } else if prefer_hint && best.face == on_face.id() {
                false
            } else {
                face < best.face
            };
            if candidate_wins {
                best = candidate;
            }
        } else if distance < best.distance {
            best = candidate;
        }
    }
    best
}

#[allow(clippy::too_many_arguments)]
fn find_complex(
    surfaces: Surfaces<'_>,
    volume: &VolumeView<'_>,
    pos: &Point3<f64>,
    dir: &Vector3<f64>,
    on_face: OnFace,
    config: &GeoConfig,
    scratch: &mut IntersectScratch,
    count: usize,
) -> Intersection {
    let IntersectScratch {
        faces,
        distances,
        order,
        senses,
    } = scratch;
    order.clear();
    order.extend((0..count).filter(|i| is_candidate(distances[*i])));
    order.sort_unstable_by(|a, b| {
        distances[*a]
            .total_cmp(&distances[*b])
            .then_with(|| faces[*a].cmp(&faces[*b]))
    });
    SenseCalculator::new(surfaces, pos, config.tolerance(), senses.as_mut_slice())
        .calc(volume, on_face);
    let current = &mut senses[..volume.num_faces()];
    let logic = LogicEvaluator::new(volume.logic());
    for &i in order.iter() {
        let (face, distance) = (faces[i], distances[i]);
        let crossing = pos + distance * dir;
        let normal = surfaces.apply(volume.get_surface(face), &mut CalcNormal::new(&crossing));
        current[face.get()] = sense_from_direction(&normal, dir);
        if !logic.evaluate(current) {
            return Intersection { face, distance };
        }
    }
    Intersection::none()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        config::Tolerance,
        construct::{GeoBuilder, VolumeInput},
        geo_params::GeoParams,
        logic::Logic,
        surface::{PlaneX, SphereCentered},
        testgeo,
        types::{SurfaceId, VolumeId},
    };
    use approx::assert_relative_eq;
    use std::str::FromStr;

    fn next(
        geo: &GeoParams,
        volume: &str,
        pos: Point3<f64>,
        dir: Vector3<f64>,
        face: OnFace,
    ) -> Intersection {
        let mut scratch = IntersectScratch::new(geo.max_faces(), geo.max_intersections());
        let view = geo.volumes().get(geo.find_volume(volume));
        find_next_boundary(geo.surfaces(), &view, &pos, &dir, face, geo.config(), &mut scratch)
    }
    /// Unit ball cut by the plane `x = plane`.
    fn cut_ball(plane: f64, config: GeoConfig) -> GeoParams {
        let mut b = GeoBuilder::with_config(config);
        b.insert_primitive("cut", &PlaneX::new(plane)).unwrap();
        b.insert_primitive("ball", &SphereCentered::new(1.0)).unwrap();
        b.insert_volume(&VolumeInput {
            label: "cut ball".into(),
            faces: vec![SurfaceId::new(0), SurfaceId::new(1)],
            logic: Logic::from_str("0 1 &").unwrap(),
        })
        .unwrap();
        b.build().unwrap()
    }

    #[test]
    fn no_faces() {
        let geo = testgeo::one_volume().unwrap();
        let i = next(&geo, "infinite", Point3::origin(), Vector3::x(), OnFace::none());
        assert_eq!(i, Intersection::none());
        assert!(!i.is_valid());
    }
    #[test]
    fn sphere() {
        let geo = testgeo::two_volumes(1.5).unwrap();
        let i = next(&geo, "inside", Point3::origin(), Vector3::y(), OnFace::none());
        assert_eq!(i.face, FaceId::new(0));
        assert_relative_eq!(i.distance, 1.5);
        let pos = Point3::new(-3.0, 0.0, 0.0);
        let i = next(&geo, "outside", pos, Vector3::x(), OnFace::none());
        assert_eq!(i.face, FaceId::new(0));
        assert_relative_eq!(i.distance, 1.5);
        let i = next(&geo, "outside", pos, -Vector3::x(), OnFace::none());
        assert!(!i.is_valid());
        assert_eq!(i.distance, no_intersection());
    }
    #[test]
    fn on_surface_hint() {
        let geo = testgeo::two_volumes(1.5).unwrap();
        // just entered the sphere: the zero root is suppressed
        let hint = OnFace::new(FaceId::new(0), Sense::Inside);
        let i = next(&geo, "inside", Point3::new(-1.5, 0.0, 0.0), Vector3::x(), hint);
        assert_eq!(i.face, FaceId::new(0));
        assert_relative_eq!(i.distance, 3.0);
        // just left the sphere
        let hint = OnFace::new(FaceId::new(0), Sense::Outside);
        let i = next(&geo, "outside", Point3::new(1.5, 0.0, 0.0), Vector3::x(), hint);
        assert!(!i.is_valid());
    }
    #[test]
    fn nearest_face() {
        let geo = testgeo::five_volumes().unwrap();
        let i = next(&geo, "b", Point3::new(1.0, -1.9, 0.0), Vector3::y(), OnFace::none());
        // sphere "d" is face 7 of "b"
        assert_eq!(i.face, FaceId::new(7));
        assert_relative_eq!(i.distance, 0.15, epsilon = 1e-12);
        let i = next(&geo, "a", Point3::new(-1.0, 0.0, 0.0), Vector3::x(), OnFace::none());
        assert_eq!(i.face, FaceId::new(5));
        assert_relative_eq!(i.distance, 1.0);
    }
    #[test]
    fn tie_lowest_face() {
        let geo = testgeo::five_volumes().unwrap();
        // heading exactly for the corner (2, 2, 0) of "b": px 2 (face 0) and py 2 (face 2) tie
        let dir = Vector3::new(1.0, 1.0, 0.0).normalize();
        let i = next(&geo, "b", Point3::new(1.8, 1.8, 0.0), dir, OnFace::none());
        assert_eq!(i.face, FaceId::new(0));
        assert_relative_eq!(i.distance, 0.2 * 2.0_f64.sqrt(), max_relative = 1e-12);
    }
    #[test]
    fn tie_hinted_face() {
        // starting on the ball at x = -1 toward +x, the far side of the ball and the plane x = 1 are hit together
        let pos = Point3::new(-1.0, 0.0, 0.0);
        let hint = OnFace::new(FaceId::new(1), Sense::Inside);
        let geo = cut_ball(1.0, GeoConfig::default());
        let i = next(&geo, "cut ball", pos, Vector3::x(), OnFace::none());
        assert_eq!(i.face, FaceId::new(0));
        assert_relative_eq!(i.distance, 2.0);
        let i = next(&geo, "cut ball", pos, Vector3::x(), hint);
        assert_eq!(i.face, FaceId::new(1));
        assert_relative_eq!(i.distance, 2.0);

        let mut config = GeoConfig::default();
        config.set_prefer_hinted_face_on_tie(false);
        let geo = cut_ball(1.0, config);
        let i = next(&geo, "cut ball", pos, Vector3::x(), hint);
        assert_eq!(i.face, FaceId::new(0));
    }
    #[test]
    fn tie_within_tolerance() {
        let pos = Point3::new(-1.0, 0.0, 0.0);
        let hint = OnFace::new(FaceId::new(1), Sense::Inside);
        // plane slightly closer than the far side of the ball
        let geo = cut_ball(1.0 - 1e-9, GeoConfig::default());
        let i = next(&geo, "cut ball", pos, Vector3::x(), hint);
        assert_eq!(i.face, FaceId::new(0));
        let mut config = GeoConfig::default();
        config.set_tolerance(Tolerance::new(1e-8, 1e-8).unwrap());
        let geo = cut_ball(1.0 - 1e-9, config);
        let i = next(&geo, "cut ball", pos, Vector3::x(), hint);
        assert_eq!(i.face, FaceId::new(1));
    }
    #[test]
    fn complex_volume() {
        let geo = testgeo::five_volumes().unwrap();
        assert_eq!(geo.find_volume("exterior"), VolumeId::new(0));
        // from below the cell toward it: the exterior is left when entering the box
        let pos = Point3::new(1.0, -5.0, 0.0);
        let i = next(&geo, "exterior", pos, Vector3::y(), OnFace::none());
        assert_eq!(i.face, FaceId::new(2));
        assert_relative_eq!(i.distance, 3.0);
        // moving away from the box never leaves the exterior
        let i = next(&geo, "exterior", pos, -Vector3::y(), OnFace::none());
        assert!(!i.is_valid());
        // the ray passes beside the box: crossing the planes of the box does not change membership
        let i = next(&geo, "exterior", Point3::new(-5.0, 3.0, 0.0), Vector3::x(), OnFace::none());
        assert!(!i.is_valid());
    }
}
