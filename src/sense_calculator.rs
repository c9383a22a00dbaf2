//! Calculation of face senses
//!
//! The [`SenseCalculator`] classifies a point against every face of a volume. A face the point is known to be on
//! (an [`OnFace`] hint, usually obtained by moving exactly onto a boundary) is never recomputed: its sense is taken
//! from the hint so that repeated queries at a boundary always give the same answer.
use crate::{
    config::Tolerance,
    surface::surfaces::{CalcNormal, CalcSense, Surfaces},
    types::{FaceId, Sense, SignedSense},
    volume::VolumeView,
};
use nalgebra::{Point3, Vector3};

/// Sense with respect to a surface after moving an infinitesimal step along `dir` from a point on the surface.
///
/// Moving along the outward normal leads outside. A tangent direction counts as outside, like a point on the
/// surface.
#[must_use]
pub fn sense_from_direction(normal: &Vector3<f64>, dir: &Vector3<f64>) -> Sense {
    if normal.dot(dir) < 0.0 {
        Sense::Inside
    } else {
        Sense::Outside
    }
}

/// A face the current point lies on, together with the side it is considered to be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnFace {
    id: FaceId,
    sense: Sense,
}
impl Default for OnFace {
    fn default() -> Self {
        Self::none()
    }
}
impl OnFace {
    /// Create a new hint.
    #[must_use]
    pub const fn new(id: FaceId, sense: Sense) -> Self {
        Self { id, sense }
    }
    /// "Not on any face".
    #[must_use]
    pub const fn none() -> Self {
        Self {
            id: FaceId::invalid(),
            sense: Sense::Outside,
        }
    }
    /// Returns true if this refers to a face.
    #[must_use]
    pub const fn is_some(&self) -> bool {
        self.id.is_valid()
    }
    /// Returns the face, invalid if none.
    #[must_use]
    pub const fn id(&self) -> FaceId {
        self.id
    }
    /// Returns the sense with respect to the face.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if no face is set.
    #[must_use]
    pub fn sense(&self) -> Sense {
        debug_assert!(self.is_some(), "sense of an empty face hint");
        self.sense
    }
    /// Returns the stored sense even if no face is set.
    #[must_use]
    pub const fn unchecked_sense(&self) -> Sense {
        self.sense
    }
}

/// Result of a sense calculation.
#[derive(Debug)]
pub struct SenseResult<'s> {
    /// sense of the point for each face of the volume
    pub senses: &'s [Sense],
    /// the hinted face, otherwise the first face the point was found to be on
    pub face: OnFace,
}

/// Calculates the senses of a point with respect to all faces of a volume.
pub struct SenseCalculator<'a> {
    surfaces: Surfaces<'a>,
    pos: &'a Point3<f64>,
    dir: Option<&'a Vector3<f64>>,
    tolerance: &'a Tolerance,
    storage: &'a mut [Sense],
}
impl<'a> SenseCalculator<'a> {
    /// Create a new calculator writing into the given scratch storage.
    ///
    /// The storage must be at least as large as the number of faces of any volume passed to
    /// [`SenseCalculator::calc`].
    #[must_use]
    pub fn new(
        surfaces: Surfaces<'a>,
        pos: &'a Point3<f64>,
        tolerance: &'a Tolerance,
        storage: &'a mut [Sense],
    ) -> Self {
        Self {
            surfaces,
            pos,
            dir: None,
            tolerance,
            storage,
        }
    }
    /// Resolve every face the point is on (except a hinted one) with [`sense_from_direction`] instead of counting
    /// it as outside.
    #[must_use]
    pub fn with_direction(mut self, dir: &'a Vector3<f64>) -> Self {
        self.dir = Some(dir);
        self
    }
    /// Calculate the senses for all faces of a volume.
    ///
    /// A point exactly on a face (without a hint) is reported as [`Sense::Outside`] of that face, or with the sense
    /// given by the direction if one is set. The lowest such face is returned in [`SenseResult::face`].
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the hinted face does not belong to the volume.
    pub fn calc(&mut self, volume: &VolumeView<'_>, face: OnFace) -> SenseResult<'_> {
        let num_faces = volume.num_faces();
        debug_assert!(
            !face.is_some() || face.id().get() < num_faces,
            "face hint {} out of range for a volume with {num_faces} faces",
            face.id()
        );
        debug_assert!(self.storage.len() >= num_faces, "sense storage too small");
        let mut on_face = face;
        let mut action = CalcSense::new(self.pos, self.tolerance);
        for (index, surface) in volume.faces().iter().enumerate() {
            let id = FaceId::new(index);
            self.storage[index] = if id == face.id() {
                face.sense()
            } else {
                let signed = self.surfaces.apply(*surface, &mut action);
                if signed == SignedSense::On {
                    let sense = self.dir.map_or(Sense::Outside, |dir| {
                        let normal = self.surfaces.apply(*surface, &mut CalcNormal::new(self.pos));
                        sense_from_direction(&normal, dir)
                    });
                    if !on_face.is_some() {
                        on_face = OnFace::new(id, sense);
                    }
                    sense
                } else {
                    signed.to_sense()
                }
            };
        }
        SenseResult {
            senses: &self.storage[..num_faces],
            face: on_face,
        }
    }
}
