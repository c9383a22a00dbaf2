//! Volume definitions
//!
//! A volume is a list of faces (surfaces renumbered `0..num_faces` in the local scope of the volume) together with
//! a postfix logic expression over the face senses.
use crate::{
    collection::{Collection, CollectionRef},
    logic::{Logic, LogicToken},
    opaque_id::ItemRange,
    types::{FaceId, SurfaceId, VolumeId, VolumeTag},
};

/// Marker for indices into the face column.
#[derive(Debug)]
pub enum FaceStorageTag {}
/// Marker for indices into the logic column.
#[derive(Debug)]
pub enum LogicStorageTag {}

/// Compact record of a single volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeRecord {
    faces: ItemRange<FaceStorageTag>,
    logic: ItemRange<LogicStorageTag>,
    max_intersections: usize,
    internal_surfaces: bool,
}

/// Owning storage of all volumes of a geometry.
#[derive(Debug, Clone, Default)]
pub struct VolumeData {
    records: Collection<VolumeRecord, VolumeTag>,
    faces: Collection<SurfaceId, FaceStorageTag>,
    logic: Collection<LogicToken, LogicStorageTag>,
}
impl VolumeData {
    /// Number of stored volumes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
    /// Returns true if no volume has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    /// Append a validated volume.
    pub(crate) fn push(
        &mut self,
        faces: &[SurfaceId],
        logic: &Logic,
        max_intersections: usize,
    ) -> VolumeId {
        let record = VolumeRecord {
            faces: self.faces.extend(faces.iter().copied()),
            logic: self.logic.extend(logic.tokens().iter().copied()),
            max_intersections,
            internal_surfaces: !logic.is_simple(),
        };
        self.records.push(record)
    }
    /// Create a non-owning view of the stored volumes.
    #[must_use]
    pub fn view(&self) -> Volumes<'_> {
        Volumes {
            records: self.records.as_ref(),
            faces: self.faces.as_ref(),
            logic: self.logic.as_ref(),
        }
    }
}

/// Read-only view of a [`VolumeData`] store.
#[derive(Clone, Copy)]
pub struct Volumes<'a> {
    records: CollectionRef<'a, VolumeRecord, VolumeTag>,
    faces: CollectionRef<'a, SurfaceId, FaceStorageTag>,
    logic: CollectionRef<'a, LogicToken, LogicStorageTag>,
}
impl<'a> Volumes<'a> {
    /// Number of volumes.
    #[must_use]
    pub const fn num_volumes(&self) -> usize {
        self.records.len()
    }
    /// Access a single volume.
    #[must_use]
    pub fn get(&self, id: VolumeId) -> VolumeView<'a> {
        let record = self.records[id];
        VolumeView {
            faces: self.faces.slice(record.faces),
            logic: self.logic.slice(record.logic),
            record,
        }
    }
}

/// Access to the faces and logic of a single volume.
#[derive(Debug, Clone, Copy)]
pub struct VolumeView<'a> {
    faces: &'a [SurfaceId],
    logic: &'a [LogicToken],
    record: VolumeRecord,
}
impl<'a> VolumeView<'a> {
    /// Number of faces of this volume.
    #[must_use]
    pub const fn num_faces(&self) -> usize {
        self.faces.len()
    }
    /// Global surfaces of all faces, indexed by [`FaceId`].
    #[must_use]
    pub const fn faces(&self) -> &'a [SurfaceId] {
        self.faces
    }
    /// Global surface of a face.
    #[must_use]
    pub fn get_surface(&self, face: FaceId) -> SurfaceId {
        debug_assert!(face.is_valid() && face.get() < self.num_faces());
        self.faces[face.get()]
    }
    /// Local face of a global surface, invalid if the volume is not bounded by the surface.
    #[must_use]
    pub fn find_face(&self, surface: SurfaceId) -> FaceId {
        self.faces
            .iter()
            .position(|s| *s == surface)
            .map_or_else(FaceId::invalid, FaceId::new)
    }
    /// Postfix logic of this volume.
    #[must_use]
    pub const fn logic(&self) -> &'a [LogicToken] {
        self.logic
    }
    /// Maximum number of intersections of a straight line with all faces.
    #[must_use]
    pub const fn max_intersections(&self) -> usize {
        self.record.max_intersections
    }
    /// Returns true if leaving through a face does not necessarily mean leaving the volume.
    ///
    /// This is the case for all volumes whose logic is not a plain intersection of face senses.
    #[must_use]
    pub const fn internal_surfaces(&self) -> bool {
        self.record.internal_surfaces
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    fn sample() -> VolumeData {
        let mut data = VolumeData::default();
        data.push(&[], &Logic::from_str("*").unwrap(), 0);
        data.push(
            &[SurfaceId::new(3), SurfaceId::new(1)],
            &Logic::from_str("0 1 ~ &").unwrap(),
            3,
        );
        data.push(
            &[SurfaceId::new(1), SurfaceId::new(2)],
            &Logic::from_str("0 1 |").unwrap(),
            4,
        );
        data
    }
    #[test]
    fn store() {
        let data = sample();
        assert_eq!(data.len(), 3);
        let volumes = data.view();
        assert_eq!(volumes.num_volumes(), 3);
        let world = volumes.get(VolumeId::new(0));
        assert_eq!(world.num_faces(), 0);
        assert_eq!(world.logic(), &[LogicToken::True]);
        assert!(!world.internal_surfaces());
    }
    #[test]
    fn faces() {
        let data = sample();
        let v = data.view().get(VolumeId::new(1));
        assert_eq!(v.num_faces(), 2);
        assert_eq!(v.get_surface(FaceId::new(0)), SurfaceId::new(3));
        assert_eq!(v.find_face(SurfaceId::new(1)), FaceId::new(1));
        assert!(!v.find_face(SurfaceId::new(2)).is_valid());
        assert_eq!(v.max_intersections(), 3);
        assert_eq!(v.logic().len(), 4);
        assert!(!v.internal_surfaces());
    }
    #[test]
    fn complex() {
        let data = sample();
        let v = data.view().get(VolumeId::new(2));
        assert!(v.internal_surfaces());
        assert_eq!(v.faces(), &[SurfaceId::new(1), SurfaceId::new(2)]);
    }
}
