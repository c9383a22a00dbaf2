//! Compact storage of heterogeneous surfaces.
//!
//! All surfaces of a geometry are stored in three flat columns: the kind tag, the range of the surface's
//! coefficients, and one contiguous array of coefficients. Operations are applied to a stored surface through the
//! [`SurfaceAction`] visitor, which is monomorphized for every concrete kind by a single `match` on the tag.
use super::{
    ConeX, ConeY, ConeZ, CCylX, CCylY, CCylZ, CylX, CylY, CylZ, GeneralQuadric, Plane, PlaneX, PlaneY,
    PlaneZ, SimpleQuadric, Sphere, SphereCentered, SurfacePrimitive, SurfaceType,
};
use crate::{
    collection::{Collection, CollectionRef},
    config::Tolerance,
    opaque_id::ItemRange,
    types::{SignedSense, SurfaceId, SurfaceState, SurfaceTag},
};
use itertools::Itertools;
use nalgebra::{Point3, Vector3};

/// Marker for indices into the coefficient column.
#[derive(Debug)]
pub enum RealTag {}

/// An operation which can be applied to any concrete surface kind.
pub trait SurfaceAction {
    /// Result of the operation.
    type Output;
    /// Apply the operation to a concrete surface.
    fn apply<S: SurfacePrimitive>(&mut self, surface: &S) -> Self::Output;
}

/// Owning storage of all surfaces of a geometry.
#[derive(Debug, Clone, Default)]
pub struct SurfaceData {
    types: Collection<SurfaceType, SurfaceTag>,
    data_offsets: Collection<ItemRange<RealTag>, SurfaceTag>,
    reals: Collection<f64, RealTag>,
}
impl SurfaceData {
    /// Number of stored surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }
    /// Returns true if no surface has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
    /// Append a concrete surface.
    pub fn push<S: SurfacePrimitive>(&mut self, surface: &S) -> SurfaceId {
        self.push_reals(S::SURFACE_TYPE, &surface.reals())
    }
    /// Append a surface given by its kind and coefficients.
    ///
    /// The caller is responsible for the validity of the coefficients.
    pub(crate) fn push_reals(&mut self, surface_type: SurfaceType, reals: &[f64]) -> SurfaceId {
        debug_assert_eq!(reals.len(), surface_type.num_reals());
        let range = self.reals.extend(reals.iter().copied());
        self.data_offsets.push(range);
        self.types.push(surface_type)
    }
    /// Create a non-owning view of the stored surfaces.
    #[must_use]
    pub fn view(&self) -> Surfaces<'_> {
        Surfaces {
            types: self.types.as_ref(),
            data_offsets: self.data_offsets.as_ref(),
            reals: self.reals.as_ref(),
        }
    }
}

/// Read-only view of a [`SurfaceData`] store.
#[derive(Clone, Copy)]
pub struct Surfaces<'a> {
    types: CollectionRef<'a, SurfaceType, SurfaceTag>,
    data_offsets: CollectionRef<'a, ItemRange<RealTag>, SurfaceTag>,
    reals: CollectionRef<'a, f64, RealTag>,
}
impl<'a> Surfaces<'a> {
    /// Number of surfaces.
    #[must_use]
    pub const fn num_surfaces(&self) -> usize {
        self.types.len()
    }
    /// Kind of the given surface.
    #[must_use]
    pub fn surface_type(&self, id: SurfaceId) -> SurfaceType {
        self.types[id]
    }
    /// Stored coefficients of the given surface.
    #[must_use]
    pub fn reals(&self, id: SurfaceId) -> &'a [f64] {
        self.reals.slice(self.data_offsets[id])
    }
    /// Reconstruct a concrete surface.
    ///
    /// The stored kind must match `S`.
    #[must_use]
    pub fn get<S: SurfacePrimitive>(&self, id: SurfaceId) -> S {
        debug_assert_eq!(self.surface_type(id), S::SURFACE_TYPE);
        S::from_reals(self.reals(id))
    }
    /// Apply an operation to the concrete kind of the given surface.
    pub fn apply<A: SurfaceAction>(&self, id: SurfaceId, action: &mut A) -> A::Output {
        match self.surface_type(id) {
            SurfaceType::Px => action.apply(&self.get::<PlaneX>(id)),
            SurfaceType::Py => action.apply(&self.get::<PlaneY>(id)),
            SurfaceType::Pz => action.apply(&self.get::<PlaneZ>(id)),
            SurfaceType::Cxc => action.apply(&self.get::<CCylX>(id)),
            SurfaceType::Cyc => action.apply(&self.get::<CCylY>(id)),
            SurfaceType::Czc => action.apply(&self.get::<CCylZ>(id)),
            SurfaceType::Sc => action.apply(&self.get::<SphereCentered>(id)),
            SurfaceType::Cx => action.apply(&self.get::<CylX>(id)),
            SurfaceType::Cy => action.apply(&self.get::<CylY>(id)),
            SurfaceType::Cz => action.apply(&self.get::<CylZ>(id)),
            SurfaceType::P => action.apply(&self.get::<Plane>(id)),
            SurfaceType::S => action.apply(&self.get::<Sphere>(id)),
            SurfaceType::Kx => action.apply(&self.get::<ConeX>(id)),
            SurfaceType::Ky => action.apply(&self.get::<ConeY>(id)),
            SurfaceType::Kz => action.apply(&self.get::<ConeZ>(id)),
            SurfaceType::Sq => action.apply(&self.get::<SimpleQuadric>(id)),
            SurfaceType::Gq => action.apply(&self.get::<GeneralQuadric>(id)),
        }
    }
    /// Short human readable description, e.g. `s 1 1 0 0.5625`.
    #[must_use]
    pub fn describe(&self, id: SurfaceId) -> String {
        format!("{} {}", self.surface_type(id), self.reals(id).iter().join(" "))
    }
}

/// Calculate the sense of a point with respect to a surface.
pub struct CalcSense<'a> {
    pos: &'a Point3<f64>,
    tolerance: &'a Tolerance,
}
impl<'a> CalcSense<'a> {
    /// Create the operation for the given position.
    #[must_use]
    pub const fn new(pos: &'a Point3<f64>, tolerance: &'a Tolerance) -> Self {
        Self { pos, tolerance }
    }
}
impl SurfaceAction for CalcSense<'_> {
    type Output = SignedSense;
    fn apply<S: SurfacePrimitive>(&mut self, surface: &S) -> Self::Output {
        surface.calc_sense(self.pos, self.tolerance)
    }
}

/// Calculate the outward normal of a surface at a point.
pub struct CalcNormal<'a> {
    pos: &'a Point3<f64>,
}
impl<'a> CalcNormal<'a> {
    /// Create the operation for the given position.
    #[must_use]
    pub const fn new(pos: &'a Point3<f64>) -> Self {
        Self { pos }
    }
}
impl SurfaceAction for CalcNormal<'_> {
    type Output = Vector3<f64>;
    fn apply<S: SurfacePrimitive>(&mut self, surface: &S) -> Self::Output {
        surface.calc_normal(self.pos)
    }
}

/// Calculate the intersection distances of a ray with a surface.
///
/// The distances are written to the front of the output buffer; the operation returns the number of slots written,
/// which is [`SurfaceType::num_intersections`] of the surface.
pub struct CalcIntersections<'a> {
    pos: &'a Point3<f64>,
    dir: &'a Vector3<f64>,
    on_surface: SurfaceState,
    distances: &'a mut [f64],
}
impl<'a> CalcIntersections<'a> {
    /// Create the operation for the given ray.
    #[must_use]
    pub fn new(
        pos: &'a Point3<f64>,
        dir: &'a Vector3<f64>,
        on_surface: SurfaceState,
        distances: &'a mut [f64],
    ) -> Self {
        Self {
            pos,
            dir,
            on_surface,
            distances,
        }
    }
}
impl SurfaceAction for CalcIntersections<'_> {
    type Output = usize;
    fn apply<S: SurfacePrimitive>(&mut self, surface: &S) -> Self::Output {
        let result = surface.calc_intersections(self.pos, self.dir, self.on_surface);
        let result = result.as_ref();
        self.distances[..result.len()].copy_from_slice(result);
        result.len()
    }
}
