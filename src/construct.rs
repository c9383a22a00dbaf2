//! Construction of a geometry
//!
//! Surfaces and volumes are inserted one by one, validated eagerly and assigned ids in insertion order. After all
//! insertions, [`GeoBuilder::build`] freezes the tables into an immutable [`GeoParams`].
use crate::{
    config::GeoConfig,
    error::{CsgError, CsgResult},
    geo_params::GeoParams,
    logic::Logic,
    surface::{Surfaces, SurfaceData, SurfacePrimitive, SurfaceType},
    types::{SurfaceId, VolumeId},
    volume::VolumeData,
};
use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Description of a surface as delivered by a geometry loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceInput {
    /// name of the surface
    #[serde(default)]
    pub label: String,
    /// kind of the surface
    #[serde(rename = "type")]
    pub surface_type: SurfaceType,
    /// coefficients, see [`SurfaceType::num_reals`]
    pub data: Vec<f64>,
}

/// Description of a volume as delivered by a geometry loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInput {
    /// name of the volume
    #[serde(default)]
    pub label: String,
    /// bounding surfaces in local face order
    pub faces: Vec<SurfaceId>,
    /// postfix membership logic over the local faces
    pub logic: Logic,
}

/// Validates and stores surfaces.
#[derive(Debug, Default)]
pub struct SurfaceInserter {
    data: SurfaceData,
    labels: Vec<String>,
}
impl SurfaceInserter {
    /// Number of inserted surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }
    /// Returns true if no surface has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Read-only access to the inserted surfaces.
    #[must_use]
    pub fn surfaces(&self) -> Surfaces<'_> {
        self.data.view()
    }
    /// Insert a surface.
    ///
    /// Coefficients of a general plane are normalized so that its normal has unit length.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the number of coefficients does not match the surface kind.
    ///   - any coefficient is not finite.
    ///   - a squared radius (or squared cone tangent) is negative.
    ///   - the normal of a general plane is zero.
    pub fn insert(&mut self, input: &SurfaceInput) -> CsgResult<SurfaceId> {
        let surface_type = input.surface_type;
        let expected = surface_type.num_reals();
        if input.data.len() != expected {
            return Err(CsgError::Surface(format!(
                "surface '{}' of type {surface_type} requires {expected} coefficients, got {}",
                input.label,
                input.data.len()
            )));
        }
        if input.data.iter().any(|c| !c.is_finite()) {
            return Err(CsgError::Surface(format!(
                "coefficients of surface '{}' must be finite",
                input.label
            )));
        }
        let mut reals = input.data.clone();
        let squared = match surface_type {
            SurfaceType::Cxc | SurfaceType::Cyc | SurfaceType::Czc | SurfaceType::Sc => Some(0),
            SurfaceType::Cx | SurfaceType::Cy | SurfaceType::Cz => Some(2),
            SurfaceType::S | SurfaceType::Kx | SurfaceType::Ky | SurfaceType::Kz => Some(3),
            _ => None,
        };
        if let Some(index) = squared {
            if reals[index] < 0.0 {
                return Err(CsgError::Surface(format!(
                    "squared radius of surface '{}' must not be negative",
                    input.label
                )));
            }
        }
        if surface_type == SurfaceType::P {
            let norm = reals[..3].iter().map(|c| c * c).sum::<f64>().sqrt();
            if norm == 0.0 {
                return Err(CsgError::Surface(format!(
                    "normal of plane '{}' must not be zero",
                    input.label
                )));
            }
            reals.iter_mut().for_each(|c| *c /= norm);
        }
        let id = self.data.push_reals(surface_type, &reals);
        self.labels.push(input.label.clone());
        debug!("inserted surface {id} '{}': {}", input.label, self.data.view().describe(id));
        Ok(id)
    }
    /// Insert a concrete surface.
    ///
    /// # Errors
    ///
    /// This function will return an error if the surface coefficients are invalid (see [`SurfaceInserter::insert`]).
    pub fn insert_primitive<S: SurfacePrimitive>(
        &mut self,
        label: &str,
        surface: &S,
    ) -> CsgResult<SurfaceId> {
        self.insert(&SurfaceInput {
            label: label.to_owned(),
            surface_type: S::SURFACE_TYPE,
            data: surface.reals(),
        })
    }
    fn finish(self) -> (SurfaceData, Vec<String>) {
        (self.data, self.labels)
    }
}

/// Validates and stores volumes.
#[derive(Debug, Default)]
pub struct VolumeInserter {
    data: VolumeData,
    labels: Vec<String>,
    max_faces: usize,
    max_intersections: usize,
    max_logic_depth: usize,
}
impl VolumeInserter {
    /// Number of inserted volumes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }
    /// Returns true if no volume has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Largest number of faces of any inserted volume.
    #[must_use]
    pub const fn max_faces(&self) -> usize {
        self.max_faces
    }
    /// Largest number of line intersections of any inserted volume.
    #[must_use]
    pub const fn max_intersections(&self) -> usize {
        self.max_intersections
    }
    /// Deepest logic stack required by any inserted volume.
    #[must_use]
    pub const fn max_logic_depth(&self) -> usize {
        self.max_logic_depth
    }
    /// Insert a volume bounded by the given surfaces.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - a face refers to a surface not contained in `surfaces`.
    ///   - a surface is used more than once as face.
    ///   - the logic expression is malformed (see [`Logic::validate`]).
    pub fn insert(&mut self, surfaces: Surfaces<'_>, input: &VolumeInput) -> CsgResult<VolumeId> {
        let num_surfaces = surfaces.num_surfaces();
        if let Some(bad) = input
            .faces
            .iter()
            .find(|s| !s.to_index().is_some_and(|i| i < num_surfaces))
        {
            return Err(CsgError::Volume(format!(
                "volume '{}' refers to surface {bad} but only {num_surfaces} surfaces exist",
                input.label
            )));
        }
        if !input.faces.iter().all_unique() {
            return Err(CsgError::Volume(format!(
                "volume '{}' uses a surface more than once",
                input.label
            )));
        }
        let depth = input.logic.validate(input.faces.len()).map_err(|e| {
            CsgError::Volume(format!("invalid logic of volume '{}': {e}", input.label))
        })?;
        let max_intersections = input
            .faces
            .iter()
            .map(|s| surfaces.surface_type(*s).num_intersections())
            .sum();
        let id = self.data.push(&input.faces, &input.logic, max_intersections);
        self.labels.push(input.label.clone());
        self.max_faces = self.max_faces.max(input.faces.len());
        self.max_intersections = self.max_intersections.max(max_intersections);
        self.max_logic_depth = self.max_logic_depth.max(depth);
        debug!(
            "inserted volume {id} '{}' with {} faces: {}",
            input.label,
            input.faces.len(),
            input.logic
        );
        Ok(id)
    }
    fn finish(self) -> (VolumeData, Vec<String>) {
        (self.data, self.labels)
    }
}

/// Builder for an immutable [`GeoParams`].
#[derive(Debug, Default)]
pub struct GeoBuilder {
    config: GeoConfig,
    surfaces: SurfaceInserter,
    volumes: VolumeInserter,
}
impl GeoBuilder {
    /// Create a new builder with the default [`GeoConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Create a new builder with the given [`GeoConfig`].
    #[must_use]
    pub fn with_config(config: GeoConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
    /// Insert a surface.
    ///
    /// # Errors
    ///
    /// This function will return an error if the surface is invalid (see [`SurfaceInserter::insert`]).
    pub fn insert_surface(&mut self, input: &SurfaceInput) -> CsgResult<SurfaceId> {
        self.surfaces.insert(input)
    }
    /// Insert a concrete surface.
    ///
    /// # Errors
    ///
    /// This function will return an error if the surface is invalid (see [`SurfaceInserter::insert`]).
    pub fn insert_primitive<S: SurfacePrimitive>(
        &mut self,
        label: &str,
        surface: &S,
    ) -> CsgResult<SurfaceId> {
        self.surfaces.insert_primitive(label, surface)
    }
    /// Insert a volume. All faces must have been inserted before.
    ///
    /// # Errors
    ///
    /// This function will return an error if the volume is invalid (see [`VolumeInserter::insert`]).
    pub fn insert_volume(&mut self, input: &VolumeInput) -> CsgResult<VolumeId> {
        self.volumes.insert(self.surfaces.surfaces(), input)
    }
    /// Deepest logic stack required by any inserted volume.
    #[must_use]
    pub const fn max_logic_depth(&self) -> usize {
        self.volumes.max_logic_depth()
    }
    /// Freeze the inserted surfaces and volumes.
    ///
    /// # Errors
    ///
    /// This function will return an error if no volume has been inserted.
    pub fn build(self) -> CsgResult<GeoParams> {
        if self.volumes.is_empty() {
            return Err(CsgError::Geometry("geometry contains no volumes".into()));
        }
        let max_logic_depth = self.volumes.max_logic_depth();
        let (volumes, volume_labels) = self.volumes.finish();
        let (surfaces, surface_labels) = self.surfaces.finish();
        let geo = GeoParams::new(
            self.config,
            surfaces,
            surface_labels,
            volumes,
            volume_labels,
            max_logic_depth,
        );
        info!(
            "built geometry with {} surfaces and {} volumes (max. {} faces, {} intersections, logic depth {})",
            geo.num_surfaces(),
            geo.num_volumes(),
            geo.max_faces(),
            geo.max_intersections(),
            geo.max_logic_depth()
        );
        Ok(geo)
    }
}
