//! The frozen geometry
//!
//! [`GeoParams`] holds all tables needed for navigation. It is created once by a
//! [`GeoBuilder`](crate::construct::GeoBuilder) and shared read-only (by reference) between any number of
//! concurrently running [`Navigator`](crate::navigator::Navigator)s.
use crate::{
    collection::Collection,
    config::GeoConfig,
    opaque_id::{ItemRange, OpaqueId},
    surface::{SurfaceData, Surfaces},
    types::{SurfaceId, SurfaceTag, UniverseId, VolumeId, VolumeTag},
    volume::{VolumeData, Volumes},
};
use itertools::Itertools;
use std::fmt::Display;

/// Marker for indices into the connectivity column.
#[derive(Debug)]
pub enum ConnectivityTag {}

/// For each surface, the volumes bounded by it.
#[derive(Debug, Clone, Default)]
pub struct Connectivity {
    ranges: Collection<ItemRange<ConnectivityTag>, SurfaceTag>,
    volumes: Collection<VolumeId, ConnectivityTag>,
}
impl Connectivity {
    fn new(num_surfaces: usize, volumes: Volumes<'_>) -> Self {
        let mut per_surface = vec![Vec::new(); num_surfaces];
        for volume in (0..volumes.num_volumes()).map(VolumeId::new) {
            for surface in volumes.get(volume).faces() {
                per_surface[surface.get()].push(volume);
            }
        }
        let mut connectivity = Self::default();
        for list in per_surface {
            let range = connectivity.volumes.extend(list);
            connectivity.ranges.push(range);
        }
        connectivity
    }
    /// Volumes using the given surface as a face, in ascending order.
    #[must_use]
    pub fn volumes(&self, surface: SurfaceId) -> &[VolumeId] {
        self.volumes.slice(self.ranges[surface])
    }
}

/// Immutable geometry tables.
#[derive(Debug, Clone)]
pub struct GeoParams {
    config: GeoConfig,
    surfaces: SurfaceData,
    surface_labels: Vec<String>,
    volumes: VolumeData,
    volume_labels: Vec<String>,
    connectivity: Connectivity,
    max_faces: usize,
    max_intersections: usize,
    max_logic_depth: usize,
}
impl GeoParams {
    pub(crate) fn new(
        config: GeoConfig,
        surfaces: SurfaceData,
        surface_labels: Vec<String>,
        volumes: VolumeData,
        volume_labels: Vec<String>,
        max_logic_depth: usize,
    ) -> Self {
        let view = volumes.view();
        let all = (0..view.num_volumes()).map(|v| view.get(VolumeId::new(v)));
        let max_faces = all.clone().map(|v| v.num_faces()).max().unwrap_or_default();
        let max_intersections = all.map(|v| v.max_intersections()).max().unwrap_or_default();
        let connectivity = Connectivity::new(surfaces.len(), view);
        Self {
            config,
            surfaces,
            surface_labels,
            volumes,
            volume_labels,
            connectivity,
            max_faces,
            max_intersections,
            max_logic_depth,
        }
    }
    /// Returns the configuration of this geometry.
    #[must_use]
    pub const fn config(&self) -> &GeoConfig {
        &self.config
    }
    /// Read-only access to the surfaces.
    #[must_use]
    pub fn surfaces(&self) -> Surfaces<'_> {
        self.surfaces.view()
    }
    /// Read-only access to the volumes.
    #[must_use]
    pub fn volumes(&self) -> Volumes<'_> {
        self.volumes.view()
    }
    /// Surface to volume connectivity.
    #[must_use]
    pub const fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }
    /// Number of surfaces.
    #[must_use]
    pub fn num_surfaces(&self) -> usize {
        self.surfaces.len()
    }
    /// Number of volumes.
    #[must_use]
    pub fn num_volumes(&self) -> usize {
        self.volumes.len()
    }
    /// Number of universes. Currently there is exactly one universe containing all volumes.
    #[must_use]
    pub const fn num_universes(&self) -> usize {
        1
    }
    /// Volumes of the given universe.
    #[must_use]
    pub fn universe_volumes(&self, universe: UniverseId) -> ItemRange<VolumeTag> {
        debug_assert_eq!(universe, UniverseId::new(0), "unknown universe");
        ItemRange::new(0, self.num_volumes())
    }
    /// Largest number of faces of any volume.
    #[must_use]
    pub const fn max_faces(&self) -> usize {
        self.max_faces
    }
    /// Largest number of line intersections of any volume.
    #[must_use]
    pub const fn max_intersections(&self) -> usize {
        self.max_intersections
    }
    /// Deepest logic stack required by any volume.
    #[must_use]
    pub const fn max_logic_depth(&self) -> usize {
        self.max_logic_depth
    }
    /// Label of a volume. The invalid volume is labeled `[OUTSIDE]`.
    #[must_use]
    pub fn id_to_label(&self, volume: VolumeId) -> &str {
        volume
            .to_index()
            .and_then(|i| self.volume_labels.get(i))
            .map_or("[OUTSIDE]", String::as_str)
    }
    /// Label of a surface.
    #[must_use]
    pub fn surface_label(&self, surface: SurfaceId) -> &str {
        surface
            .to_index()
            .and_then(|i| self.surface_labels.get(i))
            .map_or("", String::as_str)
    }
    /// Find the first volume with the given label, invalid if there is none.
    #[must_use]
    pub fn find_volume(&self, label: &str) -> VolumeId {
        self.volume_labels
            .iter()
            .position(|l| l == label)
            .map_or_else(OpaqueId::invalid, OpaqueId::new)
    }
}
impl Display for GeoParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let surfaces = self.surfaces();
        writeln!(f, "surfaces:")?;
        for id in (0..self.num_surfaces()).map(SurfaceId::new) {
            writeln!(
                f,
                "  {id} {:<12} {}  (volumes: {})",
                self.surface_label(id),
                surfaces.describe(id),
                self.connectivity.volumes(id).iter().join(" ")
            )?;
        }
        writeln!(f, "volumes:")?;
        let volumes = self.volumes();
        for id in (0..self.num_volumes()).map(VolumeId::new) {
            let v = volumes.get(id);
            writeln!(
                f,
                "  {id} {:<12} faces [{}] logic '{}'{}",
                self.id_to_label(id),
                v.faces().iter().join(" "),
                v.logic().iter().join(" "),
                if v.internal_surfaces() { " (complex)" } else { "" }
            )?;
        }
        write!(
            f,
            "max. faces: {}, max. intersections: {}, max. logic depth: {}",
            self.max_faces, self.max_intersections, self.max_logic_depth
        )
    }
}
