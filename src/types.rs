//! Basic geometry types shared by all modules.
use crate::opaque_id::OpaqueId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use strum::EnumIter;

/// Marker for surface handles.
#[derive(Debug)]
pub enum SurfaceTag {}
/// Marker for volume handles.
#[derive(Debug)]
pub enum VolumeTag {}
/// Marker for volume-local face handles.
#[derive(Debug)]
pub enum FaceTag {}
/// Marker for universe handles.
#[derive(Debug)]
pub enum UniverseTag {}

/// Global index of a surface.
pub type SurfaceId = OpaqueId<SurfaceTag>;
/// Global index of a volume. The invalid id denotes "outside the modeled world".
pub type VolumeId = OpaqueId<VolumeTag>;
/// Volume-local index of a face (`0..num_faces`).
pub type FaceId = OpaqueId<FaceTag>;
/// Index of a universe.
pub type UniverseId = OpaqueId<UniverseTag>;

/// Whether a point is inside or outside a surface.
///
/// The "outside" of a surface is the side the outward normal points to (positive quadric value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Sense {
    /// negative side of the surface
    Inside,
    /// positive side of the surface
    Outside,
}
impl Sense {
    /// Return the opposite sense.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Inside => Self::Outside,
            Self::Outside => Self::Inside,
        }
    }
    /// Single character representation (`-` inside, `+` outside).
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Inside => '-',
            Self::Outside => '+',
        }
    }
}
impl Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Sense of a point with respect to a surface, including the "exactly on" case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum SignedSense {
    /// strictly on the negative side
    Inside,
    /// within tolerance of the surface
    On,
    /// strictly on the positive side
    Outside,
}
impl SignedSense {
    /// Collapse to a [`Sense`]. Points on the surface count as outside.
    #[must_use]
    pub const fn to_sense(self) -> Sense {
        match self {
            Self::Inside => Sense::Inside,
            Self::On | Self::Outside => Sense::Outside,
        }
    }
}

/// Whether the current point is known to lie on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    /// no a-priori knowledge
    #[default]
    Off,
    /// the point is on the surface by construction
    On,
}

/// Cartesian axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Axis {
    /// x axis
    X,
    /// y axis
    Y,
    /// z axis
    Z,
}
impl Axis {
    /// Index of this axis into a 3-vector.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
    /// The two axes perpendicular to this one.
    #[must_use]
    pub const fn perpendicular(self) -> (Self, Self) {
        match self {
            Self::X => (Self::Y, Self::Z),
            Self::Y => (Self::X, Self::Z),
            Self::Z => (Self::X, Self::Y),
        }
    }
}

/// Format a list of senses as `{- + -}`.
#[must_use]
pub fn senses_to_string(senses: &[Sense]) -> String {
    let inner: Vec<String> = senses.iter().map(ToString::to_string).collect();
    format!("{{{}}}", inner.join(" "))
}
