//! Built-in reference geometries
//!
//! These small geometries are used by the tests, the benchmarks and the `csgeo` binary. Lengths are in cm.
use crate::{
    construct::{GeoBuilder, VolumeInput},
    error::CsgResult,
    geo_params::GeoParams,
    logic::Logic,
    surface::{PlaneX, PlaneY, PlaneZ, Sphere, SphereCentered},
    types::SurfaceId,
};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Selection of a built-in geometry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum GeometryKind {
    /// a single infinite volume
    OneVolume,
    /// sphere of radius 1.5 and its complement
    TwoVolumes,
    /// sphere of radius 1 inside a spherical shell up to radius 2
    ConcentricSpheres,
    /// two spheres inside a box split in two halves, surrounded by an exterior
    #[default]
    FiveVolumes,
}
impl GeometryKind {
    /// Build the selected geometry.
    ///
    /// # Errors
    ///
    /// This function will return an error if the geometry construction fails.
    pub fn build(self) -> CsgResult<GeoParams> {
        match self {
            Self::OneVolume => one_volume(),
            Self::TwoVolumes => two_volumes(1.5),
            Self::ConcentricSpheres => concentric_spheres(1.0, 2.0),
            Self::FiveVolumes => five_volumes(),
        }
    }
}

fn insert_volume(builder: &mut GeoBuilder, label: &str, faces: &[SurfaceId], logic: &str) -> CsgResult<()> {
    builder.insert_volume(&VolumeInput {
        label: label.to_owned(),
        faces: faces.to_vec(),
        logic: Logic::from_str(logic)?,
    })?;
    Ok(())
}

/// A single volume with no faces filling all space.
///
/// # Errors
///
/// This function will return an error if the geometry construction fails.
pub fn one_volume() -> CsgResult<GeoParams> {
    let mut b = GeoBuilder::new();
    insert_volume(&mut b, "infinite", &[], "*")?;
    b.build()
}

/// A sphere around the origin (volume "inside") and everything else (volume "outside").
///
/// # Errors
///
/// This function will return an error if the geometry construction fails (e.g. for a non-finite radius).
pub fn two_volumes(radius: f64) -> CsgResult<GeoParams> {
    let mut b = GeoBuilder::new();
    let s = b.insert_primitive("sphere", &Sphere::new(Point3::origin(), radius))?;
    insert_volume(&mut b, "inside", &[s], "0")?;
    insert_volume(&mut b, "outside", &[s], "0 ~")?;
    b.build()
}

/// Volume "inner" within the sphere of radius `inner`, volume "shell" between both spheres. Beyond the outer sphere
/// is outside of the modeled world.
///
/// # Errors
///
/// This function will return an error if the geometry construction fails.
pub fn concentric_spheres(inner: f64, outer: f64) -> CsgResult<GeoParams> {
    let mut b = GeoBuilder::new();
    let s0 = b.insert_primitive("inner.s", &SphereCentered::new(inner))?;
    let s1 = b.insert_primitive("outer.s", &SphereCentered::new(outer))?;
    insert_volume(&mut b, "inner", &[s0], "0")?;
    insert_volume(&mut b, "shell", &[s0, s1], "0 ~ 1 &")?;
    b.build()
}

/// The box `[-2, 2]³` split at `x = 0` into volumes "a" (`x < 0`) and "b" (`x > 0`). Volume "b" contains the
/// spheres "c" around `(1, 1, 0)` and "d" around `(1, -1, 0)`, both of radius 0.75. Volume "exterior" is everything
/// outside the box.
///
/// # Errors
///
/// This function will return an error if the geometry construction fails.
pub fn five_volumes() -> CsgResult<GeoParams> {
    let mut b = GeoBuilder::new();
    let s: Vec<SurfaceId> = vec![
        b.insert_primitive("x.lo", &PlaneX::new(-2.0))?,
        b.insert_primitive("x.hi", &PlaneX::new(2.0))?,
        b.insert_primitive("y.lo", &PlaneY::new(-2.0))?,
        b.insert_primitive("y.hi", &PlaneY::new(2.0))?,
        b.insert_primitive("z.lo", &PlaneZ::new(-2.0))?,
        b.insert_primitive("z.hi", &PlaneZ::new(2.0))?,
        b.insert_primitive("mid", &PlaneX::new(0.0))?,
        b.insert_primitive("c.s", &Sphere::new(Point3::new(1.0, 1.0, 0.0), 0.75))?,
        b.insert_primitive("d.s", &Sphere::new(Point3::new(1.0, -1.0, 0.0), 0.75))?,
    ];
    insert_volume(&mut b, "exterior", &s[0..6], "0 ~ 1 & 2 ~ & 3 & 4 ~ & 5 & ~")?;
    insert_volume(
        &mut b,
        "a",
        &[s[0], s[2], s[3], s[4], s[5], s[6]],
        "0 ~ 1 ~ & 2 & 3 ~ & 4 & 5 &",
    )?;
    insert_volume(
        &mut b,
        "b",
        &s[1..9],
        "0 1 ~ & 2 & 3 ~ & 4 & 5 ~ & 6 ~ & 7 ~ &",
    )?;
    insert_volume(&mut b, "c", &[s[7]], "0")?;
    insert_volume(&mut b, "d", &[s[8]], "0")?;
    b.build()
}
