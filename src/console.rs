//! Handling the csgeo CLI
//!
//! This module handles the command line parsing as well as basic information (e.g. help dialog, version information, etc.).
use crate::{
    error::{CsgError, CsgResult},
    get_version,
    raster::ImageParams,
    testgeo::GeometryKind,
};
use clap::{builder::Str, Parser};
use itertools::Itertools;
use nalgebra::{Point3, Vector3};
use std::{path::PathBuf, str::FromStr};
use strum::IntoEnumIterator;
use uom::si::{f64::Length, length::centimeter};

/// Command line arguments for the csgeo application.
#[derive(Debug)]
pub struct Args {
    /// geometry to be loaded
    pub geometry: GeometryKind,
    /// destination of the rendered image
    pub output: PathBuf,
    /// window and resolution of the image
    pub image: ImageParams,
    /// only print the geometry tables instead of rendering an image
    pub describe: bool,
}

#[derive(Parser, Debug, Default)]
#[command(author, version = Str::from(&get_version()), about, long_about = None)]
pub struct PartialArgs {
    /// built-in geometry (one-volume, two-volumes, concentric-spheres, five-volumes)
    #[arg(short, long)]
    geometry: Option<String>,

    /// file path of the png image. if not defined, the geometry name is used
    #[arg(short, long)]
    output: Option<String>,

    /// number of vertical pixels
    #[arg(short, long)]
    pixels: Option<usize>,

    /// lower left corner of the window in cm, as "x,y,z"
    #[arg(long)]
    lower_left: Option<String>,

    /// upper right corner of the window in cm, as "x,y,z"
    #[arg(long)]
    upper_right: Option<String>,

    /// horizontal direction of the image, as "x,y,z"
    #[arg(long)]
    rightward: Option<String>,

    /// print the surface and volume tables of the geometry and exit
    #[arg(short, long)]
    describe: bool,
}

/// Evaluates if the passed geometry name is valid.
fn eval_geometry_input(geometry_input: &str) -> Option<GeometryKind> {
    GeometryKind::from_str(geometry_input).ok()
}

/// Parses a comma separated triple of numbers.
fn eval_triple_input(input: &str) -> Option<[f64; 3]> {
    let values: Vec<f64> = input
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    values.try_into().ok()
}

fn triple_arg(input: Option<&str>, name: &str) -> CsgResult<Option<[f64; 3]>> {
    input
        .map(|i| {
            eval_triple_input(i).ok_or_else(|| {
                CsgError::Console(format!("invalid {name} '{i}', expected three comma separated numbers"))
            })
        })
        .transpose()
}

fn to_length_point(v: [f64; 3]) -> Point3<Length> {
    Point3::new(
        Length::new::<centimeter>(v[0]),
        Length::new::<centimeter>(v[1]),
        Length::new::<centimeter>(v[2]),
    )
}

impl TryFrom<PartialArgs> for Args {
    type Error = CsgError;

    fn try_from(part_args: PartialArgs) -> CsgResult<Self> {
        let geometry = match part_args.geometry.as_deref() {
            Some(g) => eval_geometry_input(g).ok_or_else(|| {
                CsgError::Console(format!(
                    "unknown geometry '{g}', choose one of: {}",
                    GeometryKind::iter().join(", ")
                ))
            })?,
            None => GeometryKind::default(),
        };
        let output = part_args
            .output
            .map_or_else(|| PathBuf::from(format!("{geometry}.png")), PathBuf::from);

        let default = ImageParams::default();
        let lower_left = triple_arg(part_args.lower_left.as_deref(), "lower left corner")?
            .map_or_else(|| default.lower_left(), to_length_point);
        let upper_right = triple_arg(part_args.upper_right.as_deref(), "upper right corner")?
            .map_or_else(|| default.upper_right(), to_length_point);
        let rightward = triple_arg(part_args.rightward.as_deref(), "rightward direction")?
            .map_or_else(|| default.rightward(), Vector3::from);
        let pixels = part_args.pixels.unwrap_or_else(|| default.vertical_pixels());
        let image = ImageParams::new(lower_left, upper_right, rightward, pixels)?;
        Ok(Self {
            geometry,
            output,
            image,
            describe: part_args.describe,
        })
    }
}

/// Creates the banner shown at program start.
#[must_use]
pub fn create_intro() -> String {
    format!(
        "{: ^79}\n{: ^79}\n",
        "csgeo - surface based constructive solid geometry",
        format!("version {}", get_version())
    )
}
