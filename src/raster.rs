//! Rasterized images of a geometry
//!
//! A rectangular window is traced row by row with straight tracks. Each pixel records the volume with the longest
//! track segment inside it. The rows are traced in parallel, each by its own [`Navigator`] on the shared
//! geometry.
use crate::{
    centimeter,
    error::{CsgError, CsgResult},
    geo_params::GeoParams,
    navigator::Navigator,
    propagator::LinearPropagator,
    surface::{
        no_intersection,
        surfaces::{CalcIntersections, CalcSense},
    },
    types::{SignedSense, SurfaceId, SurfaceState, VolumeId},
    utils::{f64_to_usize, usize_to_f64},
};
use image::{Rgb, RgbImage};
use log::{info, warn};
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Instant};
use uom::si::{f64::Length, length::centimeter};

/// Maximum number of navigation steps per pixel before a row is abandoned.
const MAX_STEPS_PER_PIXEL: usize = 64;

/// Window and resolution of a raster image.
///
/// The window is the rectangle spanned by its lower left and upper right corners, with its horizontal axis along
/// the rightward direction. The horizontal resolution follows from square pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageParams {
    lower_left: Point3<Length>,
    upper_right: Point3<Length>,
    rightward: Vector3<f64>,
    vertical_pixels: usize,
}
impl Default for ImageParams {
    /// Window `[-3 cm, 3 cm]²` in the plane `z = 0`, 64 pixels high.
    fn default() -> Self {
        Self {
            lower_left: centimeter!(-3.0, -3.0, 0.0),
            upper_right: centimeter!(3.0, 3.0, 0.0),
            rightward: Vector3::x(),
            vertical_pixels: 64,
        }
    }
}
impl ImageParams {
    /// Create new image parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters do not describe a valid window (see
    /// [`ImageParams::validate`]).
    pub fn new(
        lower_left: Point3<Length>,
        upper_right: Point3<Length>,
        rightward: Vector3<f64>,
        vertical_pixels: usize,
    ) -> CsgResult<Self> {
        let params = Self {
            lower_left,
            upper_right,
            rightward,
            vertical_pixels,
        };
        params.validate()?;
        Ok(params)
    }
    /// Returns the lower left corner of the window.
    #[must_use]
    pub const fn lower_left(&self) -> Point3<Length> {
        self.lower_left
    }
    /// Returns the upper right corner of the window.
    #[must_use]
    pub const fn upper_right(&self) -> Point3<Length> {
        self.upper_right
    }
    /// Returns the horizontal direction of the image.
    #[must_use]
    pub const fn rightward(&self) -> Vector3<f64> {
        self.rightward
    }
    /// Returns the number of pixel rows.
    #[must_use]
    pub const fn vertical_pixels(&self) -> usize {
        self.vertical_pixels
    }
    /// Sets the number of pixel rows.
    ///
    /// # Errors
    ///
    /// This function will return an error if `vertical_pixels` is zero.
    pub fn set_vertical_pixels(&mut self, vertical_pixels: usize) -> CsgResult<()> {
        if vertical_pixels == 0 {
            return Err(CsgError::Raster(
                "number of vertical pixels must be positive".into(),
            ));
        }
        self.vertical_pixels = vertical_pixels;
        Ok(())
    }
    /// Check the window.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the corners or the rightward direction are not finite.
    ///   - the rightward direction is zero.
    ///   - the upper right corner is not to the right of and above the lower left corner.
    ///   - the number of vertical pixels is zero.
    pub fn validate(&self) -> CsgResult<()> {
        self.frame().map(|_| ())
    }
    fn frame(&self) -> CsgResult<Frame> {
        let lower_left = to_centimeter(&self.lower_left);
        let upper_right = to_centimeter(&self.upper_right);
        if lower_left.iter().chain(upper_right.iter()).any(|c| !c.is_finite())
            || self.rightward.iter().any(|c| !c.is_finite())
        {
            return Err(CsgError::Raster("window must be finite".into()));
        }
        if self.vertical_pixels == 0 {
            return Err(CsgError::Raster(
                "number of vertical pixels must be positive".into(),
            ));
        }
        let right = self
            .rightward
            .try_normalize(0.0)
            .ok_or_else(|| CsgError::Raster("rightward direction must not be zero".into()))?;
        let diagonal = upper_right - lower_left;
        let width = diagonal.dot(&right);
        let up = diagonal - width * right;
        let height = up.norm();
        if width <= 0.0 || height <= f64::EPSILON * diagonal.norm() {
            return Err(CsgError::Raster(
                "upper right corner must be right of and above the lower left corner".into(),
            ));
        }
        let up = up / height;
        let pixel_width = height / usize_to_f64(self.vertical_pixels);
        let horizontal_pixels =
            f64_to_usize((width * usize_to_f64(self.vertical_pixels) / height).ceil()).max(1);
        Ok(Frame {
            upper_left: lower_left + height * up,
            right,
            down: -up,
            pixel_width,
            width: horizontal_pixels,
            height: self.vertical_pixels,
        })
    }
}

fn to_centimeter(p: &Point3<Length>) -> Point3<f64> {
    Point3::new(
        p.x.get::<centimeter>(),
        p.y.get::<centimeter>(),
        p.z.get::<centimeter>(),
    )
}

/// Pixel grid in geometry coordinates.
#[derive(Debug, Clone, Copy)]
struct Frame {
    upper_left: Point3<f64>,
    right: Vector3<f64>,
    down: Vector3<f64>,
    pixel_width: f64,
    width: usize,
    height: usize,
}

/// Volumes covering the pixels of a raster image, row by row from the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeImage {
    width: usize,
    height: usize,
    volumes: Vec<VolumeId>,
}
impl VolumeImage {
    /// Number of pixel columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }
    /// Number of pixel rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }
    /// Volume of a pixel, invalid if outside the modeled world.
    ///
    /// # Panics
    ///
    /// Panics if the pixel is out of range.
    #[must_use]
    pub fn get(&self, column: usize, row: usize) -> VolumeId {
        assert!(column < self.width && row < self.height, "pixel out of range");
        self.volumes[row * self.width + column]
    }
    /// All pixels, row by row.
    #[must_use]
    pub fn volumes(&self) -> &[VolumeId] {
        &self.volumes
    }
    /// Color image of the volume ids.
    ///
    /// Volumes are colored with a categorical palette, pixels outside the modeled world are black.
    ///
    /// # Errors
    ///
    /// This function will return an error if the image dimensions exceed the supported size.
    pub fn to_rgb_image(&self) -> CsgResult<RgbImage> {
        let too_large = |_| CsgError::Raster("image too large".into());
        let width = u32::try_from(self.width).map_err(too_large)?;
        let height = u32::try_from(self.height).map_err(too_large)?;
        Ok(RgbImage::from_fn(width, height, |x, y| {
            let volume = self.volumes[y as usize * self.width + x as usize];
            volume.to_index().map_or(Rgb([0, 0, 0]), |i| {
                let c = colorous::CATEGORY10[i % colorous::CATEGORY10.len()];
                Rgb([c.r, c.g, c.b])
            })
        }))
    }
    /// Save the color image to a file. The image format is deduced from the file extension.
    ///
    /// # Errors
    ///
    /// This function will return an error if the image cannot be written.
    pub fn save(&self, path: &Path) -> CsgResult<()> {
        self.to_rgb_image()?.save(path).map_err(|e| {
            CsgError::Raster(format!("writing image {} failed: {e}", path.display()))
        })
    }
}

/// Trace an image of the volume ids of a geometry.
///
/// # Errors
///
/// This function will return an error if the image parameters are invalid.
pub fn rasterize(geo: &GeoParams, params: &ImageParams) -> CsgResult<VolumeImage> {
    let frame = params.frame()?;
    let start = Instant::now();
    let rows: Vec<Vec<VolumeId>> = (0..frame.height)
        .into_par_iter()
        .map(|row| trace_row(geo, &frame, row))
        .collect();
    info!(
        "traced {}x{} pixels in {:.3} s",
        frame.width,
        frame.height,
        start.elapsed().as_secs_f64()
    );
    Ok(VolumeImage {
        width: frame.width,
        height: frame.height,
        volumes: rows.concat(),
    })
}

fn trace_row(geo: &GeoParams, frame: &Frame, row: usize) -> Vec<VolumeId> {
    let dir = frame.right;
    let start =
        frame.upper_left + frame.down * (frame.pixel_width * (usize_to_f64(row) + 0.5));
    let mut pixels = Vec::with_capacity(frame.width);
    let mut nav = Navigator::new(geo);
    nav.locate(start, dir);
    let mut remaining = frame.pixel_width;
    let mut longest = (VolumeId::invalid(), 0.0);
    let max_steps = MAX_STEPS_PER_PIXEL * frame.width;
    let mut steps = 0;
    while pixels.len() < frame.width {
        if steps == max_steps {
            warn!(
                "row {row}: step limit of {max_steps} reached, {} pixels left outside",
                frame.width - pixels.len()
            );
            break;
        }
        steps += 1;
        let volume = nav.current_volume();
        let distance = if nav.is_outside() {
            let pos = nav.pos();
            let distance = nearest_surface(geo, &pos, &dir).min(remaining);
            nav.locate(pos + distance * dir, dir);
            distance
        } else {
            LinearPropagator::new(&mut nav).propagate(remaining).distance
        };
        if distance > longest.1 {
            longest = (volume, distance);
        }
        remaining -= distance;
        if remaining <= 1e-12 * frame.pixel_width {
            pixels.push(longest.0);
            longest = (VolumeId::invalid(), 0.0);
            remaining = frame.pixel_width;
        }
    }
    pixels.resize(frame.width, VolumeId::invalid());
    pixels
}

/// Distance along a ray to the nearest surface of the geometry, [`no_intersection()`] if there is none.
///
/// Used to find the way back into the modeled world, where no volume provides the boundaries.
fn nearest_surface(geo: &GeoParams, pos: &Point3<f64>, dir: &Vector3<f64>) -> f64 {
    let surfaces = geo.surfaces();
    let tolerance = geo.config().tolerance();
    let mut distances = [no_intersection(); 2];
    (0..surfaces.num_surfaces())
        .map(SurfaceId::new)
        .map(|id| {
            let state = if surfaces.apply(id, &mut CalcSense::new(pos, tolerance)) == SignedSense::On {
                SurfaceState::On
            } else {
                SurfaceState::Off
            };
            let count = surfaces.apply(id, &mut CalcIntersections::new(pos, dir, state, &mut distances));
            distances[..count]
                .iter()
                .copied()
                .filter(|d| *d > 0.0)
                .fold(no_intersection(), f64::min)
        })
        .fold(no_intersection(), f64::min)
}
