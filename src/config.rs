//! Configuration of the geometry engine.
use crate::{
    error::{CsgError, CsgResult},
    types::SignedSense,
};
use serde::{Deserialize, Serialize};

/// Tolerance used for "on surface" classification and for distance ties.
///
/// A signed surface value `v` is classified as [`SignedSense::On`] if `|v| <= max(abs, rel * scale)`
/// where `scale` is the characteristic magnitude of the surface (see
/// [`SurfacePrimitive::sense_scale`](crate::surface::SurfacePrimitive::sense_scale)).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTolerance")]
pub struct Tolerance {
    rel: f64,
    abs: f64,
}
/// Unchecked serialized form of a [`Tolerance`].
#[derive(Deserialize)]
struct RawTolerance {
    rel: f64,
    abs: f64,
}
impl TryFrom<RawTolerance> for Tolerance {
    type Error = CsgError;

    fn try_from(raw: RawTolerance) -> CsgResult<Self> {
        Self::new(raw.rel, raw.abs)
    }
}
impl Default for Tolerance {
    /// Create a default tolerance with `rel = 1e-12` and `abs = 1e-12`.
    fn default() -> Self {
        Self {
            rel: 1e-12,
            abs: 1e-12,
        }
    }
}
impl Tolerance {
    /// Creates a new [`Tolerance`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - `rel` is not in the range `[0.0, 1.0)`.
    ///   - `abs` is negative or not finite.
    pub fn new(rel: f64, abs: f64) -> CsgResult<Self> {
        if !(0.0..1.0).contains(&rel) {
            return Err(CsgError::Config(
                "relative tolerance must be in the range [0.0, 1.0)".into(),
            ));
        }
        if !abs.is_finite() || abs.is_sign_negative() {
            return Err(CsgError::Config(
                "absolute tolerance must be >=0.0 and finite".into(),
            ));
        }
        Ok(Self { rel, abs })
    }
    /// Returns the relative tolerance.
    #[must_use]
    pub const fn rel(&self) -> f64 {
        self.rel
    }
    /// Returns the absolute tolerance.
    #[must_use]
    pub const fn abs(&self) -> f64 {
        self.abs
    }
    /// Width of the "on" band for a surface value of the given characteristic magnitude.
    #[must_use]
    pub fn band(&self, scale: f64) -> f64 {
        self.abs.max(self.rel * scale.abs())
    }
    /// Classify a signed surface value.
    #[must_use]
    pub fn classify(&self, value: f64, scale: f64) -> SignedSense {
        let band = self.band(scale);
        if value > band {
            SignedSense::Outside
        } else if value < -band {
            SignedSense::Inside
        } else {
            SignedSense::On
        }
    }
    /// Returns true if two distances are equal within this tolerance.
    #[must_use]
    pub fn is_tie(&self, a: f64, b: f64) -> bool {
        approx::relative_eq!(a, b, epsilon = self.abs, max_relative = self.rel)
    }
}

/// Global configuration of a geometry. It is frozen together with the geometry tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoConfig {
    tolerance: Tolerance,
    prefer_hinted_face_on_tie: bool,
}
impl Default for GeoConfig {
    /// Create a default config with the following parameters:
    ///   - tolerance: [`Tolerance::default`]
    ///   - prefer the face the point is currently on when distances tie: `true`
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            prefer_hinted_face_on_tie: true,
        }
    }
}
impl GeoConfig {
    /// Returns the tolerance of this [`GeoConfig`].
    #[must_use]
    pub const fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }
    /// Sets the tolerance of this [`GeoConfig`].
    pub fn set_tolerance(&mut self, tolerance: Tolerance) {
        self.tolerance = tolerance;
    }
    /// Returns whether a tie between crossing distances is resolved in favor of the face the point is on.
    ///
    /// If false (or if the hinted face is not part of the tie), the lowest face id wins.
    #[must_use]
    pub const fn prefer_hinted_face_on_tie(&self) -> bool {
        self.prefer_hinted_face_on_tie
    }
    /// Sets the tie-break policy of this [`GeoConfig`].
    pub fn set_prefer_hinted_face_on_tie(&mut self, prefer: bool) {
        self.prefer_hinted_face_on_tie = prefer;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn tolerance_new() {
        assert!(Tolerance::new(-0.1, 1e-10).is_err());
        assert!(Tolerance::new(1.0, 1e-10).is_err());
        assert!(Tolerance::new(f64::NAN, 1e-10).is_err());
        assert!(Tolerance::new(1e-8, -1.0).is_err());
        assert!(Tolerance::new(1e-8, f64::INFINITY).is_err());
        let t = Tolerance::new(1e-8, 1e-10).unwrap();
        assert_eq!(t.rel(), 1e-8);
        assert_eq!(t.abs(), 1e-10);
    }
    #[test]
    fn classify() {
        let t = Tolerance::new(1e-6, 1e-9).unwrap();
        assert_eq!(t.classify(1e-3, 1.0), SignedSense::Outside);
        assert_eq!(t.classify(-1e-3, 1.0), SignedSense::Inside);
        assert_eq!(t.classify(1e-10, 1.0), SignedSense::On);
        assert_eq!(t.classify(0.0, 1.0), SignedSense::On);
        // band grows with the surface scale
        assert_eq!(t.classify(1e-5, 100.0), SignedSense::On);
        assert_eq!(t.classify(-1e-5, 1.0), SignedSense::Inside);
    }
    #[test]
    fn ties() {
        let t = Tolerance::default();
        assert!(t.is_tie(1.0, 1.0));
        assert!(t.is_tie(1.0, 1.0 + 1e-14));
        assert!(!t.is_tie(1.0, 1.0 + 1e-6));
    }
    #[test]
    fn geo_config_default() {
        let c = GeoConfig::default();
        assert_eq!(c.tolerance(), &Tolerance::default());
        assert!(c.prefer_hinted_face_on_tie());
    }
    #[test]
    fn geo_config_setters() {
        let mut c = GeoConfig::default();
        c.set_prefer_hinted_face_on_tie(false);
        c.set_tolerance(Tolerance::new(0.0, 1e-6).unwrap());
        assert!(!c.prefer_hinted_face_on_tie());
        assert_eq!(c.tolerance().abs(), 1e-6);
    }
    #[test]
    fn geo_config_serde() {
        let c = GeoConfig::default();
        let s = serde_json::to_string(&c).unwrap();
        let back: GeoConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(back, c);
    }
    #[test]
    fn tolerance_serde_validates() {
        let t: Tolerance = serde_json::from_str(r#"{"rel":1e-8,"abs":1e-10}"#).unwrap();
        assert_eq!(t, Tolerance::new(1e-8, 1e-10).unwrap());
        assert!(serde_json::from_str::<Tolerance>(r#"{"rel":1e-8,"abs":-1.0}"#).is_err());
        assert!(serde_json::from_str::<Tolerance>(r#"{"rel":1.0,"abs":1e-10}"#).is_err());
        let config = r#"{"tolerance":{"rel":-0.5,"abs":1e-10},"prefer_hinted_face_on_tie":true}"#;
        let err = serde_json::from_str::<GeoConfig>(config).unwrap_err();
        assert!(err.to_string().contains("relative tolerance"));
    }
}
