//! Tone-curve parameters.
//!
//! [`CurveConfig`] holds the scalars the [`crate::CurveBuilder`] turns into
//! control points. Exposure bounds are in stops relative to mid-grey, so the
//! radiometric domain of the curve is
//! `[grey.x * 2^min_exposure, grey.x * 2^max_exposure]`.
//!
//! The toe constants below were tuned by eye for a "near black but not
//! black" toe; they are part of the curve's look and must not drift.

use gamut_core::{Point2, error::ensure_finite};
use gamut_transfer::Shaper;
use serde::{Deserialize, Serialize};

use crate::{CurveError, CurveResult};

/// Smallest accepted mid-section slope.
pub const SLOPE_MIN: f32 = 1.02;
/// Largest accepted mid-section slope.
pub const SLOPE_MAX: f32 = 6.5;

/// Default display value of the curve origin.
pub const ORIGIN_DISPLAY_Y: f32 = 0.00001;
/// Display value of the toe's inner control point (P1).
pub const TOE_CONTROL_Y: f32 = 0.00055;
/// Display value where the toe hands over to the mid section (P2).
pub const TOE_END_Y: f32 = 0.085;

/// Scalar parameters of the tone curve.
///
/// # Example
///
/// ```rust
/// use gamut_curve::CurveConfig;
///
/// let config = CurveConfig::default().with_slope(1.8);
/// config.validate().unwrap();
/// assert!((config.max_radiometric_value() - 11.52).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Slope of the straight section through mid-grey.
    pub slope: f32,
    /// Curve origin. `None` places it at `(min radiometric, ORIGIN_DISPLAY_Y)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Point2>,
    /// Mid-grey anchor (scene x, display y).
    pub mid_grey: Point2,
    /// Lower exposure bound in stops below mid-grey.
    pub min_exposure: f32,
    /// Upper exposure bound in stops above mid-grey.
    pub max_exposure: f32,
    /// Display value at the top of the shoulder.
    pub max_display_value: f32,
    /// Chromaticity-compression threshold in normalized log2 units.
    pub max_latitude: f32,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            slope: 2.2,
            origin: None,
            mid_grey: Point2::splat(0.18),
            min_exposure: -6.0,
            max_exposure: 6.0,
            max_display_value: 1.0,
            max_latitude: 0.85,
        }
    }
}

impl CurveConfig {
    /// Creates a config from the scalar curve parameters.
    pub fn new(slope: f32, origin: Point2, mid_grey: Point2, min_exposure: f32, max_exposure: f32) -> Self {
        Self {
            slope,
            origin: Some(origin),
            mid_grey,
            min_exposure,
            max_exposure,
            ..Self::default()
        }
    }

    /// Sets the slope.
    pub fn with_slope(mut self, slope: f32) -> Self {
        self.slope = slope;
        self
    }

    /// Sets the exposure bounds in stops.
    pub fn with_exposure_range(mut self, min_exposure: f32, max_exposure: f32) -> Self {
        self.min_exposure = min_exposure;
        self.max_exposure = max_exposure;
        self
    }

    /// Sets the chromaticity-compression latitude.
    pub fn with_max_latitude(mut self, max_latitude: f32) -> Self {
        self.max_latitude = max_latitude;
        self
    }

    /// Smallest scene value covered by the exposure range.
    #[inline]
    pub fn min_radiometric_value(&self) -> f32 {
        self.mid_grey.x * self.min_exposure.exp2()
    }

    /// Largest scene value covered by the exposure range.
    #[inline]
    pub fn max_radiometric_value(&self) -> f32 {
        self.mid_grey.x * self.max_exposure.exp2()
    }

    /// Effective origin (P0).
    #[inline]
    pub fn origin(&self) -> Point2 {
        self.origin
            .unwrap_or_else(|| Point2::new(self.min_radiometric_value(), ORIGIN_DISPLAY_Y))
    }

    /// Display value of the origin.
    #[inline]
    pub fn min_display_value(&self) -> f32 {
        self.origin().y
    }

    /// Log2 shaper pivoting at mid-grey over the exposure range.
    pub fn shaper(&self) -> CurveResult<Shaper> {
        Ok(Shaper::log2(self.mid_grey.x, self.min_exposure, self.max_exposure)?)
    }

    /// Checks every invariant the builder relies on.
    pub fn validate(&self) -> CurveResult<()> {
        let origin = self.origin();
        ensure_finite("slope", self.slope)?;
        ensure_finite("origin.x", origin.x)?;
        ensure_finite("origin.y", origin.y)?;
        ensure_finite("mid_grey.x", self.mid_grey.x)?;
        ensure_finite("mid_grey.y", self.mid_grey.y)?;
        ensure_finite("min_exposure", self.min_exposure)?;
        ensure_finite("max_exposure", self.max_exposure)?;
        ensure_finite("max_display_value", self.max_display_value)?;
        ensure_finite("max_latitude", self.max_latitude)?;

        if !(SLOPE_MIN..=SLOPE_MAX).contains(&self.slope) {
            return Err(invalid(format!(
                "slope {} outside [{SLOPE_MIN}, {SLOPE_MAX}]",
                self.slope
            )));
        }
        if self.min_exposure >= self.max_exposure {
            return Err(invalid(format!(
                "min exposure {} must be below max exposure {}",
                self.min_exposure, self.max_exposure
            )));
        }
        if self.mid_grey.x <= 0.0 {
            return Err(invalid(format!("mid-grey x {} must be > 0", self.mid_grey.x)));
        }
        if !(origin.x > 0.0 && origin.x < self.mid_grey.x) {
            return Err(invalid(format!(
                "origin x {} must lie in (0, {})",
                origin.x, self.mid_grey.x
            )));
        }
        if self.max_radiometric_value() <= self.mid_grey.x {
            return Err(invalid(format!(
                "max exposure {} leaves no shoulder above mid-grey",
                self.max_exposure
            )));
        }
        if !(origin.y >= 0.0 && origin.y < TOE_END_Y) {
            return Err(invalid(format!(
                "origin y {} must lie in [0, {TOE_END_Y})",
                origin.y
            )));
        }
        if !(self.mid_grey.y > TOE_END_Y && self.mid_grey.y < self.max_display_value) {
            return Err(invalid(format!(
                "mid-grey y {} must lie in ({TOE_END_Y}, {})",
                self.mid_grey.y, self.max_display_value
            )));
        }
        if !(0.0..=1.0).contains(&self.max_latitude) {
            return Err(invalid(format!(
                "max latitude {} outside [0, 1]",
                self.max_latitude
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> CurveError {
    CurveError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_valid() {
        let c = CurveConfig::default();
        c.validate().unwrap();
        assert_relative_eq!(c.origin().x, 0.0028125, max_relative = 1e-6);
        assert_eq!(c.min_display_value(), ORIGIN_DISPLAY_Y);
    }

    #[test]
    fn test_zero_slope_rejected() {
        let err = CurveConfig::default().with_slope(0.0).validate().unwrap_err();
        assert!(matches!(err, CurveError::InvalidConfig(_)));
    }

    #[test]
    fn test_slope_bounds() {
        assert!(CurveConfig::default().with_slope(SLOPE_MIN).validate().is_ok());
        assert!(CurveConfig::default().with_slope(SLOPE_MAX).validate().is_ok());
        assert!(CurveConfig::default().with_slope(6.6).validate().is_err());
        assert!(CurveConfig::default().with_slope(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_exposure_order() {
        assert!(CurveConfig::default().with_exposure_range(2.0, 2.0).validate().is_err());
        assert!(CurveConfig::default().with_exposure_range(-7.0, 5.7).validate().is_ok());
        assert!(CurveConfig::default().with_exposure_range(-7.0, -1.0).validate().is_err());
    }

    #[test]
    fn test_origin_bounds() {
        let bad = CurveConfig::new(2.2, Point2::new(0.5, 0.00001), Point2::splat(0.18), -6.0, 6.0);
        assert!(bad.validate().is_err());
        let bad_y = CurveConfig::new(2.2, Point2::new(0.001, 0.1), Point2::splat(0.18), -6.0, 6.0);
        assert!(bad_y.validate().is_err());
    }

    #[test]
    fn test_latitude_bounds() {
        assert!(CurveConfig::default().with_max_latitude(1.2).validate().is_err());
    }

    #[test]
    fn test_shaper_matches_range() {
        let s = CurveConfig::default().shaper().unwrap();
        assert_relative_eq!(s.max_linear(), 11.52, max_relative = 1e-6);
    }
}
