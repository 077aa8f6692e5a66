//! Log shaper: linear <-> normalized log encoding.
//!
//! A shaper maps scene-linear values into [0, 1] by taking the log of the
//! value relative to a pivot (mid-grey) and normalizing the result over an
//! exposure range expressed in stops (log2) or decades (log10).
//!
//! ```text
//! n = (clamp(log2(L / pivot), min_exp, max_exp) - min_exp) / (max_exp - min_exp)
//! L = 2^(min_exp + n * (max_exp - min_exp)) * pivot
//! ```
//!
//! # Non-positive input
//!
//! Zero, negative and NaN inputs land on the `min_exp` floor (normalized 0)
//! instead of evaluating `log(0)`. The floor is a log-domain value, so callers
//! that want true black to be distinguishable must pre-clamp to 0 themselves.

use gamut_core::{Error, Result, clamp01};
use serde::{Deserialize, Serialize};

/// Log base used by a [`Shaper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaperBase {
    /// Exposure range in stops.
    #[default]
    Log2,
    /// Exposure range in decades.
    Log10,
}

/// Linear to normalized log2.
///
/// # Example
///
/// ```rust
/// use gamut_transfer::shaper::linear_to_log2;
///
/// assert_eq!(linear_to_log2(0.18 * 64.0, 0.18, -6.0, 6.0), 1.0);
/// assert_eq!(linear_to_log2(0.0, 0.18, -6.0, 6.0), 0.0);
/// ```
#[inline]
pub fn linear_to_log2(linear: f32, pivot: f32, min_exp: f32, max_exp: f32) -> f32 {
    let stops = if linear > 0.0 {
        (linear / pivot).log2()
    } else {
        min_exp
    };
    (stops.clamp(min_exp, max_exp) - min_exp) / (max_exp - min_exp)
}

/// Normalized log2 to linear. Input is clamped to [0, 1].
#[inline]
pub fn log2_to_linear(normalized: f32, pivot: f32, min_exp: f32, max_exp: f32) -> f32 {
    let stops = min_exp + clamp01(normalized) * (max_exp - min_exp);
    stops.exp2() * pivot
}

/// Linear to normalized log10. Exposure bounds are in decades.
#[inline]
pub fn linear_to_log10(linear: f32, pivot: f32, min_exp: f32, max_exp: f32) -> f32 {
    let decades = if linear > 0.0 {
        (linear / pivot).log10()
    } else {
        min_exp
    };
    (decades.clamp(min_exp, max_exp) - min_exp) / (max_exp - min_exp)
}

/// Normalized log10 to linear. Input is clamped to [0, 1].
#[inline]
pub fn log10_to_linear(normalized: f32, pivot: f32, min_exp: f32, max_exp: f32) -> f32 {
    let decades = min_exp + clamp01(normalized) * (max_exp - min_exp);
    10f32.powf(decades) * pivot
}

/// Shaper parameters bundled as a value.
///
/// # Example
///
/// ```rust
/// use gamut_transfer::Shaper;
///
/// let shaper = Shaper::log2(0.18, -6.0, 6.0).unwrap();
/// let n = shaper.encode(1.0);
/// assert!((shaper.decode(n) - 1.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shaper {
    /// Value mapped to exposure 0 (mid-grey).
    pub pivot: f32,
    /// Lower exposure bound (stops or decades).
    pub min_exposure: f32,
    /// Upper exposure bound (stops or decades).
    pub max_exposure: f32,
    /// Log base.
    pub base: ShaperBase,
}

impl Shaper {
    /// Creates a validated shaper.
    pub fn new(pivot: f32, min_exposure: f32, max_exposure: f32, base: ShaperBase) -> Result<Self> {
        if !(pivot.is_finite() && pivot > 0.0) {
            return Err(Error::other(format!("shaper pivot must be > 0, got {pivot}")));
        }
        if !(min_exposure.is_finite() && max_exposure.is_finite()) || min_exposure >= max_exposure {
            return Err(Error::other(format!(
                "shaper exposure range [{min_exposure}, {max_exposure}] is empty"
            )));
        }
        Ok(Self {
            pivot,
            min_exposure,
            max_exposure,
            base,
        })
    }

    /// Log2 shaper.
    pub fn log2(pivot: f32, min_stops: f32, max_stops: f32) -> Result<Self> {
        Self::new(pivot, min_stops, max_stops, ShaperBase::Log2)
    }

    /// Log10 shaper.
    pub fn log10(pivot: f32, min_decades: f32, max_decades: f32) -> Result<Self> {
        Self::new(pivot, min_decades, max_decades, ShaperBase::Log10)
    }

    /// Linear -> normalized.
    #[inline]
    pub fn encode(&self, linear: f32) -> f32 {
        match self.base {
            ShaperBase::Log2 => linear_to_log2(linear, self.pivot, self.min_exposure, self.max_exposure),
            ShaperBase::Log10 => linear_to_log10(linear, self.pivot, self.min_exposure, self.max_exposure),
        }
    }

    /// Normalized -> linear.
    #[inline]
    pub fn decode(&self, normalized: f32) -> f32 {
        match self.base {
            ShaperBase::Log2 => log2_to_linear(normalized, self.pivot, self.min_exposure, self.max_exposure),
            ShaperBase::Log10 => log10_to_linear(normalized, self.pivot, self.min_exposure, self.max_exposure),
        }
    }

    /// Applies [`Shaper::encode`] per channel.
    #[inline]
    pub fn encode_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        rgb.map(|c| self.encode(c))
    }

    /// Applies [`Shaper::decode`] per channel.
    #[inline]
    pub fn decode_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        rgb.map(|c| self.decode(c))
    }

    /// Smallest representable linear value (normalized 0).
    #[inline]
    pub fn min_linear(&self) -> f32 {
        self.decode(0.0)
    }

    /// Largest representable linear value (normalized 1).
    #[inline]
    pub fn max_linear(&self) -> f32 {
        self.decode(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_log2_roundtrip() {
        let (pivot, lo, hi) = (0.18, -6.0, 6.0);
        let min = pivot * 2f32.powf(lo);
        let max = pivot * 2f32.powf(hi);
        for i in 0..=200 {
            let x = min * (max / min).powf(i as f32 / 200.0);
            let back = log2_to_linear(linear_to_log2(x, pivot, lo, hi), pivot, lo, hi);
            assert_relative_eq!(back, x, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_log10_roundtrip() {
        let (pivot, lo, hi) = (0.18, -2.0, 2.0);
        for &x in &[0.0018, 0.01, 0.18, 1.0, 10.0, 18.0] {
            let back = log10_to_linear(linear_to_log10(x, pivot, lo, hi), pivot, lo, hi);
            assert_relative_eq!(back, x, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_non_positive_floor() {
        assert_eq!(linear_to_log2(0.0, 0.18, -6.0, 6.0), 0.0);
        assert_eq!(linear_to_log2(-3.0, 0.18, -6.0, 6.0), 0.0);
        assert_eq!(linear_to_log2(f32::NAN, 0.18, -6.0, 6.0), 0.0);
        assert_eq!(linear_to_log10(-1.0, 0.18, -2.0, 2.0), 0.0);
    }

    #[test]
    fn test_clamps_above_range() {
        assert_eq!(linear_to_log2(1000.0, 0.18, -6.0, 6.0), 1.0);
        assert_relative_eq!(log2_to_linear(2.0, 0.18, -6.0, 6.0), 11.52, max_relative = 1e-6);
    }

    #[test]
    fn test_shaper_validation() {
        assert!(Shaper::log2(0.0, -6.0, 6.0).is_err());
        assert!(Shaper::log2(0.18, 6.0, -6.0).is_err());
        assert!(Shaper::log10(0.18, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_shaper_bounds() {
        let s = Shaper::log2(0.18, -6.0, 6.0).unwrap();
        assert_relative_eq!(s.min_linear(), 0.0028125, max_relative = 1e-6);
        assert_relative_eq!(s.max_linear(), 11.52, max_relative = 1e-6);
        let n = s.encode_rgb([0.18, 0.18 * 64.0, 0.0]);
        assert_relative_eq!(n[0], 0.5);
        assert_eq!(n[1], 1.0);
        assert_eq!(n[2], 0.0);
    }
}
