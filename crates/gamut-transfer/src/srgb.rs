//! Piecewise sRGB curve (IEC 61966-2-1).
//!
//! The display encoding the mapper applies after remapping to [0, 1]. A
//! short linear toe avoids the infinite slope of a pure power law at black;
//! [`crate::gamma`] has the plain 2.2 approximation for comparison.

/// Slope of the linear toe.
const TOE_SLOPE: f32 = 12.92;
/// Offset of the power segment.
const OFFSET: f32 = 0.055;
/// Exponent of the power segment.
const EXPONENT: f32 = 2.4;

/// Encoded value where the toe hands over to the power segment.
pub const ENCODED_BREAK: f32 = 0.04045;
/// Linear value where the toe hands over to the power segment.
pub const LINEAR_BREAK: f32 = 0.0031308;

/// Decodes an sRGB value in [0, 1] to linear display light.
///
/// ```rust
/// use gamut_transfer::srgb;
///
/// assert!((srgb::eotf(0.5) - 0.214).abs() < 1e-3);
/// ```
#[inline]
pub fn eotf(v: f32) -> f32 {
    if v <= ENCODED_BREAK {
        v / TOE_SLOPE
    } else {
        ((v + OFFSET) / (1.0 + OFFSET)).powf(EXPONENT)
    }
}

/// Encodes linear display light in [0, 1] to sRGB.
#[inline]
pub fn oetf(l: f32) -> f32 {
    if l <= LINEAR_BREAK {
        l * TOE_SLOPE
    } else {
        (1.0 + OFFSET) * l.powf(EXPONENT.recip()) - OFFSET
    }
}
