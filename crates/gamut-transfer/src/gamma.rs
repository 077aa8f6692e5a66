//! Simple power-law gamma.
//!
//! The single-exponent approximation of sRGB (`enc = lin^(1/2.2)`).
//! Negative input is clipped to 0.
//!
//! # Range
//!
//! - Input/Output: [0, 1]

/// Exponent of the simple sRGB approximation.
pub const SRGB_SIMPLE_GAMMA: f32 = 2.2;

/// EOTF for arbitrary gamma: `v^gamma`
///
/// # Example
///
/// ```rust
/// use gamut_transfer::gamma::gamma_eotf;
///
/// let linear = gamma_eotf(0.5, 2.2);
/// assert!((linear - 0.2176).abs() < 1e-3);
/// ```
#[inline]
pub fn gamma_eotf(v: f32, gamma: f32) -> f32 {
    if v <= 0.0 { 0.0 } else { v.powf(gamma) }
}

/// OETF for arbitrary gamma: `l^(1/gamma)`
#[inline]
pub fn gamma_oetf(l: f32, gamma: f32) -> f32 {
    if l <= 0.0 { 0.0 } else { l.powf(1.0 / gamma) }
}

/// Gamma 2.2 EOTF (decode).
#[inline]
pub fn eotf_22(v: f32) -> f32 {
    gamma_eotf(v, SRGB_SIMPLE_GAMMA)
}

/// Gamma 2.2 OETF (encode).
#[inline]
pub fn oetf_22(l: f32) -> f32 {
    gamma_oetf(l, SRGB_SIMPLE_GAMMA)
}
