//! Interpolation utilities.
//!
//! - Linear interpolation ([`lerp`], [`inverse_lerp`], [`remap`])
//! - Smooth interpolation ([`smoothstep`])
//! - Clamping ([`clamp01`])
//!
//! ```rust
//! use gamut_core::{lerp, remap};
//!
//! assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
//! assert_eq!(remap(0.5, 0.0, 1.0, 0.0, 100.0), 50.0);
//! ```

/// Linear interpolation: `a + (b - a) * t`.
///
/// Extrapolates for `t` outside [0, 1].
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse linear interpolation.
///
/// Returns 0 for a degenerate range.
///
/// ```rust
/// use gamut_core::inverse_lerp;
///
/// assert_eq!(inverse_lerp(0.0, 10.0, 5.0), 0.5);
/// ```
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < 1e-10 {
        0.0
    } else {
        (value - a) / (b - a)
    }
}

/// Remaps a value from `[in_min, in_max]` to `[out_min, out_max]`.
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    lerp(out_min, out_max, inverse_lerp(in_min, in_max, value))
}

/// Hermite smoothstep between two edges.
///
/// ```rust
/// use gamut_core::smoothstep;
///
/// assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
/// assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
/// assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
/// ```
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = clamp01(inverse_lerp(edge0, edge1, x));
    t * t * (3.0 - 2.0 * t)
}

/// Clamps to [0, 1]. NaN maps to 0.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
