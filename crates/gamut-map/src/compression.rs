//! Chromaticity compression.
//!
//! Bright saturated colors are pulled toward white once their max channel
//! passes a latitude threshold. The chromaticity ratio `rgb / max` is
//! blended toward `(1, 1, 1)` by
//!
//! ```text
//! w = clamp((max - threshold) / (max_radiometric - threshold), 0, 1)
//! ratio' = ratio + (1 - ratio) * falloff(w)
//! ```
//!
//! so colors reach white exactly at the top of the curve's domain. The
//! threshold is the latitude decoded from the normalized log2 domain.

use gamut_core::{lerp, smoothstep};
use gamut_curve::{CurveConfig, CurveResult};

use crate::CompressionFalloff;

/// Linear threshold above which compression starts.
///
/// `max_latitude` is a position in the normalized log2 domain, so the
/// default 0.85 over -6..+6 stops sits 4.2 stops above mid-grey, about
/// 3.31 in linear terms. Only max channels past that point are compressed;
/// widening the exposure range downward lowers the threshold.
///
/// # Example
///
/// ```rust
/// use gamut_curve::CurveConfig;
/// use gamut_map::compression::compression_threshold;
///
/// // 0.85 of a -6..+6 stop range is 4.2 stops above mid-grey
/// let t = compression_threshold(&CurveConfig::default()).unwrap();
/// assert!((t - 0.18 * 4.2_f32.exp2()).abs() < 1e-3);
/// ```
pub fn compression_threshold(curve: &CurveConfig) -> CurveResult<f32> {
    Ok(curve.shaper()?.decode(curve.max_latitude))
}

/// Blends `ratio` toward white according to how far `max_channel` exceeds
/// `threshold`. Returns `ratio` unchanged at or below the threshold.
#[inline]
pub fn calculate_gamut_compression(
    ratio: [f32; 3],
    max_channel: f32,
    threshold: f32,
    max_radiometric: f32,
    falloff: CompressionFalloff,
) -> [f32; 3] {
    if !(max_channel > threshold) {
        return ratio;
    }
    let headroom = max_radiometric - threshold;
    let w = if headroom > 0.0 {
        ((max_channel - threshold) / headroom).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let w = match falloff {
        CompressionFalloff::Linear => w,
        CompressionFalloff::Smoothstep => smoothstep(0.0, 1.0, w),
    };
    ratio.map(|r| lerp(r, 1.0, w))
}
