//! SMPTE ST 2084 Perceptual Quantizer (PQ).
//!
//! PQ encodes absolute luminance up to 10,000 cd/m2 in a perceptually
//! uniform signal. [`linear_to_pq`] and [`pq_to_linear`] take the peak
//! luminance as a parameter so the same code serves normalized and
//! absolute pipelines.
//!
//! # Range
//!
//! - Encoded: [0, 1]
//! - Linear: [0, max_nits]
//!
//! # Reference
//!
//! SMPTE ST 2084:2014
//!
//! # Usage
//!
//! ```rust
//! use gamut_transfer::pq;
//!
//! let signal = pq::oetf(100.0);
//! assert!((signal - 0.508).abs() < 0.01);
//! assert!((pq::eotf(signal) - 100.0).abs() < 0.01);
//! ```

/// Maximum luminance in cd/m2 (nits).
pub const L_MAX: f32 = 10000.0;

// Evaluated in f64; the curve is steep near the top of the range.
const M1: f64 = 2610.0 / 4096.0 / 4.0;
const M2: f64 = 2523.0 / 4096.0 * 128.0;
const C1: f64 = 3424.0 / 4096.0;
const C2: f64 = 2413.0 / 4096.0 * 32.0;
const C3: f64 = 2392.0 / 4096.0 * 32.0;

/// Encodes linear light in `[0, max_nits]` to a PQ signal.
///
/// Input is normalized by `max_nits`, clamped to [0, 1] and encoded.
#[inline]
pub fn linear_to_pq(linear: f32, max_nits: f32) -> f32 {
    if !(linear > 0.0) || !(max_nits > 0.0) {
        return 0.0;
    }
    let y = (linear as f64 / max_nits as f64).clamp(0.0, 1.0);
    let yp = y.powf(M1);
    ((C1 + C2 * yp) / (1.0 + C3 * yp)).powf(M2) as f32
}

/// Decodes a PQ signal to linear light in `[0, max_nits]`.
#[inline]
pub fn pq_to_linear(encoded: f32, max_nits: f32) -> f32 {
    if !(encoded > 0.0) {
        return 0.0;
    }
    let vp = (encoded as f64).min(1.0).powf(1.0 / M2);
    let num = (vp - C1).max(0.0);
    let den = C2 - C3 * vp;
    (max_nits as f64 * (num / den).powf(1.0 / M1)) as f32
}

/// PQ EOTF: decodes a PQ signal to absolute luminance (cd/m2).
#[inline]
pub fn eotf(v: f32) -> f32 {
    pq_to_linear(v, L_MAX)
}

/// PQ OETF: encodes absolute luminance (cd/m2) to a PQ signal.
#[inline]
pub fn oetf(l: f32) -> f32 {
    linear_to_pq(l, L_MAX)
}

/// Applies [`linear_to_pq`] per channel.
#[inline]
pub fn linear_to_pq_rgb(rgb: [f32; 3], max_nits: f32) -> [f32; 3] {
    rgb.map(|c| linear_to_pq(c, max_nits))
}

/// Applies [`pq_to_linear`] per channel.
#[inline]
pub fn pq_to_linear_rgb(rgb: [f32; 3], max_nits: f32) -> [f32; 3] {
    rgb.map(|c| pq_to_linear(c, max_nits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let test_values = [0.0, 0.1, 0.5, 1.0, 10.0, 100.0, 1000.0, 10000.0];
        for &l in &test_values {
            let decoded = eotf(oetf(l));
            assert!(
                (l - decoded).abs() < l * 0.001 + 0.001,
                "l={}, decoded={}",
                l,
                decoded
            );
        }
    }

    #[test]
    fn test_reference_white() {
        let signal = oetf(100.0);
        assert!((signal - 0.508).abs() < 0.01);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(eotf(0.0), 0.0);
        assert_eq!(oetf(0.0), 0.0);
        assert!((oetf(L_MAX) - 1.0).abs() < 1e-6);
        assert!((eotf(1.0) - L_MAX).abs() < 1.0);
    }

    #[test]
    fn test_custom_peak() {
        // Peak luminance always encodes to 1.0
        assert!((linear_to_pq(1000.0, 1000.0) - 1.0).abs() < 1e-6);
        assert!((pq_to_linear(1.0, 1000.0) - 1000.0).abs() < 0.01);
        assert_eq!(linear_to_pq(-5.0, 1000.0), 0.0);
    }
}
