//! Per-pixel mapping pipeline.
//!
//! [`PixelPipeline`] is a read-only snapshot of everything one pixel needs:
//! the published curve tables plus the scalar settings derived from the
//! config. It is `Send + Sync` and cheap to clone, so the parallel and
//! incremental passes share it without locking.
//!
//! # Stages
//!
//! 1. Scale by `2^exposure`
//! 2. Debug overlay (optional): red below / green above the curve domain
//! 3. Clamp to `[0, max radiometric]`, NaN to 0
//! 4. Split into max channel and chromaticity ratio (`(0,0,0)` for black)
//! 5. Chromaticity compression (optional)
//! 6. Curve lookup: max channel (MaxRgb) or each channel (PerChannel)
//! 7. Remap `[min display, max display]` to `[0, 1]`
//! 8. Display encoding

use std::sync::Arc;

use gamut_core::{clamp01, max_channel, remap};
use gamut_curve::{ControlPoints, LookupMode, SampleTable};

use crate::compression::{calculate_gamut_compression, compression_threshold};
use crate::{CompressionFalloff, DisplayEncoding, MapMode, MapResult, MapperConfig};

/// Overlay color for input below the curve domain.
pub const UNDER_RANGE_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
/// Overlay color for input above the curve domain.
pub const OVER_RANGE_COLOR: [f32; 3] = [0.0, 1.0, 0.0];

/// Control points and sample table built from one set of parameters.
///
/// Immutable once published; a rebuild publishes a new instance.
#[derive(Debug, Clone)]
pub struct CurveTables {
    /// Curve control points.
    pub points: ControlPoints,
    /// Samples of the curve.
    pub table: SampleTable,
}

/// Read-only inputs of the per-pixel transform.
#[derive(Debug, Clone)]
pub struct PixelPipeline {
    tables: Arc<CurveTables>,
    mode: MapMode,
    compression: bool,
    falloff: CompressionFalloff,
    lookup: LookupMode,
    encoding: DisplayEncoding,
    debug_overlay: bool,
    threshold: f32,
    min_radiometric: f32,
    max_radiometric: f32,
    min_display: f32,
    max_display: f32,
}

impl PixelPipeline {
    /// Snapshots `config` over published `tables`.
    pub fn new(tables: Arc<CurveTables>, config: &MapperConfig) -> MapResult<Self> {
        let (min_radiometric, max_radiometric) = tables.points.domain();
        let (min_display, max_display) = tables.points.range();
        Ok(Self {
            threshold: compression_threshold(&config.curve)?,
            mode: config.mode,
            compression: config.compression,
            falloff: config.falloff,
            lookup: config.lookup,
            encoding: config.encoding,
            debug_overlay: config.debug_overlay,
            min_radiometric,
            max_radiometric,
            min_display,
            max_display,
            tables,
        })
    }

    /// Same pipeline with the debug overlay switched off.
    pub fn without_overlay(mut self) -> Self {
        self.debug_overlay = false;
        self
    }

    /// Published tables.
    #[inline]
    pub fn tables(&self) -> &Arc<CurveTables> {
        &self.tables
    }

    /// Linear compression threshold.
    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    #[inline]
    fn curve(&self, x: f32) -> f32 {
        self.tables.table.lookup_y_for_x(x, self.lookup).clamp(0.0, self.max_display)
    }

    #[inline]
    fn to_display(&self, v: f32) -> f32 {
        self.encoding
            .encode(clamp01(remap(v, self.min_display, self.max_display, 0.0, 1.0)))
    }

    /// Maps one scene-linear pixel. `scale` is the linear exposure factor.
    pub fn map_pixel(&self, rgb: [f32; 3], scale: f32) -> [f32; 3] {
        let scaled = rgb.map(|c| c * scale);

        if self.debug_overlay {
            let m = max_channel(scaled);
            if m < self.min_radiometric {
                return UNDER_RANGE_COLOR;
            }
            if m > self.max_radiometric {
                return OVER_RANGE_COLOR;
            }
        }

        let max_rad = self.max_radiometric;
        let clamped = scaled.map(|c| if c > 0.0 { c.min(max_rad) } else { 0.0 });
        let m = max_channel(clamped);
        let mut ratio = if m > 0.0 { clamped.map(|c| c / m) } else { [0.0; 3] };

        if self.compression {
            ratio = calculate_gamut_compression(ratio, m, self.threshold, max_rad, self.falloff);
        }

        let toned = match self.mode {
            MapMode::MaxRgb => {
                let y = self.curve(m);
                ratio.map(|r| r * y)
            }
            MapMode::PerChannel => ratio.map(|r| self.curve(r * m)),
        };

        toned.map(|v| self.to_display(v))
    }

    /// Maps `src` into `dst` pixel by pixel. Both slices hold whole pixels
    /// of `channels` floats; channels past the third are copied through.
    pub fn map_slice(&self, src: &[f32], dst: &mut [f32], channels: usize, scale: f32) {
        for (s, d) in src.chunks_exact(channels).zip(dst.chunks_exact_mut(channels)) {
            let out = self.map_pixel([s[0], s[1], s[2]], scale);
            d[..3].copy_from_slice(&out);
            d[3..].copy_from_slice(&s[3..]);
        }
    }

    /// Maps whole pixels of `channels` floats in place.
    pub fn map_slice_in_place(&self, pixels: &mut [f32], channels: usize, scale: f32) {
        for px in pixels.chunks_exact_mut(channels) {
            let out = self.map_pixel([px[0], px[1], px[2]], scale);
            px[..3].copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamut_curve::CurveConfig;

    fn pipeline(config: &MapperConfig) -> PixelPipeline {
        let points = ControlPoints::build(&config.curve).unwrap();
        let table = SampleTable::build(&points, config.table_size, config.spacing).unwrap();
        PixelPipeline::new(Arc::new(CurveTables { points, table }), config).unwrap()
    }

    #[test]
    fn test_black_is_black() {
        for mode in [MapMode::MaxRgb, MapMode::PerChannel] {
            let p = pipeline(&MapperConfig::default().with_mode(mode));
            assert_eq!(p.map_pixel([0.0; 3], 1.0), [0.0; 3]);
        }
    }

    #[test]
    fn test_nan_input_is_finite() {
        let p = pipeline(&MapperConfig::default());
        let out = p.map_pixel([f32::NAN, 0.5, f32::NEG_INFINITY], 1.0);
        assert!(out.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_output_in_unit_range() {
        let p = pipeline(&MapperConfig::default().with_encoding(DisplayEncoding::Srgb));
        for &v in &[1e-4_f32, 0.01, 0.18, 1.0, 5.0, 100.0] {
            for c in p.map_pixel([v, v * 0.5, v * 0.1], 1.0) {
                assert!((0.0..=1.0).contains(&c), "v={v} c={c}");
            }
        }
    }

    #[test]
    fn test_overlay_colors() {
        let p = pipeline(&MapperConfig::default().with_debug_overlay(true));
        assert_eq!(p.map_pixel([0.001; 3], 1.0), UNDER_RANGE_COLOR);
        assert_eq!(p.map_pixel([20.0, 0.0, 0.0], 1.0), OVER_RANGE_COLOR);
        assert_ne!(p.map_pixel([0.18; 3], 1.0), UNDER_RANGE_COLOR);
        // Below the domain the plain transform lands on black
        assert_eq!(p.without_overlay().map_pixel([0.001; 3], 1.0), [0.0; 3]);
    }

    #[test]
    fn test_alpha_copied() {
        let p = pipeline(&MapperConfig::default());
        let src = [0.18, 0.18, 0.18, 0.25, 1.0, 0.5, 0.2, 0.75];
        let mut dst = [0.0; 8];
        p.map_slice(&src, &mut dst, 4, 1.0);
        assert_eq!(dst[3], 0.25);
        assert_eq!(dst[7], 0.75);
    }

    #[test]
    fn test_exposure_scale_brightens() {
        let p = pipeline(&MapperConfig::default().with_compression(false));
        let dim = p.map_pixel([0.18; 3], 1.0)[0];
        let bright = p.map_pixel([0.18; 3], 2.0)[0];
        assert!(bright > dim);
    }

    #[test]
    fn test_threshold_from_latitude() {
        let cfg = MapperConfig::default().with_curve(CurveConfig::default().with_max_latitude(1.0));
        let p = pipeline(&cfg);
        approx::assert_relative_eq!(p.threshold(), 11.52, max_relative = 1e-4);
    }
}
