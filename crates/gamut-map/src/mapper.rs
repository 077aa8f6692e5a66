//! The gamut mapper: owns the curve parameters and their published tables.
//!
//! Parameter changes go through [`GamutMapper::set_curve_params`] or
//! [`GamutMapper::set_config`], which invalidate the current tables, bump
//! the generation counter and rebuild synchronously. Passes read an
//! `Arc<CurveTables>` snapshot, so a rebuild never tears a running pass;
//! incremental passes notice the generation change and cancel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gamut_core::PixelLayout;
use gamut_curve::{ControlPoints, CurveConfig, SampleTable};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::pipeline::{CurveTables, PixelPipeline};
use crate::{CurveState, IncrementalPass, MapError, MapMode, MapResult, MapperConfig};

/// Pixels per rayon work item.
const PAR_CHUNK_PIXELS: usize = 4096;

/// HDR tone-curve and gamut mapper.
///
/// # Example
///
/// ```rust
/// use gamut_map::{GamutMapper, MapperConfig};
///
/// let mapper = GamutMapper::new(MapperConfig::default().with_compression(false)).unwrap();
/// let out = mapper.map_pixel([0.18, 0.18, 0.18], 0.0).unwrap();
/// assert!((out[0] - 0.18).abs() < 1e-3);
///
/// let mut pixels = vec![0.5_f32; 3 * 16];
/// mapper.map_buffer(&mut pixels, 0.0).unwrap();
/// ```
#[derive(Debug)]
pub struct GamutMapper {
    config: MapperConfig,
    state: CurveState,
    tables: Option<Arc<CurveTables>>,
    generation: Arc<AtomicU64>,
}

impl GamutMapper {
    /// Validates `config` and builds the curve tables.
    pub fn new(config: MapperConfig) -> MapResult<Self> {
        config.validate()?;
        let mut mapper = Self {
            config,
            state: CurveState::NotCalculated,
            tables: None,
            generation: Arc::new(AtomicU64::new(0)),
        };
        mapper.recalculate()?;
        Ok(mapper)
    }

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Current curve state.
    #[inline]
    pub fn state(&self) -> CurveState {
        self.state
    }

    /// Number of invalidations so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replaces the curve parameters and rebuilds.
    ///
    /// The new curve is built before anything changes, so a rejected
    /// config keeps the current tables and generation.
    pub fn set_curve_params(&mut self, curve: CurveConfig) -> MapResult<()> {
        self.set_config(MapperConfig { curve, ..self.config })
    }

    /// Replaces the whole configuration and rebuilds.
    ///
    /// Same guarantee as [`GamutMapper::set_curve_params`].
    pub fn set_config(&mut self, config: MapperConfig) -> MapResult<()> {
        config.validate()?;
        let tables = Self::build_tables(&config)?;
        self.config = config;
        self.invalidate()?;
        self.state.transition(CurveState::Calculating)?;
        self.publish(tables)
    }

    /// Switches between max-RGB and per-channel mapping.
    ///
    /// The curve is unchanged, so no rebuild happens.
    pub fn set_mode(&mut self, mode: MapMode) {
        self.config.mode = mode;
    }

    /// Enables or disables chromaticity compression without a rebuild.
    pub fn set_compression(&mut self, enabled: bool) {
        self.config.compression = enabled;
    }

    /// Marks the tables stale and cancels in-flight incremental passes.
    pub fn invalidate(&mut self) -> MapResult<()> {
        self.state.transition(CurveState::Dirty)?;
        self.tables = None;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation, "curve invalidated");
        Ok(())
    }

    /// Rebuilds control points and sample table from the current config
    /// and publishes them.
    ///
    /// On failure the state returns to `Dirty` and no tables are published.
    pub fn recalculate(&mut self) -> MapResult<()> {
        self.state.transition(CurveState::Calculating)?;
        match Self::build_tables(&self.config) {
            Ok(tables) => self.publish(tables),
            Err(e) => {
                self.tables = None;
                self.state.transition(CurveState::Dirty)?;
                Err(e)
            }
        }
    }

    fn publish(&mut self, tables: CurveTables) -> MapResult<()> {
        self.tables = Some(Arc::new(tables));
        self.state.transition(CurveState::Calculated)?;
        debug!(
            slope = self.config.curve.slope,
            min_exposure = self.config.curve.min_exposure,
            max_exposure = self.config.curve.max_exposure,
            samples = self.config.table_size,
            "curve tables published"
        );
        Ok(())
    }

    fn build_tables(config: &MapperConfig) -> MapResult<CurveTables> {
        let points = ControlPoints::build(&config.curve)?;
        let table = SampleTable::build(&points, config.table_size, config.spacing)?;
        Ok(CurveTables { points, table })
    }

    /// Published tables, if the curve is calculated.
    pub fn tables(&self) -> MapResult<Arc<CurveTables>> {
        match (&self.tables, self.state) {
            (Some(tables), CurveState::Calculated) => Ok(Arc::clone(tables)),
            (_, state) => Err(MapError::CurveNotReady { state }),
        }
    }

    /// Current control points.
    pub fn control_points(&self) -> MapResult<&ControlPoints> {
        self.published().map(|t| &t.points)
    }

    /// Current sample table.
    pub fn sample_table(&self) -> MapResult<&SampleTable> {
        self.published().map(|t| &t.table)
    }

    fn published(&self) -> MapResult<&CurveTables> {
        match (&self.tables, self.state) {
            (Some(tables), CurveState::Calculated) => Ok(tables),
            (_, state) => Err(MapError::CurveNotReady { state }),
        }
    }

    /// Snapshot of the per-pixel pipeline.
    pub fn pipeline(&self) -> MapResult<PixelPipeline> {
        PixelPipeline::new(self.tables()?, &self.config)
    }

    /// Maps one pixel at `exposure` stops.
    pub fn map_pixel(&self, rgb: [f32; 3], exposure: f32) -> MapResult<[f32; 3]> {
        let scale = exposure_scale(exposure)?;
        Ok(self.pipeline()?.map_pixel(rgb, scale))
    }

    /// Maps a flat buffer in place on the rayon pool.
    pub fn map_buffer(&self, pixels: &mut [f32], exposure: f32) -> MapResult<()> {
        let scale = exposure_scale(exposure)?;
        let pipeline = self.pipeline()?;
        let channels = self.config.layout.channels();
        let count = self.config.layout.pixel_count(pixels.len())?;

        pixels
            .par_chunks_mut(channels * PAR_CHUNK_PIXELS)
            .for_each(|chunk| pipeline.map_slice_in_place(chunk, channels, scale));

        trace!(pixels = count, exposure, "mapped buffer in place");
        Ok(())
    }

    /// Maps `src` into `dst` on the rayon pool. Alpha is copied through.
    pub fn map_buffer_into(&self, src: &[f32], dst: &mut [f32], exposure: f32) -> MapResult<()> {
        let scale = exposure_scale(exposure)?;
        let pipeline = self.pipeline()?;
        let channels = self.config.layout.channels();
        let count = self.config.layout.check_pair(src.len(), dst.len())?;

        let chunk = channels * PAR_CHUNK_PIXELS;
        dst.par_chunks_mut(chunk)
            .zip(src.par_chunks(chunk))
            .for_each(|(d, s)| pipeline.map_slice(s, d, channels, scale));

        trace!(pixels = count, exposure, "mapped buffer");
        Ok(())
    }

    /// Starts a cooperative pass over `src` that maps a bounded number of
    /// pixels per [`IncrementalPass::step`].
    pub fn start_pass<'a>(&self, src: &'a [f32], exposure: f32) -> MapResult<IncrementalPass<'a>> {
        let scale = exposure_scale(exposure)?;
        let pipeline = self.pipeline()?;
        IncrementalPass::new(
            pipeline,
            src,
            self.config.layout,
            scale,
            Arc::clone(&self.generation),
            self.generation(),
        )
    }

    /// Buffer layout the mapper expects.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.config.layout
    }
}

/// Linear factor for `exposure` stops.
fn exposure_scale(exposure: f32) -> MapResult<f32> {
    Ok(gamut_core::error::ensure_finite("exposure", exposure)?.exp2())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gamut_core::Point2;

    #[test]
    fn test_new_is_calculated() {
        let m = GamutMapper::new(MapperConfig::default()).unwrap();
        assert_eq!(m.state(), CurveState::Calculated);
        assert_eq!(m.generation(), 0);
        assert_eq!(m.sample_table().unwrap().len(), 1024);
    }

    #[test]
    fn test_set_params_rebuilds() {
        let mut m = GamutMapper::new(MapperConfig::default()).unwrap();
        let before = m.control_points().unwrap().get(5).unwrap().x;
        m.set_curve_params(CurveConfig::default().with_slope(3.0)).unwrap();
        assert_eq!(m.state(), CurveState::Calculated);
        assert_eq!(m.generation(), 1);
        assert!(m.control_points().unwrap().get(5).unwrap().x < before);
    }

    #[test]
    fn test_invalid_params_leave_mapper_intact() {
        let mut m = GamutMapper::new(MapperConfig::default()).unwrap();
        let err = m.set_curve_params(CurveConfig::default().with_slope(0.0)).unwrap_err();
        assert!(matches!(err, MapError::Curve(_)));
        assert_eq!(m.state(), CurveState::Calculated);
        assert_relative_eq!(m.config().curve.slope, 2.2);
    }

    #[test]
    fn test_unbuildable_params_keep_tables() {
        let mut m = GamutMapper::new(MapperConfig::default()).unwrap();
        // Passes validation, but the toe end lands below the origin
        let curve = CurveConfig::new(1.02, Point2::new(0.1, 0.00001), Point2::splat(0.18), -6.0, 6.0);
        assert!(curve.validate().is_ok());

        let src = vec![0.5_f32; 3 * 8];
        let mut pass = m.start_pass(&src, 0.0).unwrap();
        assert!(m.set_curve_params(curve).is_err());
        assert!(m.set_config(MapperConfig::default().with_curve(curve)).is_err());

        assert_eq!(m.state(), CurveState::Calculated);
        assert_eq!(m.generation(), 0);
        assert_relative_eq!(m.config().curve.slope, 2.2);
        assert!(m.map_pixel([0.18; 3], 0.0).is_ok());
        assert_eq!(pass.run(4), crate::PassStatus::Completed);
    }

    #[test]
    fn test_dirty_blocks_mapping() {
        let mut m = GamutMapper::new(MapperConfig::default()).unwrap();
        m.invalidate().unwrap();
        let err = m.map_pixel([0.18; 3], 0.0).unwrap_err();
        assert!(matches!(err, MapError::CurveNotReady { state: CurveState::Dirty }));
        assert!(m.sample_table().is_err());
        m.recalculate().unwrap();
        assert!(m.map_pixel([0.18; 3], 0.0).is_ok());
    }

    #[test]
    fn test_buffer_matches_pixel() {
        let m = GamutMapper::new(MapperConfig::default()).unwrap();
        let src: Vec<f32> = (0..3 * 10_000).map(|i| (i % 97) as f32 * 0.05).collect();
        let mut dst = vec![0.0; src.len()];
        m.map_buffer_into(&src, &mut dst, 1.0).unwrap();
        for i in [0, 17, 4095, 4096, 9999] {
            let px = [src[i * 3], src[i * 3 + 1], src[i * 3 + 2]];
            let expect = m.map_pixel(px, 1.0).unwrap();
            assert_eq!(&dst[i * 3..i * 3 + 3], &expect);
        }
        let mut in_place = src.clone();
        m.map_buffer(&mut in_place, 1.0).unwrap();
        assert_eq!(in_place, dst);
    }

    #[test]
    fn test_length_errors() {
        let m = GamutMapper::new(MapperConfig::default()).unwrap();
        let mut odd = vec![0.0; 7];
        assert!(matches!(m.map_buffer(&mut odd, 0.0), Err(MapError::Core(_))));
        let mut dst = vec![0.0; 6];
        let err = m.map_buffer_into(&[0.0; 9], &mut dst, 0.0).unwrap_err();
        assert!(matches!(err, MapError::Core(gamut_core::Error::SizeMismatch { .. })));
    }

    #[test]
    fn test_non_finite_exposure() {
        let m = GamutMapper::new(MapperConfig::default()).unwrap();
        assert!(m.map_pixel([0.18; 3], f32::NAN).is_err());
    }

    #[test]
    fn test_mode_switch_keeps_generation() {
        let mut m = GamutMapper::new(MapperConfig::default()).unwrap();
        m.set_mode(MapMode::PerChannel);
        m.set_compression(false);
        assert_eq!(m.generation(), 0);
        assert_eq!(m.config().mode, MapMode::PerChannel);
    }
}
