//! LUT export.
//!
//! Produces ordered float triples ready for a `.cube` writer. Inputs are
//! addressed in the shaper domain: entry `i` of an `n`-entry table sits at
//! normalized log2 value `i / (n - 1)` over the mapper's exposure range,
//! so [`CurveLut::shaper`] tells a consumer how to encode linear input
//! before indexing. Outputs are display-encoded values in [0, 1].
//!
//! Text formatting and file I/O belong to the caller.

use gamut_transfer::Shaper;
use rayon::prelude::*;
use tracing::debug;

use crate::{GamutMapper, MapError, MapResult};

/// Tone curve or 3D transform sampled into a LUT.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveLut {
    /// Title for the LUT header.
    pub title: String,
    /// Input domain minimum (shaper-normalized).
    pub domain_min: f32,
    /// Input domain maximum (shaper-normalized).
    pub domain_max: f32,
    /// Entries per axis.
    pub size: usize,
    /// Encoding from scene-linear input to the LUT domain.
    pub shaper: Shaper,
    /// Output triples. For 3D LUTs red varies fastest.
    pub entries: Vec<[f32; 3]>,
}

impl CurveLut {
    /// True for a 3D lattice (`size^3` entries).
    pub fn is_3d(&self) -> bool {
        self.entries.len() != self.size
    }
}

fn check_size(size: usize) -> MapResult<()> {
    if size < 2 {
        return Err(MapError::InvalidConfig(format!("LUT size {size} must be at least 2")));
    }
    Ok(())
}

impl GamutMapper {
    /// Samples the neutral axis through the full pipeline.
    ///
    /// Every entry is `(v, v, v)`; the overlay is off so out-of-range
    /// debugging never bakes into a LUT.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gamut_map::{GamutMapper, MapperConfig};
    ///
    /// let mapper = GamutMapper::new(MapperConfig::default()).unwrap();
    /// let lut = mapper.export_curve_lut(33).unwrap();
    /// assert_eq!(lut.entries.len(), 33);
    /// // The middle of a symmetric range is mid-grey
    /// assert!((lut.entries[16][0] - 0.18).abs() < 1e-3);
    /// ```
    pub fn export_curve_lut(&self, size: usize) -> MapResult<CurveLut> {
        check_size(size)?;
        let pipeline = self.pipeline()?.without_overlay();
        let shaper = self.config().curve.shaper()?;
        let step = 1.0 / (size - 1) as f32;

        let entries = (0..size)
            .map(|i| {
                let x = shaper.decode(i as f32 * step);
                pipeline.map_pixel([x; 3], 1.0)
            })
            .collect();

        debug!(size, "exported 1D curve LUT");
        Ok(CurveLut {
            title: "gamut tone curve".into(),
            domain_min: 0.0,
            domain_max: 1.0,
            size,
            shaper,
            entries,
        })
    }

    /// Samples the full pipeline over a `size^3` lattice, red fastest.
    pub fn export_lut_3d(&self, size: usize) -> MapResult<CurveLut> {
        check_size(size)?;
        let pipeline = self.pipeline()?.without_overlay();
        let shaper = self.config().curve.shaper()?;
        let axis: Vec<f32> = (0..size)
            .map(|i| shaper.decode(i as f32 / (size - 1) as f32))
            .collect();

        let entries = (0..size * size * size)
            .into_par_iter()
            .map(|i| {
                let r = axis[i % size];
                let g = axis[(i / size) % size];
                let b = axis[i / (size * size)];
                pipeline.map_pixel([r, g, b], 1.0)
            })
            .collect();

        debug!(size, "exported 3D LUT");
        Ok(CurveLut {
            title: "gamut map".into(),
            domain_min: 0.0,
            domain_max: 1.0,
            size,
            shaper,
            entries,
        })
    }
}
