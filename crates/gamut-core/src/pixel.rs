//! Flat pixel buffers.
//!
//! Images are row-major arrays of `f32` with 3 (RGB) or 4 (RGBA) channels
//! per pixel. Operations borrow caller-allocated slices; [`PixelLayout`]
//! validates their shape and [`PixelBuffer`] is an owned convenience
//! wrapper for callers that do not manage their own storage.
//!
//! # Example
//!
//! ```rust
//! use gamut_core::{PixelBuffer, PixelLayout};
//!
//! let buf = PixelBuffer::from_vec(vec![0.18; 12], PixelLayout::Rgba).unwrap();
//! assert_eq!(buf.pixel_count(), 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Channel layout of a flat pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelLayout {
    /// Three floats per pixel.
    #[default]
    Rgb,
    /// Four floats per pixel, alpha last.
    Rgba,
}

impl PixelLayout {
    /// Number of floats per pixel.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Checks that `len` floats form whole pixels and returns the pixel count.
    pub fn pixel_count(self, len: usize) -> Result<usize> {
        let channels = self.channels();
        if len % channels != 0 {
            return Err(Error::buffer_length(len, channels));
        }
        Ok(len / channels)
    }

    /// Validates a source/destination pair of identical shape.
    pub fn check_pair(self, src: usize, dst: usize) -> Result<usize> {
        if src != dst {
            return Err(Error::size_mismatch(src, dst));
        }
        self.pixel_count(src)
    }
}

/// Largest of the three color channels.
#[inline]
pub fn max_channel(rgb: [f32; 3]) -> f32 {
    rgb[0].max(rgb[1]).max(rgb[2])
}

/// Owned flat pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: Vec<f32>,
    layout: PixelLayout,
}

impl PixelBuffer {
    /// Wraps existing data, validating its length.
    pub fn from_vec(data: Vec<f32>, layout: PixelLayout) -> Result<Self> {
        layout.pixel_count(data.len())?;
        Ok(Self { data, layout })
    }

    /// Buffer of `pixels` black pixels (alpha 1 for RGBA).
    pub fn black(pixels: usize, layout: PixelLayout) -> Self {
        let mut data = vec![0.0; pixels * layout.channels()];
        if layout == PixelLayout::Rgba {
            for px in data.chunks_exact_mut(4) {
                px[3] = 1.0;
            }
        }
        Self { data, layout }
    }

    /// Builds an RGB buffer from triples.
    pub fn from_rgb(pixels: &[[f32; 3]]) -> Self {
        Self {
            data: pixels.iter().flatten().copied().collect(),
            layout: PixelLayout::Rgb,
        }
    }

    /// Channel layout.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len() / self.layout.channels()
    }

    /// Raw samples.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw samples, mutable.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// RGB of pixel `index`.
    pub fn rgb(&self, index: usize) -> Option<[f32; 3]> {
        let c = self.layout.channels();
        self.data
            .get(index * c..index * c + 3)
            .map(|px| [px[0], px[1], px[2]])
    }

    /// Unwraps the samples.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
