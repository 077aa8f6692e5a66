//! Error types for gamut-core operations.
//!
//! Covers the failure modes shared by every crate in the workspace:
//! buffer validation and invalid scalar parameters. Curve and mapping
//! crates wrap [`Error`] in their own enums.
//!
//! # Usage
//!
//! ```rust
//! use gamut_core::{Error, Result};
//!
//! fn check(len: usize, channels: usize) -> Result<()> {
//!     if len % channels != 0 {
//!         return Err(Error::buffer_length(len, channels));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(7, 3).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by core buffer and parameter validation.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer length is not a whole number of pixels.
    #[error("buffer of {len} floats is not a multiple of {channels} channels")]
    BufferLength {
        /// Number of floats in the buffer
        len: usize,
        /// Channels per pixel
        channels: usize,
    },

    /// Source and destination buffers differ in length.
    #[error("buffer size mismatch: source {src} floats, destination {dst} floats")]
    SizeMismatch {
        /// Source length
        src: usize,
        /// Destination length
        dst: usize,
    },

    /// A scalar parameter is NaN or infinite.
    #[error("parameter '{name}' is not finite: {value}")]
    NonFinite {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::BufferLength`] error.
    #[inline]
    pub fn buffer_length(len: usize, channels: usize) -> Self {
        Self::BufferLength { len, channels }
    }

    /// Creates an [`Error::SizeMismatch`] error.
    #[inline]
    pub fn size_mismatch(src: usize, dst: usize) -> Self {
        Self::SizeMismatch { src, dst }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Rejects NaN and infinite parameters.
#[inline]
pub fn ensure_finite(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFinite { name, value })
    }
}
