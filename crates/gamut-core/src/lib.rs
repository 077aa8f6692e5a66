//! # gamut-core
//!
//! Core types shared by the HDR tone-curve and gamut-mapping crates.
//!
//! - [`Point2`] - 2D point used for curve control points
//! - [`PixelLayout`], [`PixelBuffer`] - flat RGB/RGBA float buffers
//! - [`Error`], [`Result`] - shared error handling
//! - [`interp`] - scalar interpolation helpers
//!
//! ## Crate Structure
//!
//! ```text
//! gamut-core (this crate)
//!    ^
//!    |
//!    +-- gamut-transfer (shaper, sRGB, PQ)
//!    +-- gamut-curve (control points, solver, sample tables)
//!    +-- gamut-map (per-pixel pipeline, passes, LUT export)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod interp;
pub mod pixel;
pub mod point;

pub use error::{Error, Result};
pub use interp::{clamp01, inverse_lerp, lerp, remap, smoothstep};
pub use pixel::{max_channel, PixelBuffer, PixelLayout};
pub use point::Point2;

/// Prelude module for convenient imports.
///
/// ```
/// use gamut_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::pixel::{max_channel, PixelBuffer, PixelLayout};
    pub use crate::point::Point2;
}
