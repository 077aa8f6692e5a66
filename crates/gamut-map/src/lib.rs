//! # gamut-map
//!
//! HDR gamut mapping on top of the `gamut-curve` tone curve.
//!
//! A [`GamutMapper`] owns a [`MapperConfig`], builds the curve tables once per
//! parameter change and maps flat RGB/RGBA float buffers through the
//! per-pixel pipeline:
//!
//! ```text
//! exposure -> clamp -> max/ratio split -> compression -> curve -> remap -> encode
//! ```
//!
//! # Execution
//!
//! - [`GamutMapper::map_buffer`] / [`GamutMapper::map_buffer_into`] - data
//!   parallel over the rayon pool
//! - [`GamutMapper::start_pass`] - cooperative [`IncrementalPass`] stepped
//!   by the caller, cancelled when the curve changes
//!
//! # Example
//!
//! ```rust
//! use gamut_map::{GamutMapper, MapMode, MapperConfig};
//!
//! let config = MapperConfig::default().with_mode(MapMode::MaxRgb);
//! let mapper = GamutMapper::new(config).unwrap();
//!
//! let mut pixels = vec![
//!     0.18, 0.18, 0.18,
//!     2.0, 0.1, 0.1,
//!     0.0, 0.0, 0.0,
//! ];
//! mapper.map_buffer(&mut pixels, 0.0).unwrap();
//! assert!(pixels.iter().all(|v| (0.0..=1.0).contains(v)));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod compression;
pub mod config;
mod error;
pub mod export;
pub mod incremental;
pub mod mapper;
pub mod pipeline;
pub mod state;

pub use compression::{calculate_gamut_compression, compression_threshold};
pub use config::{CompressionFalloff, DisplayEncoding, MapMode, MapperConfig};
pub use error::{MapError, MapResult};
pub use export::CurveLut;
pub use incremental::{IncrementalPass, PassStatus};
pub use mapper::GamutMapper;
pub use pipeline::{CurveTables, PixelPipeline};
pub use state::CurveState;
