//! # gamut-transfer
//!
//! Encoding conversions used by the tone-curve and gamut-mapping pipeline.
//!
//! # Terminology
//!
//! - **OETF**: Linear -> Encoded
//! - **EOTF**: Encoded -> Linear
//! - **Shaper**: Linear -> normalized log2 (or log10) anchored at mid-grey
//!
//! # Supported Functions
//!
//! | Module | Use Case | Range |
//! |--------|----------|-------|
//! | [`shaper`] | Curve/LUT domain encoding | [0, 1] normalized |
//! | [`srgb`] | IEC 61966-2-1 two-part curve | [0, 1] |
//! | [`gamma`] | Simple power-law gamma (2.2) | [0, 1] |
//! | [`pq`] | SMPTE ST 2084 HDR | [0, max nits] |
//!
//! # Usage
//!
//! ```rust
//! use gamut_transfer::{shaper, srgb};
//!
//! // Mid-grey sits at the centre of a symmetric +/-6 stop range
//! let n = shaper::linear_to_log2(0.18, 0.18, -6.0, 6.0);
//! assert!((n - 0.5).abs() < 1e-6);
//!
//! let encoded = srgb::oetf(0.18);
//! let linear = srgb::eotf(encoded);
//! assert!((linear - 0.18).abs() < 1e-5);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod gamma;
pub mod pq;
pub mod shaper;
pub mod srgb;

pub use gamma::{gamma_eotf, gamma_oetf};
pub use pq::{linear_to_pq, pq_to_linear};
pub use shaper::{linear_to_log10, linear_to_log2, log10_to_linear, log2_to_linear, Shaper, ShaperBase};
pub use srgb::{eotf as srgb_eotf, oetf as srgb_oetf};
