//! # gamut-curve
//!
//! Parametric tone curve mapping scene-referred values to display values.
//!
//! The curve is three contiguous quadratic Bezier segments defined by seven
//! control points:
//!
//! ```text
//!   toe       = (P0, P1, P2)
//!   mid       = (P2, P3, P4)     P4 = mid-grey
//!   shoulder  = (P4, P5, P6)     P6 = (max radiometric, max display)
//! ```
//!
//! # Modules
//!
//! - [`config`] - [`CurveConfig`] scalar parameters and validation
//! - [`control`] - [`ControlPoints`] and the [`CurveBuilder`]
//! - [`bezier`] - quadratic Bezier evaluation and closed-form inversion
//! - [`solver`] - x <-> t <-> y solves over the whole curve
//! - [`table`] - [`SampleTable`] pre-evaluated samples with fast lookup
//!
//! # Example
//!
//! ```rust
//! use gamut_curve::{CurveConfig, ControlPoints, LookupMode, SampleSpacing, SampleTable};
//!
//! let config = CurveConfig::default();
//! let points = ControlPoints::build(&config).unwrap();
//! let table = SampleTable::build(&points, 1024, SampleSpacing::Log2).unwrap();
//!
//! // The curve passes through mid-grey
//! let y = table.lookup_y_for_x(0.18, LookupMode::Bilinear);
//! assert!((y - 0.18).abs() < 1e-3);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bezier;
pub mod config;
pub mod control;
mod error;
pub mod solver;
pub mod table;

pub use bezier::QuadBezier;
pub use config::CurveConfig;
pub use control::{ControlPoints, CurveBuilder, Segment};
pub use error::{CurveError, CurveResult};
pub use solver::CurvePosition;
pub use table::{LookupMode, SampleSpacing, SampleTable, DEFAULT_TABLE_SIZE};
