//! Curve error types.

use thiserror::Error;

/// Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors that can occur while building, solving or sampling a curve.
#[derive(Debug, Error)]
pub enum CurveError {
    /// Curve parameters violate an invariant.
    #[error("invalid curve config: {0}")]
    InvalidConfig(String),

    /// Control points are not ordered by x.
    #[error("control point P{index} x={x} precedes P{prev} x={prev_x}")]
    NonMonotonic {
        /// Offending point index
        index: usize,
        /// Its x coordinate
        x: f32,
        /// Previous point index
        prev: usize,
        /// Previous x coordinate
        prev_x: f32,
    },

    /// The quadratic has no root in [0, 1].
    #[error("no root in [0, 1] for {axis} = {value} on {segment} segment")]
    NoRoot {
        /// "x" or "y"
        axis: &'static str,
        /// Queried coordinate
        value: f32,
        /// Segment name
        segment: &'static str,
    },

    /// Query value is NaN or infinite.
    #[error("non-finite curve query: {0}")]
    NonFinite(f32),

    /// Parallel sample arrays disagree in length or order.
    #[error("sample table mismatch: {0}")]
    TableMismatch(String),

    /// Core validation failure.
    #[error(transparent)]
    Core(#[from] gamut_core::Error),
}
