//! Error types for gamut mapping.
//!
//! This module provides error handling for:
//! - Mapper config parsing (YAML) and validation
//! - Curve rebuilds and the curve state machine
//! - Buffer validation for parallel and incremental passes

use std::path::PathBuf;
use thiserror::Error;

use crate::CurveState;

/// Result type for mapping operations.
pub type MapResult<T> = Result<T, MapError>;

/// Errors that can occur while configuring or running the mapper.
#[derive(Debug, Error)]
pub enum MapError {
    /// Buffer or parameter validation failed.
    #[error(transparent)]
    Core(#[from] gamut_core::Error),

    /// Curve construction or sampling failed.
    #[error(transparent)]
    Curve(#[from] gamut_curve::CurveError),

    /// A mapping request arrived before the curve tables were published.
    #[error("curve not ready: state is {state}")]
    CurveNotReady {
        /// State observed by the request.
        state: CurveState,
    },

    /// A state-machine transition that is not allowed.
    #[error("invalid curve state transition {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: CurveState,
        /// Requested state.
        to: CurveState,
    },

    /// Mapper parameter outside its accepted range.
    #[error("invalid mapper config: {0}")]
    InvalidConfig(String),

    /// An incremental pass was committed before it completed.
    #[error("pass incomplete: {done} of {total} pixels mapped")]
    PassIncomplete {
        /// Pixels mapped so far.
        done: usize,
        /// Pixels in the pass.
        total: usize,
    },

    /// The curve changed while a pass was in flight.
    #[error("pass cancelled: curve parameters changed")]
    PassCancelled,

    /// Config file not found.
    #[error("config file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched.
        path: PathBuf,
    },

    /// I/O error reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
