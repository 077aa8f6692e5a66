//! Curve lifecycle state machine.
//!
//! ```text
//!   NotCalculated --+
//!                   +--> Calculating --> Calculated
//!   Dirty ----------+         |              |
//!     ^                       | (failed)     |
//!     +-----------------------+--------------+ (params changed)
//! ```
//!
//! Mapping passes only run in `Calculated`. Every other state means the
//! published tables are missing or about to be replaced.

use std::fmt;

use serde::Serialize;

use crate::{MapError, MapResult};

/// State of the mapper's curve tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CurveState {
    /// No tables have been built yet.
    #[default]
    NotCalculated,
    /// Parameters changed since the last build.
    Dirty,
    /// A rebuild is running.
    Calculating,
    /// Tables are published and match the parameters.
    Calculated,
}

impl CurveState {
    /// True if `self -> to` is a legal transition.
    pub fn can_transition(self, to: CurveState) -> bool {
        use CurveState::*;
        matches!(
            (self, to),
            (NotCalculated, Dirty)
                | (NotCalculated, Calculating)
                | (Dirty, Dirty)
                | (Dirty, Calculating)
                | (Calculating, Calculated)
                | (Calculating, Dirty)
                | (Calculated, Dirty)
                | (Calculated, Calculating)
        )
    }

    /// Moves to `to`, or fails with [`MapError::InvalidTransition`].
    pub fn transition(&mut self, to: CurveState) -> MapResult<()> {
        if !self.can_transition(to) {
            return Err(MapError::InvalidTransition { from: *self, to });
        }
        *self = to;
        Ok(())
    }

    /// True once tables are safe to read.
    #[inline]
    pub fn is_ready(self) -> bool {
        self == CurveState::Calculated
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            CurveState::NotCalculated => "not-calculated",
            CurveState::Dirty => "dirty",
            CurveState::Calculating => "calculating",
            CurveState::Calculated => "calculated",
        }
    }
}

impl fmt::Display for CurveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
