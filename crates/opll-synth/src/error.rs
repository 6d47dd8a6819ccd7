//! Error types for opll-synth.

use crate::ids::IndexKind;
use thiserror::Error;

/// Result type alias for opll-synth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in opll-synth.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Host index outside the fixed program/parameter set.
    #[error("{kind} index {index} out of range (0..{count})")]
    IndexOutOfRange {
        kind: IndexKind,
        index: i64,
        count: usize,
    },

    /// NaN or infinite parameter value.
    #[error("Invalid value {value} for parameter '{name}'")]
    InvalidValue { name: &'static str, value: f32 },

    #[error(transparent)]
    Core(#[from] opll_core::Error),
}
