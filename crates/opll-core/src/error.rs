//! Error types for opll-core.

use thiserror::Error;

/// Error type for opll-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid sample rate: {0}. Must be between 8000 and 384000 Hz")]
    InvalidSampleRate(f64),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
