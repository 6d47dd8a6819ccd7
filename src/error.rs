//! Centralized error type for the opll umbrella crate.
//!
//! Wraps the member crate errors so `?` propagates across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] opll_core::Error),

    #[error("Synth: {0}")]
    Synth(#[from] opll_synth::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
