//! Engine configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;
pub const DEFAULT_BLOCK_SIZE: usize = 512;

const MIN_SAMPLE_RATE: f64 = 8000.0;
const MAX_SAMPLE_RATE: f64 = 384000.0;

/// Configuration for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub sample_rate: f64,
    /// Largest block the host announced. Rendering accepts any length; this
    /// is informational.
    pub block_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        validate_sample_rate(self.sample_rate)?;
        if self.block_size == 0 {
            return Err(Error::InvalidConfig("block_size must be non-zero".into()));
        }
        Ok(())
    }
}

/// Rejects NaN, infinities and rates outside 8 kHz - 384 kHz.
pub fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        return Err(Error::InvalidSampleRate(sample_rate));
    }
    Ok(())
}
