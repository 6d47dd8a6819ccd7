//! Parameter range and scaling between the host's normalized values and
//! engine-native units.
//!
//! # Example
//!
//! ```
//! use opll_core::{ParameterRange, ParameterScale};
//!
//! // Envelope time multiplier: x0.1 to x10, geometric
//! let attack = ParameterRange::new(0.1, 10.0, 1.0, ParameterScale::Logarithmic);
//!
//! let native = attack.denormalize(0.5); // 1.0 (geometric mean)
//! let back = attack.normalize(native); // 0.5
//! # assert!((native - 1.0).abs() < 1e-4);
//! # assert!((back - 0.5).abs() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};

/// How a parameter value is scaled between normalized (0-1) and native values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterScale {
    /// `native = min + normalized * (max - min)`
    #[default]
    Linear,

    /// `native = min * (max/min)^normalized`
    ///
    /// Requires `min > 0` and `max > min`.
    Logarithmic,

    /// Values are quantized to integers between `min` and `max`.
    Integer,
}

/// Native range, default and scaling law of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    /// Default native value
    pub default: f32,
    pub scale: ParameterScale,
}

impl ParameterRange {
    /// `default` is clamped into `[min, max]`.
    pub fn new(min: f32, max: f32, default: f32, scale: ParameterScale) -> Self {
        debug_assert!(max > min, "max must be greater than min");

        Self {
            min,
            max,
            default: default.clamp(min, max),
            scale,
        }
    }

    pub fn linear(min: f32, max: f32, default: f32) -> Self {
        Self::new(min, max, default, ParameterScale::Linear)
    }

    pub fn logarithmic(min: f32, max: f32, default: f32) -> Self {
        Self::new(min, max, default, ParameterScale::Logarithmic)
    }

    pub fn integer(min: i32, max: i32, default: i32) -> Self {
        Self::new(
            min as f32,
            max as f32,
            default as f32,
            ParameterScale::Integer,
        )
    }

    /// Convert a native value to normalized (0.0-1.0).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let value = value.clamp(self.min, self.max);
        let range = self.max - self.min;

        if range <= 0.0 {
            return 0.0;
        }

        match self.scale {
            ParameterScale::Linear => (value - self.min) / range,

            ParameterScale::Logarithmic => {
                if self.min <= 0.0 {
                    // Fallback to linear if min is invalid
                    (value - self.min) / range
                } else {
                    let log_min = self.min.ln();
                    let log_max = self.max.ln();
                    (value.ln() - log_min) / (log_max - log_min)
                }
            }

            ParameterScale::Integer => (value.round() - self.min) / range,
        }
    }

    /// Convert a normalized value (0.0-1.0) to a native value.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        let range = self.max - self.min;

        match self.scale {
            ParameterScale::Linear => self.min + normalized * range,

            ParameterScale::Logarithmic => {
                if self.min <= 0.0 {
                    self.min + normalized * range
                } else {
                    let log_min = self.min.ln();
                    let log_max = self.max.ln();
                    (log_min + normalized * (log_max - log_min)).exp()
                }
            }

            ParameterScale::Integer => (self.min + normalized * range).round(),
        }
    }

    /// Width of one step in normalized units; `0.0` for continuous scales.
    #[inline]
    pub fn quantization(&self) -> f32 {
        match self.scale {
            ParameterScale::Integer if self.max > self.min => 1.0 / (self.max - self.min),
            _ => 0.0,
        }
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn default_normalized(&self) -> f32 {
        self.normalize(self.default)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Convert dB value to linear amplitude.
    #[inline]
    pub fn db_to_linear(db: f32) -> f32 {
        10.0_f32.powf(db / 20.0)
    }
}

impl Default for ParameterRange {
    fn default() -> Self {
        Self::linear(0.0, 1.0, 0.5)
    }
}
