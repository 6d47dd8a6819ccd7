//! Tolerance constants for render tests.

/// Floating point rounding errors.
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Envelope and oscillator arithmetic may drift slightly between paths.
pub const DSP_EPSILON: f32 = 1e-4;

/// Silence threshold (~-80dB).
pub const SILENCE_THRESHOLD: f32 = 0.0001;

/// Smallest RMS a held note is expected to reach (~-40dB).
pub const AUDIBLE_RMS: f32 = 0.01;
