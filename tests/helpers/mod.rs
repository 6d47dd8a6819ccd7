//! Test helpers and fixtures for plugin integration tests.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): exact operations
//! - `DSP_EPSILON` (1e-4): envelope and oscillator arithmetic
//! - `SILENCE_THRESHOLD` (0.0001): silence detection (-80dB)

#![allow(dead_code)]

pub mod tolerances;

use opll::prelude::*;

/// Default test sample rate
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// Standard block size for deterministic testing
pub const TEST_BLOCK_SIZE: usize = 512;

/// Resumed plugin at the test sample rate.
pub fn test_plugin() -> OpllPlugin {
    let mut plugin = OpllPlugin::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .block_size(TEST_BLOCK_SIZE)
        .build()
        .expect("Failed to create test plugin");
    plugin.resume();
    plugin
}

/// Render `frames` samples in host-sized blocks.
pub fn render(plugin: &mut OpllPlugin, frames: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; frames];
    for block in out.chunks_mut(TEST_BLOCK_SIZE) {
        plugin.process_replacing(block);
    }
    out
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Largest difference between neighbouring samples.
pub fn max_step(samples: &[f32]) -> f32 {
    samples
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0_f32, f32::max)
}

/// Assert that a signal is approximately silent (all values near zero).
pub fn assert_silence(samples: &[f32], tolerance: f32) {
    let max = peak(samples);
    assert!(
        max <= tolerance,
        "Expected silence, but peak amplitude was {}",
        max
    );
}

/// Assert that a signal has content (not silent).
pub fn assert_has_audio(samples: &[f32], min_rms: f32) {
    let r = rms(samples);
    assert!(
        r >= min_rms,
        "Expected audio content with RMS >= {}, but RMS was {}",
        min_rms,
        r
    );
}

/// Assert every sample is finite and within full scale.
pub fn assert_in_range(samples: &[f32]) {
    for (i, s) in samples.iter().enumerate() {
        assert!(
            s.is_finite() && s.abs() <= 1.0,
            "Sample {} out of range: {}",
            i,
            s
        );
    }
}

/// Route plugin logs to the test harness output. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
