//! Smoothed values for zipper-free parameter changes.
//!
//! # Example
//!
//! ```
//! use opll_core::SmoothedValue;
//!
//! // 10ms ramp at 44.1kHz
//! let mut gain = SmoothedValue::new(1.0, 0.010, 44100.0);
//! gain.set_target(0.5);
//!
//! let mut buffer = [1.0f32; 64];
//! for sample in buffer.iter_mut() {
//!     *sample *= gain.next_sample();
//! }
//! ```

/// Linear ramp from the current value to a target over a fixed time.
///
/// Call [`next_sample()`](SmoothedValue::next_sample) once per sample.
#[derive(Debug, Clone)]
pub struct SmoothedValue {
    current: f32,
    target: f32,
    step: f32,
    samples_remaining: u32,
    smooth_samples: u32,
}

impl SmoothedValue {
    pub fn new(initial: f32, smooth_time_secs: f32, sample_rate: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            samples_remaining: 0,
            smooth_samples: Self::samples_for(smooth_time_secs, sample_rate),
        }
    }

    fn samples_for(smooth_time_secs: f32, sample_rate: f32) -> u32 {
        (smooth_time_secs * sample_rate).max(1.0) as u32
    }

    #[inline]
    pub fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() < f32::EPSILON {
            return;
        }

        self.target = target;
        self.samples_remaining = self.smooth_samples;
        self.step = (self.target - self.current) / self.samples_remaining as f32;
    }

    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.step = 0.0;
        self.samples_remaining = 0;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.step;
            self.samples_remaining -= 1;

            // Snap to avoid drift
            if self.samples_remaining == 0 {
                self.current = self.target;
            }
        }

        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn is_smoothing(&self) -> bool {
        self.samples_remaining > 0
    }

    /// Takes effect on the next `set_target()` call.
    pub fn set_smooth_time(&mut self, smooth_time_secs: f32, sample_rate: f32) {
        self.smooth_samples = Self::samples_for(smooth_time_secs, sample_rate);
    }
}

impl Default for SmoothedValue {
    fn default() -> Self {
        Self::new(0.0, 0.005, 44100.0)
    }
}
