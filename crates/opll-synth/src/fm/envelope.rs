//! Per-operator envelope generator.
//!
//! Attack is a linear ramp; decay and release are exponential (constant dB
//! per second). Rate 0 freezes a stage, rate 15 is the fastest.

use super::patch::OperatorPatch;

/// Attack time at rate 1, seconds.
const ATTACK_BASE_SECS: f32 = 2.5;
/// Time to fall 60 dB at rate 1, seconds.
const DECAY_BASE_SECS: f32 = 12.0;
/// Time halves every 4/3 rate steps.
const RATE_OCTAVES_PER_STEP: f32 = 0.75;
const SUSTAIN_STEP_DB: f32 = 3.0;
/// Below this the envelope is considered finished.
const SILENCE_LEVEL: f32 = 1.0e-4;

/// Stage-time scaling and sample rate shared by all envelopes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeTiming {
    pub sample_rate: f32,
    pub attack_scale: f32,
    pub decay_scale: f32,
    pub release_scale: f32,
}

impl Default for EnvelopeTiming {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            attack_scale: 1.0,
            decay_scale: 1.0,
            release_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Envelope {
    stage: Stage,
    level: f32,
    attack_step: f32,
    decay_coef: f32,
    release_coef: f32,
    sustain_level: f32,
    sustained: bool,
}

fn rate_seconds(rate: u8, base: f32) -> Option<f32> {
    if rate == 0 {
        return None;
    }
    Some(base * 0.5_f32.powf((rate - 1) as f32 * RATE_OCTAVES_PER_STEP))
}

/// Per-sample multiplier falling 60 dB over `secs`.
fn decay_coefficient(secs: Option<f32>, sample_rate: f32) -> f32 {
    match secs {
        Some(secs) => {
            let samples = (secs * sample_rate).max(1.0);
            (1.0e-3_f32.ln() / samples).exp()
        }
        None => 1.0,
    }
}

impl Envelope {
    /// Recompute stage speeds. The current stage and level are kept.
    pub fn configure(&mut self, op: &OperatorPatch, timing: &EnvelopeTiming) {
        let sr = timing.sample_rate;

        self.attack_step = match rate_seconds(op.attack_rate, ATTACK_BASE_SECS) {
            Some(secs) => 1.0 / (secs * timing.attack_scale * sr).max(1.0),
            None => 0.0,
        };
        self.decay_coef = decay_coefficient(
            rate_seconds(op.decay_rate, DECAY_BASE_SECS).map(|s| s * timing.decay_scale),
            sr,
        );
        // A zero release rate would hold forever.
        self.release_coef = decay_coefficient(
            rate_seconds(op.release_rate.max(1), DECAY_BASE_SECS).map(|s| s * timing.release_scale),
            sr,
        );
        self.sustain_level = 10.0_f32.powf(-(op.sustain_level as f32) * SUSTAIN_STEP_DB / 20.0);
        self.sustained = op.sustained;
    }

    /// Start the attack from the current level.
    pub fn trigger(&mut self, op: &OperatorPatch, timing: &EnvelopeTiming) {
        self.configure(op, timing);
        self.stage = Stage::Attack;
    }

    pub fn release(&mut self) {
        if self.stage != Stage::Idle {
            self.stage = Stage::Release;
        }
    }

    pub fn kill(&mut self) {
        self.stage = Stage::Idle;
        self.level = 0.0;
    }

    #[inline]
    pub fn next(&mut self) -> f32 {
        match self.stage {
            Stage::Idle => return 0.0,
            Stage::Attack => {
                self.level += self.attack_step;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = Stage::Decay;
                }
            }
            Stage::Decay => {
                self.level *= self.decay_coef;
                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = Stage::Sustain;
                }
            }
            // Percussive tones keep falling at the release speed.
            Stage::Sustain if !self.sustained => self.level *= self.release_coef,
            Stage::Sustain => {}
            Stage::Release => self.level *= self.release_coef,
        }

        if matches!(self.stage, Stage::Sustain | Stage::Release) && self.level < SILENCE_LEVEL {
            self.kill();
        }
        self.level
    }

    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.stage == Stage::Idle
    }
}
