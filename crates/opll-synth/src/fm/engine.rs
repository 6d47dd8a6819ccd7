//! Nine-channel, two-operator FM engine modelled on the OPLL.

use super::envelope::{Envelope, EnvelopeTiming};
use super::patch::{OperatorPatch, Patch};
use crate::engine::SynthEngine;
use crate::ids::{ParameterId, ProgramId};
use crate::voice::VoiceAllocator;
use opll_core::{ParameterRange, SmoothedValue, DEFAULT_SAMPLE_RATE};
use opll_midi::note_to_hz;
use std::f32::consts::TAU;

/// Simultaneous voices (OPLL melody channels).
pub const VOICES: usize = 9;

/// Mix gain per voice before the master volume.
const HEADROOM: f32 = 1.0 / 3.0;
/// Carrier phase deviation at full modulator output and 100 % brightness.
const MODULATION_DEPTH: f32 = 4.0;
const TREMOLO_HZ: f32 = 3.7;
const TREMOLO_DEPTH_DB: f32 = 4.8;
const VIBRATO_HZ: f32 = 6.4;
/// Extra vibrato depth for operators with the VIB bit.
const PATCH_VIBRATO_CENTS: f32 = 14.0;
const VOLUME_SMOOTHING_SECS: f32 = 0.010;

/// Per-sample values shared by every voice.
struct Modulation {
    sample_rate: f32,
    bend_semitones: f32,
    brightness: f32,
    vibrato_ratio: f32,
    patch_vibrato_ratio: f32,
    tremolo_gain: f32,
}

impl Modulation {
    #[inline]
    fn pitch_ratio(&self, op: &OperatorPatch) -> f32 {
        if op.vibrato {
            self.patch_vibrato_ratio
        } else {
            self.vibrato_ratio
        }
    }

    #[inline]
    fn gain(&self, op: &OperatorPatch) -> f32 {
        if op.tremolo {
            self.tremolo_gain
        } else {
            1.0
        }
    }
}

#[inline]
fn waveform(radians: f32, half_sine: bool) -> f32 {
    let s = radians.sin();
    if half_sine && s < 0.0 {
        0.0
    } else {
        s
    }
}

#[inline]
fn advance(phase: f32, hz: f32, sample_rate: f32) -> f32 {
    let next = phase + hz / sample_rate;
    next - next.floor()
}

#[derive(Debug, Clone, Copy, Default)]
struct Voice {
    note: u8,
    velocity: f32,
    mod_phase: f32,
    car_phase: f32,
    /// Last two modulator outputs
    feedback: [f32; 2],
    mod_env: Envelope,
    car_env: Envelope,
}

impl Voice {
    fn start(&mut self, note: u8, velocity: f32, patch: &Patch, timing: &EnvelopeTiming) {
        // A stolen voice keeps its phase so the takeover stays continuous.
        if self.is_idle() {
            self.mod_phase = 0.0;
            self.car_phase = 0.0;
            self.feedback = [0.0; 2];
        }
        self.note = note;
        self.velocity = velocity;
        self.mod_env.trigger(&patch.modulator, timing);
        self.car_env.trigger(&patch.carrier, timing);
    }

    fn configure(&mut self, patch: &Patch, timing: &EnvelopeTiming) {
        self.mod_env.configure(&patch.modulator, timing);
        self.car_env.configure(&patch.carrier, timing);
    }

    fn release(&mut self) {
        self.mod_env.release();
        self.car_env.release();
    }

    fn kill(&mut self) {
        self.mod_env.kill();
        self.car_env.kill();
    }

    #[inline]
    fn is_idle(&self) -> bool {
        self.car_env.is_idle()
    }

    #[inline]
    fn render(&mut self, patch: &Patch, m: &Modulation) -> f32 {
        let base_hz = note_to_hz(self.note as f32 + m.bend_semitones);

        let op = &patch.modulator;
        let feedback = patch.feedback_amount() * (self.feedback[0] + self.feedback[1]) * 0.5;
        let modulator = waveform(self.mod_phase * TAU + feedback, op.half_sine)
            * self.mod_env.next()
            * patch.modulator_level
            * m.gain(op);
        self.feedback = [self.feedback[1], modulator];
        self.mod_phase = advance(
            self.mod_phase,
            base_hz * op.multiplier * m.pitch_ratio(op),
            m.sample_rate,
        );

        let op = &patch.carrier;
        let deviation = modulator * MODULATION_DEPTH * m.brightness;
        let carrier = waveform(self.car_phase * TAU + deviation, op.half_sine)
            * self.car_env.next()
            * self.velocity
            * m.gain(op);
        self.car_phase = advance(
            self.car_phase,
            base_hz * op.multiplier * m.pitch_ratio(op),
            m.sample_rate,
        );

        if self.car_env.is_idle() {
            self.mod_env.kill();
        }
        carrier
    }
}

/// Built-in synthesis backend: nine voices, fifteen ROM instruments.
///
/// # Example
///
/// ```
/// use opll_synth::{FmEngine, ProgramId, SynthEngine};
///
/// let mut engine = FmEngine::new(44100.0);
/// engine.set_program(ProgramId::Flute);
/// engine.key_on(69, 0.8);
///
/// let mut block = [0.0f32; 256];
/// for sample in block.iter_mut() {
///     *sample = engine.step();
/// }
/// assert!(block.iter().any(|s| s.abs() > 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct FmEngine {
    voices: [Voice; VOICES],
    allocator: VoiceAllocator<VOICES>,
    program: ProgramId,
    patch: Patch,
    /// Native values, indexed by `ParameterId::index()`
    params: [f32; ParameterId::COUNT],
    timing: EnvelopeTiming,
    volume: SmoothedValue,
    pitch_wheel: f32,
    tremolo_phase: f32,
    vibrato_phase: f32,
}

impl FmEngine {
    pub fn new(sample_rate: f64) -> Self {
        let params = ParameterId::ALL.map(|id| id.info().range.default);
        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate as f32
        } else {
            DEFAULT_SAMPLE_RATE as f32
        };
        let initial_volume = ParameterRange::db_to_linear(params[ParameterId::Volume.index()]);

        Self {
            voices: [Voice::default(); VOICES],
            allocator: VoiceAllocator::new(),
            program: ProgramId::default(),
            patch: Patch::default(),
            params,
            timing: EnvelopeTiming {
                sample_rate,
                ..EnvelopeTiming::default()
            },
            volume: SmoothedValue::new(initial_volume, VOLUME_SMOOTHING_SECS, sample_rate),
            pitch_wheel: 0.0,
            tremolo_phase: 0.0,
            vibrato_phase: 0.0,
        }
    }

    /// Voices currently sounding (held or releasing).
    pub fn active_voices(&self) -> usize {
        self.allocator.active_count()
    }

    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    fn reconfigure_voices(&mut self) {
        for voice in self.voices.iter_mut().filter(|v| !v.is_idle()) {
            voice.configure(&self.patch, &self.timing);
        }
    }

    fn modulation(&mut self) -> Modulation {
        let sample_rate = self.timing.sample_rate;
        self.tremolo_phase = advance(self.tremolo_phase, TREMOLO_HZ, sample_rate);
        self.vibrato_phase = advance(self.vibrato_phase, VIBRATO_HZ, sample_rate);

        let tremolo = 0.5 * (1.0 + (self.tremolo_phase * TAU).sin());
        let vibrato = (self.vibrato_phase * TAU).sin();
        let cents = self.params[ParameterId::Vibrato.index()];

        Modulation {
            sample_rate,
            bend_semitones: self.pitch_wheel * self.params[ParameterId::BendRange.index()],
            brightness: self.params[ParameterId::Brightness.index()] / 100.0,
            vibrato_ratio: 2.0_f32.powf(cents * vibrato / 1200.0),
            patch_vibrato_ratio: 2.0_f32.powf((cents + PATCH_VIBRATO_CENTS) * vibrato / 1200.0),
            tremolo_gain: ParameterRange::db_to_linear(-TREMOLO_DEPTH_DB * tremolo),
        }
    }
}

impl Default for FmEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl SynthEngine for FmEngine {
    /// Zero velocity releases the note.
    fn key_on(&mut self, note: u8, velocity: f32) {
        let note = note & 0x7F;
        if velocity <= 0.0 || !velocity.is_finite() {
            self.key_off(note);
            return;
        }

        if let Some(slot) = self.allocator.release(note) {
            self.voices[slot].release();
        }
        let velocity = velocity.min(1.0);
        let slot = self.allocator.allocate(note, velocity).slot_index();
        self.voices[slot].start(note, velocity, &self.patch, &self.timing);
    }

    fn key_off(&mut self, note: u8) {
        if let Some(slot) = self.allocator.release(note) {
            self.voices[slot].release();
        }
    }

    fn all_keys_off(&mut self) {
        self.allocator.release_all();
        for voice in self.voices.iter_mut() {
            voice.release();
        }
    }

    fn set_pitch_wheel(&mut self, offset: f32) {
        if offset.is_finite() {
            self.pitch_wheel = offset.clamp(-1.0, 1.0);
        }
    }

    #[inline]
    fn step(&mut self) -> f32 {
        let modulation = self.modulation();

        let mut mix = 0.0;
        for (slot, voice) in self.voices.iter_mut().enumerate() {
            if voice.is_idle() {
                continue;
            }
            mix += voice.render(&self.patch, &modulation);
            if voice.is_idle() {
                self.allocator.voice_finished(slot);
            } else {
                self.allocator
                    .update_envelope_level(slot, voice.car_env.level());
            }
        }
        self.allocator.advance_time(1);

        (mix * HEADROOM * self.volume.next_sample()).clamp(-1.0, 1.0)
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return;
        }
        self.timing.sample_rate = sample_rate as f32;
        self.volume
            .set_smooth_time(VOLUME_SMOOTHING_SECS, self.timing.sample_rate);
        self.reconfigure_voices();
    }

    fn set_program(&mut self, program: ProgramId) {
        self.program = program;
        self.patch = Patch::builtin(program);
        self.reconfigure_voices();
    }

    fn program(&self) -> ProgramId {
        self.program
    }

    fn set_parameter(&mut self, id: ParameterId, value: f32) {
        if !value.is_finite() {
            return;
        }
        let value = id.info().range.clamp(value);
        self.params[id.index()] = value;

        match id {
            ParameterId::Volume => self.volume.set_target(ParameterRange::db_to_linear(value)),
            ParameterId::Attack => {
                self.timing.attack_scale = value;
                self.reconfigure_voices();
            }
            ParameterId::Decay => {
                self.timing.decay_scale = value;
                self.reconfigure_voices();
            }
            ParameterId::Release => {
                self.timing.release_scale = value;
                self.reconfigure_voices();
            }
            // Read per sample
            ParameterId::Brightness | ParameterId::Vibrato | ParameterId::BendRange => {}
        }
    }

    fn parameter(&self, id: ParameterId) -> f32 {
        self.params[id.index()]
    }

    fn reset(&mut self) {
        for voice in self.voices.iter_mut() {
            voice.kill();
        }
        self.allocator.reset();
        self.pitch_wheel = 0.0;
        self.volume.set_immediate(self.volume.target());
    }
}
