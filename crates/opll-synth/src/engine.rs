//! The seam between the adapter and a concrete synthesis backend.

use crate::ids::{ParameterId, ProgramId};

/// A polyphonic voice engine driven one sample at a time.
///
/// The per-event methods (`key_on`, `key_off`, `all_keys_off`,
/// `set_pitch_wheel`), [`step`](Self::step), and the program and parameter
/// setters run in the render context and must not allocate, lock or block.
/// The name, label and text lookups serve the control side and may allocate.
/// Parameter values are in native units (see [`ParameterId::info`]).
pub trait SynthEngine: Send {
    /// `velocity` in [0, 1). Zero-velocity handling is up to the engine.
    fn key_on(&mut self, note: u8, velocity: f32);

    /// No-op when `note` is not sounding.
    fn key_off(&mut self, note: u8);

    fn all_keys_off(&mut self);

    /// `offset` in [-1, 1], 0 = centre.
    fn set_pitch_wheel(&mut self, offset: f32);

    /// Advance one sample and return it.
    fn step(&mut self) -> f32;

    fn set_sample_rate(&mut self, sample_rate: f64);

    fn set_program(&mut self, program: ProgramId);

    fn program(&self) -> ProgramId;

    fn set_parameter(&mut self, id: ParameterId, value: f32);

    fn parameter(&self, id: ParameterId) -> f32;

    /// Drop all voices immediately, without release tails.
    fn reset(&mut self);

    fn program_name(&self, program: ProgramId) -> &'static str {
        program.name()
    }

    fn parameter_name(&self, id: ParameterId) -> &'static str {
        id.info().name
    }

    fn parameter_label(&self, id: ParameterId) -> &'static str {
        id.info().label
    }

    /// Display text for a native value of `id`.
    fn parameter_text(&self, id: ParameterId, value: f32) -> String {
        id.info().format(value)
    }
}

impl<E: SynthEngine + ?Sized> SynthEngine for Box<E> {
    fn key_on(&mut self, note: u8, velocity: f32) {
        (**self).key_on(note, velocity)
    }

    fn key_off(&mut self, note: u8) {
        (**self).key_off(note)
    }

    fn all_keys_off(&mut self) {
        (**self).all_keys_off()
    }

    fn set_pitch_wheel(&mut self, offset: f32) {
        (**self).set_pitch_wheel(offset)
    }

    #[inline]
    fn step(&mut self) -> f32 {
        (**self).step()
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        (**self).set_sample_rate(sample_rate)
    }

    fn set_program(&mut self, program: ProgramId) {
        (**self).set_program(program)
    }

    fn program(&self) -> ProgramId {
        (**self).program()
    }

    fn set_parameter(&mut self, id: ParameterId, value: f32) {
        (**self).set_parameter(id, value)
    }

    fn parameter(&self, id: ParameterId) -> f32 {
        (**self).parameter(id)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn program_name(&self, program: ProgramId) -> &'static str {
        (**self).program_name(program)
    }

    fn parameter_name(&self, id: ParameterId) -> &'static str {
        (**self).parameter_name(id)
    }

    fn parameter_label(&self, id: ParameterId) -> &'static str {
        (**self).parameter_label(id)
    }

    fn parameter_text(&self, id: ParameterId, value: f32) -> String {
        (**self).parameter_text(id, value)
    }
}
