//! Event-to-voice adapter and the per-sample render loop.

use crate::engine::SynthEngine;
use crate::ids::{ParameterId, ProgramId};
use crate::shared::{AdapterControls, SharedState, PROGRAM_BIT, SAMPLE_RATE_MASK};
use crate::Result;
use opll_core::config::validate_sample_rate;
use opll_core::Arc;
use opll_midi::{decode_batch, Command, RawEvent};

#[inline]
fn route<E: SynthEngine>(engine: &mut E, command: Command) {
    match command {
        Command::NoteOn { note, velocity } => engine.key_on(note, velocity),
        Command::NoteOff { note } => engine.key_off(note),
        Command::AllNotesOff => engine.all_keys_off(),
        Command::PitchBend { offset } => engine.set_pitch_wheel(offset),
    }
}

/// Drives a [`SynthEngine`] from decoded commands and renders its output.
///
/// The adapter is owned by the render context. Program, parameter and
/// sample-rate changes can also arrive from other threads through
/// [`AdapterControls`]. Program and parameter changes are applied between two
/// samples; a requested sample rate only at the start of a block.
///
/// # Example
///
/// ```
/// use opll_midi::RawEvent;
/// use opll_synth::{FmEngine, ParameterId, VoiceAdapter};
///
/// let mut adapter = VoiceAdapter::new(FmEngine::default(), 44100.0)?;
/// adapter.set_parameter(ParameterId::Volume, 1.0)?;
/// adapter.process_events(&[RawEvent::note_on(0, 60, 100)]);
///
/// let mut block = [0.0f32; 128];
/// adapter.render_block(&mut block);
/// assert!(block.iter().any(|s| *s != 0.0));
/// # Ok::<(), opll_synth::Error>(())
/// ```
pub struct VoiceAdapter<E: SynthEngine> {
    engine: E,
    shared: Arc<SharedState>,
    sample_rate: f64,
}

impl<E: SynthEngine> VoiceAdapter<E> {
    /// Wrap `engine`, taking its current program and parameters as the
    /// initial shared state.
    pub fn new(mut engine: E, sample_rate: f64) -> Result<Self> {
        validate_sample_rate(sample_rate)?;
        engine.set_sample_rate(sample_rate);

        let parameters =
            ParameterId::ALL.map(|id| id.info().range.normalize(engine.parameter(id)));
        let shared = Arc::new(SharedState::new(engine.program(), parameters));

        Ok(Self {
            engine,
            shared,
            sample_rate,
        })
    }

    /// Route one command to the engine.
    #[inline]
    pub fn apply_command(&mut self, command: Command) {
        route(&mut self.engine, command);
    }

    /// Decode and apply a host batch in order. Returns the number of
    /// commands applied.
    pub fn process_events(&mut self, events: &[RawEvent]) -> usize {
        let engine = &mut self.engine;
        decode_batch(events, |command| route(engine, command))
    }

    /// Render a one-frame block.
    ///
    /// A non-finite engine sample is replaced by `0.0`, the engine is reset
    /// and the fault is counted.
    #[inline]
    pub fn render_sample(&mut self) -> f32 {
        self.apply_requested_sample_rate();
        self.render_frame()
    }

    /// Fill `out` with exactly `out.len()` samples. The sample rate is fixed
    /// for the whole block.
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.apply_requested_sample_rate();
        for sample in out.iter_mut() {
            *sample = self.render_frame();
        }
    }

    #[inline]
    fn render_frame(&mut self) -> f32 {
        self.sync();

        let sample = self.engine.step();
        if sample.is_finite() {
            sample
        } else {
            self.engine.reset();
            self.shared.record_fault();
            0.0
        }
    }

    /// Copy program and parameter changes into the engine. One atomic load
    /// when nothing is pending.
    #[inline]
    fn sync(&mut self) {
        let dirty = self.shared.dirty.take(!SAMPLE_RATE_MASK);
        if dirty == 0 {
            return;
        }

        for id in ParameterId::ALL {
            if dirty & (1 << id.index()) != 0 {
                let native = id.info().range.denormalize(self.shared.parameter(id));
                self.engine.set_parameter(id, native);
            }
        }
        if dirty & (1 << PROGRAM_BIT) != 0 {
            self.engine.set_program(self.shared.program());
        }
    }

    /// Block boundary: pick up a rate queued through [`AdapterControls`].
    #[inline]
    fn apply_requested_sample_rate(&mut self) {
        if self.shared.dirty.take(SAMPLE_RATE_MASK) != 0 {
            self.sample_rate = self.shared.pending_sample_rate();
            self.engine.set_sample_rate(self.sample_rate);
        }
    }

    pub fn set_program(&mut self, program: ProgramId) {
        self.controls().set_program(program);
        self.sync();
        tracing::debug!(program = program.name(), "Program changed");
    }

    #[inline]
    pub fn program(&self) -> ProgramId {
        self.shared.program()
    }

    /// Set `id` from a normalized `[0, 1]` value.
    pub fn set_parameter(&mut self, id: ParameterId, normalized: f32) -> Result<()> {
        self.controls().set_parameter(id, normalized)?;
        self.sync();
        Ok(())
    }

    /// Normalized value of `id`.
    #[inline]
    pub fn parameter(&self, id: ParameterId) -> f32 {
        self.shared.parameter(id)
    }

    pub fn program_name(&self, program: ProgramId) -> &'static str {
        self.engine.program_name(program)
    }

    pub fn parameter_name(&self, id: ParameterId) -> &'static str {
        self.engine.parameter_name(id)
    }

    pub fn parameter_label(&self, id: ParameterId) -> &'static str {
        self.engine.parameter_label(id)
    }

    /// Display text for the current value of `id`, in native units.
    pub fn parameter_text(&self, id: ParameterId) -> String {
        let native = id.info().range.denormalize(self.parameter(id));
        self.engine.parameter_text(id, native)
    }

    /// Apply a new sample rate now. Any queued request is superseded.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        self.sync();
        self.shared.dirty.take(SAMPLE_RATE_MASK);
        self.sample_rate = sample_rate;
        self.engine.set_sample_rate(sample_rate);
        tracing::info!(sample_rate, "Sample rate changed");
        Ok(())
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Hard-reset the engine, dropping every voice.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn controls(&self) -> AdapterControls {
        AdapterControls::new(Arc::clone(&self.shared))
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
