//! Host-facing plugin instance.

use crate::builder::OpllPluginBuilder;
use crate::metadata::{truncate, PluginInfo, MAX_PARAM_STR_LEN, MAX_PROGRAM_NAME_LEN};
use crate::Result;
use opll_core::{EngineConfig, Error as CoreError};
use opll_midi::RawEvent;
use opll_synth::{
    AdapterControls, FmEngine, ParameterId, ProgramId, SynthEngine, VoiceAdapter,
};

/// One instrument instance as seen by a host.
///
/// Indices at this boundary are the host's raw integers: anything outside
/// the program or parameter table is rejected and leaves state unchanged.
///
/// # Example
///
/// ```
/// use opll::prelude::*;
///
/// let mut plugin = OpllPlugin::builder()
///     .sample_rate(48000.0)
///     .program(ProgramId::Trumpet)
///     .build()?;
/// plugin.resume();
///
/// plugin.process_events(&[RawEvent::note_on(0, 67, 110)]);
/// let mut out = vec![0.0f32; 256];
/// plugin.process_replacing(&mut out);
///
/// assert_eq!(plugin.current_program_name(), "Trumpet");
/// assert!(plugin.set_program(15).is_err());
/// # Ok::<(), opll::Error>(())
/// ```
pub struct OpllPlugin<E: SynthEngine = FmEngine> {
    adapter: VoiceAdapter<E>,
    config: EngineConfig,
    suspended: bool,
    info: PluginInfo,
}

impl OpllPlugin<FmEngine> {
    /// Default configuration with the built-in FM engine.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> OpllPluginBuilder {
        OpllPluginBuilder::default()
    }
}

impl<E: SynthEngine> OpllPlugin<E> {
    /// Starts suspended.
    pub(crate) fn from_parts(
        adapter: VoiceAdapter<E>,
        config: EngineConfig,
        info: PluginInfo,
    ) -> Self {
        Self {
            adapter,
            config,
            suspended: true,
            info,
        }
    }

    // --- Event/render boundary ---

    /// Apply a block's events. Returns the number of commands recognized.
    pub fn process_events(&mut self, events: &[RawEvent]) -> usize {
        self.adapter.process_events(events)
    }

    /// Overwrite `out` with exactly `out.len()` samples.
    pub fn process_replacing(&mut self, out: &mut [f32]) {
        self.adapter.render_block(out);
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        self.adapter.render_block(out);
    }

    /// Change the sample rate. Applied now while suspended, otherwise at the
    /// start of the next rendered block.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        if self.suspended {
            self.adapter.set_sample_rate(sample_rate)?;
        } else {
            self.adapter.controls().request_sample_rate(sample_rate)?;
        }
        self.config.sample_rate = sample_rate;
        tracing::info!(sample_rate, deferred = !self.suspended, "Sample rate set");
        Ok(())
    }

    /// Rate the engine is currently running at.
    pub fn sample_rate(&self) -> f64 {
        self.adapter.sample_rate()
    }

    /// Informational; any block length can be rendered.
    pub fn set_block_size(&mut self, block_size: usize) -> Result<()> {
        if block_size == 0 {
            return Err(CoreError::InvalidConfig("block_size must be non-zero".into()).into());
        }
        self.config.block_size = block_size;
        Ok(())
    }

    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
        tracing::info!("Suspended");
    }

    pub fn resume(&mut self) {
        self.suspended = false;
        tracing::info!("Resumed");
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    // --- Control surface ---

    pub fn program_count(&self) -> usize {
        ProgramId::COUNT
    }

    pub fn parameter_count(&self) -> usize {
        ParameterId::COUNT
    }

    pub fn set_program(&mut self, index: i32) -> Result<()> {
        let program = ProgramId::try_from(index).map_err(|err| {
            tracing::warn!(index, "Rejected program index");
            err
        })?;
        self.adapter.set_program(program);
        Ok(())
    }

    /// Index of the current program.
    pub fn program(&self) -> usize {
        self.adapter.program().index()
    }

    /// Set parameter `index` from a normalized value.
    pub fn set_parameter(&mut self, index: i32, value: f32) -> Result<()> {
        let id = ParameterId::try_from(index).map_err(|err| {
            tracing::warn!(index, "Rejected parameter index");
            err
        })?;
        self.adapter.set_parameter(id, value).map_err(|err| {
            tracing::warn!(index, value, "Rejected parameter value");
            err
        })?;
        Ok(())
    }

    /// Normalized value of parameter `index`.
    pub fn parameter(&self, index: i32) -> Option<f32> {
        parameter_id(index).map(|id| self.adapter.parameter(id))
    }

    pub fn program_name(&self, index: i32) -> Option<String> {
        program_id(index).map(|program| self.fit_program(program))
    }

    pub fn current_program_name(&self) -> String {
        self.fit_program(self.adapter.program())
    }

    /// Every program name in index order.
    pub fn program_names(&self) -> impl Iterator<Item = String> + '_ {
        ProgramId::ALL
            .into_iter()
            .map(|program| self.fit_program(program))
    }

    fn fit_program(&self, program: ProgramId) -> String {
        truncate(self.adapter.program_name(program), MAX_PROGRAM_NAME_LEN)
    }

    pub fn parameter_name(&self, index: i32) -> Option<String> {
        parameter_id(index).map(|id| fit_param(self.adapter.parameter_name(id)))
    }

    pub fn parameter_label(&self, index: i32) -> Option<String> {
        parameter_id(index).map(|id| fit_param(self.adapter.parameter_label(id)))
    }

    /// Current value of parameter `index` as display text.
    pub fn parameter_display(&self, index: i32) -> Option<String> {
        parameter_id(index).map(|id| fit_param(&self.adapter.parameter_text(id)))
    }

    /// Concurrent handle for a UI or automation thread.
    pub fn controls(&self) -> AdapterControls {
        self.adapter.controls()
    }

    /// Drain the count of non-finite samples replaced since the last call.
    pub fn take_render_faults(&self) -> u64 {
        let faults = self.adapter.controls().take_render_faults();
        if faults > 0 {
            tracing::warn!(faults, "Non-finite engine samples replaced with silence");
        }
        faults
    }

    pub fn info(&self) -> &PluginInfo {
        &self.info
    }

    pub fn adapter(&self) -> &VoiceAdapter<E> {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut VoiceAdapter<E> {
        &mut self.adapter
    }
}

fn fit_param(text: &str) -> String {
    truncate(text, MAX_PARAM_STR_LEN)
}

fn program_id(index: i32) -> Option<ProgramId> {
    usize::try_from(index).ok().and_then(ProgramId::from_index)
}

fn parameter_id(index: i32) -> Option<ParameterId> {
    usize::try_from(index).ok().and_then(ParameterId::from_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn plugin() -> OpllPlugin {
        OpllPlugin::new().unwrap()
    }

    #[test]
    fn test_starts_suspended_with_defaults() {
        let plugin = plugin();
        assert!(plugin.is_suspended());
        assert_eq!(plugin.sample_rate(), 44100.0);
        assert_eq!(plugin.block_size(), 512);
        assert_eq!(plugin.program(), 0);
        assert_eq!(plugin.program_count(), 15);
        assert_eq!(plugin.parameter_count(), 7);
    }

    #[test]
    fn test_rejected_program_index_keeps_state() {
        let mut plugin = plugin();
        plugin.set_program(4).unwrap();

        for index in [-1, 15, i32::MAX] {
            let err = plugin.set_program(index).unwrap_err();
            assert!(matches!(
                err,
                Error::Synth(opll_synth::Error::IndexOutOfRange { .. })
            ));
        }
        assert_eq!(plugin.program(), 4);
        assert_eq!(plugin.program_name(15), None);
        assert_eq!(plugin.program_name(-3), None);
    }

    #[test]
    fn test_rejected_parameter_index_keeps_state() {
        let mut plugin = plugin();
        let before: Vec<_> = (0..7).map(|i| plugin.parameter(i)).collect();

        assert!(plugin.set_parameter(7, 0.5).is_err());
        assert!(plugin.set_parameter(-1, 0.5).is_err());
        assert!(plugin.set_parameter(0, f32::INFINITY).is_err());

        let after: Vec<_> = (0..7).map(|i| plugin.parameter(i)).collect();
        assert_eq!(before, after);
        assert_eq!(plugin.parameter(7), None);
        assert_eq!(plugin.parameter_name(7), None);
        assert_eq!(plugin.parameter_label(-1), None);
        assert_eq!(plugin.parameter_display(100), None);
    }

    #[test]
    fn test_text_fits_display_budgets() {
        let plugin = plugin();
        for name in plugin.program_names() {
            assert!(name.len() <= MAX_PROGRAM_NAME_LEN);
        }
        for index in 0..plugin.parameter_count() as i32 {
            for text in [
                plugin.parameter_name(index),
                plugin.parameter_label(index),
                plugin.parameter_display(index),
            ] {
                let text = text.unwrap();
                assert!(!text.is_empty() && text.len() <= MAX_PARAM_STR_LEN, "{text}");
            }
        }
    }

    #[test]
    fn test_program_names_in_order() {
        let plugin = plugin();
        let names: Vec<String> = plugin.program_names().collect();
        assert_eq!(names.len(), 15);
        assert_eq!(names[0], "Violin");
        assert_eq!(names[14], "Electric Guitar");
    }

    #[test]
    fn test_sample_rate_immediate_while_suspended() {
        let mut plugin = plugin();
        plugin.set_sample_rate(48000.0).unwrap();
        assert_eq!(plugin.sample_rate(), 48000.0);
    }

    #[test]
    fn test_sample_rate_deferred_while_active() {
        let mut plugin = plugin();
        plugin.resume();
        plugin.set_sample_rate(96000.0).unwrap();
        assert_eq!(plugin.sample_rate(), 44100.0);
        assert_eq!(plugin.config().sample_rate, 96000.0);

        plugin.process_replacing(&mut [0.0f32; 1]);
        assert_eq!(plugin.sample_rate(), 96000.0);
    }

    #[test]
    fn test_invalid_sample_rate_rejected() {
        let mut plugin = plugin();
        assert!(plugin.set_sample_rate(-1.0).is_err());
        assert!(plugin.set_sample_rate(f64::NAN).is_err());
        assert_eq!(plugin.sample_rate(), 44100.0);
        assert_eq!(plugin.config().sample_rate, 44100.0);
    }

    #[test]
    fn test_zero_block_size_rejected() {
        let mut plugin = plugin();
        assert!(matches!(
            plugin.set_block_size(0),
            Err(Error::Core(CoreError::InvalidConfig(_)))
        ));
        plugin.set_block_size(128).unwrap();
        assert_eq!(plugin.block_size(), 128);
    }
}
