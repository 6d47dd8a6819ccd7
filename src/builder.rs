//! Builder for configuring and constructing an `OpllPlugin`.

use crate::metadata::PluginInfo;
use crate::{OpllPlugin, Result};
use opll_core::EngineConfig;
use opll_synth::{FmEngine, ParameterId, ProgramId, SynthEngine, VoiceAdapter};

/// Initial program and parameter values are applied after the engine is
/// wrapped; anything left unset keeps the engine's own default.
///
/// # Example
///
/// ```
/// use opll::prelude::*;
///
/// let plugin = OpllPlugin::builder()
///     .sample_rate(48000.0)
///     .block_size(256)
///     .program(ProgramId::Vibraphone)
///     .parameter(ParameterId::Vibrato, 0.4)
///     .build()?;
///
/// assert_eq!(plugin.program(), ProgramId::Vibraphone.index());
/// # Ok::<(), opll::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpllPluginBuilder {
    config: EngineConfig,
    program: Option<ProgramId>,
    parameters: [Option<f32>; ParameterId::COUNT],
    info: PluginInfo,
}

impl OpllPluginBuilder {
    /// Default: 44100
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Default: 512
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.config.block_size = block_size;
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn program(mut self, program: ProgramId) -> Self {
        self.program = Some(program);
        self
    }

    /// Initial normalized value for `id`.
    pub fn parameter(mut self, id: ParameterId, normalized: f32) -> Self {
        self.parameters[id.index()] = Some(normalized);
        self
    }

    pub fn info(mut self, info: PluginInfo) -> Self {
        self.info = info;
        self
    }

    /// Build with the built-in FM engine.
    pub fn build(self) -> Result<OpllPlugin<FmEngine>> {
        let engine = FmEngine::new(self.config.sample_rate);
        self.build_with(engine)
    }

    /// Build around any engine.
    pub fn build_with<E: SynthEngine>(self, engine: E) -> Result<OpllPlugin<E>> {
        self.config.validate()?;

        let mut adapter = VoiceAdapter::new(engine, self.config.sample_rate)?;
        if let Some(program) = self.program {
            adapter.set_program(program);
        }
        for id in ParameterId::ALL {
            if let Some(value) = self.parameters[id.index()] {
                adapter.set_parameter(id, value)?;
            }
        }

        tracing::debug!(
            sample_rate = self.config.sample_rate,
            block_size = self.config.block_size,
            program = adapter.program().name(),
            "Plugin instance created"
        );
        Ok(OpllPlugin::from_parts(adapter, self.config, self.info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_initial_values_applied() {
        let plugin = OpllPluginBuilder::default()
            .program(ProgramId::Clarinet)
            .parameter(ParameterId::BendRange, 1.0)
            .build()
            .unwrap();

        assert_eq!(plugin.program(), ProgramId::Clarinet.index());
        assert_eq!(plugin.parameter(ParameterId::BendRange.index() as i32), Some(1.0));
        assert_eq!(
            plugin.adapter().engine().parameter(ParameterId::BendRange),
            24.0
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = OpllPluginBuilder::default()
            .sample_rate(1.0)
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::Core(opll_core::Error::InvalidSampleRate(_))
        ));

        assert!(OpllPluginBuilder::default().block_size(0).build().is_err());
    }

    #[test]
    fn test_non_finite_initial_parameter_rejected() {
        let result = OpllPluginBuilder::default()
            .parameter(ParameterId::Volume, f32::NAN)
            .build();
        assert!(matches!(
            result,
            Err(Error::Synth(opll_synth::Error::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_custom_info() {
        let plugin = OpllPluginBuilder::default()
            .info(PluginInfo::new("Custom").vendor("Someone"))
            .build()
            .unwrap();
        assert_eq!(plugin.info().effect_name(), "Custom");
        assert_eq!(plugin.info().vendor_string(), "Someone");
    }
}
