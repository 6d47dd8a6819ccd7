//! # opll - OPLL-style synthesizer bridge
//!
//! Real-time bridge between a host's MIDI event stream and a two-operator FM
//! voice engine modelled on the YM2413 (OPLL), producing mono audio on
//! demand.
//!
//! ## Architecture
//!
//! `opll` is an umbrella crate that ties together:
//! - **opll-core** - configuration, errors, lock-free atomics, parameter ranges
//! - **opll-midi** - raw event decoding into canonical commands
//! - **opll-synth** - index tables, the engine trait, the voice adapter and the
//!   built-in FM engine
//!
//! ## Quick Start
//!
//! ```
//! use opll::prelude::*;
//!
//! let mut plugin = OpllPlugin::new()?;
//! plugin.set_program(ProgramId::Piano.index() as i32)?;
//! plugin.resume();
//!
//! // Once per host block
//! plugin.process_events(&[RawEvent::note_on(0, 60, 100)]);
//! let mut out = vec![0.0f32; 512];
//! plugin.process_replacing(&mut out);
//!
//! // From a UI thread
//! let controls = plugin.controls();
//! controls.set_parameter(ParameterId::Brightness, 0.8)?;
//! # Ok::<(), opll::Error>(())
//! ```

/// Re-export of opll-core for direct access
pub use opll_core as core;

/// Re-export of opll-midi for direct access
pub use opll_midi as midi;

/// Re-export of opll-synth for direct access
pub use opll_synth as synth;

pub use opll_core::{EngineConfig, ParameterRange, ParameterScale};
pub use opll_midi::{decode, Command, RawEvent};
pub use opll_synth::{
    AdapterControls, FmEngine, IndexKind, ParameterId, ParameterInfo, ProgramId, SynthEngine,
    VoiceAdapter,
};

pub mod error;
pub use error::{Error, Result};

pub mod metadata;
pub use metadata::{PinInfo, PluginInfo, MAX_PARAM_STR_LEN, MAX_PROGRAM_NAME_LEN};

mod builder;
mod plugin;

pub use builder::OpllPluginBuilder;
pub use plugin::OpllPlugin;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{OpllPlugin, OpllPluginBuilder, PluginInfo};

    pub use crate::midi::{Command, RawEvent};

    pub use crate::synth::{
        AdapterControls, FmEngine, ParameterId, ProgramId, SynthEngine, VoiceAdapter,
    };

    pub use crate::core::EngineConfig;
}
