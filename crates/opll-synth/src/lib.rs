//! Voice engine adapter for the OPLL bridge.
//!
//! - **[`VoiceAdapter`]** - routes decoded commands into a [`SynthEngine`] and
//!   renders its output sample by sample
//! - **[`AdapterControls`]** - lock-free handle for program/parameter changes
//!   from other threads
//! - **[`ProgramId`]** / **[`ParameterId`]** - host index tables
//! - **[`FmEngine`]** - nine-voice OPLL-style FM backend
//! - **[`VoiceAllocator`]** - fixed-size voice slot allocation with stealing
//!
//! # Quick Start
//!
//! ```
//! use opll_synth::{FmEngine, ProgramId, RawEvent, VoiceAdapter};
//!
//! let mut adapter = VoiceAdapter::new(FmEngine::default(), 48000.0)?;
//! adapter.set_program(ProgramId::Piano);
//!
//! // Control thread side
//! let controls = adapter.controls();
//! std::thread::spawn(move || controls.set_program(ProgramId::Organ))
//!     .join()
//!     .unwrap();
//!
//! adapter.process_events(&[RawEvent::note_on(0, 60, 100)]);
//! let mut out = vec![0.0f32; 512];
//! adapter.render_block(&mut out);
//! assert_eq!(adapter.program(), ProgramId::Organ);
//! # Ok::<(), opll_synth::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

mod ids;
pub use ids::{IndexKind, ParameterId, ParameterInfo, ProgramId};

mod engine;
pub use engine::SynthEngine;

mod voice;
pub use voice::{AllocationResult, VoiceAllocator, VoiceId, VoiceSlot, VoiceState};

pub mod fm;
pub use fm::{FmEngine, VOICES};

mod shared;
pub use shared::AdapterControls;

mod adapter;
pub use adapter::VoiceAdapter;

pub use opll_midi::{Command, RawEvent};
