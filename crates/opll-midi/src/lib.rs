//! MIDI decoding for the OPLL bridge.
//!
//! Turns raw host packets ([`RawEvent`]) into the closed set of commands the
//! voice engine understands ([`Command`]). Decoding is pure, allocation-free
//! and safe to call from the audio callback.
//!
//! # Example
//!
//! ```
//! use opll_midi::{decode, Command, RawEvent};
//!
//! let raw = RawEvent::from_bytes(&[0x90, 60, 127]);
//! assert_eq!(
//!     decode(raw),
//!     Some(Command::NoteOn { note: 60, velocity: 127.0 / 128.0 })
//! );
//!
//! // Unrecognized status bytes are dropped
//! assert_eq!(decode(RawEvent::from_bytes(&[0xC0, 5])), None);
//! ```

mod command;
pub use command::{decode, decode_batch, Command, PITCH_BEND_CENTER, VELOCITY_SCALE};

mod event;
pub use event::{RawEvent, CC_ALL_NOTES_OFF, CC_MONO_MODE_ON};

mod utils;
pub use utils::note_to_hz;
