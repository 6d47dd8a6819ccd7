//! Canonical commands and the raw-packet decoder.

use crate::event::{RawEvent, CC_ALL_NOTES_OFF, CC_MONO_MODE_ON};
use serde::{Deserialize, Serialize};

/// Note-on velocity divisor. Raw 127 decodes to 127/128, never 1.0.
pub const VELOCITY_SCALE: f32 = 1.0 / 128.0;

/// 14-bit pitch wheel position that decodes to zero bend.
pub const PITCH_BEND_CENTER: u16 = 0x2000;

const STATUS_NOTE_OFF: u8 = 0x80;
const STATUS_NOTE_ON: u8 = 0x90;
const STATUS_CONTROL_CHANGE: u8 = 0xB0;
const STATUS_PITCH_BEND: u8 = 0xE0;

/// What the voice engine is asked to do.
///
/// Channels are not carried: every channel drives the same engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// `note` in 0..=127
    NoteOff { note: u8 },
    /// `note` in 0..=127, `velocity` in [0, 127/128]
    NoteOn { note: u8, velocity: f32 },
    AllNotesOff,
    /// `offset` in [-1, 1), exactly 0.0 at the centre position
    PitchBend { offset: f32 },
}

impl Command {
    #[inline]
    pub fn decode(raw: RawEvent) -> Option<Self> {
        decode(raw)
    }

    #[inline]
    pub fn note(&self) -> Option<u8> {
        match *self {
            Command::NoteOn { note, .. } | Command::NoteOff { note } => Some(note),
            _ => None,
        }
    }
}

impl RawEvent {
    #[inline]
    pub fn decode(self) -> Option<Command> {
        decode(self)
    }
}

/// Decode one raw packet. Returns `None` for anything unrecognized.
///
/// RT-safe: pure, no allocation, constant time.
#[inline]
pub fn decode(raw: RawEvent) -> Option<Command> {
    match raw.status() {
        STATUS_NOTE_OFF => Some(Command::NoteOff {
            note: raw.byte(1) & 0x7F,
        }),
        STATUS_NOTE_ON => Some(Command::NoteOn {
            note: raw.byte(1) & 0x7F,
            velocity: (raw.byte(2) & 0x7F) as f32 * VELOCITY_SCALE,
        }),
        // The controller byte is compared unmasked.
        STATUS_CONTROL_CHANGE => match raw.byte(1) {
            CC_ALL_NOTES_OFF | CC_MONO_MODE_ON => Some(Command::AllNotesOff),
            _ => None,
        },
        STATUS_PITCH_BEND => {
            let position = (((raw.byte(2) & 0x7F) as u16) << 7) | (raw.byte(1) & 0x7F) as u16;
            let offset =
                (position as f32 - PITCH_BEND_CENTER as f32) / PITCH_BEND_CENTER as f32;
            Some(Command::PitchBend { offset })
        }
        _ => None,
    }
}

/// Decode a host batch in order, handing each command to `apply`.
///
/// Dropped packets are skipped silently. Returns the number of commands
/// produced.
#[inline]
pub fn decode_batch<F>(events: &[RawEvent], mut apply: F) -> usize
where
    F: FnMut(Command),
{
    let mut produced = 0;
    for command in events.iter().filter_map(|raw| decode(*raw)) {
        apply(command);
        produced += 1;
    }
    produced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_off_ignores_velocity() {
        let cmd = decode(RawEvent::new([0x80, 64, 0x55]));
        assert_eq!(cmd, Some(Command::NoteOff { note: 64 }));
    }

    #[test]
    fn test_note_on_velocity_quirk() {
        let cmd = decode(RawEvent::note_on(0, 60, 127));
        assert_eq!(
            cmd,
            Some(Command::NoteOn {
                note: 60,
                velocity: 127.0 / 128.0
            })
        );
    }

    #[test]
    fn test_note_on_zero_velocity_stays_note_on() {
        let cmd = decode(RawEvent::note_on(0, 60, 0));
        assert_eq!(
            cmd,
            Some(Command::NoteOn {
                note: 60,
                velocity: 0.0
            })
        );
    }

    #[test]
    fn test_data_bytes_masked() {
        let cmd = decode(RawEvent::new([0x93, 0xBC, 0xFF]));
        assert_eq!(
            cmd,
            Some(Command::NoteOn {
                note: 0x3C,
                velocity: 127.0 / 128.0
            })
        );
    }

    #[test]
    fn test_channel_ignored() {
        for channel in 0..16 {
            assert_eq!(
                decode(RawEvent::note_off(channel, 10, 0)),
                Some(Command::NoteOff { note: 10 })
            );
        }
    }

    #[test]
    fn test_all_notes_off_and_all_sound_off() {
        assert_eq!(
            decode(RawEvent::control_change(0, 0x7B, 0)),
            Some(Command::AllNotesOff)
        );
        assert_eq!(
            decode(RawEvent::control_change(9, 0x7E, 0)),
            Some(Command::AllNotesOff)
        );
        assert_eq!(decode(RawEvent::control_change(0, 0x07, 100)), None);
        assert_eq!(decode(RawEvent::control_change(0, 0x79, 0)), None);
    }

    #[test]
    fn test_pitch_bend_landmarks() {
        let offset = |bend| match decode(RawEvent::pitch_bend(0, bend)) {
            Some(Command::PitchBend { offset }) => offset,
            other => panic!("Expected PitchBend, got {:?}", other),
        };
        assert_eq!(offset(0x2000), 0.0);
        assert_eq!(offset(0x0000), -1.0);
        assert_eq!(offset(0x3FFF), 8191.0 / 8192.0);
        assert_eq!(offset(0x1000), -0.5);
    }

    #[test]
    fn test_unrecognized_status_dropped() {
        for status in [0x00, 0x45, 0xA0, 0xC0, 0xD0, 0xF0, 0xF8, 0xFF] {
            assert_eq!(decode(RawEvent::new([status, 60, 100])), None);
        }
    }

    #[test]
    fn test_short_note_on_reads_zero_velocity() {
        let cmd = decode(RawEvent::from_bytes(&[0x90, 60]));
        assert_eq!(
            cmd,
            Some(Command::NoteOn {
                note: 60,
                velocity: 0.0
            })
        );
    }

    #[test]
    fn test_decode_batch_preserves_order() {
        let events = [
            RawEvent::note_on(0, 60, 64),
            RawEvent::new([0xC0, 1, 0]),
            RawEvent::note_off(0, 60, 0),
            RawEvent::control_change(0, 0x7B, 0),
        ];
        let mut seen = Vec::new();
        let produced = decode_batch(&events, |cmd| seen.push(cmd));

        assert_eq!(produced, 3);
        assert_eq!(
            seen,
            vec![
                Command::NoteOn {
                    note: 60,
                    velocity: 0.5
                },
                Command::NoteOff { note: 60 },
                Command::AllNotesOff,
            ]
        );
    }
}
