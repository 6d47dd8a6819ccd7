//! Raw host event packets.

use serde::{Deserialize, Serialize};

/// Controller number for "all notes off" (channel mode message).
pub const CC_ALL_NOTES_OFF: u8 = 0x7B;

/// Controller number for "mono mode on"; implies all notes off.
pub const CC_MONO_MODE_ON: u8 = 0x7E;

/// Raw 3-byte MIDI packet as delivered by the host.
///
/// No validity is implied. Bytes past `len` read as zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawEvent {
    pub data: [u8; 3],
    /// Valid bytes in `data` (0-3).
    pub len: u8,
}

impl RawEvent {
    #[inline]
    pub fn new(data: [u8; 3]) -> Self {
        Self { data, len: 3 }
    }

    /// Copies at most three bytes; extra bytes are ignored.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut data = [0u8; 3];
        let len = bytes.len().min(3);
        data[..len].copy_from_slice(&bytes[..len]);
        Self {
            data,
            len: len as u8,
        }
    }

    #[inline]
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new([0x90 | (channel & 0x0F), note, velocity])
    }

    #[inline]
    pub fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new([0x80 | (channel & 0x0F), note, velocity])
    }

    #[inline]
    pub fn control_change(channel: u8, control: u8, value: u8) -> Self {
        Self::new([0xB0 | (channel & 0x0F), control, value])
    }

    /// `bend` is the 14-bit wheel position (0x2000 = centre).
    #[inline]
    pub fn pitch_bend(channel: u8, bend: u16) -> Self {
        Self::new([
            0xE0 | (channel & 0x0F),
            (bend & 0x7F) as u8,
            ((bend >> 7) & 0x7F) as u8,
        ])
    }

    #[inline]
    pub fn status(&self) -> u8 {
        self.byte(0) & 0xF0
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.byte(0) & 0x0F
    }

    /// Byte `index`, or zero when the packet is shorter.
    #[inline]
    pub fn byte(&self, index: usize) -> u8 {
        if index < self.len as usize {
            self.data[index]
        } else {
            0
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..(self.len as usize).min(3)]
    }
}

impl From<[u8; 3]> for RawEvent {
    fn from(data: [u8; 3]) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_channel() {
        let event = RawEvent::note_on(5, 60, 100);
        assert_eq!(event.status(), 0x90);
        assert_eq!(event.channel(), 5);
        assert_eq!(event.as_bytes(), &[0x95, 60, 100]);
    }

    #[test]
    fn test_short_packet_reads_zero() {
        let event = RawEvent::from_bytes(&[0xC3, 12]);
        assert_eq!(event.len, 2);
        assert_eq!(event.byte(1), 12);
        assert_eq!(event.byte(2), 0);
        assert_eq!(event.as_bytes(), &[0xC3, 12]);
    }

    #[test]
    fn test_empty_packet() {
        let event = RawEvent::from_bytes(&[]);
        assert_eq!(event.status(), 0);
        assert!(event.as_bytes().is_empty());
    }

    #[test]
    fn test_long_input_truncated() {
        let event = RawEvent::from_bytes(&[0x80, 1, 2, 3, 4]);
        assert_eq!(event.len, 3);
        assert_eq!(event.data, [0x80, 1, 2]);
    }

    #[test]
    fn test_pitch_bend_split() {
        let event = RawEvent::pitch_bend(0, 0x2000);
        assert_eq!(event.data, [0xE0, 0x00, 0x40]);

        let event = RawEvent::pitch_bend(1, 0x3FFF);
        assert_eq!(event.data, [0xE1, 0x7F, 0x7F]);
    }
}
