//! Note/frequency helpers.

/// Equal-tempered frequency of a (possibly fractional) note, A4 = 69 = 440 Hz.
#[inline]
pub fn note_to_hz(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}
