//! OPLL instrument patches.
//!
//! Each built-in instrument is an 8-byte register image in the chip's
//! layout:
//!
//! | byte | bits                                          |
//! |------|-----------------------------------------------|
//! | 0, 1 | AM, VIB, EG-TYP, KSR, MULT (mod, car)         |
//! | 2    | mod KSL (7-6), mod TL (5-0)                   |
//! | 3    | car KSL (7-6), DC (4), DM (3), FB (2-0)       |
//! | 4, 5 | AR (7-4), DR (3-0) (mod, car)                 |
//! | 6, 7 | SL (7-4), RR (3-0) (mod, car)                 |

use crate::ids::ProgramId;

const ROM: [[u8; 8]; ProgramId::COUNT] = [
    [0x71, 0x61, 0x1E, 0x17, 0xD0, 0x78, 0x00, 0x17],
    [0x13, 0x41, 0x1A, 0x0D, 0xD8, 0xF7, 0x23, 0x13],
    [0x13, 0x01, 0x99, 0x00, 0xF2, 0xC4, 0x21, 0x23],
    [0x11, 0x61, 0x0E, 0x07, 0x8D, 0x64, 0x70, 0x27],
    [0x32, 0x21, 0x1E, 0x06, 0xE1, 0x76, 0x01, 0x28],
    [0x31, 0x22, 0x16, 0x05, 0xE0, 0x71, 0x00, 0x18],
    [0x21, 0x61, 0x1D, 0x07, 0x82, 0x81, 0x11, 0x07],
    [0x33, 0x21, 0x2D, 0x13, 0xB0, 0x70, 0x00, 0x07],
    [0x61, 0x61, 0x1B, 0x06, 0x64, 0x65, 0x10, 0x17],
    [0x41, 0x61, 0x0B, 0x18, 0x85, 0xF0, 0x81, 0x07],
    [0x33, 0x01, 0x83, 0x11, 0xEA, 0xEF, 0x10, 0x04],
    [0x17, 0xC1, 0x24, 0x07, 0xF8, 0xF8, 0x22, 0x12],
    [0x61, 0x50, 0x0C, 0x05, 0xD2, 0xF5, 0x40, 0x42],
    [0x01, 0x01, 0x55, 0x03, 0xE9, 0x90, 0x03, 0x02],
    [0x41, 0x41, 0x89, 0x03, 0xF1, 0xE4, 0xC0, 0x13],
];

/// Frequency multiplier per MULT value. 10/12/14 repeat their neighbours.
const MULTIPLIERS: [f32; 16] = [
    0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 10.0, 12.0, 12.0, 15.0, 15.0,
];

/// Modulator total level step in dB.
const TL_STEP_DB: f32 = 0.75;

/// Settings for one of the two operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorPatch {
    pub tremolo: bool,
    pub vibrato: bool,
    /// EG-TYP: hold at the sustain level while the key is down
    pub sustained: bool,
    pub multiplier: f32,
    /// Rectified (half) sine instead of a full sine
    pub half_sine: bool,
    pub attack_rate: u8,
    pub decay_rate: u8,
    /// Attenuation steps of 3 dB below full level
    pub sustain_level: u8,
    pub release_rate: u8,
}

impl OperatorPatch {
    fn decode(flags: u8, rates: u8, levels: u8, half_sine: bool) -> Self {
        Self {
            tremolo: flags & 0x80 != 0,
            vibrato: flags & 0x40 != 0,
            sustained: flags & 0x20 != 0,
            multiplier: MULTIPLIERS[(flags & 0x0F) as usize],
            half_sine,
            attack_rate: rates >> 4,
            decay_rate: rates & 0x0F,
            sustain_level: levels >> 4,
            release_rate: levels & 0x0F,
        }
    }
}

/// A decoded two-operator instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patch {
    pub modulator: OperatorPatch,
    pub carrier: OperatorPatch,
    /// Modulator output level, linear (from TL)
    pub modulator_level: f32,
    /// Modulator self-feedback, 0-7
    pub feedback: u8,
}

impl Patch {
    pub fn from_registers(regs: [u8; 8]) -> Self {
        let total_level = regs[2] & 0x3F;
        Self {
            modulator: OperatorPatch::decode(regs[0], regs[4], regs[6], regs[3] & 0x08 != 0),
            carrier: OperatorPatch::decode(regs[1], regs[5], regs[7], regs[3] & 0x10 != 0),
            modulator_level: 10.0_f32.powf(-(total_level as f32) * TL_STEP_DB / 20.0),
            feedback: regs[3] & 0x07,
        }
    }

    pub fn builtin(program: ProgramId) -> Self {
        Self::from_registers(ROM[program.index()])
    }

    /// Feedback phase scale in radians; zero when FB is 0.
    #[inline]
    pub fn feedback_amount(&self) -> f32 {
        match self.feedback {
            0 => 0.0,
            fb => std::f32::consts::PI / (1u32 << (7 - fb)) as f32,
        }
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::builtin(ProgramId::default())
    }
}
