//! Program and parameter index tables.
//!
//! Host-facing indices map 1:1 onto closed enumerations. Lookups outside the
//! fixed set return `None` (or [`Error::IndexOutOfRange`]); nothing is ever
//! clamped to a neighbouring entry.

use crate::{Error, Result};
use opll_core::ParameterRange;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which table an index was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    Program,
    Parameter,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Program => f.write_str("Program"),
            IndexKind::Parameter => f.write_str("Parameter"),
        }
    }
}

/// Built-in OPLL instrument patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProgramId {
    #[default]
    Violin = 0,
    Guitar,
    Piano,
    Flute,
    Clarinet,
    Oboe,
    Trumpet,
    Organ,
    Horn,
    Synthesizer,
    Harpsichord,
    Vibraphone,
    SynthBass,
    AcousticBass,
    ElectricGuitar,
}

impl ProgramId {
    pub const COUNT: usize = 15;

    pub const ALL: [ProgramId; Self::COUNT] = [
        ProgramId::Violin,
        ProgramId::Guitar,
        ProgramId::Piano,
        ProgramId::Flute,
        ProgramId::Clarinet,
        ProgramId::Oboe,
        ProgramId::Trumpet,
        ProgramId::Organ,
        ProgramId::Horn,
        ProgramId::Synthesizer,
        ProgramId::Harpsichord,
        ProgramId::Vibraphone,
        ProgramId::SynthBass,
        ProgramId::AcousticBass,
        ProgramId::ElectricGuitar,
    ];

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ProgramId::Violin => "Violin",
            ProgramId::Guitar => "Guitar",
            ProgramId::Piano => "Piano",
            ProgramId::Flute => "Flute",
            ProgramId::Clarinet => "Clarinet",
            ProgramId::Oboe => "Oboe",
            ProgramId::Trumpet => "Trumpet",
            ProgramId::Organ => "Organ",
            ProgramId::Horn => "Horn",
            ProgramId::Synthesizer => "Synthesizer",
            ProgramId::Harpsichord => "Harpsichord",
            ProgramId::Vibraphone => "Vibraphone",
            ProgramId::SynthBass => "Synth Bass",
            ProgramId::AcousticBass => "Acoustic Bass",
            ProgramId::ElectricGuitar => "Electric Guitar",
        }
    }
}

impl TryFrom<usize> for ProgramId {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Self::from_index(index).ok_or(Error::IndexOutOfRange {
            kind: IndexKind::Program,
            index: index as i64,
            count: Self::COUNT,
        })
    }
}

impl TryFrom<i32> for ProgramId {
    type Error = Error;

    fn try_from(index: i32) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(Self::from_index)
            .ok_or(Error::IndexOutOfRange {
                kind: IndexKind::Program,
                index: index as i64,
                count: Self::COUNT,
            })
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Engine parameters exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ParameterId {
    /// Output level
    Volume = 0,
    /// Attack time multiplier applied to the patch rates
    Attack,
    /// Decay time multiplier
    Decay,
    /// Release time multiplier
    Release,
    /// Modulator output scale (FM index)
    Brightness,
    /// Global vibrato depth
    Vibrato,
    /// Pitch wheel range
    BendRange,
}

impl ParameterId {
    pub const COUNT: usize = 7;

    pub const ALL: [ParameterId; Self::COUNT] = [
        ParameterId::Volume,
        ParameterId::Attack,
        ParameterId::Decay,
        ParameterId::Release,
        ParameterId::Brightness,
        ParameterId::Vibrato,
        ParameterId::BendRange,
    ];

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Static description of this parameter.
    pub fn info(self) -> ParameterInfo {
        match self {
            ParameterId::Volume => ParameterInfo {
                name: "Volume",
                label: "dB",
                range: ParameterRange::linear(-48.0, 0.0, -6.0),
                precision: 1,
            },
            ParameterId::Attack => ParameterInfo {
                name: "Attack",
                label: "x",
                range: ParameterRange::logarithmic(0.1, 10.0, 1.0),
                precision: 2,
            },
            ParameterId::Decay => ParameterInfo {
                name: "Decay",
                label: "x",
                range: ParameterRange::logarithmic(0.1, 10.0, 1.0),
                precision: 2,
            },
            ParameterId::Release => ParameterInfo {
                name: "Release",
                label: "x",
                range: ParameterRange::logarithmic(0.1, 10.0, 1.0),
                precision: 2,
            },
            ParameterId::Brightness => ParameterInfo {
                name: "Bright",
                label: "%",
                range: ParameterRange::linear(0.0, 200.0, 100.0),
                precision: 0,
            },
            ParameterId::Vibrato => ParameterInfo {
                name: "Vibrato",
                label: "cent",
                range: ParameterRange::linear(0.0, 100.0, 0.0),
                precision: 0,
            },
            ParameterId::BendRange => ParameterInfo {
                name: "Bend",
                label: "semi",
                range: ParameterRange::integer(0, 24, 2),
                precision: 0,
            },
        }
    }
}

impl TryFrom<usize> for ParameterId {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Self::from_index(index).ok_or(Error::IndexOutOfRange {
            kind: IndexKind::Parameter,
            index: index as i64,
            count: Self::COUNT,
        })
    }
}

impl TryFrom<i32> for ParameterId {
    type Error = Error;

    fn try_from(index: i32) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(Self::from_index)
            .ok_or(Error::IndexOutOfRange {
                kind: IndexKind::Parameter,
                index: index as i64,
                count: Self::COUNT,
            })
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

/// Name, unit, native range and display precision of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterInfo {
    pub name: &'static str,
    pub label: &'static str,
    pub range: ParameterRange,
    /// Decimal places shown by [`format`](Self::format).
    pub precision: usize,
}

impl ParameterInfo {
    pub fn format(&self, native: f32) -> String {
        format!("{:.*}", self.precision, native)
    }
}
