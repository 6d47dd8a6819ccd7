//! OPLL-style FM synthesis backend.

mod engine;
mod envelope;
pub mod patch;

pub use engine::{FmEngine, VOICES};
pub use envelope::EnvelopeTiming;
pub use patch::{OperatorPatch, Patch};
