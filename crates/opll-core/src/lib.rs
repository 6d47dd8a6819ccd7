//! Core runtime pieces shared by the OPLL bridge crates.
//!
//! - [`EngineConfig`]: sample rate / block size configuration
//! - [`AtomicFloat`], [`AtomicDouble`], [`DirtyMask`]: lock-free
//!   single-field primitives shared between the control and render contexts
//! - [`ParameterRange`]: normalized (0.0-1.0) ↔ native value conversion
//! - [`SmoothedValue`]: zipper-free per-sample ramps
//!
//! Nothing in this crate allocates or blocks on its hot paths.

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{EngineConfig, DEFAULT_BLOCK_SIZE, DEFAULT_SAMPLE_RATE};

pub(crate) mod lockfree;
pub use lockfree::{AtomicDouble, AtomicFloat, DirtyMask};

pub mod parameter;
pub use parameter::{ParameterRange, ParameterScale};

pub mod smooth;
pub use smooth::SmoothedValue;

pub use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
pub use std::sync::Arc;
