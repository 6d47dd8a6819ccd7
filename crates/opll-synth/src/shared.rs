//! State shared between the render side and any number of control handles.
//!
//! Every field is a single atomic. A writer stores the value, then marks its
//! dirty bit. The render side drains program and parameter bits once per
//! sample and the sample-rate bit once per block, copying the marked fields
//! into the engine.

use crate::ids::{ParameterId, ProgramId};
use crate::{Error, Result};
use opll_core::config::validate_sample_rate;
use opll_core::{
    Arc, AtomicDouble, AtomicFloat, AtomicU64, AtomicU8, DirtyMask, Ordering,
};

pub(crate) const PROGRAM_BIT: usize = ParameterId::COUNT;
pub(crate) const SAMPLE_RATE_BIT: usize = ParameterId::COUNT + 1;
pub(crate) const SAMPLE_RATE_MASK: u32 = 1 << SAMPLE_RATE_BIT;

#[derive(Debug)]
pub(crate) struct SharedState {
    /// Normalized values, indexed by `ParameterId::index()`
    parameters: [AtomicFloat; ParameterId::COUNT],
    program: AtomicU8,
    pending_sample_rate: AtomicDouble,
    pub(crate) dirty: DirtyMask,
    render_faults: AtomicU64,
}

impl SharedState {
    pub(crate) fn new(program: ProgramId, parameters: [f32; ParameterId::COUNT]) -> Self {
        Self {
            parameters: parameters.map(AtomicFloat::new),
            program: AtomicU8::new(program as u8),
            pending_sample_rate: AtomicDouble::new(0.0),
            dirty: DirtyMask::new(),
            render_faults: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn parameter(&self, id: ParameterId) -> f32 {
        self.parameters[id.index()].get()
    }

    #[inline]
    pub(crate) fn program(&self) -> ProgramId {
        // Only valid indices are ever stored.
        ProgramId::from_index(self.program.load(Ordering::Acquire) as usize).unwrap_or_default()
    }

    #[inline]
    pub(crate) fn pending_sample_rate(&self) -> f64 {
        self.pending_sample_rate.get()
    }

    #[inline]
    pub(crate) fn record_fault(&self) {
        self.render_faults.fetch_add(1, Ordering::Relaxed);
    }
}

/// Control-context handle to a [`VoiceAdapter`](crate::VoiceAdapter).
///
/// Cheap to clone, `Send + Sync`. Program and parameter writes become
/// visible to the render side at its next sample, sample-rate requests at
/// its next block. None of these calls block.
#[derive(Debug, Clone)]
pub struct AdapterControls {
    shared: Arc<SharedState>,
}

impl AdapterControls {
    pub(crate) fn new(shared: Arc<SharedState>) -> Self {
        Self { shared }
    }

    /// Set a parameter from a normalized value. Finite values are clamped to
    /// `[0, 1]`; NaN and infinities are rejected.
    pub fn set_parameter(&self, id: ParameterId, normalized: f32) -> Result<()> {
        if !normalized.is_finite() {
            return Err(Error::InvalidValue {
                name: id.info().name,
                value: normalized,
            });
        }
        self.shared.parameters[id.index()].set(normalized.clamp(0.0, 1.0));
        self.shared.dirty.mark(id.index());
        Ok(())
    }

    /// Last normalized value written for `id`.
    #[inline]
    pub fn parameter(&self, id: ParameterId) -> f32 {
        self.shared.parameter(id)
    }

    pub fn set_program(&self, program: ProgramId) {
        self.shared.program.store(program as u8, Ordering::Release);
        self.shared.dirty.mark(PROGRAM_BIT);
    }

    #[inline]
    pub fn program(&self) -> ProgramId {
        self.shared.program()
    }

    /// Queue a sample-rate change for the render side to apply at the start
    /// of its next block.
    pub fn request_sample_rate(&self, sample_rate: f64) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        self.shared.pending_sample_rate.set(sample_rate);
        self.shared.dirty.mark(SAMPLE_RATE_BIT);
        tracing::debug!(sample_rate, "Sample rate change deferred to render side");
        Ok(())
    }

    /// True while a queued change has not been picked up by the render side.
    pub fn has_pending_changes(&self) -> bool {
        !self.shared.dirty.is_clear()
    }

    /// Non-finite samples replaced since the last [`take_render_faults`](Self::take_render_faults).
    pub fn render_faults(&self) -> u64 {
        self.shared.render_faults.load(Ordering::Relaxed)
    }

    pub fn take_render_faults(&self) -> u64 {
        self.shared.render_faults.swap(0, Ordering::Relaxed)
    }
}
