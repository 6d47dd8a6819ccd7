//! Fixed-size voice allocator.
//!
//! Maps note numbers onto a small pool of channel slots:
//! - A note that is already sounding is released before it is retriggered
//! - With no idle slot, the quietest releasing slot is stolen, then the oldest
//!   held one
//!
//! All methods are RT-safe (no allocations after construction).

/// Unique identifier for a voice instance.
pub type VoiceId = u64;

/// State of a single voice slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceState {
    #[default]
    Idle,
    /// Key held (attack/decay/sustain)
    Active,
    /// Key released, envelope still sounding
    Releasing,
}

/// Bookkeeping for one slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceSlot {
    pub voice_id: VoiceId,
    /// Note number that triggered this slot (0-127)
    pub note: u8,
    pub velocity: f32,
    /// Last reported carrier level, used to pick among releasing slots
    pub envelope_level: f32,
    /// Sample counter at allocation
    pub start_time: u64,
    pub state: VoiceState,
}

/// Result of allocating a slot for a key-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationResult {
    Allocated {
        voice_id: VoiceId,
        slot_index: usize,
    },
    /// An occupied slot was taken over
    Stolen {
        voice_id: VoiceId,
        slot_index: usize,
        stolen_voice_id: VoiceId,
    },
}

impl AllocationResult {
    #[inline]
    pub fn slot_index(&self) -> usize {
        match *self {
            AllocationResult::Allocated { slot_index, .. }
            | AllocationResult::Stolen { slot_index, .. } => slot_index,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VoiceAllocator<const N: usize> {
    slots: [VoiceSlot; N],
    next_voice_id: VoiceId,
    current_time: u64,
    /// note (0-127) -> slot index of the voice that note is holding
    note_to_slot: [Option<usize>; 128],
}

impl<const N: usize> Default for VoiceAllocator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> VoiceAllocator<N> {
    pub fn new() -> Self {
        Self {
            slots: [VoiceSlot::default(); N],
            next_voice_id: 1,
            current_time: 0,
            note_to_slot: [None; 128],
        }
    }

    /// Allocate a slot for `note`. Always succeeds.
    pub fn allocate(&mut self, note: u8, velocity: f32) -> AllocationResult {
        let note = note & 0x7F;

        if let Some(existing) = self.note_to_slot[note as usize].take() {
            self.slots[existing].state = VoiceState::Releasing;
        }

        if let Some(slot_index) = self.find_idle_slot() {
            let voice_id = self.activate_slot(slot_index, note, velocity);
            return AllocationResult::Allocated {
                voice_id,
                slot_index,
            };
        }

        let slot_index = self.find_slot_to_steal();
        let stolen = self.slots[slot_index];
        if self.note_to_slot[stolen.note as usize] == Some(slot_index) {
            self.note_to_slot[stolen.note as usize] = None;
        }

        let voice_id = self.activate_slot(slot_index, note, velocity);
        AllocationResult::Stolen {
            voice_id,
            slot_index,
            stolen_voice_id: stolen.voice_id,
        }
    }

    /// Release the slot held by `note`. Returns its index, or `None` when the
    /// note is not held.
    pub fn release(&mut self, note: u8) -> Option<usize> {
        let slot_index = self.note_to_slot[(note & 0x7F) as usize].take()?;
        self.slots[slot_index].state = VoiceState::Releasing;
        Some(slot_index)
    }

    /// Move every held slot to `Releasing`.
    pub fn release_all(&mut self) {
        for slot in self.slots.iter_mut() {
            if slot.state == VoiceState::Active {
                slot.state = VoiceState::Releasing;
            }
        }
        self.note_to_slot = [None; 128];
    }

    /// Free a slot whose envelope reached silence.
    pub fn voice_finished(&mut self, slot_index: usize) {
        let Some(slot) = self.slots.get_mut(slot_index) else {
            return;
        };
        if self.note_to_slot[slot.note as usize] == Some(slot_index) {
            self.note_to_slot[slot.note as usize] = None;
        }
        slot.state = VoiceState::Idle;
        slot.envelope_level = 0.0;
    }

    #[inline]
    pub fn update_envelope_level(&mut self, slot_index: usize, level: f32) {
        if let Some(slot) = self.slots.get_mut(slot_index) {
            slot.envelope_level = level;
        }
    }

    #[inline]
    pub fn advance_time(&mut self, samples: u64) {
        self.current_time = self.current_time.wrapping_add(samples);
    }

    /// Slot currently held by `note`.
    #[inline]
    pub fn slot_for_note(&self, note: u8) -> Option<usize> {
        self.note_to_slot[(note & 0x7F) as usize]
    }

    pub fn active_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.state != VoiceState::Idle)
            .count()
    }

    pub fn slots(&self) -> &[VoiceSlot] {
        &self.slots
    }

    pub fn reset(&mut self) {
        self.slots = [VoiceSlot::default(); N];
        self.note_to_slot = [None; 128];
    }

    fn find_idle_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.state == VoiceState::Idle)
    }

    // Only called when every slot is occupied.
    fn find_slot_to_steal(&self) -> usize {
        let releasing = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.state == VoiceState::Releasing)
            .min_by(|(_, a), (_, b)| a.envelope_level.total_cmp(&b.envelope_level));

        if let Some((i, _)) = releasing {
            return i;
        }

        self.slots
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.start_time)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn activate_slot(&mut self, slot_index: usize, note: u8, velocity: f32) -> VoiceId {
        let voice_id = self.next_voice_id;
        self.next_voice_id = self.next_voice_id.wrapping_add(1);

        self.slots[slot_index] = VoiceSlot {
            voice_id,
            note,
            velocity,
            envelope_level: 0.0,
            start_time: self.current_time,
            state: VoiceState::Active,
        };
        self.note_to_slot[note as usize] = Some(slot_index);

        voice_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_allocation() {
        let mut alloc = VoiceAllocator::<4>::new();

        let result = alloc.allocate(60, 0.8);
        assert!(matches!(
            result,
            AllocationResult::Allocated { slot_index: 0, .. }
        ));

        let result = alloc.allocate(64, 0.7);
        assert!(matches!(
            result,
            AllocationResult::Allocated { slot_index: 1, .. }
        ));
        assert_eq!(alloc.active_count(), 2);
        assert_eq!(alloc.slot_for_note(64), Some(1));
    }

    #[test]
    fn test_steals_oldest_when_all_held() {
        let mut alloc = VoiceAllocator::<2>::new();

        alloc.allocate(60, 0.8);
        alloc.advance_time(100);
        alloc.allocate(64, 0.7);
        alloc.advance_time(100);

        let result = alloc.allocate(67, 0.9);
        assert!(matches!(
            result,
            AllocationResult::Stolen {
                slot_index: 0,
                stolen_voice_id: 1,
                ..
            }
        ));
        assert_eq!(alloc.slot_for_note(60), None);
        assert_eq!(alloc.slot_for_note(67), Some(0));
    }

    #[test]
    fn test_prefers_quietest_releasing_slot() {
        let mut alloc = VoiceAllocator::<3>::new();

        alloc.allocate(60, 0.8);
        alloc.allocate(62, 0.8);
        alloc.allocate(64, 0.8);
        alloc.release(62);
        alloc.release(64);
        alloc.update_envelope_level(1, 0.5);
        alloc.update_envelope_level(2, 0.1);

        let result = alloc.allocate(70, 0.8);
        assert_eq!(result.slot_index(), 2);
        // the held note survives
        assert_eq!(alloc.slot_for_note(60), Some(0));
    }

    #[test]
    fn test_release() {
        let mut alloc = VoiceAllocator::<9>::new();

        alloc.allocate(60, 0.8);
        assert_eq!(alloc.release(60), Some(0));
        assert_eq!(alloc.slots()[0].state, VoiceState::Releasing);

        // second release of the same note is a no-op
        assert_eq!(alloc.release(60), None);

        alloc.voice_finished(0);
        assert_eq!(alloc.slots()[0].state, VoiceState::Idle);
        assert_eq!(alloc.active_count(), 0);
    }

    #[test]
    fn test_retrigger_releases_previous_slot() {
        let mut alloc = VoiceAllocator::<9>::new();

        alloc.allocate(60, 0.8);
        let result = alloc.allocate(60, 0.5);

        assert_eq!(result.slot_index(), 1);
        assert_eq!(alloc.slots()[0].state, VoiceState::Releasing);
        assert_eq!(alloc.slot_for_note(60), Some(1));
    }

    #[test]
    fn test_finished_slot_does_not_drop_newer_mapping() {
        let mut alloc = VoiceAllocator::<9>::new();

        alloc.allocate(60, 0.8);
        alloc.allocate(60, 0.8);
        alloc.voice_finished(0);

        assert_eq!(alloc.slot_for_note(60), Some(1));
    }

    #[test]
    fn test_release_all() {
        let mut alloc = VoiceAllocator::<9>::new();
        for note in [60, 64, 67] {
            alloc.allocate(note, 0.8);
        }

        alloc.release_all();

        assert!(alloc
            .slots()
            .iter()
            .take(3)
            .all(|s| s.state == VoiceState::Releasing));
        assert_eq!(alloc.slot_for_note(64), None);
    }

    #[test]
    fn test_reset() {
        let mut alloc = VoiceAllocator::<9>::new();
        alloc.allocate(60, 0.8);
        alloc.reset();
        assert_eq!(alloc.active_count(), 0);
        assert_eq!(alloc.slot_for_note(60), None);
    }
}
