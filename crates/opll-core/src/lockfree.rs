//! Lock-free primitives shared between the control and render contexts.
//!
//! Every type here is a single atomic field. Writers publish with `Release`,
//! readers observe with `Acquire`, so a reader never sees a torn value.

use atomic_float::{AtomicF32, AtomicF64};
use std::sync::atomic::{AtomicU32, Ordering};

/// Cache-line aligned atomic f32.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFloat {
    value: AtomicF32,
}

impl AtomicFloat {
    pub fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.value.store(value, Ordering::Release);
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Cache-line aligned atomic f64.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicDouble {
    value: AtomicF64,
}

impl AtomicDouble {
    pub fn new(value: f64) -> Self {
        Self {
            value: AtomicF64::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.value.store(value, Ordering::Release);
    }
}

impl Default for AtomicDouble {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Up to 32 "changed" bits set by a writer and drained by a single reader.
///
/// The writer stores the new value first, then calls [`mark`](Self::mark);
/// the reader calls [`take`](Self::take) and then loads the values whose bits
/// were set. Bits outside the mask passed to `take` stay pending, so different
/// fields can be drained at different points of the render loop. With release/acquire pairing the reader always sees the value
/// that caused the bit, or a newer one.
#[derive(Debug, Default)]
#[repr(align(64))]
pub struct DirtyMask {
    bits: AtomicU32,
}

impl DirtyMask {
    pub const CAPACITY: usize = 32;

    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mark(&self, bit: usize) {
        debug_assert!(bit < Self::CAPACITY);
        self.bits.fetch_or(1 << bit, Ordering::Release);
    }

    /// Clear and return the pending bits selected by `mask`.
    ///
    /// Single load on the fast path; only writes when a selected bit is set.
    #[inline]
    pub fn take(&self, mask: u32) -> u32 {
        if self.bits.load(Ordering::Relaxed) & mask == 0 {
            return 0;
        }
        self.bits.fetch_and(!mask, Ordering::Acquire) & mask
    }

    #[inline]
    pub fn is_clear(&self) -> bool {
        self.bits.load(Ordering::Relaxed) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_atomic_float() {
        let val = AtomicFloat::new(1.0);
        assert_eq!(val.get(), 1.0);
        val.set(2.5);
        assert_eq!(val.get(), 2.5);
    }

    #[test]
    fn test_atomic_double() {
        let val = AtomicDouble::new(44100.0);
        val.set(48000.0);
        assert_eq!(val.get(), 48000.0);
    }

    #[test]
    fn test_dirty_mask_take_clears() {
        let mask = DirtyMask::new();
        assert!(mask.is_clear());
        mask.mark(0);
        mask.mark(5);
        assert_eq!(mask.take(u32::MAX), 0b10_0001);
        assert_eq!(mask.take(u32::MAX), 0);
        assert!(mask.is_clear());
    }

    #[test]
    fn test_dirty_mask_take_leaves_unselected_bits() {
        let mask = DirtyMask::new();
        mask.mark(1);
        mask.mark(8);

        assert_eq!(mask.take(!(1 << 8)), 1 << 1);
        assert!(!mask.is_clear());
        assert_eq!(mask.take(1 << 1), 0);
        assert_eq!(mask.take(1 << 8), 1 << 8);
        assert!(mask.is_clear());
    }

    #[test]
    fn test_dirty_mask_across_threads() {
        let mask = Arc::new(DirtyMask::new());
        let value = Arc::new(AtomicFloat::new(0.0));

        let writer = {
            let mask = Arc::clone(&mask);
            let value = Arc::clone(&value);
            std::thread::spawn(move || {
                value.set(0.75);
                mask.mark(3);
            })
        };
        writer.join().unwrap();

        assert_eq!(mask.take(u32::MAX), 1 << 3);
        assert_eq!(value.get(), 0.75);
    }
}
