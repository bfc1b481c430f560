//! RAII timing block for one accumulator slot
//!
//! Construction starts the slot, drop stops it. The stop runs on every exit
//! path out of the scope: normal fall-through, early return, `?`, or unwinding.

use crate::accumulator::{SlotAccumulator, SLOT_COUNT};
use crate::clock::{MonotonicClock, SystemClock};

/// Guard that keeps a slot's start/stop pair balanced
#[must_use = "the slot is stopped as soon as the guard is dropped"]
pub struct ScopedSlotTimer<'a, C: MonotonicClock = SystemClock, const N: usize = SLOT_COUNT> {
    timing: &'a SlotAccumulator<C, N>,
    idx: usize,
}

impl<'a, C: MonotonicClock, const N: usize> ScopedSlotTimer<'a, C, N> {
    /// Start slot `idx` on `timing`
    pub fn new(timing: &'a SlotAccumulator<C, N>, idx: usize) -> Self {
        timing.start(idx);
        Self { timing, idx }
    }

    /// Start slot `idx`, binding `label` if the slot has none yet
    pub fn labeled(timing: &'a SlotAccumulator<C, N>, idx: usize, label: &str) -> Self {
        timing.start_labeled(idx, label);
        Self { timing, idx }
    }

    pub fn index(&self) -> usize {
        self.idx
    }
}

impl<C: MonotonicClock, const N: usize> Drop for ScopedSlotTimer<'_, C, N> {
    fn drop(&mut self) {
        self.timing.stop(self.idx);
    }
}
