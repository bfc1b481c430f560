//! Free-function timing API over a per-thread default accumulator
//!
//! For call sites where threading an accumulator through is impractical.
//! Each thread gets its own [`SlotAccumulator`], created on first use, so the
//! single-writer rule holds without locks. Reports only cover the calling
//! thread.
//!
//! ```
//! use slotprof::global;
//!
//! for _ in 0..3 {
//!     let _block = global::block_labeled(1, "main loop");
//!     // ... work ...
//! }
//! global::print().unwrap();
//! global::clear();
//! ```

use std::marker::PhantomData;

use crate::accumulator::SlotAccumulator;
use crate::error::Result;
use crate::report::TimingReport;

thread_local! {
    static TIMING: SlotAccumulator = SlotAccumulator::new();
}

/// Run `f` against this thread's accumulator
pub fn with<R>(f: impl FnOnce(&SlotAccumulator) -> R) -> R {
    TIMING.with(f)
}

pub fn start(idx: usize) {
    with(|timing| timing.start(idx));
}

pub fn start_labeled(idx: usize, label: &str) {
    with(|timing| timing.start_labeled(idx, label));
}

pub fn stop(idx: usize) {
    with(|timing| timing.stop(idx));
}

pub fn clear() {
    with(SlotAccumulator::clear);
}

pub fn report() -> TimingReport {
    with(SlotAccumulator::report)
}

/// Print this thread's report to stdout
pub fn print() -> Result<()> {
    with(SlotAccumulator::print)
}

/// Guard over a slot of the per-thread accumulator
///
/// Stops the slot on drop. Not `Send`: it must drop on the thread that
/// started it.
#[must_use = "the slot is stopped as soon as the guard is dropped"]
pub struct Block {
    idx: usize,
    _not_send: PhantomData<*const ()>,
}

impl Drop for Block {
    fn drop(&mut self) {
        // Thread-local may already be gone during thread teardown
        let _ = TIMING.try_with(|timing| timing.stop(self.idx));
    }
}

pub fn block(idx: usize) -> Block {
    start(idx);
    Block {
        idx,
        _not_send: PhantomData,
    }
}

pub fn block_labeled(idx: usize, label: &str) -> Block {
    start_labeled(idx, label);
    Block {
        idx,
        _not_send: PhantomData,
    }
}
