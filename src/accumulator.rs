//! Slot-indexed timing accumulator
//!
//! A fixed table of [`SLOT_COUNT`] slots. Calling code brackets regions with
//! `start(idx)` / `stop(idx)`; each balanced pair adds the elapsed time to
//! the slot. Time keeps accumulating across repeated entries until
//! [`SlotAccumulator::clear`].
//!
//! # Example
//! ```
//! use slotprof::{ManualClock, SlotAccumulator};
//!
//! let clock = ManualClock::new();
//! let timing: SlotAccumulator<&ManualClock> = SlotAccumulator::with_clock(&clock);
//!
//! for _ in 0..10 {
//!     timing.start_labeled(1, "block #1");
//!     clock.advance_micros(500_000);
//!     timing.stop(1);
//! }
//!
//! assert_eq!(timing.accumulated(1), 5_000_000);
//! assert!(timing.report().to_text().contains("1: block #1: 5 seconds"));
//! ```
//!
//! The table uses `Cell`s, so every operation takes `&self` and guards can
//! nest. It is `!Sync`: concurrent instrumentation needs one accumulator per
//! thread.

use std::io::Write;
use std::time::Duration;

use crate::block::ScopedSlotTimer;
use crate::clock::{MonotonicClock, SystemClock};
use crate::error::{Result, TimingError};
use crate::report::{ReportUnit, SlotReport, TimingReport};
use crate::slot::{Slot, SlotLabel};

/// Default number of slots
pub const SLOT_COUNT: usize = 500;

/// Fixed-capacity table of accumulating timing slots
pub struct SlotAccumulator<C = SystemClock, const N: usize = SLOT_COUNT> {
    clock: C,
    slots: [Slot; N],
}

impl SlotAccumulator {
    /// Create an accumulator on the system monotonic clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SlotAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: MonotonicClock, const N: usize> SlotAccumulator<C, N> {
    /// Create an accumulator reading time from `clock`
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            slots: std::array::from_fn(|_| Slot::new()),
        }
    }

    /// Number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Begin a timed region in slot `idx`
    ///
    /// # Panics
    /// If `idx >= capacity()`. Use [`try_start`](Self::try_start) for a
    /// checked variant.
    #[inline]
    pub fn start(&self, idx: usize) {
        self.slots[idx].subtract(self.clock.get_timestamp());
    }

    /// Begin a timed region and bind `label` to the slot
    ///
    /// The first non-empty label sticks until [`clear`](Self::clear); later
    /// labels for the same slot are ignored.
    #[inline]
    pub fn start_labeled(&self, idx: usize, label: &str) {
        let slot = &self.slots[idx];
        slot.subtract(self.clock.get_timestamp());
        slot.bind_label(label);
    }

    /// End a timed region in slot `idx`
    ///
    /// Unbalanced calls are not detected; they leave a meaningless sum.
    #[inline]
    pub fn stop(&self, idx: usize) {
        self.slots[idx].add(self.clock.get_timestamp());
    }

    pub fn try_start(&self, idx: usize) -> Result<()> {
        self.check(idx)?;
        self.start(idx);
        Ok(())
    }

    pub fn try_start_labeled(&self, idx: usize, label: &str) -> Result<()> {
        self.check(idx)?;
        self.start_labeled(idx, label);
        Ok(())
    }

    pub fn try_stop(&self, idx: usize) -> Result<()> {
        self.check(idx)?;
        self.stop(idx);
        Ok(())
    }

    fn check(&self, idx: usize) -> Result<()> {
        if idx < N {
            Ok(())
        } else {
            Err(TimingError::SlotOutOfRange {
                index: idx,
                capacity: N,
            })
        }
    }

    /// Start slot `idx` and stop it when the returned guard drops
    pub fn block(&self, idx: usize) -> ScopedSlotTimer<'_, C, N> {
        ScopedSlotTimer::new(self, idx)
    }

    /// Labeled variant of [`block`](Self::block)
    pub fn block_labeled(&self, idx: usize, label: &str) -> ScopedSlotTimer<'_, C, N> {
        ScopedSlotTimer::labeled(self, idx, label)
    }

    /// Run `f` inside a labeled block on slot `idx`
    pub fn time<R>(&self, idx: usize, label: &str, f: impl FnOnce() -> R) -> R {
        let _block = self.block_labeled(idx, label);
        f()
    }

    /// Raw accumulated microseconds for slot `idx`
    ///
    /// Mid-region (after `start`, before `stop`) this is a large negative
    /// number, not an elapsed time.
    pub fn accumulated(&self, idx: usize) -> i64 {
        self.slots[idx].accumulated()
    }

    /// Accumulated time for slot `idx`, clamped at zero
    pub fn elapsed(&self, idx: usize) -> Duration {
        Duration::from_micros(self.accumulated(idx).max(0) as u64)
    }

    /// Label bound to slot `idx`, if any
    pub fn label(&self, idx: usize) -> Option<SlotLabel> {
        let label = self.slots[idx].label();
        (!label.is_empty()).then_some(label)
    }

    /// Slots with non-zero accumulated time, in index order
    pub fn active_slots(&self) -> impl Iterator<Item = (usize, &Slot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.accumulated() != 0)
    }

    /// Reset every slot's time and label
    pub fn clear(&self) {
        for slot in &self.slots {
            slot.reset();
        }
        tracing::debug!(slots = N, "timing slots cleared");
    }

    /// Snapshot the non-idle slots
    ///
    /// The name column width covers every slot, idle ones included, so the
    /// layout stays stable as slots come and go.
    pub fn report(&self) -> TimingReport {
        let name_width = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| slot.display_name(i).chars().count())
            .max()
            .unwrap_or(0);

        let slots: Vec<SlotReport> = self
            .active_slots()
            .map(|(index, slot)| {
                let accumulated_us = slot.accumulated();
                let (value, unit) = ReportUnit::scale(accumulated_us as f64 / 1000.0);
                let label = slot.label();
                SlotReport {
                    index,
                    label: (!label.is_empty()).then(|| label.as_str().to_string()),
                    name: slot.display_name(index),
                    accumulated_us,
                    value,
                    unit,
                }
            })
            .collect();

        tracing::debug!(active = slots.len(), name_width, "timing report built");
        TimingReport { name_width, slots }
    }

    /// Write the text report to `out`
    pub fn write_report<W: Write>(&self, out: &mut W) -> Result<()> {
        self.report().write_text(out)
    }

    /// Print the text report to stdout
    pub fn print(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.write_report(&mut out)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn manual(clock: &ManualClock) -> SlotAccumulator<&ManualClock> {
        SlotAccumulator::with_clock(clock)
    }

    #[test]
    fn test_new_is_idle() {
        let timing = SlotAccumulator::new();
        assert_eq!(timing.capacity(), SLOT_COUNT);
        assert_eq!(timing.active_slots().count(), 0);
        assert!(timing.label(0).is_none());
    }

    #[test]
    fn test_start_stop_accumulates() {
        let clock = ManualClock::starting_at(1_000_000_000);
        let timing = manual(&clock);

        timing.start(4);
        clock.advance_micros(250);
        timing.stop(4);
        assert_eq!(timing.accumulated(4), 250);

        timing.start(4);
        clock.advance_micros(750);
        timing.stop(4);
        assert_eq!(timing.accumulated(4), 1_000);
        assert_eq!(timing.elapsed(4), Duration::from_micros(1_000));
    }

    #[test]
    fn test_empty_region_is_zero() {
        let clock = ManualClock::starting_at(77_000_000);
        let timing = manual(&clock);
        timing.start(0);
        timing.stop(0);
        assert_eq!(timing.accumulated(0), 0);
        assert_eq!(timing.active_slots().count(), 0);
    }

    #[test]
    fn test_mid_region_sum_is_negative() {
        let clock = ManualClock::starting_at(5_000_000);
        let timing = manual(&clock);
        timing.start(2);
        assert_eq!(timing.accumulated(2), -5_000);
        assert_eq!(timing.elapsed(2), Duration::ZERO);
    }

    #[test]
    fn test_label_is_sticky() {
        let clock = ManualClock::new();
        let timing = manual(&clock);

        timing.start_labeled(5, "A");
        clock.advance_micros(10);
        timing.stop(5);
        timing.start_labeled(5, "B");
        clock.advance_micros(10);
        timing.stop(5);

        assert_eq!(timing.label(5).unwrap().as_str(), "A");
        let text = timing.report().to_text();
        assert!(text.contains("5: A"));
        assert!(!text.contains("5: B"));
    }

    #[test]
    fn test_clear_resets_and_allows_rebinding() {
        let clock = ManualClock::new();
        let timing = manual(&clock);

        timing.start_labeled(9, "old");
        clock.advance_micros(100);
        timing.stop(9);
        timing.clear();

        assert_eq!(timing.accumulated(9), 0);
        assert_eq!(timing.report().to_text(), "Timing report:\n");

        timing.start_labeled(9, "new");
        clock.advance_micros(100);
        timing.stop(9);
        assert_eq!(timing.label(9).unwrap().as_str(), "new");
    }

    #[test]
    fn test_try_variants_check_range() {
        let clock = ManualClock::new();
        let timing: SlotAccumulator<&ManualClock, 8> = SlotAccumulator::with_clock(&clock);

        assert!(timing.try_start(7).is_ok());
        assert!(timing.try_stop(7).is_ok());
        let err = timing.try_start_labeled(8, "nope").unwrap_err();
        assert!(matches!(
            err,
            TimingError::SlotOutOfRange {
                index: 8,
                capacity: 8
            }
        ));
        assert!(timing.try_stop(100).is_err());
    }

    #[test]
    #[should_panic]
    fn test_unchecked_out_of_range_panics() {
        let timing = SlotAccumulator::new();
        timing.start(SLOT_COUNT);
    }

    #[test]
    fn test_report_width_counts_idle_slots() {
        let clock = ManualClock::new();
        let timing: SlotAccumulator<&ManualClock, 16> = SlotAccumulator::with_clock(&clock);

        // Slot 15 has a long label but no time; it still sets the width
        timing.start_labeled(15, "a long idle label");
        timing.stop(15);

        timing.start(1);
        clock.advance_micros(2_000);
        timing.stop(1);

        let report = timing.report();
        assert_eq!(report.name_width, "15: a long idle label".len());
        assert_eq!(report.slots.len(), 1);
        assert_eq!(
            report.to_text(),
            format!("Timing report:\n  {:<21}: 2 milliseconds\n", "1")
        );
    }

    #[test]
    fn test_report_width_counts_chars_not_bytes() {
        let clock = ManualClock::new();
        let timing: SlotAccumulator<&ManualClock, 4> = SlotAccumulator::with_clock(&clock);

        timing.start_labeled(1, "é");
        clock.advance_micros(1_000);
        timing.stop(1);

        let report = timing.report();
        assert_eq!(report.name_width, 4);
        assert_eq!(report.to_text(), "Timing report:\n  1: é: 1 milliseconds\n");
    }

    #[test]
    fn test_nul_label_does_not_bind() {
        let clock = ManualClock::new();
        let timing: SlotAccumulator<&ManualClock, 4> = SlotAccumulator::with_clock(&clock);

        timing.start_labeled(1, "\0");
        clock.advance_micros(1_000);
        timing.stop(1);
        assert!(timing.label(1).is_none());
        assert_eq!(timing.report().to_text(), "Timing report:\n  1: 1 milliseconds\n");

        timing.start_labeled(1, "io\0tail");
        clock.advance_micros(1_000);
        timing.stop(1);
        assert_eq!(timing.label(1).unwrap().as_str(), "io");
    }

    #[test]
    fn test_report_width_without_labels() {
        let timing: SlotAccumulator<SystemClock, 12> = SlotAccumulator::with_clock(SystemClock);
        assert_eq!(timing.report().name_width, 2);
    }

    #[test]
    fn test_report_units_per_slot() {
        let clock = ManualClock::new();
        let timing: SlotAccumulator<&ManualClock, 4> = SlotAccumulator::with_clock(&clock);

        let spans_us = [999_999, 1_000_000, 1_000_000_000, 60_000_000_000];
        for (idx, us) in spans_us.iter().enumerate() {
            timing.start(idx);
            clock.advance_micros(*us);
            timing.stop(idx);
        }

        let units: Vec<ReportUnit> = timing.report().slots.iter().map(|s| s.unit).collect();
        assert_eq!(
            units,
            vec![
                ReportUnit::Milliseconds,
                ReportUnit::Seconds,
                ReportUnit::Minutes,
                ReportUnit::Hours
            ]
        );
    }

    #[test]
    fn test_time_closure() {
        let clock = ManualClock::new();
        let timing = manual(&clock);
        let out = timing.time(3, "closure", || {
            clock.advance_micros(40);
            "done"
        });
        assert_eq!(out, "done");
        assert_eq!(timing.accumulated(3), 40);
        assert_eq!(timing.label(3).unwrap().as_str(), "closure");
    }

    #[test]
    fn test_write_report_to_buffer() {
        let clock = ManualClock::new();
        let timing = manual(&clock);
        timing.start_labeled(0, "main loop");
        clock.advance(Duration::from_millis(1500));
        timing.stop(0);

        let mut buf = Vec::new();
        timing.write_report(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Timing report:\n"));
        assert!(text.contains("0: main loop"));
        assert!(text.contains(": 1.5 seconds"));
    }

    #[test]
    fn test_print_does_not_panic() {
        let timing = SlotAccumulator::new();
        timing.start(1);
        timing.stop(1);
        assert!(timing.print().is_ok());
    }
}
