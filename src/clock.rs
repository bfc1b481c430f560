//! Monotonic time sources
//!
//! Everything that measures an interval goes through [`MonotonicClock`], so
//! accumulators and timers can run against the OS clock in production and
//! against a [`ManualClock`] in tests.
//!
//! Two readings are exposed:
//! - [`MonotonicClock::get_time`]: nanoseconds, used by the scoped timers
//! - [`MonotonicClock::get_timestamp`]: signed microseconds, the unit the slot
//!   accumulator sums (its report divides by 1000 to get milliseconds)
//!
//! Readings are only meaningful relative to each other within one process.

use std::cell::Cell;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use nix::time::{clock_gettime, ClockId};

/// A time source that never goes backwards within a process run
pub trait MonotonicClock {
    /// Current reading in nanoseconds
    fn get_time(&self) -> u64;

    /// Current reading in microseconds, as a signed sample
    ///
    /// Only differences between samples are meaningful.
    fn get_timestamp(&self) -> i64 {
        (self.get_time() / 1_000) as i64
    }
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &C {
    fn get_time(&self) -> u64 {
        (**self).get_time()
    }

    fn get_timestamp(&self) -> i64 {
        (**self).get_timestamp()
    }
}

/// The OS monotonic clock (`CLOCK_MONOTONIC`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a handle to the system clock
    pub fn new() -> Self {
        SystemClock
    }
}

impl MonotonicClock for SystemClock {
    #[inline]
    fn get_time(&self) -> u64 {
        match clock_gettime(ClockId::CLOCK_MONOTONIC) {
            Ok(ts) => (ts.tv_sec() as u64) * 1_000_000_000 + ts.tv_nsec() as u64,
            // clock_gettime(CLOCK_MONOTONIC) does not fail on supported targets
            Err(_) => fallback_nanos(),
        }
    }
}

/// Nanoseconds since the first fallback reading, via `std::time::Instant`
fn fallback_nanos() -> u64 {
    static ANCHOR: OnceLock<Instant> = OnceLock::new();
    ANCHOR.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

/// A clock that only moves when told to
///
/// Single-threaded by construction (`Cell`), like the accumulator it usually
/// drives. Share it by reference: `&ManualClock` is itself a clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ns: Cell<u64>,
}

impl ManualClock {
    /// Create a manual clock reading zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manual clock starting at `ns` nanoseconds
    pub fn starting_at(ns: u64) -> Self {
        Self {
            now_ns: Cell::new(ns),
        }
    }

    /// Move the clock to `ns`; earlier readings are rejected
    pub fn set(&self, ns: u64) {
        let now = self.now_ns.get();
        if ns < now {
            tracing::warn!(now, requested = ns, "ignoring backwards move of manual clock");
            return;
        }
        self.now_ns.set(ns);
    }

    /// Advance by a `Duration`
    pub fn advance(&self, by: Duration) {
        self.advance_nanos(by.as_nanos() as u64);
    }

    /// Advance by `ns` nanoseconds
    pub fn advance_nanos(&self, ns: u64) {
        self.now_ns.set(self.now_ns.get().saturating_add(ns));
    }

    /// Advance by `us` microseconds
    pub fn advance_micros(&self, us: u64) {
        self.advance_nanos(us.saturating_mul(1_000));
    }
}

impl MonotonicClock for ManualClock {
    fn get_time(&self) -> u64 {
        self.now_ns.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let mut last = clock.get_time();
        for _ in 0..1000 {
            let now = clock.get_time();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_system_clock_measures_sleep() {
        let clock = SystemClock::new();
        let t0 = clock.get_time();
        thread::sleep(Duration::from_millis(10));
        let elapsed = clock.get_time() - t0;
        assert!(elapsed >= 10_000_000);
        assert!(elapsed < 1_000_000_000);
    }

    #[test]
    fn test_timestamp_is_microseconds() {
        let clock = ManualClock::starting_at(5_000_999);
        assert_eq!(clock.get_timestamp(), 5_000);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_millis(2));
        assert_eq!(clock.get_time(), 2_000_000);
        clock.advance_micros(3);
        assert_eq!(clock.get_time(), 2_003_000);
        clock.advance_nanos(7);
        assert_eq!(clock.get_time(), 2_003_007);
    }

    #[test]
    fn test_manual_clock_rejects_backwards_set() {
        let clock = ManualClock::starting_at(100);
        clock.set(50);
        assert_eq!(clock.get_time(), 100);
        clock.set(150);
        assert_eq!(clock.get_time(), 150);
    }

    #[test]
    fn test_clock_by_reference() {
        let clock = ManualClock::starting_at(42_000);
        let by_ref: &ManualClock = &clock;
        assert_eq!(MonotonicClock::get_time(&by_ref), 42_000);
        assert_eq!(MonotonicClock::get_timestamp(&by_ref), 42);
    }
}
