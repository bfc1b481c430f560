//! Self-reporting scope timer
//!
//! A [`ScopedTimer`] is independent of the slot table. It samples the clock
//! when created and reports once, either when [`ScopedTimer::end`] is called
//! or when it drops:
//!
//! ```text
//! Timer: decode took 12.345ms
//! ```

use std::fmt;
use std::time::Duration;

use crate::clock::{MonotonicClock, SystemClock};
use crate::sink::{PrintSink, StderrSink};

/// Unit chosen for a nanosecond duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationScale {
    Nanos,
    Micros,
    Millis,
    Secs,
}

impl DurationScale {
    /// Coarsest unit the duration strictly exceeds one of
    pub fn from_nanos(ns: u64) -> Self {
        if ns > 1_000_000_000 {
            DurationScale::Secs
        } else if ns > 1_000_000 {
            DurationScale::Millis
        } else if ns > 1_000 {
            DurationScale::Micros
        } else {
            DurationScale::Nanos
        }
    }

    /// Duration expressed in this unit
    pub fn value(&self, ns: u64) -> f64 {
        let ns = ns as f64;
        match self {
            DurationScale::Secs => ns / 1e9,
            DurationScale::Millis => ns / 1e6,
            DurationScale::Micros => ns / 1e3,
            DurationScale::Nanos => ns,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            DurationScale::Secs => "s",
            DurationScale::Millis => "ms",
            DurationScale::Micros => "us",
            DurationScale::Nanos => "ns",
        }
    }
}

/// Formats a nanosecond duration as `<value:.3><suffix>`
#[derive(Debug, Clone, Copy)]
pub struct ScaledDuration(pub u64);

impl fmt::Display for ScaledDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = DurationScale::from_nanos(self.0);
        write!(f, "{:.3}{}", scale.value(self.0), scale.suffix())
    }
}

/// Timer that logs its own lifetime
///
/// Reports through a [`PrintSink`] (stderr by default). If `end` is never
/// called, dropping the timer reports instead, so every timer reports on
/// every exit path.
///
/// Calling `end` a second time measures again from the original start and
/// reports a second line.
pub struct ScopedTimer<'a, C: MonotonicClock = SystemClock, S: PrintSink = StderrSink> {
    name: &'a str,
    start_ns: u64,
    end_ns: Option<u64>,
    clock: C,
    sink: S,
}

impl ScopedTimer<'static> {
    /// Start an unnamed timer on the system clock, reporting to stderr
    pub fn new() -> Self {
        Self::with_parts("", SystemClock, StderrSink)
    }
}

impl Default for ScopedTimer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ScopedTimer<'a> {
    /// Start a named timer on the system clock, reporting to stderr
    pub fn named(name: &'a str) -> Self {
        Self::with_parts(name, SystemClock, StderrSink)
    }
}

impl<'a, C: MonotonicClock, S: PrintSink> ScopedTimer<'a, C, S> {
    /// Start a timer with an explicit clock and sink
    pub fn with_parts(name: &'a str, clock: C, sink: S) -> Self {
        let start_ns = clock.get_time();
        Self {
            name,
            start_ns,
            end_ns: None,
            clock,
            sink,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Whether `end` has run
    pub fn is_ended(&self) -> bool {
        self.end_ns.is_some()
    }

    /// Time since the timer started, without reporting
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.clock.get_time().saturating_sub(self.start_ns))
    }

    /// Stop the timer and report the duration
    pub fn end(&mut self) -> Duration {
        let end_ns = self.clock.get_time();
        self.end_ns = Some(end_ns);

        let duration_ns = end_ns.saturating_sub(self.start_ns);
        self.sink.print(format_args!(
            "Timer: {} took {}",
            self.name,
            ScaledDuration(duration_ns)
        ));
        Duration::from_nanos(duration_ns)
    }
}

impl<C: MonotonicClock, S: PrintSink> Drop for ScopedTimer<'_, C, S> {
    fn drop(&mut self) {
        if self.end_ns.is_none() {
            self.end();
        }
    }
}
