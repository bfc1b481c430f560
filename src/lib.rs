//! Slotprof - slot-indexed code timing with aligned reports
//!
//! This library provides lightweight instrumentation for measuring where
//! time goes inside a program:
//!
//! - [`SlotAccumulator`]: a fixed table of numbered slots that accumulate
//!   elapsed time across repeated start/stop pairs and print an aligned report
//! - [`ScopedSlotTimer`]: an RAII guard that keeps a slot's start/stop balanced
//! - [`ScopedTimer`]: a standalone timer that logs its own duration once
//! - [`global`]: the same API over a per-thread default accumulator

pub mod accumulator;
pub mod block;
pub mod cli;
pub mod clock;
pub mod error;
pub mod global;
pub mod report;
pub mod scope_timer;
pub mod sink;
pub mod slot;

pub use accumulator::{SlotAccumulator, SLOT_COUNT};
pub use block::ScopedSlotTimer;
pub use clock::{ManualClock, MonotonicClock, SystemClock};
pub use error::{Result, TimingError};
pub use report::{ReportUnit, SlotReport, TimingReport};
pub use scope_timer::{DurationScale, ScaledDuration, ScopedTimer};
pub use sink::{MemorySink, PrintSink, StderrSink, TracingSink};
pub use slot::{SlotLabel, MAX_LABEL_LEN, NAME_LENGTH};
