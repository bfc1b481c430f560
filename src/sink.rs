//! Print sinks for self-reporting timers
//!
//! A sink takes one pre-formatted line and writes it somewhere, appending
//! the newline itself.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;

/// Destination for timer log lines
pub trait PrintSink {
    fn print(&self, args: fmt::Arguments<'_>);
}

impl<S: PrintSink + ?Sized> PrintSink for &S {
    fn print(&self, args: fmt::Arguments<'_>) {
        (**self).print(args)
    }
}

/// Writes lines to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl PrintSink for StderrSink {
    fn print(&self, args: fmt::Arguments<'_>) {
        let stderr = std::io::stderr();
        let mut out = stderr.lock();
        // A closed stderr must not take the instrumented program down
        let _ = out.write_fmt(args);
        let _ = out.write_all(b"\n");
    }
}

/// Emits lines as `tracing` events at INFO level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl PrintSink for TracingSink {
    fn print(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: "slotprof", "{}", args);
    }
}

/// Collects lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: RefCell<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every line printed so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }

    /// Remove and return all collected lines
    pub fn take(&self) -> Vec<String> {
        self.lines.take()
    }
}

impl PrintSink for MemorySink {
    fn print(&self, args: fmt::Arguments<'_>) {
        self.lines.borrow_mut().push(args.to_string());
    }
}
