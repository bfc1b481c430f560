//! Slot storage: one accumulator bucket and its bound label
//!
//! Labels live in a fixed inline buffer so binding one never allocates.
//! A label is bound at most once; later bindings are ignored until the slot
//! is cleared.

use std::cell::Cell;
use std::fmt;

/// Label buffer size in bytes, including the reserved terminator byte
pub const NAME_LENGTH: usize = 40;

/// Maximum number of visible label bytes
pub const MAX_LABEL_LEN: usize = NAME_LENGTH - 1;

/// Fixed-capacity label text
///
/// Holds at most [`MAX_LABEL_LEN`] bytes of UTF-8. Input ends at the first
/// NUL; longer input is cut at the last character boundary that fits.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SlotLabel {
    buf: [u8; MAX_LABEL_LEN],
    len: u8,
}

impl SlotLabel {
    /// The empty label
    pub const EMPTY: SlotLabel = SlotLabel {
        buf: [0; MAX_LABEL_LEN],
        len: 0,
    };

    /// Build a label from `text`, truncating to capacity
    pub fn new(text: &str) -> Self {
        let text = text.split('\0').next().unwrap_or_default();
        let mut end = text.len().min(MAX_LABEL_LEN);
        while !text.is_char_boundary(end) {
            end -= 1;
        }

        let mut label = Self::EMPTY;
        label.buf[..end].copy_from_slice(&text.as_bytes()[..end]);
        label.len = end as u8;
        label
    }

    pub fn as_str(&self) -> &str {
        // Only ever filled from a &str cut at a char boundary
        std::str::from_utf8(&self.buf[..self.len as usize]).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }
}

impl Default for SlotLabel {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SlotLabel").field(&self.as_str()).finish()
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accumulator bucket
///
/// `accumulated` is a running sum of clock samples in microseconds: `start`
/// subtracts the current sample, `stop` adds it back, so a balanced pair adds
/// the elapsed interval.
#[derive(Debug, Default)]
pub struct Slot {
    accumulated: Cell<i64>,
    label: Cell<SlotLabel>,
}

impl Slot {
    /// An idle, unlabeled slot
    pub const fn new() -> Self {
        Slot {
            accumulated: Cell::new(0),
            label: Cell::new(SlotLabel::EMPTY),
        }
    }

    #[inline]
    pub(crate) fn subtract(&self, sample: i64) {
        self.accumulated
            .set(self.accumulated.get().wrapping_sub(sample));
    }

    #[inline]
    pub(crate) fn add(&self, sample: i64) {
        self.accumulated
            .set(self.accumulated.get().wrapping_add(sample));
    }

    /// Bind `label` if no label is bound yet
    ///
    /// Returns true if this call bound the label.
    pub(crate) fn bind_label(&self, label: &str) -> bool {
        if !self.label.get().is_empty() {
            return false;
        }
        let label = SlotLabel::new(label);
        if label.is_empty() {
            return false;
        }
        self.label.set(label);
        true
    }

    pub(crate) fn reset(&self) {
        self.accumulated.set(0);
        self.label.set(SlotLabel::EMPTY);
    }

    /// Accumulated microseconds
    pub fn accumulated(&self) -> i64 {
        self.accumulated.get()
    }

    pub fn label(&self) -> SlotLabel {
        self.label.get()
    }

    /// Name shown in reports: `"<idx>: <label>"` or just `"<idx>"`
    pub(crate) fn display_name(&self, index: usize) -> String {
        let label = self.label.get();
        if label.is_empty() {
            index.to_string()
        } else {
            format!("{}: {}", index, label)
        }
    }
}
