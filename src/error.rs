//! Error type for timing operations
//!
//! The hot-path operations (`start`, `stop`) never fail; errors only come
//! from the checked slot accessors and from writing reports.

use thiserror::Error;

/// Errors that can occur while recording or reporting timings
#[derive(Error, Debug)]
pub enum TimingError {
    #[error("Slot index {index} out of range (capacity {capacity})")]
    SlotOutOfRange { index: usize, capacity: usize },

    #[error("Failed to write timing report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize timing report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for timing operations
pub type Result<T> = std::result::Result<T, TimingError>;
