//! Aggregated timing report
//!
//! A [`TimingReport`] is a snapshot of every non-idle slot, with the unit
//! already chosen and the name column width computed. It renders as the
//! aligned text report or as JSON.

use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::error::Result;

/// Header line that precedes every text report
pub const REPORT_HEADER: &str = "Timing report:";

/// Unit a slot's accumulated time is reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl ReportUnit {
    /// Pick the unit for a value in milliseconds and scale it
    ///
    /// Thresholds: under 1000 ms stays in milliseconds, under 1_000_000 ms is
    /// seconds, under 60_000_000 ms is minutes, anything larger is hours.
    pub fn scale(millis: f64) -> (f64, ReportUnit) {
        if millis < 1000.0 {
            (millis, ReportUnit::Milliseconds)
        } else if millis < 1000.0 * 1000.0 {
            (millis / 1000.0, ReportUnit::Seconds)
        } else if millis < 1000.0 * 1000.0 * 60.0 {
            (millis / 1000.0 / 60.0, ReportUnit::Minutes)
        } else {
            (millis / 1000.0 / 60.0 / 60.0, ReportUnit::Hours)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportUnit::Milliseconds => "milliseconds",
            ReportUnit::Seconds => "seconds",
            ReportUnit::Minutes => "minutes",
            ReportUnit::Hours => "hours",
        }
    }
}

impl fmt::Display for ReportUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One report line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotReport {
    /// Slot index
    pub index: usize,
    /// Bound label, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Display name (`"<idx>: <label>"` or `"<idx>"`)
    pub name: String,
    /// Raw accumulated time in microseconds
    pub accumulated_us: i64,
    /// Accumulated time scaled to `unit`
    pub value: f64,
    pub unit: ReportUnit,
}

/// Snapshot of all non-idle slots in index order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingReport {
    /// Width of the name column in characters (longest display name over all slots)
    pub name_width: usize,
    pub slots: Vec<SlotReport>,
}

impl TimingReport {
    /// True if no slot has accumulated time
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Render the aligned text report
    pub fn write_text<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", REPORT_HEADER)?;
        for slot in &self.slots {
            writeln!(
                out,
                "  {:<width$}: {} {}",
                slot.name,
                slot.value,
                slot.unit,
                width = self.name_width
            )?;
        }
        Ok(())
    }

    /// Render the text report into a `String`
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_text(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
