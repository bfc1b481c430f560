//! CLI argument parsing for the slotprof demo

use clap::{Parser, ValueEnum};

/// Output format for the timing report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Aligned human-readable text (default)
    Text,
    /// JSON for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "slotprof")]
#[command(version)]
#[command(about = "Run an instrumented workload and print its slot timing report", long_about = None)]
pub struct Cli {
    /// Number of loop iterations to time
    #[arg(short = 'n', long = "iterations", default_value = "10")]
    pub iterations: u32,

    /// Milliseconds slept inside each timed block
    #[arg(short = 's', long = "sleep-ms", value_name = "MS", default_value = "5")]
    pub sleep_ms: u64,

    /// Report format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Also run a standalone scoped timer around the whole workload
    #[arg(long = "standalone")]
    pub standalone: bool,

    /// Enable debug tracing output on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
