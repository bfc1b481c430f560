use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use slotprof::cli::{Cli, ReportFormat};
use slotprof::{ScopedTimer, SlotAccumulator};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Two manually bracketed blocks plus one RAII block around the loop body
fn run_workload(timing: &SlotAccumulator, iterations: u32, pause: Duration) {
    for i in 0..iterations {
        let _body = timing.block_labeled(0, "main loop");

        timing.start_labeled(1, "block #1");
        thread::sleep(pause);
        timing.stop(1);

        timing.start_labeled(2, "block #2");
        thread::sleep(pause * 2);
        timing.stop(2);

        tracing::trace!(iteration = i, "workload iteration done");
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.iterations == 0 {
        anyhow::bail!("Invalid value for --iterations: 0 (must be >= 1)");
    }

    init_tracing(args.debug);

    let timing = SlotAccumulator::new();
    let pause = Duration::from_millis(args.sleep_ms);

    if args.standalone {
        let _whole = ScopedTimer::named("workload");
        run_workload(&timing, args.iterations, pause);
    } else {
        run_workload(&timing, args.iterations, pause);
    }

    match args.format {
        ReportFormat::Text => timing.print()?,
        ReportFormat::Json => println!("{}", timing.report().to_json()?),
    }

    Ok(())
}
