#![no_main]

use libfuzzer_sys::fuzz_target;
use slotprof::{ManualClock, SlotAccumulator, MAX_LABEL_LEN};

fuzz_target!(|data: &[u8]| {
    // Treat the input as a sequence of labels separated by NUL bytes
    let clock = ManualClock::new();
    let timing: SlotAccumulator<&ManualClock, 16> = SlotAccumulator::with_clock(&clock);

    for (i, chunk) in data.split(|b| *b == 0).enumerate() {
        let Ok(label) = std::str::from_utf8(chunk) else {
            continue;
        };
        timing.start_labeled(i % 16, label);
        clock.advance_micros(1);
        timing.stop(i % 16);
    }

    if let Some(bound) = timing.label(0) {
        assert!(bound.len() <= MAX_LABEL_LEN);
    }

    // Rendering must never panic, whatever the labels contain
    let _ = timing.report().to_text();
});
