#![no_main]

use fixation_tracker::csv_input::{parse_labeled_csv, parse_sample_csv};
use fixation_tracker::session::replay;
use fixation_tracker::SessionConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = parse_labeled_csv(input);
        // Parsed streams may still be non-monotonic; replay must reject, not panic.
        if let Ok(samples) = parse_sample_csv(input) {
            let _ = replay(&samples, SessionConfig::default());
        }
    }
});
