#![no_main]

use libfuzzer_sys::fuzz_target;
use logtally_analyzer::AggregatorSet;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let mut set = AggregatorSet::new();
        for line in text.lines() {
            set.ingest_line(line);
        }
        let _ = set.summarize();
    }
});
