#![no_main]

use libfuzzer_sys::fuzz_target;
use logtally_analyzer::{SchemaKind, classify};

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let kind = classify(line);
        if kind == SchemaKind::Metric {
            assert!(line.contains("metric=") && line.contains("value="));
        }
    }
});
