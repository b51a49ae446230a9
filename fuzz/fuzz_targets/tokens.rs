#![no_main]

use libfuzzer_sys::fuzz_target;
use logtally_analyzer::RawTokens;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let tokens = RawTokens::parse(line);
        // 모든 키는 '='를 포함하지 않음
        for (key, _) in tokens.iter() {
            assert!(!key.contains('='));
        }
    }
});
