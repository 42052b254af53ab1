#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The pipeline takes UTF-8 text; other byte strings are not inputs
    if let Ok(s) = std::str::from_utf8(data) {
        let hovers = hovermark::analyze(s, &[]);
        for hover in &hovers {
            assert!(hover.range.start < hover.range.end && hover.range.end <= s.len());
        }
    }
});
