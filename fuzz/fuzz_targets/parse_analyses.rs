#![no_main]

use libfuzzer_sys::fuzz_target;
use wavemap_core::model::parse_analyses;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_analyses(text);
    }
});
