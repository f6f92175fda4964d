#![no_main]

use libfuzzer_sys::fuzz_target;
use pshenv::{Duration, TextCodec};

fuzz_target!(|data: &str| {
    // === Parsing should never panic ===
    let Ok(parsed) = Duration::unmarshal_text(data) else {
        return;
    };

    // === Whatever parses must survive its own rendering ===
    let text = parsed.marshal_text().unwrap();
    assert_eq!(Duration::unmarshal_text(&text).unwrap(), parsed);
    let _ = parsed.as_std();
});
