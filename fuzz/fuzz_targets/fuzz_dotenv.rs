#![no_main]

use libfuzzer_sys::fuzz_target;
use pshenv::MapProvider;

fuzz_target!(|data: &[u8]| {
    // === Parsing should never panic ===
    let Ok(map) = MapProvider::from_reader(data) else {
        return;
    };

    // === Rendering must parse back to the same map ===
    let text = map.to_dotenv();
    let reparsed = MapProvider::from_dotenv_str(&text).unwrap();
    assert_eq!(reparsed, map);
});
