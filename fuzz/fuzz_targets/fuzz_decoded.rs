#![no_main]

use libfuzzer_sys::fuzz_target;
use pshenv::decode::decode_value;
use pshenv::{Application, Relationships, Routes, Variables};

fuzz_target!(|data: &str| {
    // === Decoding arbitrary payloads should never panic ===
    let _ = decode_value::<Application>(data);
    let _ = decode_value::<Routes>(data);
    let _ = decode_value::<Variables>(data);

    if let Ok(rels) = decode_value::<Relationships>(data) {
        for (name, entries) in rels.iter() {
            for entry in entries {
                let _ = entry.url(true, true);
            }
            let _ = rels.postgresql_url(name);
            let _ = rels.mongodb_url(name);
        }
    }
});
