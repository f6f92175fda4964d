#![no_main]

use libfuzzer_sys::fuzz_target;
use pshenv::codec::pem;
use pshenv::{Certificate, ClientCertificateAuthority, TextCodec};

fuzz_target!(|data: &str| {
    // === Block scanning should never panic ===
    if let Some((block, rest)) = pem::decode(data) {
        assert!(rest.len() <= data.len());
        let _ = pem::encode(&block.label, &block.contents);
    }

    // === Certificate parsing should never panic ===
    if let Ok(cert) = Certificate::unmarshal_text(data) {
        let text = cert.marshal_text().unwrap();
        assert_eq!(Certificate::unmarshal_text(&text).unwrap(), cert);
    }
    let _ = ClientCertificateAuthority::unmarshal_text(data);
});
