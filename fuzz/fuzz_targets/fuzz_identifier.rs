#![no_main]

use factura::core::{IdentifierType, validate_identifier};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic — errors are fine, panics are bugs.
        let _ = validate_identifier(IdentifierType::Nif, s);
        let _ = validate_identifier(IdentifierType::Cif, s);
    }
});
