#![no_main]

use cborjson::{EncodeOptions, canonical, decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let options = EncodeOptions::new()
        .with_allow_duplicate_keys(true)
        .with_resolve_references(true);
    if let Ok(Some(value)) = decode::decode(data, &options) {
        // Re-encoding is stable; resolved references may nest too deep to decode again
        let bytes = encode::emit(&value);
        if let Ok(Some(again)) = decode::decode(&bytes, &EncodeOptions::new()) {
            assert_eq!(encode::emit(&again), bytes);
        }

        if let Ok(bytes) = canonical::encode(&value) {
            assert!(decode::decode(&bytes, &EncodeOptions::new().with_ctap2_canonical(true)).is_ok());
        }
    }
});
