#![no_main]

use cborjson::{JsonOptions, NumberConversion, json};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&mode, text)) = data.split_first() else {
        return;
    };
    let mode = match mode % 5 {
        0 => NumberConversion::Full,
        1 => NumberConversion::Double,
        2 => NumberConversion::IntOrFloat,
        3 => NumberConversion::IntOrFloatFromDouble,
        _ => NumberConversion::Decimal128,
    };
    let options = JsonOptions::new().with_number_conversion(mode);

    if let Ok(value) = json::from_slice(text, &options) {
        // Anything parsed must be writable, and the output must parse again
        let written = json::to_string(&value, &options).expect("parsed JSON must be writable");
        assert!(json::from_str(&written, &options).is_ok(), "{written}");
    }
    _ = json::sequence_from_slice(text, &options);
});
