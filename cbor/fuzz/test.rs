#![cfg(test)]

use cborjson::{EncodeOptions, JsonOptions, decode, json};
use std::io::Read;

fn replay(corpus: &str, f: impl Fn(&[u8])) {
    match std::fs::read_dir(corpus) {
        Err(e) => {
            eprintln!(
                "Failed to open dir: {e}, curr dir: {}",
                std::env::current_dir().unwrap().to_string_lossy()
            );
        }
        Ok(dir) => {
            for entry in dir.flatten() {
                let path = entry.path();
                if path.is_file()
                    && let Ok(mut file) = std::fs::File::open(&path)
                {
                    let mut buffer = Vec::new();
                    if file.read_to_end(&mut buffer).is_ok() {
                        f(&buffer);
                    }
                }
            }
        }
    }
}

#[test]
fn test_decode() {
    replay("./corpus/decode", |data| {
        if let Ok(value) = decode::decode(data, &EncodeOptions::new().with_resolve_references(true)) {
            _ = format!("{value:?}");
        }
    });
}

#[test]
fn test_json() {
    replay("./corpus/json", |data| {
        if let Some((_, text)) = data.split_first()
            && let Ok(value) = json::from_slice(text, &JsonOptions::new())
        {
            _ = json::to_string(&value, &JsonOptions::new());
        }
    });
}
