/*!
CTAP2 canonical CBOR.

The canonical form drops every tag, writes floats in their full 8-byte form,
orders map entries by their encoded keys and allows arrays and maps to nest
at most four levels deep (levels 0 to 3).
*/

use super::encode::Encoder;
use super::error::{Error, Result};
use super::value::Value;
use core::cmp::Ordering;

/// Deepest level at which an array or map may appear.
const MAX_CONTAINER_DEPTH: usize = 3;

/// Encodes `value` in CTAP2 canonical form.
///
/// Fails with [`Error::NestingTooDeep`] for containers below level 3 and with
/// [`Error::DuplicateKey`] when two map keys share a canonical encoding.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new();
    emit(&mut encoder, value, 0, true)?;
    let data = encoder.build();
    tracing::trace!(len = data.len(), "Encoded canonical CBOR");
    Ok(data)
}

/// Orders two values the way canonical map keys are ordered.
///
/// Values rank by major type once their tags are stripped, byte strings
/// compare their raw bytes and everything else compares its canonical
/// encoding. Depth and duplicate-key limits do not apply here.
pub fn canonical_cmp(a: &Value, b: &Value) -> Ordering {
    let (a, b) = (a.untagged(), b.untagged());
    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
        _ => lenient(a).cmp(&lenient(b)),
    })
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Unsigned(_) => 0,
        Value::Negative(_) => 1,
        Value::Bytes(_) => 2,
        Value::Text(_) => 3,
        Value::Array(_) => 4,
        Value::Map(_) => 5,
        Value::Tagged(..) => 6,
        _ => 7,
    }
}

fn lenient(value: &Value) -> Vec<u8> {
    let mut encoder = Encoder::new();
    // Only the strict checks can fail
    let _ = emit(&mut encoder, value, 0, false);
    encoder.build()
}

fn key_order(a: &[u8], b: &[u8]) -> Ordering {
    let major = |k: &[u8]| k.first().map_or(0, |b| b >> 5);
    major(a)
        .cmp(&major(b))
        .then(a.len().cmp(&b.len()))
        .then_with(|| a.cmp(b))
}

fn emit(encoder: &mut Encoder, value: &Value, depth: usize, strict: bool) -> Result<()> {
    let value = value.untagged();
    match value {
        Value::Array(_) | Value::Map(_) if strict && depth > MAX_CONTAINER_DEPTH => {
            return Err(Error::NestingTooDeep);
        }
        Value::Float(f) => encoder.emit_f64_full(*f),
        Value::Text(s) => {
            encoder.emit_uint_minor(3, s.len() as u64);
            encoder.emit_raw_slice(s.as_bytes());
        }
        Value::Array(items) => {
            encoder.emit_uint_minor(4, items.len() as u64);
            for item in items {
                emit(encoder, item, depth + 1, strict)?;
            }
        }
        Value::Map(entries) => {
            let mut pairs = entries
                .iter()
                .map(|(k, v)| {
                    let mut key = Encoder::new();
                    emit(&mut key, k, depth + 1, strict)?;
                    let mut val = Encoder::new();
                    emit(&mut val, v, depth + 1, strict)?;
                    Ok((key.build(), val.build()))
                })
                .collect::<Result<Vec<_>>>()?;
            pairs.sort_by(|(a, _), (b, _)| key_order(a, b));
            if strict && pairs.windows(2).any(|w| w[0].0 == w[1].0) {
                return Err(Error::DuplicateKey);
            }

            encoder.emit_uint_minor(5, pairs.len() as u64);
            for (k, v) in &pairs {
                encoder.emit_raw_slice(k);
                encoder.emit_raw_slice(v);
            }
        }
        // Integers, byte strings and simple values have a single definite form
        _ => encoder.emit(value),
    }
    Ok(())
}
