use super::canonical::*;
use super::{EncodeOptions, Error, JsonOptions, Map, Value, decode, json};
use core::cmp::Ordering;
use hex_literal::hex;

fn map(entries: &[(Value, Value)]) -> Value {
    Value::Map(entries.iter().cloned().collect())
}

/// `depth` arrays, each holding the next, around a zero.
fn nested_arrays(depth: usize) -> Value {
    (0..depth).fold(Value::from(0), |inner, _| Value::Array(vec![inner]))
}

#[test]
fn shortest_forms_without_tags() {
    assert_eq!(encode(&Value::from(500)).unwrap(), hex!("1901f4"));
    assert_eq!(encode(&Value::from(-24)).unwrap(), hex!("37"));
    assert_eq!(encode(&Value::from(1.0)).unwrap(), hex!("fb3ff0000000000000"));
    assert_eq!(encode(&Value::from(f64::NAN)).unwrap(), hex!("fb7ff8000000000000"));
    assert_eq!(
        encode(&Value::tagged(1, Value::tagged(2, Value::from("x")))).unwrap(),
        hex!("6178")
    );
    assert_eq!(encode(&Value::Undefined).unwrap(), hex!("f7"));
    assert_eq!(encode(&Value::Simple(99)).unwrap(), hex!("f863"));
}

#[test]
fn deterministic() {
    let value = map(&[
        (Value::from("name"), Value::from("x")),
        (Value::from(-3), Value::Bytes(vec![1, 2])),
        (
            Value::from(1),
            Value::Array(vec![map(&[(Value::from("z"), Value::Null)])]),
        ),
    ]);
    let first = encode(&value).unwrap();
    assert_eq!(encode(&value).unwrap(), first);
    assert_eq!(encode(&value.clone()).unwrap(), first);

    let forward: Map = (0..20)
        .map(|i| (Value::from(format!("k{i}")), Value::from(i)))
        .collect();
    let backward: Map = (0..20)
        .rev()
        .map(|i| (Value::from(format!("k{i}")), Value::from(i)))
        .collect();
    assert_eq!(
        encode(&Value::Map(forward)).unwrap(),
        encode(&Value::Map(backward)).unwrap()
    );
}

#[test]
fn key_order() {
    // Major type first, then length, then bytes
    let value = map(&[
        (Value::from("aa"), Value::from(0)),
        (Value::from("b"), Value::from(0)),
        (Value::from(-1), Value::from(0)),
        (Value::from(100), Value::from(0)),
        (Value::from(10), Value::from(0)),
        (Value::Bytes(vec![0]), Value::from(0)),
        (Value::Bool(false), Value::from(0)),
    ]);
    assert_eq!(
        encode(&value).unwrap(),
        hex!("a7 0a00 186400 2000 410000 616200 62616100 f400")
    );
}

#[test]
fn depth_limit() {
    assert!(encode(&nested_arrays(4)).is_ok());
    assert!(matches!(
        encode(&nested_arrays(5)),
        Err(Error::NestingTooDeep)
    ));

    // Maps count as levels too, keys included
    let deep_key = map(&[(nested_arrays(3), Value::Null)]);
    assert!(encode(&deep_key).is_ok());
    let too_deep_key = map(&[(nested_arrays(4), Value::Null)]);
    assert!(matches!(encode(&too_deep_key), Err(Error::NestingTooDeep)));

    // Tags are stripped and do not count
    let tagged = (0..4).fold(Value::from(0), |inner, _| {
        Value::tagged(7, Value::Array(vec![inner]))
    });
    assert!(encode(&tagged).is_ok());
}

#[test]
fn duplicates_after_tag_stripping() {
    let value = map(&[
        (Value::from(0), Value::from("a")),
        (Value::tagged(99, Value::from(0)), Value::from("b")),
    ]);
    assert!(matches!(encode(&value), Err(Error::DuplicateKey)));

    // Floats of equal value are distinct from integers
    let value = map(&[
        (Value::from(1), Value::Null),
        (Value::from(1.0), Value::Null),
    ]);
    assert!(encode(&value).is_ok());
}

#[test]
fn comparator() {
    assert_eq!(canonical_cmp(&Value::from(1), &Value::from(-1)), Ordering::Less);
    assert_eq!(
        canonical_cmp(&Value::from(1000), &Value::from(24)),
        Ordering::Greater
    );
    assert_eq!(
        canonical_cmp(&Value::Bytes(vec![2]), &Value::Bytes(vec![1, 0])),
        Ordering::Greater
    );
    assert_eq!(
        canonical_cmp(&Value::from("b"), &Value::from("aa")),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp(&Value::tagged(5, Value::from("a")), &Value::from("a")),
        Ordering::Equal
    );
    assert_eq!(
        canonical_cmp(&Value::Null, &Value::Array(Vec::new())),
        Ordering::Greater
    );

    // No depth limit when ordering
    assert_eq!(
        canonical_cmp(&nested_arrays(10), &nested_arrays(10)),
        Ordering::Equal
    );
}

#[test]
fn sorted_keys_end_to_end() {
    let b_first = map(&[
        (Value::from("b"), Value::from(2)),
        (Value::from("a"), Value::from(1)),
    ]);
    let a_first = map(&[
        (Value::from("a"), Value::from(1)),
        (Value::from("b"), Value::from(2)),
    ]);
    let data = encode(&b_first).unwrap();
    assert_eq!(data, encode(&a_first).unwrap());
    assert_eq!(data, hex!("a2616101616202"));

    let decoded = decode::decode(&data, &EncodeOptions::new().with_ctap2_canonical(true))
        .unwrap()
        .unwrap();
    assert_eq!(
        json::to_string(&decoded, &JsonOptions::new()).unwrap(),
        r#"{"a":1,"b":2}"#
    );
}
