use super::json::*;
use super::{
    EncodeOptions, Error, JsonOptions, Map, Number, NumberConversion, Value, decode, encode,
};
use test_case::test_case;

fn options(mode: NumberConversion) -> JsonOptions {
    JsonOptions::new().with_number_conversion(mode)
}

fn parse(text: &str) -> Value {
    from_str(text, &JsonOptions::new()).unwrap()
}

fn write(value: &Value) -> String {
    to_string(value, &JsonOptions::new()).unwrap()
}

fn number(text: &str, mode: NumberConversion) -> Value {
    parse_number_str(text, 0, text.len(), &options(mode))
        .unwrap()
        .unwrap()
}

fn object(entries: &[(&str, Value)]) -> Value {
    entries
        .iter()
        .map(|(k, v)| (Value::from(*k), v.clone()))
        .collect()
}

const ALL_MODES: [NumberConversion; 5] = [
    NumberConversion::Full,
    NumberConversion::Double,
    NumberConversion::IntOrFloat,
    NumberConversion::IntOrFloatFromDouble,
    NumberConversion::Decimal128,
];

#[test]
fn values() {
    assert_eq!(
        parse(r#" {"a": [1, -2, true, false, null, "x"], "b": {}} "#),
        object(&[
            (
                "a",
                Value::Array(vec![
                    Value::from(1),
                    Value::from(-2),
                    Value::Bool(true),
                    Value::Bool(false),
                    Value::Null,
                    Value::from("x"),
                ])
            ),
            ("b", Value::Map(Map::new())),
        ])
    );
    assert_eq!(parse("[]"), Value::Array(Vec::new()));
    assert_eq!(parse("\t\r\n 7 "), Value::from(7));
    assert_eq!(
        parse(r#""\"\\\/\b\f\n\r\tAé😀""#),
        Value::from("\"\\/\u{8}\u{c}\n\r\tAé😀")
    );
}

#[test]
fn sources_agree() {
    let text = r#"{"k€y": [1.5, "😀", -0, 123456789012345678901234567890]}"#;
    let expected = parse(text);
    let units: Vec<u16> = text.encode_utf16().collect();
    assert_eq!(from_utf16(&units, &JsonOptions::new()).unwrap(), expected);
    assert_eq!(from_slice(text.as_bytes(), &JsonOptions::new()).unwrap(), expected);
    assert_eq!(
        from_reader(text.as_bytes(), &JsonOptions::new()).unwrap(),
        expected
    );
}

#[test_case("0.1", NumberConversion::Double, Value::Float(0.1))]
#[test_case("0.1", NumberConversion::IntOrFloat, Value::Float(0.1))]
#[test_case("0.1", NumberConversion::IntOrFloatFromDouble, Value::Float(0.1))]
#[test_case("2.50", NumberConversion::IntOrFloat, Value::Float(2.5))]
#[test_case("2.0", NumberConversion::IntOrFloat, Value::from(2))]
#[test_case("9007199254740993", NumberConversion::IntOrFloat, Value::Float(9007199254740992.0))]
#[test_case("1e2", NumberConversion::IntOrFloatFromDouble, Value::from(100))]
#[test_case("-1.5", NumberConversion::Full, Value::tagged(4, Value::Array(vec![Value::from(-1), Value::from(-15)])))]
#[test_case("123", NumberConversion::Full, Value::from(123))]
#[test_case("123", NumberConversion::Double, Value::Float(123.0))]
#[test_case("18446744073709551616", NumberConversion::Full, Value::tagged(2, Value::Bytes(vec![1, 0, 0, 0, 0, 0, 0, 0, 0])))]
#[test_case("1e400", NumberConversion::Double, Value::Float(f64::INFINITY))]
fn conversion_modes(text: &str, mode: NumberConversion, expected: Value) {
    assert_eq!(number(text, mode), expected);
}

#[test]
fn one_tenth() {
    let full = Number::from_value(&number("0.1", NumberConversion::Full)).unwrap();
    let tenth = Number::from(1).divide(&Number::from(10)).unwrap();
    assert_eq!(full, tenth);
    assert!(matches!(full.kind(), super::Kind::Decimal(_)));

    let decimal128 = Number::from_value(&number("0.1", NumberConversion::Decimal128)).unwrap();
    assert_eq!(decimal128, tenth);

    assert_ne!(Number::from(0.1), tenth);
    assert_eq!(number("0.1", NumberConversion::Double), Value::Float(0.1));
}

#[test]
fn small_integers_in_every_mode() {
    for mode in ALL_MODES {
        assert_eq!(number("12", mode), Value::from(12), "{mode}");
        assert_eq!(number("0", mode), Value::from(0), "{mode}");
        assert_eq!(number("-7", mode), Value::from(-7), "{mode}");
    }
}

#[test]
fn digit_count_does_not_change_the_number() {
    for mode in ALL_MODES {
        for (short, long) in [
            ("7", "7.0"),
            ("-5", "-5e0"),
            ("12", "1.2e1"),
            ("-9", "-900e-2"),
        ] {
            assert_eq!(
                Number::from_value(&number(short, mode)).unwrap(),
                Number::from_value(&number(long, mode)).unwrap(),
                "{short} vs {long} under {mode}"
            );
        }
    }

    // The integer modes give plain integers whatever the digit count
    for mode in [
        NumberConversion::Full,
        NumberConversion::IntOrFloat,
        NumberConversion::IntOrFloatFromDouble,
    ] {
        assert_eq!(number("5", mode), Value::from(5));
        assert_eq!(number("500", mode), Value::from(500));
        assert_eq!(number("-5", mode), Value::from(-5));
        assert_eq!(number("-500", mode), Value::from(-500));
    }
}

#[test]
fn negative_zero() {
    let keep = JsonOptions::new().with_number_conversion(NumberConversion::Double);
    let v = from_str("-0", &keep).unwrap();
    assert!(matches!(v, Value::Float(f) if f == 0.0 && f.is_sign_negative()));

    for mode in ALL_MODES {
        let drop = options(mode).with_preserve_negative_zero(false);
        let v = from_str("-0", &drop).unwrap();
        let n = Number::from_value(&v).unwrap();
        assert!(n.is_zero() && !n.is_negative(), "{mode}: {v:?}");
        let v = from_str("-0.0", &drop).unwrap();
        assert!(!Number::from_value(&v).unwrap().is_negative(), "{mode}: {v:?}");
    }

    let v = from_str("-0", &JsonOptions::new()).unwrap();
    assert!(Number::from_value(&v).unwrap().is_negative());
    let v = from_str("-0", &options(NumberConversion::Decimal128)).unwrap();
    assert_eq!(v.outermost_tag(), Some(268));
}

#[test]
fn number_literals() {
    let opts = JsonOptions::new();
    for bad in ["", "-", "01", "1.", ".5", "1e", "1e+", "+1", "0x10", "1 ", "١"] {
        assert_eq!(
            parse_number_str(bad, 0, bad.len(), &opts).unwrap(),
            None,
            "{bad:?}"
        );
    }
    assert!(matches!(
        parse_number_bytes(b"12", 1, 2, &opts),
        Err(Error::OutOfRange { offset: 1, count: 2, len: 2 })
    ));
    assert_eq!(
        parse_number_bytes(b"x-12.5e-1y", 1, 8, &options(NumberConversion::Double)).unwrap(),
        Some(Value::Float(-1.25))
    );
}

#[test_case(r#"{"a":1,}"#; "trailing comma in object")]
#[test_case("[1,]"; "trailing comma in array")]
#[test_case("[1,,2]"; "empty element")]
#[test_case(r#"{"a"}"#; "missing colon")]
#[test_case(r#"{1:2}"#; "non-string key")]
#[test_case(r#""\uD800""#; "lone high surrogate")]
#[test_case(r#""\uD800A""#; "high surrogate then non-surrogate")]
#[test_case(r#""\uDC00""#; "lone low surrogate")]
#[test_case("\"a\u{1}b\""; "raw control character")]
#[test_case(r#""\x""#; "unknown escape")]
#[test_case("[1] 2"; "trailing data")]
#[test_case("tru"; "short literal")]
#[test_case("nul1"; "bad literal")]
#[test_case("\u{c}1"; "form feed is not whitespace")]
#[test_case("-"; "bare minus")]
#[test_case("01"; "leading zero")]
#[test_case(""; "empty")]
fn rejected(text: &str) {
    assert!(from_str(text, &JsonOptions::new()).is_err());
}

#[test]
fn duplicate_keys() {
    let text = r#"{"a":1,"a":2}"#;
    assert!(matches!(
        from_str(text, &JsonOptions::new()),
        Err(Error::DuplicateKey)
    ));
    let allowed = JsonOptions::new().with_allow_duplicate_keys(true);
    assert_eq!(
        from_str(text, &allowed).unwrap(),
        object(&[("a", Value::from(2))])
    );
}

#[test]
fn nesting_limit() {
    let nested = |depth: usize| format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    assert!(from_str(&nested(MAX_NESTING), &JsonOptions::new()).is_ok());
    assert!(matches!(
        from_str(&nested(MAX_NESTING + 1), &JsonOptions::new()),
        Err(Error::NestingTooDeep)
    ));
}

#[test]
fn error_offsets() {
    assert!(matches!(
        from_str("[1, x]", &JsonOptions::new()),
        Err(Error::Syntax { offset: 4, .. })
    ));
    assert!(matches!(
        from_slice(b"[\"\xff\"]", &JsonOptions::new()),
        Err(Error::InvalidUtf8(2))
    ));
    let units: Vec<u16> = "[\"€\", 1".encode_utf16().collect();
    assert!(matches!(
        from_utf16(&units, &JsonOptions::new()),
        Err(Error::Syntax { offset: 7, .. })
    ));
    assert!(matches!(
        from_str("1e99999999999999999999", &JsonOptions::new()),
        Err(Error::ResourceExhausted(_))
    ));
}

#[test]
fn text_sequences() {
    let opts = JsonOptions::new();
    assert_eq!(
        sequence_from_slice(b"\x1e1 \x1e{\"a\":2}\n\x1e[1,", &opts).unwrap(),
        vec![
            Some(Value::from(1)),
            Some(object(&[("a", Value::from(2))])),
            None
        ]
    );

    // A number running into the end may have lost digits
    assert_eq!(
        sequence_from_slice(b"\x1e\"x\"\x1e123", &opts).unwrap(),
        vec![Some(Value::from("x")), None]
    );

    // Empty records are skipped
    assert_eq!(
        sequence_from_slice(b"\x1e\x1e\n\x1etrue\n", &opts).unwrap(),
        vec![Some(Value::Bool(true))]
    );
    assert_eq!(sequence_from_slice(b"", &opts).unwrap(), Vec::new());

    // A number must be followed by whitespace before the next separator
    assert!(sequence_from_slice(b"\x1e1\x1e2\n", &opts).is_err());
    // Texts need a leading separator
    assert!(sequence_from_slice(b"1\n", &opts).is_err());
    // Garbage inside a record is still an error
    assert!(sequence_from_slice(b"\x1e[1 2]\n", &opts).is_err());

    assert_eq!(
        sequence_from_reader(&b"\x1e{}\n\x1e[]\n"[..], &opts).unwrap(),
        vec![
            Some(Value::Map(Map::new())),
            Some(Value::Array(Vec::new()))
        ]
    );
}

#[test]
fn writer_scalars() {
    assert_eq!(write(&Value::from(-17)), "-17");
    assert_eq!(write(&Value::Negative(u64::MAX)), "-18446744073709551616");
    assert_eq!(write(&Value::from(u64::MAX)), "18446744073709551615");
    assert_eq!(write(&Value::from(1.5)), "1.5");
    assert_eq!(write(&Value::from(1e21)), "1e+21");
    assert_eq!(write(&Value::from(0.000001)), "0.000001");
    assert_eq!(write(&Value::from(-0.0)), "-0");
    for null in [
        Value::Null,
        Value::Undefined,
        Value::Simple(16),
        Value::from(f64::NAN),
        Value::from(f64::NEG_INFINITY),
    ] {
        assert_eq!(write(&null), "null");
    }
}

#[test]
fn writer_strings() {
    assert_eq!(
        write(&Value::from("\"\\/\u{8}\u{c}\n\r\t\u{1}\u{1f}")),
        r#""\"\\/\b\f\n\r\t\u0001\u001F""#
    );
    assert_eq!(
        write(&Value::from("\u{7f}\u{85}\u{a0}\u{a1}")),
        "\"\\u007F\\u0085\\u00A0\u{a1}\""
    );
    assert_eq!(
        write(&Value::from("a\u{2028}b\u{2029}\u{feff}\u{fffe}\u{ffff}é😀")),
        "\"a\\u2028b\\u2029\\uFEFF\\uFFFE\\uFFFFé😀\""
    );

    let lone = [0x61, 0xD800, 0x62];
    let mut s = String::new();
    assert!(matches!(
        write_utf16_string(&lone, &mut s, &JsonOptions::new()),
        Err(Error::UnpairedSurrogate)
    ));
    let mut s = String::new();
    write_utf16_string(&lone, &mut s, &JsonOptions::new().with_replace_surrogates(true)).unwrap();
    assert_eq!(s, "\"a\u{fffd}b\"");
    let mut s = String::new();
    let units: Vec<u16> = "😀\n".encode_utf16().collect();
    write_utf16_string(&units, &mut s, &JsonOptions::new()).unwrap();
    assert_eq!(s, "\"😀\\n\"");
}

#[test]
fn writer_bytes() {
    let data = vec![0xfb, 0xff];
    assert_eq!(write(&Value::Bytes(data.clone())), r#""-_8""#);
    assert_eq!(write(&Value::tagged(21, Value::Bytes(data.clone()))), r#""-_8""#);
    assert_eq!(write(&Value::tagged(22, Value::Bytes(data.clone()))), r#""+/8=""#);
    assert_eq!(write(&Value::tagged(23, Value::Bytes(data))), r#""FBFF""#);
    assert_eq!(write(&Value::Bytes(Vec::new())), r#""""#);
}

#[test]
fn writer_numeric_tags() {
    let fraction = Value::tagged(4, Value::Array(vec![Value::from(-2), Value::from(27315)]));
    assert_eq!(write(&fraction), "273.15");
    let bigfloat = Value::tagged(5, Value::Array(vec![Value::from(-1), Value::from(3)]));
    assert_eq!(write(&bigfloat), "1.5");
    let bignum = Value::tagged(2, Value::Bytes(vec![1, 0, 0, 0, 0, 0, 0, 0, 0]));
    assert_eq!(write(&bignum), "18446744073709551616");
    let third = Value::tagged(30, Value::Array(vec![Value::from(1), Value::from(3)]));
    assert_eq!(write(&third), "0.3333333333333333333333333333333333");
    let infinity = Value::tagged(
        268,
        Value::Array(vec![Value::from(0), Value::from(0), Value::from(2)]),
    );
    assert_eq!(write(&infinity), "null");

    // Binary fractions too large to expand in base 10 have no JSON number
    let huge = Value::tagged(
        5,
        Value::Array(vec![Value::from(4_000_000_000_000u64), Value::from(1)]),
    );
    assert_eq!(write(&huge), "null");
    let wrapped = Value::Array(vec![huge, Value::from(1)]);
    assert_eq!(write(&wrapped), "[null,1]");
    assert_eq!(
        parse(&write(&wrapped)),
        Value::Array(vec![Value::Null, Value::from(1)])
    );

    // Malformed numeric content is written as the data it is
    let malformed = Value::tagged(4, Value::from("x"));
    assert_eq!(write(&malformed), r#""x""#);
}

#[test]
fn writer_keys() {
    let mut map = Map::new();
    map.insert(Value::from(1), Value::from("a"));
    map.insert(Value::Array(vec![Value::from(1), Value::from(2)]), Value::Null);
    map.insert(Value::tagged(32, Value::from("k")), Value::Bool(true));
    assert_eq!(
        write(&Value::Map(map)),
        r#"{"1":"a","[1,2]":null,"k":true}"#
    );

    let mut map = Map::new();
    map.insert(Value::from(1), Value::from("a"));
    map.insert(Value::from("1"), Value::from("b"));
    assert!(matches!(
        to_string(&Value::Map(map), &JsonOptions::new()),
        Err(Error::DuplicateKey)
    ));
}

#[test]
fn writer_depth() {
    let nested = |depth: usize| {
        (0..depth).fold(Value::Null, |inner, _| Value::Array(vec![inner]))
    };
    assert!(to_string(&nested(MAX_NESTING), &JsonOptions::new()).is_ok());
    assert!(matches!(
        to_string(&nested(MAX_NESTING + 1), &JsonOptions::new()),
        Err(Error::NestingTooDeep)
    ));
}

#[test]
fn writer_sinks() {
    let value = object(&[("a", Value::Array(vec![Value::from(1), Value::from("é")]))]);
    let mut out = Vec::new();
    to_writer(&value, &mut out, &JsonOptions::new()).unwrap();
    assert_eq!(out, r#"{"a":[1,"é"]}"#.as_bytes());

    let mut s = String::from("x=");
    write_value(&value, &mut s, &JsonOptions::new()).unwrap();
    assert_eq!(s, r#"x={"a":[1,"é"]}"#);

    let mut s = String::new();
    write_base64(&mut s, b"hello", 1, 3, true, true).unwrap();
    assert_eq!(s, "ZWxs");
}

fn sample() -> Value {
    object(&[
        ("int", Value::from(-42)),
        ("big", Value::from(9007199254740991u64)),
        ("float", Value::from(-0.25)),
        ("text", Value::from("line\nbreak \u{2028} 😀")),
        ("flags", Value::Array(vec![Value::Bool(true), Value::Null])),
        ("nested", object(&[("empty", Value::Array(Vec::new()))])),
    ])
}

#[test]
fn json_round_trip() {
    let opts = options(NumberConversion::IntOrFloat);
    let value = sample();
    let text = to_string(&value, &opts).unwrap();
    assert_eq!(from_str(&text, &opts).unwrap(), value);

    // Insertion order is not part of map identity
    let reordered: Value = match &value {
        Value::Map(m) => Value::Map(m.iter().rev().cloned().collect()),
        _ => unreachable!(),
    };
    assert_eq!(from_str(&text, &opts).unwrap(), reordered);
}

#[test]
fn cbor_round_trip() {
    let mut value = sample();
    if let Value::Map(m) = &mut value {
        m.insert(Value::from(7), Value::Bytes(vec![0, 1, 2]));
        m.insert(
            Value::Bytes(vec![9]),
            Value::tagged(1, Value::from(1363896240.5)),
        );
        m.insert(Value::from("undefined"), Value::Undefined);
        m.insert(Value::from("simple"), Value::Simple(99));
        m.insert(
            Value::from("bignum"),
            Number::from(u64::MAX).add(&Number::from(1)).unwrap().to_value(),
        );
        m.insert(
            Value::from("third"),
            Number::from(1).divide(&Number::from(3)).unwrap().to_value(),
        );
    }
    let data = encode::emit(&value);
    let decoded = decode::decode(&data, &EncodeOptions::new()).unwrap().unwrap();
    assert_eq!(decoded, value);

    let indefinite = EncodeOptions::new().with_use_indef_length_strings(true);
    let data = encode::emit_with_options(&value, &indefinite).unwrap();
    assert_eq!(
        decode::decode(&data, &EncodeOptions::new()).unwrap().unwrap(),
        value
    );
}

#[test]
fn cbor_to_json() {
    let data = encode::emit(&object(&[
        ("id", Value::tagged(23, Value::Bytes(vec![0xde, 0xad]))),
        ("n", Value::from(1.5)),
    ]));
    let value = decode::decode(&data, &EncodeOptions::new()).unwrap().unwrap();
    assert_eq!(write(&value), r#"{"id":"DEAD","n":1.5}"#);
}
