use super::number::{BigDecimal, BigFloat, Rational};
use super::{Error, Kind, Number, Value};
use core::cmp::Ordering;
use num_bigint::{BigInt, BigUint};
use test_case::test_case;

fn num(s: &str) -> Number {
    s.parse().unwrap()
}

fn third() -> Number {
    Number::from(Rational::new(&BigInt::from(1), &BigInt::from(3)).unwrap())
}

#[test]
fn integer_overflow_promotes() {
    let sum = Number::from(i64::MAX).add(&Number::from(1)).unwrap();
    assert!(matches!(sum.kind(), Kind::BigInteger(_)));
    assert_eq!(sum.to_big_integer().unwrap(), BigInt::from(i64::MAX) + 1);
    assert!(!sum.is_negative());

    let product = Number::from(i64::MIN).multiply(&Number::from(-1)).unwrap();
    assert_eq!(product, sum);
    assert_eq!(Number::from(i64::MIN).negate(), sum);

    // Results that fit narrow back to a plain integer
    let back = sum.subtract(&Number::from(1)).unwrap();
    assert!(matches!(back.kind(), Kind::Integer(i64::MAX)));
}

#[test]
fn integer_division_is_exact() {
    let q = Number::from(1).divide(&Number::from(3)).unwrap();
    let Kind::Rational(r) = q.kind() else {
        panic!("expected a rational, got {q:?}");
    };
    assert_eq!(r.numerator(), &BigUint::from(1u8));
    assert_eq!(r.denominator(), &BigUint::from(3u8));
    assert_eq!(q, third());

    let q = Number::from(6).divide(&Number::from(3)).unwrap();
    assert!(matches!(q.kind(), Kind::Integer(2)));

    let q = Number::from(1).divide(&Number::from(8)).unwrap();
    assert_eq!(q, num("0.125"));
}

#[test]
fn division_at_the_integer_boundary() {
    let q = Number::from(i64::MIN).divide(&Number::from(-1)).unwrap();
    assert!(matches!(q.kind(), Kind::BigInteger(_)));
    assert_eq!(q.to_big_integer().unwrap(), BigInt::from(1u64 << 63));

    let q = Number::from(i64::MIN).divide(&Number::from(2)).unwrap();
    assert!(matches!(q.kind(), Kind::Integer(-4611686018427387904)));

    let r = Number::from(i64::MIN).remainder(&Number::from(-1)).unwrap();
    assert!(matches!(r.kind(), Kind::Integer(0)));
}

#[test]
fn division_by_zero() {
    let inf = Number::from(5).divide(&Number::from(0)).unwrap();
    assert!(matches!(inf.kind(), Kind::Double(f) if *f == f64::INFINITY));
    let neg = Number::from(-5).divide(&Number::from(0)).unwrap();
    assert!(neg.is_infinite() && neg.is_negative());
    assert!(Number::from(0).divide(&Number::from(0)).unwrap().is_nan());
    assert!(Number::from(7).remainder(&Number::from(0)).unwrap().is_nan());
}

#[test_case(Number::from(2), Number::from(2.5), Number::from(BigFloat::from_f64(4.5)); "integer and double")]
#[test_case(Number::from(2), num("0.5"), num("2.5"); "integer and decimal")]
#[test_case(num("0.5"), third(), Number::from(Rational::new(&BigInt::from(5), &BigInt::from(6)).unwrap()); "decimal and rational")]
fn promotion(a: Number, b: Number, expected: Number) {
    let sum = a.add(&b).unwrap();
    assert_eq!(
        core::mem::discriminant(sum.kind()),
        core::mem::discriminant(expected.kind())
    );
    assert_eq!(sum, expected);
}

#[test]
fn cross_kind_equality() {
    let half = [
        Number::from(0.5),
        num("0.5"),
        num("5e-1"),
        Number::from(BigFloat::from_f64(0.5)),
        Number::from(1).divide(&Number::from(2)).unwrap(),
    ];
    for a in &half {
        for b in &half {
            assert_eq!(a.compare(b), Ordering::Equal, "{a:?} vs {b:?}");
        }
    }

    let three = [
        Number::from(3),
        num("3.00"),
        Number::from(3.0),
        Number::from(BigInt::from(3)),
        Number::from(Rational::new(&BigInt::from(9), &BigInt::from(3)).unwrap()),
    ];
    for a in &three {
        for b in &three {
            assert_eq!(a, b);
        }
    }
}

#[test]
fn total_order() {
    let mut values = vec![
        Number::from(f64::NAN),
        num("1e400"),
        Number::from(2),
        third(),
        num("-0.5"),
        Number::from(f64::NEG_INFINITY),
        Number::from(0.25),
    ];
    values.sort();
    let rendered: Vec<String> = values.iter().map(|n| n.to_string()).collect();
    assert_eq!(
        rendered,
        ["-Infinity", "-0.5", "0.25", "1/3", "2", "1E+400", "NaN"]
    );

    // -0 and 0 compare equal, NaN equals itself
    assert_eq!(Number::from(-0.0), Number::from(0));
    assert_eq!(Number::from(f64::NAN), Number::from(f64::NAN));
}

#[test]
fn order_past_expansion_limits() {
    // 2^4000000000000 as it arrives on the wire: 5([4000000000000, 1])
    let two_pow = Number::from_value(&Value::tagged(
        5,
        Value::Array(vec![Value::from(4_000_000_000_000u64), Value::from(1)]),
    ))
    .unwrap();
    assert!(matches!(two_pow.kind(), Kind::BinaryFloat(_)));
    assert_eq!(
        two_pow,
        Number::from(BigFloat::new(false, BigUint::from(1u8), 4_000_000_000_000))
    );

    let three_times = Number::from(BigFloat::new(false, BigUint::from(3u8), 4_000_000_000_000));
    let ten_pow = Number::from(BigDecimal::new(false, BigUint::from(1u8), 5_000_000_000_000));
    let tiny = Number::from(BigDecimal::new(false, BigUint::from(1u8), -5_000_000_000_000));
    assert!(two_pow < three_times);
    assert!(three_times < ten_pow);
    assert_ne!(two_pow, ten_pow);
    assert!(tiny < Number::from(1) && tiny > Number::from(0));
    assert!(ten_pow.negate() < two_pow.negate());
    assert!(ten_pow > Number::from(f64::MAX));

    // Nearly the same size in different radixes: never equal, and
    // consistent in both directions
    let near = Number::from(BigFloat::new(false, BigUint::from(1u8), 3_321_928_094_887));
    let power = Number::from(BigDecimal::new(false, BigUint::from(1u8), 1_000_000_000_000));
    assert_ne!(near.compare(&power), Ordering::Equal);
    assert_eq!(near.compare(&power), power.compare(&near).reverse());

    let mut values = vec![
        ten_pow.clone(),
        Number::from(1),
        three_times.clone(),
        tiny.clone(),
        two_pow.clone(),
        ten_pow.negate(),
    ];
    values.sort();
    assert_eq!(
        values,
        [ten_pow.negate(), tiny, Number::from(1), two_pow, three_times, ten_pow]
    );
}

#[test_case(Number::from(300), Ok(44), Err(()); "wraps")]
#[test_case(num("-1.75"), Ok(-1i8 as u8), Err(()); "truncates")]
#[test_case(Number::from(255), Ok(255), Ok(255); "in range")]
fn narrowing(n: Number, unchecked: Result<u8, ()>, checked: Result<u8, ()>) {
    assert_eq!(Ok(n.to_u8_unchecked()), unchecked);
    assert_eq!(n.to_u8_checked().map_err(|_| ()), checked);
}

#[test]
fn exact_conversions() {
    assert!(matches!(num("2.5").to_i32_if_exact(), Err(Error::NotExact("i32"))));
    assert_eq!(num("2.0").to_i32_if_exact().unwrap(), 2);
    assert!(matches!(
        Number::from(1e20).to_i64_checked(),
        Err(Error::Overflow("i64"))
    ));
    assert!(Number::from(f64::INFINITY).to_i64_checked().is_err());
    assert_eq!(Number::from(f64::NAN).to_i32_unchecked(), 0);
    assert_eq!(num("-2.9").to_i16_checked().unwrap(), -2);
    assert!(Number::from(0.1).can_fit_in_f64());
    assert!(!num("0.1").can_fit_in_f64());
    assert!(Number::from(0.5).can_fit_in_f32());
    assert!(!Number::from(0.1).can_fit_in_f32());
}

#[test]
fn value_views() {
    let bignum = Value::tagged(2, Value::Bytes(vec![1, 0, 0, 0, 0, 0, 0, 0, 0]));
    assert!(bignum.is_number());
    assert_eq!(
        bignum.to_number().unwrap(),
        Number::from(u64::MAX).add(&Number::from(1)).unwrap()
    );

    let fraction = Value::tagged(4, Value::Array(vec![Value::from(-2), Value::from(27315)]));
    assert_eq!(fraction.to_number().unwrap(), num("273.15"));
    assert_eq!(num("273.15").to_value(), fraction);

    assert!(!Value::from("12").is_number());
    assert!(matches!(Value::Null.to_number(), Err(Error::NotANumber)));

    // Negative zero and the specials need the extended tags
    let minus_zero = Number::from(BigDecimal::zero(true)).to_value();
    assert_eq!(minus_zero.outermost_tag(), Some(268));
    assert!(Number::from_value(&minus_zero).unwrap().is_negative());
    let inf = Number::from(Rational::infinity(true)).to_value();
    assert_eq!(inf.outermost_tag(), Some(270));
    assert!(Number::from_value(&inf).unwrap().is_infinite());
}

#[test]
fn display() {
    assert_eq!(Number::from(-17).to_string(), "-17");
    assert_eq!(Number::from(0.1).to_string(), "0.1");
    assert_eq!(Number::from(1e21).to_string(), "1e+21");
    assert_eq!(Number::from(1.5e-7).to_string(), "1.5e-7");
    assert_eq!(Number::from(-0.0).to_string(), "-0");
    assert_eq!(num("12.50").to_string(), "12.50");
    assert_eq!(num("Infinity").to_string(), "Infinity");
    assert!(matches!("1.".parse::<Number>(), Err(Error::Syntax { .. })));
}
