use super::{BigDecimal, BigFloat, Kind, Number, Rational, Scaled, Special};
use crate::error::{Error, Result};
use crate::tags;
use crate::value::Value;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, ToPrimitive, Zero};

impl Number {
    /// The numeric view of a value: integers, floats and the numeric tags.
    ///
    /// A numeric tag with malformed content is [`Error::InvalidTag`]; any other
    /// value is [`Error::NotANumber`].
    pub fn from_value(value: &Value) -> Result<Number> {
        match value {
            Value::Unsigned(n) => Ok(Number::from(*n)),
            Value::Negative(n) => Ok(Number::from_negative(*n)),
            Value::Float(f) => Ok(Number::from(*f)),
            Value::Tagged(tag, content) => Self::from_tagged(*tag, content),
            _ => Err(Error::NotANumber),
        }
    }

    pub(crate) fn from_tagged(tag: u64, content: &Value) -> Result<Number> {
        match tag {
            tags::POSITIVE_BIGNUM | tags::NEGATIVE_BIGNUM => bignum(tag, content),
            tags::DECIMAL_FRACTION
            | tags::DECIMAL_FRACTION_BIG_EXPONENT
            | tags::EXTENDED_DECIMAL_FRACTION => {
                fraction::<10>(tag, content).map(|d: BigDecimal| Number(Kind::Decimal(d)))
            }
            tags::BIGFLOAT | tags::BIGFLOAT_BIG_EXPONENT | tags::EXTENDED_BIGFLOAT => {
                fraction::<2>(tag, content).map(|f: BigFloat| Number(Kind::BinaryFloat(f)))
            }
            tags::RATIONAL | tags::EXTENDED_RATIONAL => {
                rational(tag, content).map(|r| Number(Kind::Rational(r)))
            }
            _ => Err(Error::NotANumber),
        }
    }

    /// The value encoding of this number, using the numeric tags for
    /// anything a plain integer or float cannot carry.
    pub fn to_value(&self) -> Value {
        match &self.0 {
            Kind::Integer(i) => Value::from(*i),
            Kind::Double(f) => Value::Float(*f),
            Kind::BigInteger(b) => bigint_to_value(b),
            Kind::Decimal(d) => {
                fraction_to_value(tags::DECIMAL_FRACTION, tags::EXTENDED_DECIMAL_FRACTION, d)
            }
            Kind::BinaryFloat(f) => {
                fraction_to_value(tags::BIGFLOAT, tags::EXTENDED_BIGFLOAT, f)
            }
            Kind::Rational(r) => rational_to_value(r),
        }
    }
}

/// Checks the structure of a fraction or rational tag without raising.
pub fn check_fraction(tag: u64, content: &Value) -> bool {
    match tag {
        tags::DECIMAL_FRACTION
        | tags::DECIMAL_FRACTION_BIG_EXPONENT
        | tags::EXTENDED_DECIMAL_FRACTION => fraction::<10>(tag, content).is_ok(),
        tags::BIGFLOAT | tags::BIGFLOAT_BIG_EXPONENT | tags::EXTENDED_BIGFLOAT => {
            fraction::<2>(tag, content).is_ok()
        }
        tags::RATIONAL | tags::EXTENDED_RATIONAL => rational(tag, content).is_ok(),
        _ => false,
    }
}

fn invalid(tag: u64, reason: &'static str) -> Error {
    Error::InvalidTag { tag, reason }
}

fn bignum(tag: u64, content: &Value) -> Result<Number> {
    let Value::Bytes(bytes) = content else {
        return Err(invalid(tag, "bignum content must be a byte string"));
    };
    if bytes.len() <= 7 {
        // Fits comfortably in an i64 either way round
        let v = bytes.iter().fold(0i64, |acc, b| (acc << 8) | *b as i64);
        return Ok(Number::from(if tag == tags::NEGATIVE_BIGNUM { -1 - v } else { v }));
    }
    let value = BigInt::from_biguint(Sign::Plus, BigUint::from_bytes_be(bytes));
    Ok(Number::from_bigint(if tag == tags::NEGATIVE_BIGNUM {
        -1 - value
    } else {
        value
    }))
}

/// Any CBOR integer: major types 0 and 1 or a bignum.
fn integer(value: &Value) -> Option<BigInt> {
    match value {
        Value::Unsigned(n) => Some(BigInt::from(*n)),
        Value::Negative(n) => Some(-1 - BigInt::from(*n)),
        Value::Tagged(tag @ (tags::POSITIVE_BIGNUM | tags::NEGATIVE_BIGNUM), inner) => {
            match bignum(*tag, inner).ok()?.into_kind() {
                Kind::Integer(i) => Some(BigInt::from(i)),
                Kind::BigInteger(b) => Some(b),
                _ => None,
            }
        }
        _ => None,
    }
}

fn flags(tag: u64, items: &[Value]) -> Result<u64> {
    match items.get(2) {
        None => Ok(0),
        Some(Value::Unsigned(f @ 0..=7)) => Ok(*f),
        Some(_) => Err(invalid(tag, "flags must be an integer from 0 to 7")),
    }
}

fn special_for(flags: u64) -> Special {
    match flags {
        0 | 1 => Special::Finite,
        2 | 3 => Special::Infinity,
        4 | 5 => Special::QuietNan,
        _ => Special::SignalingNan,
    }
}

fn fraction<const R: u32>(tag: u64, content: &Value) -> Result<Scaled<R>> {
    let Value::Array(items) = content else {
        return Err(invalid(tag, "expected an array"));
    };
    let extended = matches!(
        tag,
        tags::EXTENDED_DECIMAL_FRACTION | tags::EXTENDED_BIGFLOAT
    );
    match (extended, items.len()) {
        (false, 2) | (true, 2 | 3) => {}
        _ => return Err(invalid(tag, "wrong number of elements")),
    }

    let exponent = match &items[0] {
        Value::Unsigned(_) | Value::Negative(_) => integer(&items[0]),
        Value::Tagged(..) if tag != tags::DECIMAL_FRACTION && tag != tags::BIGFLOAT => {
            integer(&items[0])
        }
        _ => None,
    }
    .ok_or_else(|| invalid(tag, "exponent must be an integer"))?;
    let exponent = exponent
        .to_i64()
        .ok_or(Error::ResourceExhausted("exponent out of range"))?;

    let mantissa =
        integer(&items[1]).ok_or_else(|| invalid(tag, "mantissa must be an integer"))?;
    let (sign, magnitude) = mantissa.into_parts();
    if !extended {
        return Ok(Scaled::new(sign == Sign::Minus, magnitude, exponent));
    }
    if sign == Sign::Minus {
        return Err(invalid(tag, "mantissa must not be negative"));
    }

    let flags = flags(tag, items)?;
    let negative = flags & 1 == 1;
    match special_for(flags) {
        Special::Finite => Ok(Scaled::new(negative, magnitude, exponent)),
        _ if exponent != 0 => Err(invalid(tag, "non-finite value with an exponent")),
        Special::Infinity if !magnitude.is_zero() => {
            Err(invalid(tag, "infinity with a mantissa"))
        }
        Special::Infinity => Ok(Scaled::infinity(negative)),
        special => Ok(Scaled::nan(
            negative,
            special == Special::SignalingNan,
            magnitude,
        )),
    }
}

fn rational(tag: u64, content: &Value) -> Result<Rational> {
    let Value::Array(items) = content else {
        return Err(invalid(tag, "expected an array"));
    };
    let extended = tag == tags::EXTENDED_RATIONAL;
    match (extended, items.len()) {
        (false, 2) | (true, 2 | 3) => {}
        _ => return Err(invalid(tag, "wrong number of elements")),
    }
    let numerator = integer(&items[0]).ok_or_else(|| invalid(tag, "numerator must be an integer"))?;
    let denominator =
        integer(&items[1]).ok_or_else(|| invalid(tag, "denominator must be an integer"))?;
    if denominator.sign() != Sign::Plus {
        return Err(invalid(tag, "denominator must be positive"));
    }
    if !extended {
        return Rational::new(&numerator, &denominator);
    }
    if numerator.sign() == Sign::Minus {
        return Err(invalid(tag, "numerator must not be negative"));
    }

    let flags = flags(tag, items)?;
    let negative = flags & 1 == 1;
    let (_, numerator) = numerator.into_parts();
    match special_for(flags) {
        Special::Finite => Ok(Rational::from_parts(
            negative,
            numerator,
            denominator.magnitude().clone(),
        )),
        _ if !denominator.is_one() => Err(invalid(tag, "non-finite value with a denominator")),
        Special::Infinity if !numerator.is_zero() => {
            Err(invalid(tag, "infinity with a numerator"))
        }
        Special::Infinity => Ok(Rational::infinity(negative)),
        special => Ok(Rational::nan(
            negative,
            special == Special::SignalingNan,
            numerator,
        )),
    }
}

/// A CBOR integer for `value`, using a bignum tag beyond 64 bits.
fn bigint_to_value(value: &BigInt) -> Value {
    match value.sign() {
        Sign::Minus => {
            // -1 - n
            let n = value.magnitude() - 1u8;
            match n.to_u64() {
                Some(n) => Value::Negative(n),
                None => Value::tagged(tags::NEGATIVE_BIGNUM, Value::Bytes(n.to_bytes_be())),
            }
        }
        _ => biguint_to_value(value.magnitude()),
    }
}

fn biguint_to_value(value: &BigUint) -> Value {
    match value.to_u64() {
        Some(n) => Value::Unsigned(n),
        None => Value::tagged(tags::POSITIVE_BIGNUM, Value::Bytes(value.to_bytes_be())),
    }
}

fn flags_for(negative: bool, special: Special) -> u64 {
    let base = match special {
        Special::Finite => 0,
        Special::Infinity => 2,
        Special::QuietNan => 4,
        Special::SignalingNan => 6,
    };
    base + negative as u64
}

fn fraction_to_value<const R: u32>(plain: u64, extended: u64, v: &Scaled<R>) -> Value {
    if v.is_finite() && !(v.is_zero() && v.is_negative()) {
        return Value::tagged(
            plain,
            Value::Array(vec![
                Value::from(v.exponent()),
                bigint_to_value(&v.signed_mantissa()),
            ]),
        );
    }
    Value::tagged(
        extended,
        Value::Array(vec![
            Value::from(v.exponent()),
            biguint_to_value(v.mantissa()),
            Value::from(flags_for(v.is_negative(), v.special())),
        ]),
    )
}

fn rational_to_value(r: &Rational) -> Value {
    if r.is_finite() && !(r.is_zero() && r.is_negative()) {
        let sign = if r.is_negative() { Sign::Minus } else { Sign::Plus };
        return Value::tagged(
            tags::RATIONAL,
            Value::Array(vec![
                bigint_to_value(&BigInt::from_biguint(sign, r.numerator().clone())),
                biguint_to_value(r.denominator()),
            ]),
        );
    }
    Value::tagged(
        tags::EXTENDED_RATIONAL,
        Value::Array(vec![
            biguint_to_value(r.numerator()),
            biguint_to_value(r.denominator()),
            Value::from(flags_for(r.is_negative(), r.special())),
        ]),
    )
}
