/*!
Well-known CBOR tag numbers and their structural checks.

Only the shape of tag content is validated here (a date string is text, a
bignum is a byte string, a fraction is a two or three element array of
integers); the meaning of the content is not interpreted.
*/

use super::error::{Error, Result};
use super::number::{self, Number};
use super::value::Value;

/// Standard date/time string.
pub const DATE_TIME: u64 = 0;
/// Epoch-based date/time.
pub const EPOCH_DATE_TIME: u64 = 1;
pub const POSITIVE_BIGNUM: u64 = 2;
pub const NEGATIVE_BIGNUM: u64 = 3;
/// `[exponent, mantissa]` with value `mantissa * 10^exponent`.
pub const DECIMAL_FRACTION: u64 = 4;
/// `[exponent, mantissa]` with value `mantissa * 2^exponent`.
pub const BIGFLOAT: u64 = 5;
/// Expected conversion of a byte string to base64url.
pub const EXPECT_BASE64URL: u64 = 21;
/// Expected conversion of a byte string to base64.
pub const EXPECT_BASE64: u64 = 22;
/// Expected conversion of a byte string to base16.
pub const EXPECT_BASE16: u64 = 23;
/// Reference to a string recorded in the enclosing namespace.
pub const STRING_REF: u64 = 25;
/// Marks a value that later shared references may point at.
pub const SHAREABLE: u64 = 28;
/// Reference to an earlier shareable value.
pub const SHARED_REF: u64 = 29;
/// `[numerator, denominator]`.
pub const RATIONAL: u64 = 30;
/// Opens a string reference namespace.
pub const STRING_REF_NAMESPACE: u64 = 256;
/// Decimal fraction whose exponent may be a bignum.
pub const DECIMAL_FRACTION_BIG_EXPONENT: u64 = 264;
/// Bigfloat whose exponent may be a bignum.
pub const BIGFLOAT_BIG_EXPONENT: u64 = 265;
/// `[exponent, |mantissa|, flags]` decimal fraction with specials.
pub const EXTENDED_DECIMAL_FRACTION: u64 = 268;
/// `[exponent, |mantissa|, flags]` bigfloat with specials.
pub const EXTENDED_BIGFLOAT: u64 = 269;
/// `[|numerator|, denominator, flags]` rational with specials.
pub const EXTENDED_RATIONAL: u64 = 270;

/// True for tags whose content has a numeric interpretation.
pub fn is_numeric(tag: u64) -> bool {
    matches!(
        tag,
        POSITIVE_BIGNUM
            | NEGATIVE_BIGNUM
            | DECIMAL_FRACTION
            | BIGFLOAT
            | RATIONAL
            | DECIMAL_FRACTION_BIG_EXPONENT
            | BIGFLOAT_BIG_EXPONENT
            | EXTENDED_DECIMAL_FRACTION
            | EXTENDED_BIGFLOAT
            | EXTENDED_RATIONAL
    )
}

/// Validates the content of a well-known tag.
pub fn check(tag: u64, content: &Value) -> Result<()> {
    let ok = match tag {
        DATE_TIME => matches!(content, Value::Text(_)),
        EPOCH_DATE_TIME => matches!(
            content,
            Value::Unsigned(_) | Value::Negative(_) | Value::Float(_)
        ),
        POSITIVE_BIGNUM | NEGATIVE_BIGNUM => matches!(content, Value::Bytes(_)),
        STRING_REF | SHARED_REF => matches!(content, Value::Unsigned(_)),
        _ if is_numeric(tag) => {
            // Raises the specific structural error for the tag
            return Number::from_tagged(tag, content).map(|_| ());
        }
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidTag {
            tag,
            reason: "unexpected content type",
        })
    }
}

/// As [`check`], without raising.
pub fn is_valid(tag: u64, content: &Value) -> bool {
    if is_numeric(tag) && !matches!(tag, POSITIVE_BIGNUM | NEGATIVE_BIGNUM) {
        number::check_fraction(tag, content)
    } else {
        check(tag, content).is_ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn structural_checks() {
        assert!(check(DATE_TIME, &Value::from("2013-03-21T20:04:00Z")).is_ok());
        assert!(check(DATE_TIME, &Value::from(1)).is_err());
        assert!(check(EPOCH_DATE_TIME, &Value::from(1.5)).is_ok());
        assert!(check(POSITIVE_BIGNUM, &Value::from("12")).is_err());
        assert!(check(1234, &Value::Null).is_ok());
    }

    #[test]
    fn fractions() {
        let good = Value::Array(vec![Value::from(-2), Value::from(27315)]);
        assert!(is_valid(DECIMAL_FRACTION, &good));
        let short = Value::Array(vec![Value::from(-2)]);
        assert!(!is_valid(DECIMAL_FRACTION, &short));
        assert!(matches!(
            check(DECIMAL_FRACTION, &short),
            Err(Error::InvalidTag { tag: 4, .. })
        ));

        // Bignum exponents are only allowed by the big-exponent tags
        let big_exp = Value::Array(vec![
            Value::tagged(POSITIVE_BIGNUM, Value::Bytes(vec![1])),
            Value::from(1),
        ]);
        assert!(!is_valid(DECIMAL_FRACTION, &big_exp));
        assert!(is_valid(DECIMAL_FRACTION_BIG_EXPONENT, &big_exp));

        let infinity = Value::Array(vec![Value::from(0), Value::from(0), Value::from(3)]);
        assert!(is_valid(EXTENDED_DECIMAL_FRACTION, &infinity));
        let bad_flags = Value::Array(vec![Value::from(0), Value::from(0), Value::from(8)]);
        assert!(!is_valid(EXTENDED_BIGFLOAT, &bad_flags));
        let bad_infinity = Value::Array(vec![Value::from(1), Value::from(0), Value::from(2)]);
        assert!(!is_valid(EXTENDED_DECIMAL_FRACTION, &bad_infinity));
    }

    #[test]
    fn rationals() {
        assert!(is_valid(RATIONAL, &Value::Array(vec![Value::from(-1), Value::from(3)])));
        assert!(!is_valid(RATIONAL, &Value::Array(vec![Value::from(1), Value::from(0)])));
        assert!(!is_valid(RATIONAL, &Value::Array(vec![Value::from(1), Value::from(-3)])));
        assert!(is_valid(
            EXTENDED_RATIONAL,
            &Value::Array(vec![Value::from(0), Value::from(1), Value::from(4)])
        ));
        assert!(!is_valid(
            EXTENDED_RATIONAL,
            &Value::Array(vec![Value::from(-1), Value::from(1)])
        ));
    }
}
