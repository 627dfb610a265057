/*!
JSON number literals.

A literal is checked against the RFC 8259 grammar and converted to a value
according to the [`NumberConversion`] in effect. Malformed input is never an
error here: the entry points return `None` and leave it to the caller to
report the failure with position context.
*/

use crate::error::{Result, check_range};
use crate::number::{BigDecimal, Number};
use crate::options::{JsonOptions, NumberConversion};
use crate::value::Value;
use smallvec::SmallVec;

/// Largest integer magnitude that survives a round trip through `f64`.
const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Why a literal could not be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberError {
    /// Not a JSON number.
    Malformed,
    /// Well formed, but the exponent is beyond what can be represented.
    OutOfRange,
}

/// Parses the `count` bytes of `input` starting at `offset` as a number.
pub fn parse_number_str(
    input: &str,
    offset: usize,
    count: usize,
    options: &JsonOptions,
) -> Result<Option<Value>> {
    parse_number_bytes(input.as_bytes(), offset, count, options)
}

/// Parses the `count` bytes of `input` starting at `offset` as a number.
pub fn parse_number_bytes(
    input: &[u8],
    offset: usize,
    count: usize,
    options: &JsonOptions,
) -> Result<Option<Value>> {
    check_range(offset, count, input.len())?;
    Ok(parse_number(&input[offset..offset + count], options).ok())
}

/// Parses the `count` UTF-16 code units of `input` starting at `offset` as a
/// number.
pub fn parse_number_utf16(
    input: &[u16],
    offset: usize,
    count: usize,
    options: &JsonOptions,
) -> Result<Option<Value>> {
    check_range(offset, count, input.len())?;
    let ascii = input[offset..offset + count]
        .iter()
        .map(|u| u8::try_from(*u).ok().filter(u8::is_ascii))
        .collect::<Option<SmallVec<[u8; 32]>>>();
    Ok(ascii.and_then(|text| parse_number(&text, options).ok()))
}

/// One or two digits, or a minus sign and one non-zero digit.
fn small_integer(text: &[u8]) -> Option<i64> {
    let digit = |b: u8| b.is_ascii_digit().then(|| (b - b'0') as i64);
    match *text {
        [d] => digit(d),
        [b'-', d] if d != b'0' => digit(d).map(|d| -d),
        [d1, d2] if d1 != b'0' => Some(digit(d1)? * 10 + digit(d2)?),
        _ => None,
    }
}

pub(crate) fn parse_number(
    text: &[u8],
    options: &JsonOptions,
) -> core::result::Result<Value, NumberError> {
    if let Some(v) = small_integer(text) {
        return Ok(Value::from(v));
    }

    let s = core::str::from_utf8(text).map_err(|_| NumberError::Malformed)?;
    let decimal = match BigDecimal::parse_json(s) {
        None => return Err(NumberError::Malformed),
        Some(Err(_)) => {
            // Only the exact modes need the exponent itself
            return match options.number_conversion() {
                NumberConversion::Full | NumberConversion::Decimal128 => {
                    Err(NumberError::OutOfRange)
                }
                _ => s
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| NumberError::Malformed),
            };
        }
        Some(Ok(decimal)) => decimal,
    };
    if decimal.is_zero() && decimal.is_negative() {
        return Ok(negative_zero(&decimal, options));
    }

    let double = || s.parse::<f64>().map_err(|_| NumberError::Malformed);
    Ok(match options.number_conversion() {
        NumberConversion::Full => {
            if decimal.exponent() == 0 {
                Number::from_bigint(decimal.signed_mantissa()).to_value()
            } else {
                Number::from(decimal).to_value()
            }
        }
        NumberConversion::Double => Value::Float(double()?),
        NumberConversion::IntOrFloat => {
            let f = double()?;
            if decimal.is_integral() && f.abs() <= MAX_SAFE_INTEGER as f64 {
                // Exact: every integer in range is a double
                Value::from(f as i64)
            } else {
                Value::Float(f)
            }
        }
        NumberConversion::IntOrFloatFromDouble => {
            let f = double()?;
            if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER as f64 {
                Value::from(f as i64)
            } else {
                Value::Float(f)
            }
        }
        NumberConversion::Decimal128 => Number::from(decimal.round_to_decimal128()).to_value(),
    })
}

fn negative_zero(decimal: &BigDecimal, options: &JsonOptions) -> Value {
    let mode = options.number_conversion();
    if mode == NumberConversion::Decimal128 {
        let zero = if options.preserve_negative_zero() {
            decimal.clone()
        } else {
            decimal.abs()
        };
        return Number::from(zero.round_to_decimal128()).to_value();
    }
    match (options.preserve_negative_zero(), mode) {
        (true, _) => Value::Float(-0.0),
        (false, NumberConversion::Double) => Value::Float(0.0),
        (false, _) => Value::Unsigned(0),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fast_path_shapes() {
        assert_eq!(small_integer(b"7"), Some(7));
        assert_eq!(small_integer(b"42"), Some(42));
        assert_eq!(small_integer(b"-5"), Some(-5));
        assert_eq!(small_integer(b"-0"), None);
        assert_eq!(small_integer(b"05"), None);
        assert_eq!(small_integer(b"4x"), None);
        assert_eq!(small_integer(b"123"), None);
    }

    #[test]
    fn bounds_are_checked() {
        let options = JsonOptions::new();
        assert!(parse_number_str("123", 1, 3, &options).is_err());
        assert!(parse_number_bytes(b"123", 4, 0, &options).is_err());
        assert_eq!(
            parse_number_str("[123]", 1, 3, &options).unwrap(),
            Some(Value::from(123))
        );
        assert_eq!(parse_number_str("[123]", 0, 4, &options).unwrap(), None);
    }

    #[test]
    fn utf16_input() {
        let options = JsonOptions::new();
        let units: Vec<u16> = "-1.5e3".encode_utf16().collect();
        let v = parse_number_utf16(&units, 0, units.len(), &options)
            .unwrap()
            .unwrap();
        assert_eq!(Number::from_value(&v).unwrap(), Number::from(-1500));

        let wide = [0x31u16, 0x0661];
        assert_eq!(parse_number_utf16(&wide, 0, 2, &options).unwrap(), None);
    }

    #[test]
    fn exponent_overflow() {
        assert_eq!(
            parse_number(b"1e99999999999999999999", &JsonOptions::new()),
            Err(NumberError::OutOfRange)
        );
        assert_eq!(
            parse_number(b"1e", &JsonOptions::new()),
            Err(NumberError::Malformed)
        );
    }
}
