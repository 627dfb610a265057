/*!
Numbers over CBOR values.

A [`Number`] is a view over any [`Value`](crate::Value) with a numeric
meaning: plain integers, floats, bignums (tags 2/3), decimal fractions and
bigfloats (tags 4/5, 264/265, 268/269) and rationals (tags 30/270). It owns one
of six kinds and arithmetic promotes to the narrowest kind that holds the
exact result:

* integer with integer stays an integer, growing to a big integer on overflow;
* anything with a rational gives a rational;
* otherwise anything with a decimal gives a decimal;
* otherwise anything with a float gives a binary float.

Division returns the exact quotient, falling back to a rational when the
quotient does not terminate. Division by zero gives a signed infinity, or
NaN for `0/0`.
*/

mod convert;
mod rational;
mod scaled;
mod tagged;

pub use convert::{MAX_SCALE_BITS, MAX_SCALE_DIGITS};
pub use rational::{BINARY_PRECISION, DECIMAL_PRECISION, Rational};
pub use scaled::{BigDecimal, BigFloat, Scaled, Special};
pub use tagged::check_fraction;

use super::error::{Error, Result};
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

/// The representation held by a [`Number`].
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Integer(i64),
    Double(f64),
    BigInteger(BigInt),
    Decimal(BigDecimal),
    BinaryFloat(BigFloat),
    Rational(Rational),
}

#[derive(Debug, Clone)]
pub struct Number(Kind);

// Operands lifted to a common kind
enum Pair {
    Integer(i64, i64),
    BigInteger(BigInt, BigInt),
    Float(BigFloat, BigFloat),
    Decimal(BigDecimal, BigDecimal),
    Rational(Rational, Rational),
}

impl Number {
    pub fn kind(&self) -> &Kind {
        &self.0
    }

    pub fn into_kind(self) -> Kind {
        self.0
    }

    /// Wraps a big integer, narrowing it to a plain integer when it fits.
    pub fn from_bigint(value: BigInt) -> Self {
        match value.to_i64() {
            Some(i) => Number(Kind::Integer(i)),
            None => Number(Kind::BigInteger(value)),
        }
    }

    /// The value `-1 - n`, as carried by CBOR major type 1.
    pub fn from_negative(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Number(Kind::Integer(-1 - n)),
            Err(_) => Number(Kind::BigInteger(-1 - BigInt::from(n))),
        }
    }

    fn rank(&self) -> u8 {
        match self.0 {
            Kind::Integer(_) => 0,
            Kind::BigInteger(_) => 1,
            Kind::Double(_) | Kind::BinaryFloat(_) => 2,
            Kind::Decimal(_) => 3,
            Kind::Rational(_) => 4,
        }
    }

    fn promote(&self, other: &Number) -> Result<Pair> {
        if let (Kind::Integer(a), Kind::Integer(b)) = (&self.0, &other.0) {
            return Ok(Pair::Integer(*a, *b));
        }
        Ok(match self.rank().max(other.rank()) {
            0 | 1 => Pair::BigInteger(self.to_big_integer()?, other.to_big_integer()?),
            2 => Pair::Float(self.to_big_float()?, other.to_big_float()?),
            3 => Pair::Decimal(self.to_decimal()?, other.to_decimal()?),
            _ => Pair::Rational(self.to_rational()?, other.to_rational()?),
        })
    }

    /// -1, 0 or 1 by sign; NaN reports 2.
    pub fn sign(&self) -> i32 {
        match &self.0 {
            Kind::Integer(i) => i.signum() as i32,
            Kind::Double(f) if f.is_nan() => 2,
            Kind::Double(f) if *f == 0.0 => 0,
            Kind::Double(f) => {
                if *f < 0.0 {
                    -1
                } else {
                    1
                }
            }
            Kind::BigInteger(b) => match b.sign() {
                Sign::Minus => -1,
                Sign::NoSign => 0,
                Sign::Plus => 1,
            },
            Kind::Decimal(d) => d.sign(),
            Kind::BinaryFloat(f) => f.sign(),
            Kind::Rational(r) => r.sign(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.sign() == 0
    }

    /// True if the sign bit is set, including for negative zero.
    pub fn is_negative(&self) -> bool {
        match &self.0 {
            Kind::Integer(i) => *i < 0,
            Kind::Double(f) => f.is_sign_negative(),
            Kind::BigInteger(b) => b.is_negative(),
            Kind::Decimal(d) => d.is_negative(),
            Kind::BinaryFloat(f) => f.is_negative(),
            Kind::Rational(r) => r.is_negative(),
        }
    }

    pub fn is_nan(&self) -> bool {
        match &self.0 {
            Kind::Integer(_) | Kind::BigInteger(_) => false,
            Kind::Double(f) => f.is_nan(),
            Kind::Decimal(d) => d.is_nan(),
            Kind::BinaryFloat(f) => f.is_nan(),
            Kind::Rational(r) => r.is_nan(),
        }
    }

    pub fn is_infinite(&self) -> bool {
        match &self.0 {
            Kind::Integer(_) | Kind::BigInteger(_) => false,
            Kind::Double(f) => f.is_infinite(),
            Kind::Decimal(d) => d.is_infinite(),
            Kind::BinaryFloat(f) => f.is_infinite(),
            Kind::Rational(r) => r.is_infinite(),
        }
    }

    pub fn is_finite(&self) -> bool {
        !self.is_nan() && !self.is_infinite()
    }

    /// True for finite values without a fractional part.
    pub fn is_integral(&self) -> bool {
        match &self.0 {
            Kind::Integer(_) | Kind::BigInteger(_) => true,
            Kind::Double(f) => f.is_finite() && f.fract() == 0.0,
            Kind::Decimal(d) => d.is_integral(),
            Kind::BinaryFloat(f) => f.is_integral(),
            Kind::Rational(r) => r.is_integral(),
        }
    }

    /// The integer part, truncated toward zero.
    pub fn to_big_integer(&self) -> Result<BigInt> {
        match &self.0 {
            Kind::Integer(i) => Ok(BigInt::from(*i)),
            Kind::Double(f) if !f.is_finite() => Err(Error::Overflow("integer")),
            Kind::Double(f) => BigFloat::from_f64(*f).to_bigint(),
            Kind::BigInteger(b) => Ok(b.clone()),
            Kind::Decimal(d) => d.to_bigint(),
            Kind::BinaryFloat(f) => f.to_bigint(),
            Kind::Rational(r) => r.to_bigint(),
        }
    }

    pub fn to_big_integer_if_exact(&self) -> Result<BigInt> {
        if self.is_finite() && !self.is_integral() {
            return Err(Error::NotExact("integer"));
        }
        self.to_big_integer()
    }

    /// The decimal value; exact except for non-terminating rationals, which
    /// are rounded to [`DECIMAL_PRECISION`] digits.
    pub fn to_decimal(&self) -> Result<BigDecimal> {
        match &self.0 {
            Kind::Integer(i) => Ok(BigDecimal::from_i64(*i)),
            Kind::Double(f) => Ok(BigDecimal::from_f64(*f)),
            Kind::BigInteger(b) => Ok(BigDecimal::from_bigint(b)),
            Kind::Decimal(d) => Ok(d.clone()),
            Kind::BinaryFloat(f) => f.to_decimal(),
            Kind::Rational(r) => r.to_decimal(),
        }
    }

    /// The binary float value; exact except for decimals and rationals that
    /// do not terminate in base 2, which are rounded to [`BINARY_PRECISION`]
    /// bits.
    pub fn to_big_float(&self) -> Result<BigFloat> {
        match &self.0 {
            Kind::Integer(i) => Ok(BigFloat::from_i64(*i)),
            Kind::Double(f) => Ok(BigFloat::from_f64(*f)),
            Kind::BigInteger(b) => Ok(BigFloat::from_bigint(b)),
            Kind::Decimal(d) => d.to_rational()?.to_big_float(),
            Kind::BinaryFloat(f) => Ok(f.clone()),
            Kind::Rational(r) => r.to_big_float(),
        }
    }

    pub fn to_rational(&self) -> Result<Rational> {
        match &self.0 {
            Kind::Integer(i) => Ok(Rational::from_bigint(&BigInt::from(*i))),
            Kind::Double(f) => BigFloat::from_f64(*f).to_rational(),
            Kind::BigInteger(b) => Ok(Rational::from_bigint(b)),
            Kind::Decimal(d) => d.to_rational(),
            Kind::BinaryFloat(f) => f.to_rational(),
            Kind::Rational(r) => Ok(r.clone()),
        }
    }

    /// The nearest double.
    pub fn to_f64(&self) -> f64 {
        match &self.0 {
            Kind::Integer(i) => *i as f64,
            Kind::Double(f) => *f,
            Kind::BigInteger(b) => convert::ratio_to_f64(
                b.is_negative(),
                b.magnitude(),
                &BigUint::from(1u8),
            ),
            Kind::Decimal(d) => d.to_f64(),
            Kind::BinaryFloat(f) => f.to_f64(),
            Kind::Rational(r) => r.to_f64(),
        }
    }

    /// True if a double holds this value exactly; infinities and NaNs fit.
    pub fn can_fit_in_f64(&self) -> bool {
        match &self.0 {
            Kind::Integer(i) => (*i as f64) as i128 == *i as i128,
            Kind::Double(_) => true,
            _ if !self.is_finite() => true,
            _ => {
                let f = self.to_f64();
                f.is_finite() && Number::from(f).compare(self) == Ordering::Equal
            }
        }
    }

    /// True if a single-precision float holds this value exactly.
    pub fn can_fit_in_f32(&self) -> bool {
        if !self.is_finite() {
            return true;
        }
        if let Kind::Integer(i) = self.0 {
            return (i as f32) as i128 == i as i128;
        }
        let f = self.to_f64();
        self.can_fit_in_f64() && (f as f32) as f64 == f
    }

    /// The low 64 bits of the truncated value in two's complement, 0 for
    /// infinities and NaN.
    fn wrapping_u64(&self) -> u64 {
        match &self.0 {
            Kind::Integer(i) => *i as u64,
            Kind::Double(f) if !f.is_finite() => 0,
            Kind::Double(f) if f.abs() < 9.223_372_036_854_775_808e18 => *f as i64 as u64,
            Kind::Double(f) => BigFloat::from_f64(*f).wrapping_u64(),
            Kind::BigInteger(b) => {
                let low = b.magnitude().iter_u64_digits().next().unwrap_or(0);
                if b.is_negative() {
                    low.wrapping_neg()
                } else {
                    low
                }
            }
            Kind::Decimal(d) => d.wrapping_u64(),
            Kind::BinaryFloat(f) => f.wrapping_u64(),
            Kind::Rational(r) => r.wrapping_u64(),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: &Number) -> Result<Number> {
        Ok(match self.promote(other)? {
            Pair::Integer(a, b) => match a.checked_add(b) {
                Some(v) => Number::from(v),
                None => Number::from_bigint(BigInt::from(a) + b),
            },
            Pair::BigInteger(a, b) => Number::from_bigint(a + b),
            Pair::Float(a, b) => Number::from(a.add(&b)?),
            Pair::Decimal(a, b) => Number::from(a.add(&b)?),
            Pair::Rational(a, b) => Number::from(a.add(&b)?),
        })
    }

    pub fn subtract(&self, other: &Number) -> Result<Number> {
        Ok(match self.promote(other)? {
            Pair::Integer(a, b) => match a.checked_sub(b) {
                Some(v) => Number::from(v),
                None => Number::from_bigint(BigInt::from(a) - b),
            },
            Pair::BigInteger(a, b) => Number::from_bigint(a - b),
            Pair::Float(a, b) => Number::from(a.subtract(&b)?),
            Pair::Decimal(a, b) => Number::from(a.subtract(&b)?),
            Pair::Rational(a, b) => Number::from(a.subtract(&b)?),
        })
    }

    pub fn multiply(&self, other: &Number) -> Result<Number> {
        Ok(match self.promote(other)? {
            Pair::Integer(a, b) => match a.checked_mul(b) {
                Some(v) => Number::from(v),
                None => Number::from_bigint(BigInt::from(a) * b),
            },
            Pair::BigInteger(a, b) => Number::from_bigint(a * b),
            Pair::Float(a, b) => Number::from(a.multiply(&b)?),
            Pair::Decimal(a, b) => Number::from(a.multiply(&b)?),
            Pair::Rational(a, b) => Number::from(a.multiply(&b)?),
        })
    }

    /// The exact quotient; see the module documentation.
    pub fn divide(&self, other: &Number) -> Result<Number> {
        match self.promote(other)? {
            Pair::Integer(a, b) => {
                if b == 0 {
                    return Ok(integer_division_by_zero(a.signum()));
                }
                // i64::MIN / -1 has no i64 remainder and falls through to BigInt
                if a.checked_rem(b) == Some(0) {
                    if let Some(q) = a.checked_div(b) {
                        return Ok(Number::from(q));
                    }
                }
                divide_integers(BigInt::from(a), BigInt::from(b))
            }
            Pair::BigInteger(a, b) => {
                if b.is_zero() {
                    return Ok(integer_division_by_zero(a.signum().to_i64().unwrap_or(0)));
                }
                divide_integers(a, b)
            }
            Pair::Float(a, b) => match a.divide(&b)? {
                Some(q) => Ok(Number::from(q)),
                None => Ok(Number::from(a.to_rational()?.divide(&b.to_rational()?)?)),
            },
            Pair::Decimal(a, b) => match a.divide(&b)? {
                Some(q) => Ok(Number::from(q)),
                None => Ok(Number::from(a.to_rational()?.divide(&b.to_rational()?)?)),
            },
            Pair::Rational(a, b) => Ok(Number::from(a.divide(&b)?)),
        }
    }

    /// The truncated remainder, with the sign of the dividend. A zero divisor
    /// gives NaN.
    pub fn remainder(&self, other: &Number) -> Result<Number> {
        Ok(match self.promote(other)? {
            Pair::Integer(_, 0) => Number::from(f64::NAN),
            Pair::Integer(a, b) => Number::from(a.checked_rem(b).unwrap_or(0)),
            Pair::BigInteger(_, b) if b.is_zero() => Number::from(f64::NAN),
            Pair::BigInteger(a, b) => Number::from_bigint(a % b),
            Pair::Float(a, b) => Number::from(a.remainder(&b)?),
            Pair::Decimal(a, b) => Number::from(a.remainder(&b)?),
            Pair::Rational(a, b) => Number::from(a.remainder(&b)?),
        })
    }

    pub fn negate(&self) -> Number {
        match &self.0 {
            Kind::Integer(i) => match i.checked_neg() {
                Some(n) => Number::from(n),
                None => Number::from_bigint(-BigInt::from(*i)),
            },
            Kind::Double(f) => Number::from(-*f),
            Kind::BigInteger(b) => Number::from_bigint(-b),
            Kind::Decimal(d) => Number::from(d.negate()),
            Kind::BinaryFloat(f) => Number::from(f.negate()),
            Kind::Rational(r) => Number::from(r.negate()),
        }
    }

    pub fn abs(&self) -> Number {
        if self.is_negative() {
            self.negate()
        } else {
            self.clone()
        }
    }

    /// Total order: NaN sorts above everything (and equals NaN) and -0 == 0.
    /// Values of different kinds compare exactly.
    pub fn compare(&self, other: &Number) -> Ordering {
        if let (Kind::Integer(a), Kind::Integer(b)) = (&self.0, &other.0) {
            return a.cmp(b);
        }
        match (self.is_nan(), other.is_nan()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
        let (sa, sb) = (self.sign(), other.sign());
        if sa != sb {
            return sa.cmp(&sb);
        }
        if sa == 0 {
            return Ordering::Equal;
        }
        let magnitude = self.compare_magnitude(other);
        if sa < 0 {
            magnitude.reverse()
        } else {
            magnitude
        }
    }

    /// Compares absolute values of two non-zero, non-NaN numbers of the same
    /// sign.
    fn compare_magnitude(&self, other: &Number) -> Ordering {
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }

        // Cheap base-2 logarithms settle values of clearly different size
        // without materializing either one in the other's radix
        let (la, lb) = (self.log2_abs(), other.log2_abs());
        let tolerance = (la.abs() + lb.abs()) * 1e-12 + 1e-6;
        if (la - lb).abs() > tolerance {
            return la.total_cmp(&lb);
        }

        let (a, b) = (self.abs(), other.abs());
        match a.promote(&b) {
            Ok(Pair::Integer(a, b)) => a.cmp(&b),
            Ok(Pair::BigInteger(a, b)) => a.cmp(&b),
            Ok(Pair::Float(a, b)) => a.compare(&b),
            Ok(Pair::Decimal(a, b)) => a.compare(&b),
            Ok(Pair::Rational(a, b)) => a.compare(&b),
            Err(e) => {
                // Only reachable across kinds with huge exponents, where an
                // exact tie would need a mantissa of that many digits
                tracing::trace!(error = %e, "Ordering {self} and {other} by kind");
                self.rank().cmp(&other.rank())
            }
        }
    }

    /// Approximate `log2(|self|)` for a finite non-zero value.
    fn log2_abs(&self) -> f64 {
        match &self.0 {
            Kind::Integer(i) => (i.unsigned_abs() as f64).log2(),
            Kind::Double(f) => f.abs().log2(),
            Kind::BigInteger(b) => convert::log2_magnitude(b.magnitude()),
            Kind::Decimal(d) => {
                let scale = d.exponent() as f64 * core::f64::consts::LOG2_10;
                convert::log2_magnitude(d.mantissa()) + scale
            }
            Kind::BinaryFloat(f) => convert::log2_magnitude(f.mantissa()) + f.exponent() as f64,
            Kind::Rational(r) => {
                convert::log2_magnitude(r.numerator()) - convert::log2_magnitude(r.denominator())
            }
        }
    }
}

fn integer_division_by_zero(sign: i64) -> Number {
    Number::from(match sign {
        1 => f64::INFINITY,
        -1 => f64::NEG_INFINITY,
        _ => f64::NAN,
    })
}

fn divide_integers(a: BigInt, b: BigInt) -> Result<Number> {
    let (q, r) = a.div_rem(&b);
    if r.is_zero() {
        Ok(Number::from_bigint(q))
    } else {
        Ok(Number::from(Rational::new(&a, &b)?))
    }
}

macro_rules! narrowing {
    ($($ty:ident => $checked:ident, $unchecked:ident, $exact:ident;)*) => {
        impl Number {
            $(
                #[doc = concat!("Truncates toward zero, failing with [`Error::Overflow`] outside the `", stringify!($ty), "` range or for infinity and NaN.")]
                pub fn $checked(&self) -> Result<$ty> {
                    if let Kind::Integer(i) = self.0 {
                        return $ty::try_from(i).map_err(|_| Error::Overflow(stringify!($ty)));
                    }
                    self.to_big_integer()
                        .ok()
                        .and_then(|v| $ty::try_from(&v).ok())
                        .ok_or(Error::Overflow(stringify!($ty)))
                }

                #[doc = concat!("Truncates toward zero and wraps into `", stringify!($ty), "`; infinity and NaN give 0.")]
                pub fn $unchecked(&self) -> $ty {
                    self.wrapping_u64() as $ty
                }

                #[doc = concat!("Converts to `", stringify!($ty), "`, failing with [`Error::NotExact`] for a fractional value.")]
                pub fn $exact(&self) -> Result<$ty> {
                    if self.is_finite() && !self.is_integral() {
                        return Err(Error::NotExact(stringify!($ty)));
                    }
                    self.$checked()
                }
            )*
        }
    };
}

narrowing! {
    i8 => to_i8_checked, to_i8_unchecked, to_i8_if_exact;
    i16 => to_i16_checked, to_i16_unchecked, to_i16_if_exact;
    i32 => to_i32_checked, to_i32_unchecked, to_i32_if_exact;
    i64 => to_i64_checked, to_i64_unchecked, to_i64_if_exact;
    u8 => to_u8_checked, to_u8_unchecked, to_u8_if_exact;
    u16 => to_u16_checked, to_u16_unchecked, to_u16_if_exact;
    u32 => to_u32_checked, to_u32_unchecked, to_u32_if_exact;
    u64 => to_u64_checked, to_u64_unchecked, to_u64_if_exact;
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

macro_rules! impl_from {
    ($($ty:ty => |$v:ident| $e:expr;)*) => {
        $(
            impl From<$ty> for Number {
                fn from($v: $ty) -> Self {
                    Number($e)
                }
            }
        )*
    };
}

impl_from! {
    i64 => |v| Kind::Integer(v);
    i32 => |v| Kind::Integer(v.into());
    u32 => |v| Kind::Integer(v.into());
    f64 => |v| Kind::Double(v);
    f32 => |v| Kind::Double(v.into());
    BigDecimal => |v| Kind::Decimal(v);
    BigFloat => |v| Kind::BinaryFloat(v);
    Rational => |v| Kind::Rational(v);
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Number(Kind::Integer(i)),
            Err(_) => Number(Kind::BigInteger(BigInt::from(value))),
        }
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::from_bigint(value)
    }
}

/// Renders a double the way JavaScript's `Number.prototype.toString` does:
/// the shortest round-trip digits, plain notation for exponents in
/// `-7..21`, and `NaN`/`Infinity` for non-finite values. Negative zero keeps
/// its sign.
pub(crate) fn format_double(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{:e}", f.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let mut out = String::with_capacity(k as usize + 8);
    if f < 0.0 {
        out.push('-');
    }
    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(core::iter::repeat_n('0', (n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(core::iter::repeat_n('0', (-n) as usize));
        out.push_str(&digits);
    } else {
        let (head, tail) = digits.split_at(1);
        out.push_str(head);
        if !tail.is_empty() {
            out.push('.');
            out.push_str(tail);
        }
        out.push('e');
        out.push(if n > 0 { '+' } else { '-' });
        out.push_str(&(n - 1).unsigned_abs().to_string());
    }
    out
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Kind::Integer(i) => write!(f, "{i}"),
            Kind::Double(d) => f.write_str(&format_double(*d)),
            Kind::BigInteger(b) => write!(f, "{b}"),
            Kind::Decimal(d) => write!(f, "{d}"),
            Kind::BinaryFloat(b) => write!(f, "{b}"),
            Kind::Rational(r) => write!(f, "{r}"),
        }
    }
}

impl FromStr for Number {
    type Err = Error;

    /// Parses a JSON number literal exactly, or one of `Infinity`,
    /// `-Infinity` and `NaN`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Infinity" => return Ok(Number::from(BigDecimal::infinity(false))),
            "-Infinity" => return Ok(Number::from(BigDecimal::infinity(true))),
            "NaN" => return Ok(Number::from(BigDecimal::quiet_nan())),
            _ => {}
        }
        let decimal = BigDecimal::parse_json(s).ok_or(Error::syntax(0, "Invalid number"))??;
        if decimal.exponent() == 0 {
            Ok(Number::from_bigint(decimal.signed_mantissa()))
        } else {
            Ok(Number::from(decimal))
        }
    }
}
