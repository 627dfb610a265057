use super::convert::{self, MAX_SCALE_BITS, MAX_SCALE_DIGITS};
use super::rational::Rational;
use crate::error::{Error, Result};
use core::cmp::Ordering;
use core::fmt;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Non-finite states shared by the arbitrary-precision kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    Finite,
    Infinity,
    QuietNan,
    SignalingNan,
}

/// An arbitrary-precision `mantissa * R^exponent`, with signed zero,
/// infinities and NaNs (whose payload is kept in the mantissa).
///
/// Equality is by representation: `1.0` and `10E-1` are different values
/// that compare equal through [`Scaled::compare`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scaled<const R: u32> {
    negative: bool,
    special: Special,
    mantissa: BigUint,
    exponent: i64,
}

/// Arbitrary-precision decimal fraction.
pub type BigDecimal = Scaled<10>;

/// Arbitrary-precision binary fraction.
pub type BigFloat = Scaled<2>;

fn add_exponent(a: i64, b: i64) -> Result<i64> {
    a.checked_add(b)
        .ok_or(Error::ResourceExhausted("exponent out of range"))
}

impl<const R: u32> Scaled<R> {
    pub fn new(negative: bool, mantissa: BigUint, exponent: i64) -> Self {
        Self {
            negative,
            special: Special::Finite,
            mantissa,
            exponent,
        }
    }

    pub fn from_bigint(value: &BigInt) -> Self {
        Self::new(value.sign() == Sign::Minus, value.magnitude().clone(), 0)
    }

    pub fn from_i64(value: i64) -> Self {
        Self::new(value < 0, BigUint::from(value.unsigned_abs()), 0)
    }

    pub fn zero(negative: bool) -> Self {
        Self::new(negative, BigUint::zero(), 0)
    }

    pub fn infinity(negative: bool) -> Self {
        Self {
            negative,
            special: Special::Infinity,
            mantissa: BigUint::zero(),
            exponent: 0,
        }
    }

    pub fn nan(negative: bool, signaling: bool, payload: BigUint) -> Self {
        Self {
            negative,
            special: if signaling {
                Special::SignalingNan
            } else {
                Special::QuietNan
            },
            mantissa: payload,
            exponent: 0,
        }
    }

    pub(crate) fn quiet_nan() -> Self {
        Self::nan(false, false, BigUint::zero())
    }

    pub fn special(&self) -> Special {
        self.special
    }

    pub fn mantissa(&self) -> &BigUint {
        &self.mantissa
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    pub fn signed_mantissa(&self) -> BigInt {
        let sign = if self.negative { Sign::Minus } else { Sign::Plus };
        BigInt::from_biguint(sign, self.mantissa.clone())
    }

    /// True if the sign bit is set, including for -0 and negative NaNs.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_finite(&self) -> bool {
        self.special == Special::Finite
    }

    pub fn is_infinite(&self) -> bool {
        self.special == Special::Infinity
    }

    pub fn is_nan(&self) -> bool {
        matches!(self.special, Special::QuietNan | Special::SignalingNan)
    }

    pub fn is_signaling(&self) -> bool {
        self.special == Special::SignalingNan
    }

    pub fn is_zero(&self) -> bool {
        self.is_finite() && self.mantissa.is_zero()
    }

    /// -1, 0 or 1; NaN reports 2.
    pub fn sign(&self) -> i32 {
        if self.is_nan() {
            2
        } else if self.is_zero() {
            0
        } else if self.negative {
            -1
        } else {
            1
        }
    }

    pub fn negate(&self) -> Self {
        Self {
            negative: !self.negative,
            ..self.clone()
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            negative: false,
            ..self.clone()
        }
    }

    fn radix_pow(n: u64) -> Result<BigUint> {
        if R == 2 {
            convert::shl(&BigUint::one(), n)
        } else {
            convert::pow10(n)
        }
    }

    fn scale(m: &BigUint, n: u64) -> Result<BigUint> {
        if R == 2 {
            convert::shl(m, n)
        } else {
            Ok(m * convert::pow10(n)?)
        }
    }

    // Only for shifts bounded by the size of an existing operand
    fn scale_unbounded(m: &BigUint, n: u64) -> BigUint {
        if R == 2 {
            m << n as usize
        } else {
            m * BigUint::from(10u8).pow(n as u32)
        }
    }

    /// Number of radix-`R` digits in the mantissa.
    fn digits(m: &BigUint) -> u64 {
        if R == 2 {
            m.bits().max(1)
        } else {
            convert::digit_count(m)
        }
    }

    fn max_scale() -> u64 {
        if R == 2 {
            MAX_SCALE_BITS
        } else {
            MAX_SCALE_DIGITS
        }
    }

    fn propagate_nan(&self, other: &Self) -> Self {
        let nan = if self.is_nan() { self } else { other };
        Self {
            special: Special::QuietNan,
            ..nan.clone()
        }
    }

    /// Aligns two finite values to the smaller exponent.
    fn align(&self, other: &Self) -> Result<(BigInt, BigInt, i64)> {
        let (a, b) = (self.signed_mantissa(), other.signed_mantissa());
        match self.exponent.cmp(&other.exponent) {
            Ordering::Equal => Ok((a, b, self.exponent)),
            Ordering::Greater => {
                let shift = self.exponent.abs_diff(other.exponent);
                let m = Self::scale(&self.mantissa, shift)?;
                let a = BigInt::from_biguint(a.sign(), m);
                Ok((a, b, other.exponent))
            }
            Ordering::Less => {
                let shift = other.exponent.abs_diff(self.exponent);
                let m = Self::scale(&other.mantissa, shift)?;
                let b = BigInt::from_biguint(b.sign(), m);
                Ok((a, b, self.exponent))
            }
        }
    }

    fn from_signed(value: BigInt, exponent: i64) -> Self {
        let (sign, mantissa) = value.into_parts();
        Self::new(sign == Sign::Minus, mantissa, exponent)
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.is_nan() || other.is_nan() {
            return Ok(self.propagate_nan(other));
        }
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) if self.negative != other.negative => return Ok(Self::quiet_nan()),
            (true, _) => return Ok(self.clone()),
            (false, true) => return Ok(other.clone()),
            _ => {}
        }
        if self.is_zero() && other.is_zero() {
            return Ok(Self::zero(self.negative && other.negative));
        }
        if self.is_zero() {
            return Ok(other.clone());
        }
        if other.is_zero() {
            return Ok(self.clone());
        }
        let (a, b, exponent) = self.align(other)?;
        Ok(Self::from_signed(a + b, exponent))
    }

    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.add(&other.negate())
    }

    pub fn multiply(&self, other: &Self) -> Result<Self> {
        if self.is_nan() || other.is_nan() {
            return Ok(self.propagate_nan(other));
        }
        let negative = self.negative != other.negative;
        if self.is_infinite() || other.is_infinite() {
            if self.is_zero() || other.is_zero() {
                return Ok(Self::quiet_nan());
            }
            return Ok(Self::infinity(negative));
        }
        Ok(Self::new(
            negative,
            &self.mantissa * &other.mantissa,
            add_exponent(self.exponent, other.exponent)?,
        ))
    }

    /// The exact quotient, or `None` when it does not terminate in radix `R`.
    pub fn divide(&self, other: &Self) -> Result<Option<Self>> {
        if self.is_nan() || other.is_nan() {
            return Ok(Some(self.propagate_nan(other)));
        }
        let negative = self.negative != other.negative;
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => return Ok(Some(Self::quiet_nan())),
            (true, false) => return Ok(Some(Self::infinity(negative))),
            (false, true) => return Ok(Some(Self::zero(negative))),
            _ => {}
        }
        if other.is_zero() {
            return Ok(Some(if self.is_zero() {
                Self::quiet_nan()
            } else {
                Self::infinity(negative)
            }));
        }
        if self.is_zero() {
            return Ok(Some(Self::zero(negative)));
        }

        let g = self.mantissa.gcd(&other.mantissa);
        let numerator = &self.mantissa / &g;
        let denominator = &other.mantissa / &g;
        let exponent = add_exponent(self.exponent, -other.exponent)?;
        let Some((numerator, shift)) = Self::terminate(numerator, denominator)? else {
            return Ok(None);
        };
        Ok(Some(Self::new(
            negative,
            numerator,
            add_exponent(exponent, -(shift as i64))?,
        )))
    }

    /// Rewrites `n / d` (in lowest terms) as `n' / R^k`, if possible.
    fn terminate(numerator: BigUint, denominator: BigUint) -> Result<Option<(BigUint, u64)>> {
        let twos = denominator.trailing_zeros().unwrap_or(0);
        let mut rest = denominator >> twos as usize;
        if R == 2 {
            return Ok(rest.is_one().then_some((numerator, twos)));
        }
        let five = BigUint::from(5u8);
        let mut fives = 0u64;
        while !rest.is_one() {
            let (q, r) = rest.div_rem(&five);
            if !r.is_zero() {
                return Ok(None);
            }
            rest = q;
            fives += 1;
        }
        let k = twos.max(fives);
        let numerator = convert::shl(&numerator, k - twos)? * convert::pow5(k - fives)?;
        Ok(Some((numerator, k)))
    }

    /// Truncated remainder, taking the sign of the dividend.
    pub fn remainder(&self, other: &Self) -> Result<Self> {
        if self.is_nan() || other.is_nan() {
            return Ok(self.propagate_nan(other));
        }
        if self.is_infinite() || other.is_zero() {
            return Ok(Self::quiet_nan());
        }
        if other.is_infinite() || self.is_zero() {
            return Ok(self.clone());
        }
        let (a, b, exponent) = self.abs().align(&other.abs())?;
        let r = a.magnitude() % b.magnitude();
        Ok(Self::new(self.negative, r, exponent))
    }

    /// Total order: NaN above everything (and equal to itself), -0 == 0.
    pub fn compare(&self, other: &Self) -> Ordering {
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

    fn order_of_magnitude(&self) -> i128 {
        Self::digits(&self.mantissa) as i128 + self.exponent as i128
    }

    fn compare_magnitude(&self, other: &Self) -> Ordering {
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
        let order = self
            .order_of_magnitude()
            .cmp(&other.order_of_magnitude());
        if order != Ordering::Equal {
            return order;
        }
        // Equal orders bound the exponent gap by the digit counts
        match self.exponent.cmp(&other.exponent) {
            Ordering::Equal => self.mantissa.cmp(&other.mantissa),
            Ordering::Greater => {
                let shift = self.exponent.abs_diff(other.exponent);
                Self::scale_unbounded(&self.mantissa, shift).cmp(&other.mantissa)
            }
            Ordering::Less => {
                let shift = other.exponent.abs_diff(self.exponent);
                self.mantissa
                    .cmp(&Self::scale_unbounded(&other.mantissa, shift))
            }
        }
    }

    pub fn is_integral(&self) -> bool {
        if !self.is_finite() {
            return false;
        }
        if self.exponent >= 0 || self.mantissa.is_zero() {
            return true;
        }
        let places = self.exponent.unsigned_abs();
        if R == 2 {
            return self.mantissa.trailing_zeros().unwrap_or(0) >= places;
        }
        if places >= Self::digits(&self.mantissa) {
            return false;
        }
        (&self.mantissa % BigUint::from(10u8).pow(places as u32)).is_zero()
    }

    fn truncated_magnitude(&self) -> BigUint {
        let places = self.exponent.unsigned_abs();
        if places >= Self::digits(&self.mantissa) {
            return BigUint::zero();
        }
        if R == 2 {
            &self.mantissa >> places as usize
        } else {
            &self.mantissa / BigUint::from(10u8).pow(places as u32)
        }
    }

    /// The integer part, truncated toward zero.
    pub fn to_bigint(&self) -> Result<BigInt> {
        if !self.is_finite() {
            return Err(Error::Overflow("integer"));
        }
        let magnitude = if self.exponent >= 0 {
            Self::scale(&self.mantissa, self.exponent as u64)?
        } else {
            self.truncated_magnitude()
        };
        let sign = if self.negative { Sign::Minus } else { Sign::Plus };
        Ok(BigInt::from_biguint(sign, magnitude))
    }

    /// The low 64 bits of the truncated integer part, two's complement.
    pub(crate) fn wrapping_u64(&self) -> u64 {
        // R^64 is a multiple of 2^64
        if !self.is_finite() || self.exponent >= 64 {
            return 0;
        }
        let magnitude = if self.exponent >= 0 {
            Self::scale_unbounded(&self.mantissa, self.exponent as u64)
        } else {
            self.truncated_magnitude()
        };
        let low = magnitude.iter_u64_digits().next().unwrap_or(0);
        if self.negative {
            low.wrapping_neg()
        } else {
            low
        }
    }

    pub fn to_rational(&self) -> Result<Rational> {
        match self.special {
            Special::Infinity => return Ok(Rational::infinity(self.negative)),
            Special::QuietNan | Special::SignalingNan => {
                return Ok(Rational::nan(
                    self.negative,
                    self.is_signaling(),
                    self.mantissa.clone(),
                ));
            }
            Special::Finite => {}
        }
        if self.exponent >= 0 {
            let numerator = Self::scale(&self.mantissa, self.exponent as u64)?;
            Ok(Rational::from_parts(self.negative, numerator, BigUint::one()))
        } else {
            let denominator = Self::radix_pow(self.exponent.unsigned_abs())?;
            Ok(Rational::from_parts(
                self.negative,
                self.mantissa.clone(),
                denominator,
            ))
        }
    }

    /// Converts a ratio to radix `R`, exactly when it terminates and otherwise
    /// rounded half-even to `precision` digits.
    pub(crate) fn from_ratio(
        negative: bool,
        numerator: &BigUint,
        denominator: &BigUint,
        precision: u64,
    ) -> Result<Self> {
        if numerator.is_zero() {
            return Ok(Self::zero(negative));
        }
        let g = numerator.gcd(denominator);
        let (n, d) = (numerator / &g, denominator / &g);
        if let Some((n, shift)) = Self::terminate(n.clone(), d.clone())? {
            return Ok(Self::new(negative, n, -(shift as i64)));
        }

        // Scale so the integer quotient has at least precision + 1 digits
        let k = precision as i64 + Self::digits(&d) as i64 - Self::digits(&n) as i64 + 1;
        if k.unsigned_abs() > Self::max_scale() {
            return Err(Error::ResourceExhausted("quotient scale too large"));
        }
        let (q, r) = if k >= 0 {
            Self::scale(&n, k as u64)?.div_rem(&d)
        } else {
            n.div_rem(&Self::scale(&d, k.unsigned_abs())?)
        };
        let excess = Self::digits(&q).saturating_sub(precision);
        let mantissa = convert::div_round_half_even(&q, &Self::radix_pow(excess)?, !r.is_zero());
        Ok(Self::new(negative, mantissa, excess as i64 - k))
    }

    /// The exact value of a double.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            let bits = value.to_bits();
            let quiet = bits & (1 << 51) != 0;
            let payload = BigUint::from(bits & ((1 << 51) - 1));
            return Self::nan(value.is_sign_negative(), !quiet, payload);
        }
        if value.is_infinite() {
            return Self::infinity(value < 0.0);
        }
        let (negative, mantissa, exponent) = convert::decompose_f64(value);
        if mantissa == 0 {
            return Self::zero(negative);
        }
        // Keep the mantissa odd so 0.5 is 5E-1 and not 53 digits long
        let shift = mantissa.trailing_zeros();
        let (mantissa, exponent) = (BigUint::from(mantissa >> shift), exponent + shift as i64);
        if R == 2 {
            return Self::new(negative, mantissa, exponent);
        }
        if exponent >= 0 {
            Self::new(negative, mantissa << exponent as usize, 0)
        } else {
            // m * 2^-k == m * 5^k * 10^-k
            let five = BigUint::from(5u8).pow(exponent.unsigned_abs() as u32);
            Self::new(negative, mantissa * five, exponent)
        }
    }

    /// Rounds to the nearest double.
    pub fn to_f64(&self) -> f64 {
        let sign = if self.negative { -1.0 } else { 1.0 };
        match self.special {
            Special::Infinity => return sign * f64::INFINITY,
            Special::QuietNan | Special::SignalingNan => return f64::NAN.copysign(sign),
            Special::Finite => {}
        }
        if self.mantissa.is_zero() {
            return sign * 0.0;
        }
        let order = self.order_of_magnitude();
        if R == 2 {
            if order > 1100 {
                return sign * f64::INFINITY;
            }
            if order < -1100 {
                return sign * 0.0;
            }
            let (n, d) = if self.exponent >= 0 {
                (&self.mantissa << self.exponent as usize, BigUint::one())
            } else {
                (
                    self.mantissa.clone(),
                    BigUint::one() << self.exponent.unsigned_abs() as usize,
                )
            };
            return convert::ratio_to_f64(self.negative, &n, &d);
        }
        if order > 330 {
            return sign * f64::INFINITY;
        }
        if order < -345 {
            return sign * 0.0;
        }
        // The standard parser rounds arbitrarily long decimal input correctly
        format!("{}e{}", self.mantissa, self.exponent)
            .parse::<f64>()
            .map_or(f64::NAN, |f| sign * f)
    }
}

impl BigFloat {
    /// The exact decimal value of this binary fraction.
    pub fn to_decimal(&self) -> Result<BigDecimal> {
        match self.special {
            Special::Infinity => return Ok(BigDecimal::infinity(self.negative)),
            Special::QuietNan | Special::SignalingNan => {
                return Ok(BigDecimal::nan(
                    self.negative,
                    self.is_signaling(),
                    self.mantissa.clone(),
                ));
            }
            Special::Finite => {}
        }
        if self.exponent >= 0 {
            Ok(BigDecimal::new(
                self.negative,
                convert::shl(&self.mantissa, self.exponent as u64)?,
                0,
            ))
        } else {
            let places = self.exponent.unsigned_abs();
            Ok(BigDecimal::new(
                self.negative,
                &self.mantissa * convert::pow5(places)?,
                self.exponent,
            ))
        }
    }
}

impl BigDecimal {
    pub const DECIMAL128_DIGITS: u64 = 34;
    const DECIMAL128_MIN_EXPONENT: i64 = -6176;
    const DECIMAL128_MAX_EXPONENT: i64 = 6111;

    /// Converts a binary fraction, exactly when it terminates in base 10.
    pub fn from_big_float(value: &BigFloat) -> Result<Self> {
        value.to_decimal()
    }

    /// Rounds half-even to the precision and exponent range of IEEE 754
    /// decimal128: results past the largest finite value become infinity,
    /// results below the smallest subnormal become a signed zero.
    pub fn round_to_decimal128(&self) -> Self {
        if !self.is_finite() {
            return self.clone();
        }
        if self.mantissa.is_zero() {
            let exponent = self
                .exponent
                .clamp(Self::DECIMAL128_MIN_EXPONENT, Self::DECIMAL128_MAX_EXPONENT);
            return Self::new(self.negative, BigUint::zero(), exponent);
        }

        let digits = convert::digit_count(&self.mantissa);
        let adjusted = self.exponent as i128 + digits as i128 - 1;
        if adjusted > Self::DECIMAL128_MAX_EXPONENT as i128 + Self::DECIMAL128_DIGITS as i128 - 1 {
            return Self::infinity(self.negative);
        }

        // Drop enough digits for both the precision and the minimum exponent
        let excess_precision = digits.saturating_sub(Self::DECIMAL128_DIGITS) as i128;
        let excess_range = Self::DECIMAL128_MIN_EXPONENT as i128 - self.exponent as i128;
        let drop = excess_precision.max(excess_range).max(0);
        let (mut mantissa, mut exponent) = if drop == 0 {
            (self.mantissa.clone(), self.exponent)
        } else if drop as u64 > digits {
            (BigUint::zero(), Self::DECIMAL128_MIN_EXPONENT)
        } else {
            let divisor = BigUint::from(10u8).pow(drop as u32);
            (
                convert::div_round_half_even(&self.mantissa, &divisor, false),
                (self.exponent as i128 + drop) as i64,
            )
        };
        if convert::digit_count(&mantissa) > Self::DECIMAL128_DIGITS {
            mantissa /= 10u8;
            exponent += 1;
        }

        if exponent > Self::DECIMAL128_MAX_EXPONENT {
            // Clamp by padding the coefficient when it still fits
            let pad = (exponent - Self::DECIMAL128_MAX_EXPONENT) as u64;
            if convert::digit_count(&mantissa) + pad > Self::DECIMAL128_DIGITS {
                return Self::infinity(self.negative);
            }
            mantissa *= BigUint::from(10u8).pow(pad as u32);
            exponent = Self::DECIMAL128_MAX_EXPONENT;
        }
        Self::new(self.negative, mantissa, exponent)
    }

    /// Parses the JSON number grammar exactly, returning `None` when `s` is
    /// not a JSON number.
    pub fn parse_json(s: &str) -> Option<Result<Self>> {
        let bytes = s.as_bytes();
        let mut i = 0;
        let negative = bytes.first() == Some(&b'-');
        if negative {
            i += 1;
        }
        let int_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        let int_digits = &s[int_start..i];
        if int_digits.is_empty() || (int_digits.len() > 1 && int_digits.starts_with('0')) {
            return None;
        }
        let mut frac_digits = "";
        if bytes.get(i) == Some(&b'.') {
            let start = i + 1;
            i = start;
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            frac_digits = &s[start..i];
            if frac_digits.is_empty() {
                return None;
            }
        }
        let mut exponent: i64 = 0;
        let mut exponent_overflow = false;
        if matches!(bytes.get(i), Some(b'e' | b'E')) {
            i += 1;
            let exp_negative = match bytes.get(i) {
                Some(b'-') => {
                    i += 1;
                    true
                }
                Some(b'+') => {
                    i += 1;
                    false
                }
                _ => false,
            };
            let start = i;
            while let Some(d) = bytes.get(i).filter(|b| b.is_ascii_digit()) {
                exponent = match exponent
                    .checked_mul(10)
                    .and_then(|e| e.checked_add((d - b'0') as i64))
                {
                    Some(e) => e,
                    None => {
                        exponent_overflow = true;
                        0
                    }
                };
                i += 1;
            }
            if i == start {
                return None;
            }
            if exp_negative {
                exponent = -exponent;
            }
        }
        if i != bytes.len() {
            return None;
        }

        let digits = if frac_digits.is_empty() {
            BigUint::parse_bytes(int_digits.as_bytes(), 10)
        } else {
            let mut all = String::with_capacity(int_digits.len() + frac_digits.len());
            all.push_str(int_digits);
            all.push_str(frac_digits);
            BigUint::parse_bytes(all.as_bytes(), 10)
        };
        let mantissa = digits?;
        if exponent_overflow {
            // Every digit was checked; only the magnitude is out of reach
            return Some(Err(Error::ResourceExhausted("exponent out of range")));
        }
        Some(
            add_exponent(exponent, -(frac_digits.len() as i64))
                .map(|exponent| Self::new(negative, mantissa, exponent)),
        )
    }
}

impl<const R: u32> fmt::Display for Scaled<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        match self.special {
            Special::Infinity => return write!(f, "{sign}Infinity"),
            Special::QuietNan | Special::SignalingNan => {
                let name = if self.is_signaling() { "sNaN" } else { "NaN" };
                return if self.mantissa.is_zero() {
                    write!(f, "{sign}{name}")
                } else {
                    write!(f, "{sign}{name}{}", self.mantissa)
                };
            }
            Special::Finite => {}
        }
        if R == 2 {
            // Binary fractions print through their exact decimal value when
            // that is small enough to materialize
            return match self.exact_decimal() {
                Some(decimal) => fmt::Display::fmt(&decimal, f),
                None => write!(f, "{sign}{}P{}", self.mantissa, self.exponent),
            };
        }

        let digits = self.mantissa.to_string();
        if self.exponent == 0 {
            return write!(f, "{sign}{digits}");
        }
        let adjusted = self.exponent as i128 + digits.len() as i128 - 1;
        if self.exponent < 0 && adjusted >= -6 {
            let point = digits.len() as i128 + self.exponent as i128;
            if point > 0 {
                let (int, frac) = digits.split_at(point as usize);
                write!(f, "{sign}{int}.{frac}")
            } else {
                let zeros = "0".repeat((-point) as usize);
                write!(f, "{sign}0.{zeros}{digits}")
            }
        } else {
            let (head, tail) = digits.split_at(1);
            let exp_sign = if adjusted >= 0 { "+" } else { "-" };
            if tail.is_empty() {
                write!(f, "{sign}{head}E{exp_sign}{}", adjusted.unsigned_abs())
            } else {
                write!(f, "{sign}{head}.{tail}E{exp_sign}{}", adjusted.unsigned_abs())
            }
        }
    }
}

impl<const R: u32> Scaled<R> {
    fn exact_decimal(&self) -> Option<BigDecimal> {
        let places = self.exponent.unsigned_abs();
        let mantissa = if self.exponent >= 0 {
            convert::shl(&self.mantissa, places).ok()?
        } else {
            &self.mantissa * convert::pow5(places).ok()?
        };
        Some(BigDecimal::new(
            self.negative,
            mantissa,
            self.exponent.min(0),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::parse_json(s).unwrap().unwrap()
    }

    #[test]
    fn parse_and_display() {
        assert_eq!(dec("0.1").to_string(), "0.1");
        assert_eq!(dec("-12.50").to_string(), "-12.50");
        assert_eq!(dec("1e3").to_string(), "1E+3");
        assert_eq!(dec("1.5e3").to_string(), "1.5E+3");
        assert_eq!(dec("0.0000001").to_string(), "1E-7");
        assert_eq!(dec("0.000001").to_string(), "0.000001");
        assert!(BigDecimal::parse_json("01").is_none());
        assert!(BigDecimal::parse_json("1.").is_none());
        assert!(BigDecimal::parse_json("1e").is_none());
        assert!(BigDecimal::parse_json("+1").is_none());
        assert!(matches!(
            BigDecimal::parse_json("1e99999999999999999999"),
            Some(Err(Error::ResourceExhausted(_)))
        ));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(dec("0.1").add(&dec("0.2")).unwrap().compare(&dec("0.3")), Ordering::Equal);
        assert_eq!(dec("1.5").multiply(&dec("-2")).unwrap().to_string(), "-3.0");
        assert_eq!(dec("1").divide(&dec("8")).unwrap().unwrap().to_string(), "0.125");
        assert!(dec("1").divide(&dec("3")).unwrap().is_none());
        assert_eq!(dec("7.5").remainder(&dec("2")).unwrap().to_string(), "1.5");
        assert_eq!(dec("-7.5").remainder(&dec("2")).unwrap().to_string(), "-1.5");
    }

    #[test]
    fn division_specials() {
        let inf = dec("1").divide(&dec("0")).unwrap().unwrap();
        assert!(inf.is_infinite() && !inf.is_negative());
        let neg = dec("-1").divide(&dec("0")).unwrap().unwrap();
        assert!(neg.is_infinite() && neg.is_negative());
        assert!(dec("0").divide(&dec("0")).unwrap().unwrap().is_nan());
    }

    #[test]
    fn ordering() {
        assert_eq!(dec("1.0").compare(&dec("1")), Ordering::Equal);
        assert_eq!(dec("-0").compare(&dec("0")), Ordering::Equal);
        assert_eq!(dec("1e400").compare(&dec("9e399")), Ordering::Greater);
        assert_eq!(dec("-2").compare(&dec("-1.5")), Ordering::Less);
        assert_eq!(BigDecimal::quiet_nan().compare(&BigDecimal::infinity(false)), Ordering::Greater);
    }

    #[test]
    fn integral() {
        assert!(dec("1.000").is_integral());
        assert!(!dec("1.001").is_integral());
        assert!(!dec("0.5").is_integral());
        assert!(BigFloat::from_f64(4.0).is_integral());
        assert!(!BigFloat::from_f64(0.5).is_integral());
        assert_eq!(dec("-2.9").to_bigint().unwrap(), BigInt::from(-2));
    }

    #[test]
    fn doubles() {
        assert_eq!(BigDecimal::from_f64(0.1).to_f64(), 0.1);
        assert_eq!(BigFloat::from_f64(-3.75).to_f64(), -3.75);
        assert_eq!(dec("0.1").to_f64(), 0.1);
        assert_eq!(dec("1e400").to_f64(), f64::INFINITY);
        assert_eq!(dec("-1e-400").to_f64().to_bits(), (-0.0f64).to_bits());
        assert_eq!(BigFloat::from_f64(0.5).to_decimal().unwrap().to_string(), "0.5");
        assert_eq!(BigDecimal::from_f64(0.5).to_string(), "0.5");
        assert_eq!(BigDecimal::from_f64(96.0).to_string(), "96");
        assert_eq!(BigFloat::from_f64(96.0).mantissa(), &BigUint::from(3u8));
        assert!(BigDecimal::from_f64(-0.0).is_negative());
    }

    #[test]
    fn decimal128() {
        let r = dec("1.2345678901234567890123456789012345678").round_to_decimal128();
        assert_eq!(r.to_string(), "1.234567890123456789012345678901235");
        assert!(dec("1e6145").round_to_decimal128().is_infinite());
        let max = dec("1e6144").round_to_decimal128();
        assert_eq!(max.exponent(), 6111);
        assert_eq!(max.compare(&dec("1e6144")), Ordering::Equal);
        assert_eq!(dec("1e-6177").round_to_decimal128().compare(&dec("0")), Ordering::Equal);
        assert_eq!(dec("0.5").round_to_decimal128(), dec("0.5"));
    }

    #[test]
    fn rounded_ratio() {
        let third = BigDecimal::from_ratio(false, &BigUint::from(1u8), &BigUint::from(3u8), 34).unwrap();
        assert_eq!(third.to_string(), "0.3333333333333333333333333333333333");
        let quarter = BigDecimal::from_ratio(true, &BigUint::from(1u8), &BigUint::from(4u8), 34).unwrap();
        assert_eq!(quarter.to_string(), "-0.25");
    }
}
