use super::convert;
use super::scaled::{BigDecimal, BigFloat, Scaled, Special};
use crate::error::{Error, Result};
use core::cmp::Ordering;
use core::fmt;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Significant digits kept when a rational is rendered as a decimal.
pub const DECIMAL_PRECISION: u64 = 34;

/// Significant bits kept when a rational is rendered as a binary float.
pub const BINARY_PRECISION: u64 = 113;

/// An exact fraction in lowest terms, with the same specials as the
/// scaled kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    negative: bool,
    special: Special,
    numerator: BigUint,
    denominator: BigUint,
}

impl Rational {
    /// Builds `numerator / denominator`, failing on a zero denominator.
    pub fn new(numerator: &BigInt, denominator: &BigInt) -> Result<Self> {
        if denominator.is_zero() {
            return Err(Error::NotANumber);
        }
        let negative = (numerator.sign() == Sign::Minus) != (denominator.sign() == Sign::Minus);
        Ok(Self::from_parts(
            negative && !numerator.is_zero(),
            numerator.magnitude().clone(),
            denominator.magnitude().clone(),
        ))
    }

    /// Builds a finite rational from a sign and magnitudes; the denominator
    /// must be non-zero.
    pub(crate) fn from_parts(negative: bool, numerator: BigUint, denominator: BigUint) -> Self {
        let g = numerator.gcd(&denominator);
        let (numerator, denominator) = if numerator.is_zero() {
            (numerator, BigUint::one())
        } else if g.is_one() {
            (numerator, denominator)
        } else {
            (numerator / &g, denominator / &g)
        };
        Self {
            negative,
            special: Special::Finite,
            numerator,
            denominator,
        }
    }

    fn from_signed(numerator: BigInt, denominator: BigUint) -> Self {
        let (sign, magnitude) = numerator.into_parts();
        Self::from_parts(sign == Sign::Minus, magnitude, denominator)
    }

    pub fn from_bigint(value: &BigInt) -> Self {
        Self::from_signed(value.clone(), BigUint::one())
    }

    pub fn zero(negative: bool) -> Self {
        Self::from_parts(negative, BigUint::zero(), BigUint::one())
    }

    pub fn infinity(negative: bool) -> Self {
        Self {
            negative,
            special: Special::Infinity,
            numerator: BigUint::zero(),
            denominator: BigUint::one(),
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
            numerator: payload,
            denominator: BigUint::one(),
        }
    }

    fn quiet_nan() -> Self {
        Self::nan(false, false, BigUint::zero())
    }

    pub fn special(&self) -> Special {
        self.special
    }

    /// The numerator magnitude, or the NaN payload.
    pub fn numerator(&self) -> &BigUint {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigUint {
        &self.denominator
    }

    fn signed_numerator(&self) -> BigInt {
        let sign = if self.negative { Sign::Minus } else { Sign::Plus };
        BigInt::from_biguint(sign, self.numerator.clone())
    }

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
        self.is_finite() && self.numerator.is_zero()
    }

    pub fn is_integral(&self) -> bool {
        self.is_finite() && self.denominator.is_one()
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

    fn propagate_nan(&self, other: &Self) -> Self {
        let nan = if self.is_nan() { self } else { other };
        Self {
            special: Special::QuietNan,
            ..nan.clone()
        }
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
        let numerator = self.signed_numerator() * BigInt::from(other.denominator.clone())
            + other.signed_numerator() * BigInt::from(self.denominator.clone());
        Ok(Self::from_signed(
            numerator,
            &self.denominator * &other.denominator,
        ))
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
        Ok(Self::from_parts(
            negative,
            &self.numerator * &other.numerator,
            &self.denominator * &other.denominator,
        ))
    }

    pub fn divide(&self, other: &Self) -> Result<Self> {
        if self.is_nan() || other.is_nan() {
            return Ok(self.propagate_nan(other));
        }
        let negative = self.negative != other.negative;
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => return Ok(Self::quiet_nan()),
            (true, false) => return Ok(Self::infinity(negative)),
            (false, true) => return Ok(Self::zero(negative)),
            _ => {}
        }
        if other.is_zero() {
            return Ok(if self.is_zero() {
                Self::quiet_nan()
            } else {
                Self::infinity(negative)
            });
        }
        Ok(Self::from_parts(
            negative,
            &self.numerator * &other.denominator,
            &self.denominator * &other.numerator,
        ))
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
        // |a| - |b| * trunc(|a| / |b|), over the common denominator
        let a = &self.numerator * &other.denominator;
        let b = &other.numerator * &self.denominator;
        let r = a % b;
        Ok(Self::from_parts(
            self.negative,
            r,
            &self.denominator * &other.denominator,
        ))
    }

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
        let magnitude = match (self.is_infinite(), other.is_infinite()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator)),
        };
        if sa < 0 {
            magnitude.reverse()
        } else {
            magnitude
        }
    }

    /// The integer part, truncated toward zero.
    pub fn to_bigint(&self) -> Result<BigInt> {
        if !self.is_finite() {
            return Err(Error::Overflow("integer"));
        }
        let sign = if self.negative { Sign::Minus } else { Sign::Plus };
        Ok(BigInt::from_biguint(
            sign,
            &self.numerator / &self.denominator,
        ))
    }

    pub(crate) fn wrapping_u64(&self) -> u64 {
        if !self.is_finite() {
            return 0;
        }
        let magnitude = &self.numerator / &self.denominator;
        let low = magnitude.iter_u64_digits().next().unwrap_or(0);
        if self.negative {
            low.wrapping_neg()
        } else {
            low
        }
    }

    fn to_scaled<const R: u32>(&self, precision: u64) -> Result<Scaled<R>> {
        match self.special {
            Special::Infinity => Ok(Scaled::infinity(self.negative)),
            Special::QuietNan | Special::SignalingNan => Ok(Scaled::nan(
                self.negative,
                self.is_signaling(),
                self.numerator.clone(),
            )),
            Special::Finite => {
                Scaled::from_ratio(self.negative, &self.numerator, &self.denominator, precision)
            }
        }
    }

    /// The decimal value, exact when it terminates, otherwise rounded to
    /// [`DECIMAL_PRECISION`] digits.
    pub fn to_decimal(&self) -> Result<BigDecimal> {
        self.to_scaled(DECIMAL_PRECISION)
    }

    /// The binary value, exact when it terminates, otherwise rounded to
    /// [`BINARY_PRECISION`] bits.
    pub fn to_big_float(&self) -> Result<BigFloat> {
        self.to_scaled(BINARY_PRECISION)
    }

    pub fn to_f64(&self) -> f64 {
        let sign = if self.negative { -1.0 } else { 1.0 };
        match self.special {
            Special::Infinity => sign * f64::INFINITY,
            Special::QuietNan | Special::SignalingNan => f64::NAN.copysign(sign),
            Special::Finite => {
                convert::ratio_to_f64(self.negative, &self.numerator, &self.denominator)
            }
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        match self.special {
            Special::Infinity => write!(f, "{sign}Infinity"),
            Special::QuietNan | Special::SignalingNan => {
                let name = if self.is_signaling() { "sNaN" } else { "NaN" };
                if self.numerator.is_zero() {
                    write!(f, "{sign}{name}")
                } else {
                    write!(f, "{sign}{name}{}", self.numerator)
                }
            }
            Special::Finite if self.denominator.is_one() => {
                write!(f, "{sign}{}", self.numerator)
            }
            Special::Finite => write!(f, "{sign}{}/{}", self.numerator, self.denominator),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(&BigInt::from(n), &BigInt::from(d)).unwrap()
    }

    #[test]
    fn lowest_terms() {
        assert_eq!(r(2, 4), r(1, 2));
        assert_eq!(r(-3, 6).to_string(), "-1/2");
        assert_eq!(r(3, -6).to_string(), "-1/2");
        assert_eq!(r(6, 3).to_string(), "2");
        assert!(Rational::new(&BigInt::from(1), &BigInt::zero()).is_err());
    }

    #[test]
    fn arithmetic() {
        assert_eq!(r(1, 3).add(&r(1, 6)).unwrap(), r(1, 2));
        assert_eq!(r(1, 3).subtract(&r(1, 2)).unwrap(), r(-1, 6));
        assert_eq!(r(2, 3).multiply(&r(3, 4)).unwrap(), r(1, 2));
        assert_eq!(r(1, 2).divide(&r(1, 4)).unwrap(), r(2, 1));
        assert_eq!(r(7, 2).remainder(&r(1, 1)).unwrap(), r(1, 2));
        assert_eq!(r(-7, 2).remainder(&r(1, 1)).unwrap(), r(-1, 2));
    }

    #[test]
    fn ordering() {
        assert_eq!(r(1, 3).compare(&r(2, 6)), Ordering::Equal);
        assert_eq!(r(-1, 3).compare(&r(-1, 4)), Ordering::Less);
        assert_eq!(Rational::infinity(true).compare(&r(-100, 1)), Ordering::Less);
        assert_eq!(Rational::quiet_nan().compare(&Rational::infinity(false)), Ordering::Greater);
    }

    #[test]
    fn conversions() {
        assert_eq!(r(1, 3).to_f64(), 1.0 / 3.0);
        assert_eq!(r(-7, 2).to_bigint().unwrap(), BigInt::from(-3));
        assert_eq!(r(1, 8).to_decimal().unwrap().to_string(), "0.125");
        assert_eq!(r(3, 4).to_big_float().unwrap().to_f64(), 0.75);
        assert_eq!(r(-7, 2).wrapping_u64(), (-3i64) as u64);
    }
}
