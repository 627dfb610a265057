use crate::error::{Error, Result};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

/// Largest power of ten a backend operation will materialize.
pub const MAX_SCALE_DIGITS: u64 = 100_000;

/// Largest power of two a backend operation will materialize.
pub const MAX_SCALE_BITS: u64 = 1 << 22;

const LOG10_2: f64 = core::f64::consts::LOG10_2;

pub(crate) fn pow10(n: u64) -> Result<BigUint> {
    if n > MAX_SCALE_DIGITS {
        return Err(Error::ResourceExhausted("decimal scale too large"));
    }
    Ok(BigUint::from(10u8).pow(n as u32))
}

pub(crate) fn pow5(n: u64) -> Result<BigUint> {
    if n > MAX_SCALE_DIGITS {
        return Err(Error::ResourceExhausted("decimal scale too large"));
    }
    Ok(BigUint::from(5u8).pow(n as u32))
}

pub(crate) fn shl(m: &BigUint, n: u64) -> Result<BigUint> {
    if n > MAX_SCALE_BITS {
        return Err(Error::ResourceExhausted("binary scale too large"));
    }
    Ok(m << n as usize)
}

/// Number of decimal digits in `m`, 1 for zero.
pub(crate) fn digit_count(m: &BigUint) -> u64 {
    if let Some(small) = m.to_u64() {
        return small.checked_ilog10().map_or(1, |d| d as u64 + 1);
    }
    // The estimate is exact or one short
    let estimate = ((m.bits() - 1) as f64 * LOG10_2) as u64 + 1;
    if *m >= BigUint::from(10u8).pow(estimate as u32) {
        estimate + 1
    } else {
        estimate
    }
}

/// `log2(m)` from the leading 64 bits, for non-zero `m`.
pub(crate) fn log2_magnitude(m: &BigUint) -> f64 {
    let bits = m.bits();
    if bits <= 64 {
        return m.to_u64().map_or(f64::NAN, |v| (v as f64).log2());
    }
    let lead = (m >> (bits - 64) as usize).to_u64().unwrap_or(u64::MAX);
    (lead as f64).log2() + (bits - 64) as f64
}

/// Divides `m` by `divisor`, rounding half to even. A non-zero `sticky`
/// means the true dividend is slightly larger than `m`.
pub(crate) fn div_round_half_even(m: &BigUint, divisor: &BigUint, sticky: bool) -> BigUint {
    let (q, r) = m.div_rem(divisor);
    let twice = &r << 1usize;
    match twice.cmp(divisor) {
        core::cmp::Ordering::Greater => q + 1u8,
        core::cmp::Ordering::Equal if sticky || q.is_odd() => q + 1u8,
        _ => q,
    }
}

/// Splits a finite double into `(negative, mantissa, exponent)` with
/// `value = mantissa * 2^exponent`.
pub(crate) fn decompose_f64(f: f64) -> (bool, u64, i64) {
    let bits = f.to_bits();
    let negative = bits >> 63 != 0;
    let biased = ((bits >> 52) & 0x7FF) as i64;
    let fraction = bits & ((1 << 52) - 1);
    if biased == 0 {
        (negative, fraction, -1074)
    } else {
        (negative, fraction | (1 << 52), biased - 1075)
    }
}

fn signed(negative: bool, f: f64) -> f64 {
    if negative { -f } else { f }
}

/// Rounds `num / den` to the nearest double, ties to even.
pub(crate) fn ratio_to_f64(negative: bool, num: &BigUint, den: &BigUint) -> f64 {
    if num.is_zero() {
        return signed(negative, 0.0);
    }
    // value lies in [2^(e-1), 2^(e+1))
    let e = num.bits() as i64 - den.bits() as i64;
    if e > 1024 {
        return signed(negative, f64::INFINITY);
    }
    if e < -1076 {
        return signed(negative, 0.0);
    }

    // Scale so the quotient carries 55 or 56 significant bits
    let s = 55 - e;
    let (q, r) = if s >= 0 {
        (num << s as usize).div_rem(den)
    } else {
        num.div_rem(&(den << (-s) as usize))
    };
    let sticky = !r.is_zero();
    let Some(q) = q.to_u128() else {
        return signed(negative, f64::INFINITY);
    };

    let q_bits = 128 - q.leading_zeros() as i64;
    let mut drop = (q_bits - 53).max(s - 1074);
    let mut m = q >> drop;
    let rest = q & ((1u128 << drop) - 1);
    let half = 1u128 << (drop - 1);
    if rest > half || (rest == half && (sticky || m & 1 == 1)) {
        m += 1;
    }
    if m == 1 << 53 {
        m >>= 1;
        drop += 1;
    }

    let bits = if m >= 1 << 52 {
        let exp = 52 + drop - s;
        if exp > 1023 {
            return signed(negative, f64::INFINITY);
        }
        (((exp + 1023) as u64) << 52) | (m as u64 & ((1 << 52) - 1))
    } else {
        // Subnormal: the scale was chosen so the last bit weighs 2^-1074
        m as u64
    };
    signed(negative, f64::from_bits(bits))
}
