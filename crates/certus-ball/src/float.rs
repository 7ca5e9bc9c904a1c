//! Arbitrary-precision binary floating point.
//!
//! This module wraps `dashu`'s unsigned bignums into a signed binary float
//! `(-1)^neg * man * 2^exp` with an odd (or zero) significand. Unlike a
//! conventional float there is no precision attached to a value: operators
//! (`+`, `-`, `*`) are *exact*, and the precision-bounded methods
//! ([`Float::add`], [`Float::mul`], [`Float::div`], ...) return the rounded
//! result together with a rigorous [`Magnitude`] bound on the rounding error.
//! The ball layer absorbs that bound into its radius.

use dashu::base::{BitTest, Signed as DashuSigned, UnsignedAbs};
use dashu::integer::{IBig, UBig};
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::magnitude::Magnitude;

/// An exact `f64` power of two, saturating outside the representable range.
pub(crate) fn pow2_f64(e: i64) -> f64 {
    if e < -1074 {
        0.0
    } else if e < -1022 {
        f64::from_bits(1u64 << (e + 1074))
    } else if e > 1023 {
        f64::INFINITY
    } else {
        f64::from_bits(((e + 1023) as u64) << 52)
    }
}

/// A signed arbitrary-precision binary float, `(-1)^neg * man * 2^exp`.
///
/// Canonical form: `man` is odd or zero; zero is represented as
/// `{neg: false, man: 0, exp: 0}`, so the derived equality is exact.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Float {
    neg: bool,
    man: UBig,
    exp: i64,
}

impl Float {
    /// The exact value 0.
    #[must_use]
    pub fn zero() -> Self {
        Float {
            neg: false,
            man: UBig::ZERO,
            exp: 0,
        }
    }

    /// The exact value 1.
    #[must_use]
    pub fn one() -> Self {
        Float {
            neg: false,
            man: UBig::ONE,
            exp: 0,
        }
    }

    /// The exact value of a machine integer.
    #[must_use]
    pub fn from_i64(v: i64) -> Self {
        let neg = v < 0;
        Self::normalized(neg, UBig::from(v.unsigned_abs()), 0)
    }

    /// The exact value of a finite `f64`.
    ///
    /// Every finite `f64` is a dyadic rational, so no rounding occurs.
    /// Non-finite input maps to zero.
    #[must_use]
    pub fn from_f64(x: f64) -> Self {
        if x == 0.0 || !x.is_finite() {
            return Float::zero();
        }
        let bits = x.abs().to_bits();
        let biased = (bits >> 52) & 0x7ff;
        let frac = bits & ((1u64 << 52) - 1);
        let (man, e) = if biased == 0 {
            (frac, -1074i64)
        } else {
            (frac | (1u64 << 52), biased as i64 - 1075)
        };
        Self::normalized(x < 0.0, UBig::from(man), e)
    }

    /// True if this is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.man == UBig::ZERO
    }

    /// True if this value is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.neg
    }

    /// Number of significant bits in the significand.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.man.bit_len()
    }

    /// The absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Float {
            neg: false,
            man: self.man.clone(),
            exp: self.exp,
        }
    }

    /// Exact scaling by `2^e`.
    #[must_use]
    pub fn mul_2exp(&self, e: i64) -> Self {
        if self.is_zero() {
            return Float::zero();
        }
        Float {
            neg: self.neg,
            man: self.man.clone(),
            exp: self.exp + e,
        }
    }

    /// Smallest `e` with `|self| < 2^e`. Meaningless for zero.
    fn exp_upper(&self) -> i64 {
        self.exp + self.bit_len() as i64
    }

    /// Rounds to `prec` significant bits (toward zero), returning the result
    /// and an upper bound on the discarded part.
    #[must_use]
    pub fn rounded(&self, prec: usize) -> (Self, Magnitude) {
        let bl = self.bit_len();
        if bl <= prec {
            return (self.clone(), Magnitude::Zero);
        }
        let sh = bl - prec;
        let man = self.man.clone() >> sh;
        let err = Magnitude::pow2(self.exp + sh as i64);
        (Self::normalized(self.neg, man, self.exp + sh as i64), err)
    }

    /// Addition rounded to `prec` bits, with a rigorous rounding bound.
    #[must_use]
    pub fn add(&self, other: &Self, prec: usize) -> (Self, Magnitude) {
        if self.is_zero() {
            return other.rounded(prec);
        }
        if other.is_zero() {
            return self.rounded(prec);
        }
        let (hi, lo) = if self.exp_upper() >= other.exp_upper() {
            (self, other)
        } else {
            (other, self)
        };
        // If the smaller operand sits entirely below the target precision,
        // absorb it into the error bound instead of aligning significands.
        if lo.exp_upper() < hi.exp_upper() - prec as i64 - 4 {
            let (r, e) = hi.rounded(prec);
            return (r, &e + &Magnitude::pow2(lo.exp_upper()));
        }
        self.exact_add(other).rounded(prec)
    }

    /// Subtraction rounded to `prec` bits, with a rigorous rounding bound.
    #[must_use]
    pub fn sub(&self, other: &Self, prec: usize) -> (Self, Magnitude) {
        self.add(&-other, prec)
    }

    /// Multiplication rounded to `prec` bits, with a rigorous rounding bound.
    #[must_use]
    pub fn mul(&self, other: &Self, prec: usize) -> (Self, Magnitude) {
        if self.is_zero() || other.is_zero() {
            return (Float::zero(), Magnitude::Zero);
        }
        let man = &self.man * &other.man;
        Self::normalized(self.neg != other.neg, man, self.exp + other.exp).rounded(prec)
    }

    /// Division rounded to `prec` bits, with a rigorous rounding bound.
    ///
    /// Division by exact zero returns `(0, Infinity)`; the caller decides
    /// what an unbounded quotient means (the ball layer returns a non-finite
    /// ball before ever reaching this case).
    #[must_use]
    pub fn div(&self, other: &Self, prec: usize) -> (Self, Magnitude) {
        if other.is_zero() {
            return (Float::zero(), Magnitude::Infinity);
        }
        if self.is_zero() {
            return (Float::zero(), Magnitude::Zero);
        }
        let bl_a = self.bit_len() as i64;
        let bl_b = other.bit_len() as i64;
        let s = (prec as i64 + 2 + bl_b - bl_a).max(0) as usize;
        let q = (self.man.clone() << s) / &other.man;
        let exp = self.exp - other.exp - s as i64;
        // Floor division of the magnitudes: at most one unit in 2^exp.
        let err = Magnitude::pow2(exp);
        let (r, round_err) = Self::normalized(self.neg != other.neg, q, exp).rounded(prec);
        (r, &err + &round_err)
    }

    /// An upper bound for `|self|`.
    #[must_use]
    pub fn mag_upper(&self) -> Magnitude {
        self.mag_bound(true)
    }

    /// A lower bound for `|self|`.
    #[must_use]
    pub fn mag_lower(&self) -> Magnitude {
        self.mag_bound(false)
    }

    fn mag_bound(&self, upper: bool) -> Magnitude {
        if self.is_zero() {
            return Magnitude::Zero;
        }
        let bl = self.bit_len();
        let sh = bl.saturating_sub(32);
        let top = self.man.clone() >> sh;
        let t = u64::try_from(top).unwrap_or(u64::MAX);
        let e = self.exp + sh as i64 + 32;
        if upper {
            let bump = u128::from(sh > 0);
            Magnitude::normalize_up(u128::from(t) + bump, e)
        } else {
            Magnitude::normalize_down(u128::from(t), e)
        }
    }

    /// An `f64` approximation (round toward zero), saturating on overflow.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let bl = self.bit_len();
        let sh = bl.saturating_sub(53);
        let top = self.man.clone() >> sh;
        let t = u64::try_from(top).unwrap_or(u64::MAX) as f64;
        let r = t * pow2_f64(self.exp + sh as i64);
        if self.neg {
            -r
        } else {
            r
        }
    }

    fn exact_add(&self, other: &Self) -> Self {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let e = self.exp.min(other.exp);
        let sum = self.to_ibig_scaled(e) + other.to_ibig_scaled(e);
        Self::from_ibig(sum, e)
    }

    fn to_ibig_scaled(&self, e: i64) -> IBig {
        let sh = (self.exp - e) as usize;
        let m = IBig::from(self.man.clone()) << sh;
        if self.neg {
            -m
        } else {
            m
        }
    }

    fn from_ibig(v: IBig, exp: i64) -> Self {
        let neg = DashuSigned::is_negative(&v);
        Self::normalized(neg, v.unsigned_abs(), exp)
    }

    /// Canonicalizes: strips trailing zero bits, fixes the zero encoding.
    fn normalized(neg: bool, mut man: UBig, mut exp: i64) -> Self {
        if man == UBig::ZERO {
            return Float::zero();
        }
        let mut tz = 0usize;
        while !man.bit(tz) {
            tz += 1;
        }
        if tz > 0 {
            man = man >> tz;
            exp += tz as i64;
        }
        Float { neg, man, exp }
    }
}

impl Add for &Float {
    type Output = Float;

    /// Exact addition (no rounding).
    fn add(self, rhs: &Float) -> Float {
        self.exact_add(rhs)
    }
}

impl Add for Float {
    type Output = Float;

    fn add(self, rhs: Float) -> Float {
        &self + &rhs
    }
}

impl Sub for &Float {
    type Output = Float;

    /// Exact subtraction (no rounding).
    fn sub(self, rhs: &Float) -> Float {
        self.exact_add(&-rhs)
    }
}

impl Sub for Float {
    type Output = Float;

    fn sub(self, rhs: Float) -> Float {
        &self - &rhs
    }
}

impl Mul for &Float {
    type Output = Float;

    /// Exact multiplication (no rounding).
    fn mul(self, rhs: &Float) -> Float {
        if self.is_zero() || rhs.is_zero() {
            return Float::zero();
        }
        Float::normalized(
            self.neg != rhs.neg,
            &self.man * &rhs.man,
            self.exp + rhs.exp,
        )
    }
}

impl Mul for Float {
    type Output = Float;

    fn mul(self, rhs: Float) -> Float {
        &self * &rhs
    }
}

impl Neg for &Float {
    type Output = Float;

    fn neg(self) -> Float {
        if self.is_zero() {
            return Float::zero();
        }
        Float {
            neg: !self.neg,
            man: self.man.clone(),
            exp: self.exp,
        }
    }
}

impl Neg for Float {
    type Output = Float;

    fn neg(self) -> Float {
        -&self
    }
}

impl Zero for Float {
    fn zero() -> Self {
        Float::zero()
    }

    fn is_zero(&self) -> bool {
        Float::is_zero(self)
    }
}

impl One for Float {
    fn one() -> Self {
        Float::one()
    }

    fn is_one(&self) -> bool {
        !self.neg && self.man == UBig::ONE && self.exp == 0
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64_exact() {
        let x = Float::from_f64(0.75);
        assert_eq!(x.to_f64(), 0.75);
        let y = Float::from_f64(-3.5);
        assert_eq!(y.to_f64(), -3.5);
        assert!(y.is_negative());
    }

    #[test]
    fn test_exact_operators() {
        let a = Float::from_f64(1.5);
        let b = Float::from_f64(0.25);
        assert_eq!((&a + &b).to_f64(), 1.75);
        assert_eq!((&a - &b).to_f64(), 1.25);
        assert_eq!((&a * &b).to_f64(), 0.375);
    }

    #[test]
    fn test_rounded_reports_error() {
        // 2^70 + 1 does not fit in 16 bits
        let big = Float::from_i64(1).mul_2exp(70);
        let x = &big + &Float::one();
        let (r, err) = x.rounded(16);
        assert!(r.bit_len() <= 16);
        assert!(!err.is_zero());
        // the discarded part is at most the reported bound
        let diff = (&x - &r).abs();
        assert!(diff.mag_upper() <= err);
    }

    #[test]
    fn test_add_far_apart_scales() {
        let big = Float::from_i64(1).mul_2exp(200);
        let tiny = Float::from_i64(1).mul_2exp(-200);
        let (r, err) = Float::add(&big, &tiny, 64);
        assert_eq!(r, big);
        assert!(!err.is_zero());
        assert!(err <= Magnitude::pow2(-150));
    }

    #[test]
    fn test_div_bound() {
        let a = Float::from_i64(1);
        let b = Float::from_i64(3);
        let (q, err) = a.div(&b, 64);
        // q ≈ 1/3 within the reported error
        let back = &(&q * &b) - &a;
        let three = Magnitude::from_u64_upper(3);
        assert!(back.mag_upper() <= &err * &three);
        assert!((q.to_f64() - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_div_by_zero() {
        let (_, err) = Float::one().div(&Float::zero(), 64);
        assert_eq!(err, Magnitude::Infinity);
    }

    #[test]
    fn test_mag_bounds_bracket() {
        let x = Float::from_f64(0.1);
        let lo = x.mag_lower().to_f64();
        let hi = x.mag_upper().to_f64();
        assert!(lo <= 0.1 && 0.1 <= hi);
    }
}
