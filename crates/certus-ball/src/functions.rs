//! Verified elementary functions on balls.
//!
//! Each function evaluates its Taylor series directly in ball arithmetic, so
//! argument uncertainty and rounding propagate into the radius automatically,
//! and then adds a rigorous bound on the truncated tail. Arguments too large
//! for the series to be driven below the working precision yield a
//! non-finite ball: a sound "don't know", never a wrong enclosure.

use crate::complex::ComplexBall;
use crate::magnitude::Magnitude;
use crate::real::RealBall;

/// Iteration cap for the series loops; reached only for arguments so large
/// that a non-finite result is the right answer anyway.
const SERIES_MAX_TERMS: i64 = 10_000;

/// The exponential `e^z` as a rigorous enclosure.
#[must_use]
pub fn exp(z: &ComplexBall, prec: usize) -> ComplexBall {
    let wp = prec + 16;
    let r = z.mag_upper();
    if !r.is_finite() {
        return ComplexBall::non_finite();
    }
    let mut sum = ComplexBall::one();
    let mut term = ComplexBall::one();
    let mut bound = Magnitude::from_u64_upper(1);
    let mut k: i64 = 1;
    loop {
        if k > SERIES_MAX_TERMS {
            return ComplexBall::non_finite();
        }
        term = term.mul(z, wp).div_i64(k, wp);
        sum = sum.add(&term, wp);
        bound = (&bound * &r).div_lower(&Magnitude::from_u64_lower(k as u64));
        // Tail ≤ bound once the term ratio r/(k+1) has dropped to 1/2.
        let half_next = Magnitude::from_u64_lower(((k + 1) / 2) as u64);
        if r <= half_next && bound <= Magnitude::pow2(-(wp as i64)) {
            sum.add_error(&bound, &bound);
            return sum;
        }
        k += 1;
    }
}

/// The sine `sin z` as a rigorous enclosure.
#[must_use]
pub fn sin(z: &ComplexBall, prec: usize) -> ComplexBall {
    let wp = prec + 16;
    let r = z.mag_upper();
    if !r.is_finite() {
        return ComplexBall::non_finite();
    }
    let r2 = &r * &r;
    let neg_z2 = z.mul(z, wp).neg();
    let mut sum = z.clone();
    let mut term = z.clone();
    let mut bound = r.clone();
    let mut k: i64 = 1;
    loop {
        if k > SERIES_MAX_TERMS {
            return ComplexBall::non_finite();
        }
        term = term.mul(&neg_z2, wp).div_i64(2 * k, wp).div_i64(2 * k + 1, wp);
        sum = sum.add(&term, wp);
        let den = (2 * k) * (2 * k + 1);
        bound = (&bound * &r2).div_lower(&Magnitude::from_u64_lower(den as u64));
        let half_next = ((2 * k + 2) * (2 * k + 3) / 2) as u64;
        if r2 <= Magnitude::from_u64_lower(half_next)
            && bound <= Magnitude::pow2(-(wp as i64))
        {
            sum.add_error(&bound, &bound);
            return sum;
        }
        k += 1;
    }
}

/// The cosine `cos z` as a rigorous enclosure.
#[must_use]
pub fn cos(z: &ComplexBall, prec: usize) -> ComplexBall {
    let wp = prec + 16;
    let r = z.mag_upper();
    if !r.is_finite() {
        return ComplexBall::non_finite();
    }
    let r2 = &r * &r;
    let neg_z2 = z.mul(z, wp).neg();
    let mut sum = ComplexBall::one();
    let mut term = ComplexBall::one();
    let mut bound = Magnitude::from_u64_upper(1);
    let mut k: i64 = 1;
    loop {
        if k > SERIES_MAX_TERMS {
            return ComplexBall::non_finite();
        }
        term = term.mul(&neg_z2, wp).div_i64(2 * k - 1, wp).div_i64(2 * k, wp);
        sum = sum.add(&term, wp);
        let den = (2 * k - 1) * (2 * k);
        bound = (&bound * &r2).div_lower(&Magnitude::from_u64_lower(den as u64));
        let half_next = ((2 * k + 1) * (2 * k + 2) / 2) as u64;
        if r2 <= Magnitude::from_u64_lower(half_next)
            && bound <= Magnitude::pow2(-(wp as i64))
        {
            sum.add_error(&bound, &bound);
            return sum;
        }
        k += 1;
    }
}

/// A rigorous enclosure of π, via Machin's formula
/// `π = 16·atan(1/5) − 4·atan(1/239)`.
#[must_use]
pub fn pi(prec: usize) -> RealBall {
    let wp = prec + 32;
    let a5 = atan_recip(5, wp);
    let a239 = atan_recip(239, wp);
    a5.mul_2exp(4).sub(&a239.mul_2exp(2), wp)
}

/// `atan(1/q)` for integer `q ≥ 2` by the alternating Gregory series; the
/// tail is bounded by the first omitted term.
fn atan_recip(q: i64, wp: usize) -> RealBall {
    let qq = q * q;
    let mut sum = RealBall::zero();
    // p = 1/q^(2k+1)
    let mut p = RealBall::one().div_i64(q, wp);
    let mut k: i64 = 0;
    loop {
        let term = p.div_i64(2 * k + 1, wp);
        sum = if k % 2 == 0 {
            sum.add(&term, wp)
        } else {
            sum.sub(&term, wp)
        };
        p = p.div_i64(qq, wp);
        if p.mag_upper() <= Magnitude::pow2(-(wp as i64)) || k > SERIES_MAX_TERMS {
            sum.add_error(&p.mag_upper());
            return sum;
        }
        k += 1;
    }
}
