//! Complex balls: a pair of real balls enclosing a complex number.

use std::fmt;

use crate::magnitude::Magnitude;
use crate::real::RealBall;

/// A complex number enclosed part-wise: `re` and `im` are independent
/// [`RealBall`]s, so the enclosed region is an axis-aligned box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexBall {
    re: RealBall,
    im: RealBall,
}

impl ComplexBall {
    /// A ball from real and imaginary parts.
    #[must_use]
    pub fn new(re: RealBall, im: RealBall) -> Self {
        ComplexBall { re, im }
    }

    /// A purely real ball.
    #[must_use]
    pub fn from_real(re: RealBall) -> Self {
        ComplexBall {
            re,
            im: RealBall::zero(),
        }
    }

    /// The exact real value of a machine integer.
    #[must_use]
    pub fn from_i64(v: i64) -> Self {
        Self::from_real(RealBall::from_i64(v))
    }

    /// The exact real value of a finite `f64`.
    #[must_use]
    pub fn from_f64(x: f64) -> Self {
        Self::from_real(RealBall::from_f64(x))
    }

    /// The exact value 0.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_real(RealBall::zero())
    }

    /// The exact value 1.
    #[must_use]
    pub fn one() -> Self {
        Self::from_real(RealBall::one())
    }

    /// The whole complex plane: both parts have infinite radius.
    #[must_use]
    pub fn non_finite() -> Self {
        ComplexBall {
            re: RealBall::non_finite(),
            im: RealBall::non_finite(),
        }
    }

    /// The real part.
    #[must_use]
    pub fn re(&self) -> &RealBall {
        &self.re
    }

    /// The imaginary part.
    #[must_use]
    pub fn im(&self) -> &RealBall {
        &self.im
    }

    /// True if both radii are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// True if the imaginary part is exactly zero, so the enclosed value is
    /// certainly real.
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.im.is_zero()
    }

    /// True if the box possibly contains zero (conservative, like
    /// [`RealBall::contains_zero`]).
    #[must_use]
    pub fn contains_zero(&self) -> bool {
        self.re.contains_zero() && self.im.contains_zero()
    }

    /// Forces the imaginary part to exact zero.
    ///
    /// Only sound when the enclosed value is known to be real on other
    /// grounds (the caller's responsibility).
    pub fn zero_imag(&mut self) {
        self.im = RealBall::zero();
    }

    /// Inflates the real radius by `re_err` and the imaginary radius by
    /// `im_err`.
    pub fn add_error(&mut self, re_err: &Magnitude, im_err: &Magnitude) {
        self.re.add_error(re_err);
        self.im.add_error(im_err);
    }

    /// An upper bound on the combined real/imaginary radius.
    #[must_use]
    pub fn rad_mag(&self) -> Magnitude {
        self.re.rad() + self.im.rad()
    }

    /// An upper bound for `|z|` over the box (via `|re| + |im|`).
    #[must_use]
    pub fn mag_upper(&self) -> Magnitude {
        &self.re.mag_upper() + &self.im.mag_upper()
    }

    /// A lower bound for `|z|` over the box (via `max(|re|, |im|)`).
    #[must_use]
    pub fn mag_lower(&self) -> Magnitude {
        self.re.mag_lower().max(self.im.mag_lower())
    }

    /// Ball addition at `prec` bits.
    #[must_use]
    pub fn add(&self, other: &Self, prec: usize) -> Self {
        ComplexBall {
            re: self.re.add(&other.re, prec),
            im: self.im.add(&other.im, prec),
        }
    }

    /// Ball subtraction at `prec` bits.
    #[must_use]
    pub fn sub(&self, other: &Self, prec: usize) -> Self {
        ComplexBall {
            re: self.re.sub(&other.re, prec),
            im: self.im.sub(&other.im, prec),
        }
    }

    /// Ball negation (exact).
    #[must_use]
    pub fn neg(&self) -> Self {
        ComplexBall {
            re: self.re.neg(),
            im: self.im.neg(),
        }
    }

    /// Ball multiplication at `prec` bits.
    #[must_use]
    pub fn mul(&self, other: &Self, prec: usize) -> Self {
        let ac = self.re.mul(&other.re, prec);
        let bd = self.im.mul(&other.im, prec);
        let ad = self.re.mul(&other.im, prec);
        let bc = self.im.mul(&other.re, prec);
        ComplexBall {
            re: ac.sub(&bd, prec),
            im: ad.add(&bc, prec),
        }
    }

    /// Ball reciprocal `1/z` at `prec` bits.
    ///
    /// Returns [`ComplexBall::non_finite`] when the box meets zero;
    /// reciprocation is total and never signals an error.
    #[must_use]
    pub fn recip(&self, prec: usize) -> Self {
        if self.contains_zero() {
            return ComplexBall::non_finite();
        }
        let d = self
            .re
            .mul(&self.re, prec)
            .add(&self.im.mul(&self.im, prec), prec);
        ComplexBall {
            re: self.re.div(&d, prec),
            im: self.im.neg().div(&d, prec),
        }
    }

    /// Ball division by a machine integer at `prec` bits.
    #[must_use]
    pub fn div_i64(&self, v: i64, prec: usize) -> Self {
        ComplexBall {
            re: self.re.div_i64(v, prec),
            im: self.im.div_i64(v, prec),
        }
    }

    /// Exact scaling by `2^e`.
    #[must_use]
    pub fn mul_2exp(&self, e: i64) -> Self {
        ComplexBall {
            re: self.re.mul_2exp(e),
            im: self.im.mul_2exp(e),
        }
    }
}

impl fmt::Display for ComplexBall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} + {}i)", self.re, self.im)
    }
}
