//! Real balls: midpoint plus guaranteed error radius.

use std::fmt;

use crate::float::Float;
use crate::magnitude::Magnitude;

/// A real number known to lie in `[mid - rad, mid + rad]`.
///
/// Every operation preserves that invariant: midpoint rounding is absorbed
/// into the radius, and radius arithmetic always rounds up. A radius of
/// [`Magnitude::Infinity`] is the "no information" element: it encloses the
/// whole real line and propagates through arithmetic without ever causing an
/// error path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RealBall {
    mid: Float,
    rad: Magnitude,
}

impl RealBall {
    /// A ball with the given midpoint and radius.
    #[must_use]
    pub fn new(mid: Float, rad: Magnitude) -> Self {
        RealBall { mid, rad }
    }

    /// An exact (zero-radius) ball.
    #[must_use]
    pub fn from_float(mid: Float) -> Self {
        RealBall {
            mid,
            rad: Magnitude::Zero,
        }
    }

    /// The exact value of a finite `f64`.
    #[must_use]
    pub fn from_f64(x: f64) -> Self {
        Self::from_float(Float::from_f64(x))
    }

    /// The exact value of a machine integer.
    #[must_use]
    pub fn from_i64(v: i64) -> Self {
        Self::from_float(Float::from_i64(v))
    }

    /// The exact value 0.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_float(Float::zero())
    }

    /// The exact value 1.
    #[must_use]
    pub fn one() -> Self {
        Self::from_float(Float::one())
    }

    /// The whole real line: zero midpoint, infinite radius.
    #[must_use]
    pub fn non_finite() -> Self {
        RealBall {
            mid: Float::zero(),
            rad: Magnitude::Infinity,
        }
    }

    /// The midpoint.
    #[must_use]
    pub fn mid(&self) -> &Float {
        &self.mid
    }

    /// The radius.
    #[must_use]
    pub fn rad(&self) -> &Magnitude {
        &self.rad
    }

    /// True if this is exactly zero (zero midpoint and radius).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mid.is_zero() && self.rad.is_zero()
    }

    /// True if the radius is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.rad.is_finite()
    }

    /// True if the ball certainly or possibly contains zero.
    ///
    /// Never returns `false` when zero is actually enclosed; may return
    /// `true` for a ball whose midpoint barely clears the radius (a sound,
    /// conservative answer).
    #[must_use]
    pub fn contains_zero(&self) -> bool {
        self.mid.mag_lower() <= self.rad
    }

    /// The certain sign of every point in the ball, or `None` if the ball
    /// meets zero.
    #[must_use]
    pub fn sign_certain(&self) -> Option<i8> {
        if self.contains_zero() {
            None
        } else if self.mid.is_negative() {
            Some(-1)
        } else {
            Some(1)
        }
    }

    /// An upper bound for `|x|` over the ball.
    #[must_use]
    pub fn mag_upper(&self) -> Magnitude {
        &self.mid.mag_upper() + &self.rad
    }

    /// A lower bound for `|x|` over the ball.
    #[must_use]
    pub fn mag_lower(&self) -> Magnitude {
        self.mid.mag_lower().sub_lower(&self.rad)
    }

    /// Inflates the radius by `err`.
    pub fn add_error(&mut self, err: &Magnitude) {
        self.rad = &self.rad + err;
    }

    /// Ball addition at `prec` bits.
    #[must_use]
    pub fn add(&self, other: &Self, prec: usize) -> Self {
        let (mid, e) = self.mid.add(&other.mid, prec);
        RealBall {
            mid,
            rad: &(&self.rad + &other.rad) + &e,
        }
    }

    /// Ball subtraction at `prec` bits.
    #[must_use]
    pub fn sub(&self, other: &Self, prec: usize) -> Self {
        self.add(&other.neg(), prec)
    }

    /// Ball negation (exact).
    #[must_use]
    pub fn neg(&self) -> Self {
        RealBall {
            mid: -&self.mid,
            rad: self.rad.clone(),
        }
    }

    /// Ball multiplication at `prec` bits.
    #[must_use]
    pub fn mul(&self, other: &Self, prec: usize) -> Self {
        let (mid, e) = self.mid.mul(&other.mid, prec);
        let ua = self.mid.mag_upper();
        let ub = other.mid.mag_upper();
        let cross = &(&(&ua * &other.rad) + &(&ub * &self.rad)) + &(&self.rad * &other.rad);
        RealBall {
            mid,
            rad: &cross + &e,
        }
    }

    /// Ball division at `prec` bits.
    ///
    /// If the divisor meets zero the result is [`RealBall::non_finite`];
    /// division is total and never signals an error.
    #[must_use]
    pub fn div(&self, other: &Self, prec: usize) -> Self {
        if other.contains_zero() {
            return RealBall::non_finite();
        }
        let (mid, e) = self.mid.div(&other.mid, prec);
        // |x/y - x̂/ŷ| ≤ (ra·|ŷ| + |x̂|·rb) / (|y|·|ŷ|)
        let num = &(&self.rad * &other.mid.mag_upper()) + &(&self.mid.mag_upper() * &other.rad);
        let rad = num
            .div_lower(&other.mag_lower())
            .div_lower(&other.mid.mag_lower());
        RealBall {
            mid,
            rad: &rad + &e,
        }
    }

    /// Ball multiplication by a machine integer at `prec` bits.
    #[must_use]
    pub fn mul_i64(&self, v: i64, prec: usize) -> Self {
        self.mul(&RealBall::from_i64(v), prec)
    }

    /// Ball division by a machine integer at `prec` bits.
    #[must_use]
    pub fn div_i64(&self, v: i64, prec: usize) -> Self {
        self.div(&RealBall::from_i64(v), prec)
    }

    /// Exact scaling by `2^e`.
    #[must_use]
    pub fn mul_2exp(&self, e: i64) -> Self {
        RealBall {
            mid: self.mid.mul_2exp(e),
            rad: self.rad.mul_2exp(e),
        }
    }

    /// True if the exact value `x` certainly lies in the ball.
    ///
    /// May return `false` for points within a rounding sliver of the
    /// boundary; never returns `true` for a point outside.
    #[must_use]
    pub fn contains_f64(&self, x: f64) -> bool {
        let diff = (&self.mid - &Float::from_f64(x)).abs();
        diff.mag_upper() <= self.rad
    }

    /// The midpoint as an `f64` approximation.
    #[must_use]
    pub fn mid_f64(&self) -> f64 {
        self.mid.to_f64()
    }

    /// The radius as an `f64` upper approximation.
    #[must_use]
    pub fn rad_f64(&self) -> f64 {
        self.rad.to_f64()
    }
}

impl fmt::Display for RealBall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} +/- {}]", self.mid_f64(), self.rad)
    }
}
