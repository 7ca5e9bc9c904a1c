//! Directed-rounding error bounds.
//!
//! A [`Magnitude`] is a non-negative bound on the absolute size of some
//! quantity. Every operation that could round, rounds *up*, so a magnitude
//! computed from sound inputs never understates what it bounds. Comparisons
//! and `max` are exact.
//!
//! The representation is a 32-bit mantissa with a wide power-of-two exponent:
//! a finite magnitude holds `man * 2^(exp - 32)` with `man` normalized to
//! `[2^31, 2^32)`, so a finite value always lies in `[2^(exp-1), 2^exp)`.

use num_traits::Zero;
use std::fmt;
use std::ops::{Add, Mul};

/// Number of mantissa bits carried by a finite magnitude.
const MAG_BITS: u32 = 32;

/// An always-round-up bound on a non-negative quantity.
///
/// `Zero` and `Infinity` are explicit states: zero means the bounded quantity
/// is exactly zero, infinity means no finite bound is known.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Magnitude {
    /// The bounded quantity is exactly zero.
    Zero,
    /// A finite bound `man * 2^(exp - 32)` with `man` in `[2^31, 2^32)`.
    ///
    /// Field order matters: the derived ordering compares exponents first,
    /// which is exact thanks to the mantissa normalization.
    Finite {
        /// Power-of-two scale; the value lies in `[2^(exp-1), 2^exp)`.
        exp: i64,
        /// Normalized mantissa in `[2^31, 2^32)`.
        man: u64,
    },
    /// No finite bound.
    Infinity,
}

impl Magnitude {
    /// An exact power of two, `2^e`.
    #[must_use]
    pub fn pow2(e: i64) -> Self {
        Magnitude::Finite {
            exp: e + 1,
            man: 1 << (MAG_BITS - 1),
        }
    }

    /// An upper bound for the integer `v` (exact whenever `v` fits in 32
    /// significant bits).
    #[must_use]
    pub fn from_u64_upper(v: u64) -> Self {
        Self::normalize_up(u128::from(v), i64::from(MAG_BITS))
    }

    /// A lower bound for the integer `v` (exact whenever `v` fits in 32
    /// significant bits).
    #[must_use]
    pub fn from_u64_lower(v: u64) -> Self {
        Self::normalize_down(u128::from(v), i64::from(MAG_BITS))
    }

    /// An upper bound for `|x|`. Non-finite input maps to `Infinity`.
    #[must_use]
    pub fn from_f64_upper(x: f64) -> Self {
        if x == 0.0 {
            return Magnitude::Zero;
        }
        if !x.is_finite() {
            return Magnitude::Infinity;
        }
        let bits = x.abs().to_bits();
        let biased = (bits >> 52) & 0x7ff;
        let frac = bits & ((1u64 << 52) - 1);
        let (man, e) = if biased == 0 {
            (frac, -1074i64)
        } else {
            (frac | (1u64 << 52), biased as i64 - 1075)
        };
        Self::normalize_up(u128::from(man), e + i64::from(MAG_BITS))
    }

    /// True if this bound is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Magnitude::Zero)
    }

    /// True if this bound is finite (zero counts as finite).
    #[must_use]
    pub fn is_finite(&self) -> bool {
        !matches!(self, Magnitude::Infinity)
    }

    /// Scales by a power of two, exactly.
    #[must_use]
    pub fn mul_2exp(&self, e: i64) -> Self {
        match self {
            Magnitude::Finite { exp, man } => Magnitude::Finite {
                exp: exp + e,
                man: *man,
            },
            other => other.clone(),
        }
    }

    /// Round-up quotient `self / den_lower`, where `den_lower` is a *lower*
    /// bound on the true denominator. Division by zero yields `Infinity`.
    #[must_use]
    pub fn div_lower(&self, den_lower: &Magnitude) -> Self {
        match (self, den_lower) {
            (Magnitude::Zero, _) => Magnitude::Zero,
            (Magnitude::Infinity, _) | (_, Magnitude::Zero) => Magnitude::Infinity,
            (_, Magnitude::Infinity) => Magnitude::Zero,
            (
                Magnitude::Finite { exp: ea, man: ma },
                Magnitude::Finite { exp: eb, man: mb },
            ) => {
                let num = u128::from(*ma) << MAG_BITS;
                let den = u128::from(*mb);
                let q = (num + den - 1) / den;
                Self::normalize_up(q, ea - eb)
            }
        }
    }

    /// Round-down difference `max(self - sub_upper, 0)`, where `sub_upper` is
    /// an *upper* bound on the subtrahend. The result is a sound lower bound.
    #[must_use]
    pub fn sub_lower(&self, sub_upper: &Magnitude) -> Self {
        if sub_upper >= self {
            return Magnitude::Zero;
        }
        match (self, sub_upper) {
            (a, Magnitude::Zero) => a.clone(),
            (Magnitude::Infinity, Magnitude::Finite { .. }) => Magnitude::Infinity,
            (
                Magnitude::Finite { exp: ea, man: ma },
                Magnitude::Finite { exp: eb, man: mb },
            ) => {
                let d = ea - eb;
                if d > 64 {
                    // The subtrahend is far below one ulp of self.
                    return Self::normalize_down(u128::from(*ma) - 1, *ea);
                }
                let a = u128::from(*ma) << d;
                let b = u128::from(*mb);
                if a <= b {
                    Magnitude::Zero
                } else {
                    Self::normalize_down(a - b, *eb)
                }
            }
            _ => Magnitude::Zero,
        }
    }

    /// An `f64` approximation, rounding toward infinity on overflow.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Magnitude::Zero => 0.0,
            Magnitude::Infinity => f64::INFINITY,
            Magnitude::Finite { exp, man } => {
                (*man as f64) * crate::float::pow2_f64(exp - i64::from(MAG_BITS))
            }
        }
    }

    /// Builds a finite magnitude from `m * 2^(e - 32)`, rounding up.
    pub(crate) fn normalize_up(m: u128, e: i64) -> Self {
        if m == 0 {
            return Magnitude::Zero;
        }
        let bl = 128 - m.leading_zeros();
        if bl > MAG_BITS {
            let sh = bl - MAG_BITS;
            let mut man = (m + ((1u128 << sh) - 1)) >> sh;
            let mut exp = e + i64::from(sh);
            if man == 1u128 << MAG_BITS {
                man >>= 1;
                exp += 1;
            }
            Magnitude::Finite {
                exp,
                man: man as u64,
            }
        } else {
            let sh = MAG_BITS - bl;
            Magnitude::Finite {
                exp: e - i64::from(sh),
                man: (m << sh) as u64,
            }
        }
    }

    /// Builds a finite magnitude from `m * 2^(e - 32)`, rounding down.
    pub(crate) fn normalize_down(m: u128, e: i64) -> Self {
        if m == 0 {
            return Magnitude::Zero;
        }
        let bl = 128 - m.leading_zeros();
        if bl > MAG_BITS {
            let sh = bl - MAG_BITS;
            Magnitude::Finite {
                exp: e + i64::from(sh),
                man: (m >> sh) as u64,
            }
        } else {
            let sh = MAG_BITS - bl;
            Magnitude::Finite {
                exp: e - i64::from(sh),
                man: (m << sh) as u64,
            }
        }
    }
}

impl Add for &Magnitude {
    type Output = Magnitude;

    /// Round-up addition.
    fn add(self, rhs: &Magnitude) -> Magnitude {
        match (self, rhs) {
            (Magnitude::Zero, other) | (other, Magnitude::Zero) => other.clone(),
            (Magnitude::Infinity, _) | (_, Magnitude::Infinity) => Magnitude::Infinity,
            (
                Magnitude::Finite { exp: ea, man: ma },
                Magnitude::Finite { exp: eb, man: mb },
            ) => {
                let (ea, ma, eb, mb) = if ea >= eb {
                    (*ea, *ma, *eb, *mb)
                } else {
                    (*eb, *mb, *ea, *ma)
                };
                let d = ea - eb;
                if d > 64 {
                    // The smaller operand is below one ulp; bump by an ulp.
                    Magnitude::normalize_up(u128::from(ma) + 1, ea)
                } else {
                    let sum = (u128::from(ma) << d) + u128::from(mb);
                    Magnitude::normalize_up(sum, eb)
                }
            }
        }
    }
}

impl Add for Magnitude {
    type Output = Magnitude;

    fn add(self, rhs: Magnitude) -> Magnitude {
        &self + &rhs
    }
}

impl Mul for &Magnitude {
    type Output = Magnitude;

    /// Round-up multiplication. `Zero` annihilates, including `Zero *
    /// Infinity`: a factor known to be exactly zero makes the product zero.
    fn mul(self, rhs: &Magnitude) -> Magnitude {
        match (self, rhs) {
            (Magnitude::Zero, _) | (_, Magnitude::Zero) => Magnitude::Zero,
            (Magnitude::Infinity, _) | (_, Magnitude::Infinity) => Magnitude::Infinity,
            (
                Magnitude::Finite { exp: ea, man: ma },
                Magnitude::Finite { exp: eb, man: mb },
            ) => {
                let prod = u128::from(*ma) * u128::from(*mb);
                Magnitude::normalize_up(prod, ea + eb - i64::from(MAG_BITS))
            }
        }
    }
}

impl Mul for Magnitude {
    type Output = Magnitude;

    fn mul(self, rhs: Magnitude) -> Magnitude {
        &self * &rhs
    }
}

impl Zero for Magnitude {
    fn zero() -> Self {
        Magnitude::Zero
    }

    fn is_zero(&self) -> bool {
        Magnitude::is_zero(self)
    }
}

impl Default for Magnitude {
    fn default() -> Self {
        Magnitude::Zero
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Magnitude::Zero => write!(f, "0"),
            Magnitude::Infinity => write!(f, "inf"),
            Magnitude::Finite { .. } => write!(f, "{:.4e}", self.to_f64()),
        }
    }
}
