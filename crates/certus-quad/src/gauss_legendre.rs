//! Automatic-degree Gauss-Legendre quadrature with rigorous error bounds.
//!
//! This is the "high-order rule" consumed by the adaptive driver: given a
//! subinterval and a tolerance, it either produces a tight enclosure of the
//! integral within a degree budget, or *declines*. Declining is a normal
//! negative result (the driver falls back to bisection), never an error.
//!
//! # Method
//!
//! For `f` analytic and bounded by `M` on the Bernstein ellipse `E_ρ` of the
//! interval, the `n`-point Gauss-Legendre error satisfies (via the Chebyshev
//! coefficient bound `|a_k| ≤ 2Mρ^{-k}` and exactness up to degree `2n-1`)
//!
//! ```text
//! |I − GL_n| ≤ 8·M · Σ_{k ≥ 2n} ρ^{-k} = 16·M·ρ^{-2n}   for ρ = 2,
//! ```
//!
//! i.e. `M · 2^(4-2n)` on `[-1, 1]`, scaled by `|δ| = |b-a|/2` after mapping.
//! `M` comes from one evaluation of `f` on a ball covering the ellipse, with
//! `order = 1` so the integrand vouches for its own analyticity. With the
//! ellipse parameter fixed, one bound evaluation serves every candidate
//! degree; the smallest tabulated degree meeting the tolerance is used.
//!
//! Nodes and weights are *verified*: an f64 Newton guess is certified by a
//! ball sign-change check, sharpened by interval Newton steps at working
//! precision, and the weights are evaluated from the enclosed nodes. Any
//! verification failure turns into a decline.

use certus_ball::{ComplexBall, Float, Magnitude, RealBall};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::integrand::Integrand;

/// Candidate degrees, roughly geometric. The automatic selection takes the
/// smallest entry whose error bound meets the tolerance.
const DEGREE_STEPS: &[usize] = &[
    4, 6, 8, 12, 16, 24, 32, 48, 64, 96, 128, 192, 256, 384, 512, 768, 1024,
];

/// Why an automatic-degree attempt produced no enclosure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Decline {
    /// The integrand reported a non-finite (or non-analytic) value on the
    /// evaluation ellipse.
    #[error("integrand is not analytic or not bounded on the evaluation ellipse")]
    NonFiniteBound,
    /// No tabulated degree within the budget meets the tolerance.
    #[error("no admissible degree within limit {0}")]
    DegreeLimit(i64),
    /// Node enclosures could not be verified at this precision.
    #[error("quadrature nodes could not be verified")]
    UnverifiedNodes,
}

/// Verified nodes and weights for one degree.
struct GlNodes {
    prec: usize,
    nodes: Vec<RealBall>,
    weights: Vec<RealBall>,
}

/// Per-call cache of verified rules, keyed by degree.
///
/// Owned by a single integration call (nothing outlives the call); a rule is
/// recomputed only if a higher precision is requested later.
#[derive(Default)]
pub struct NodeCache {
    rules: FxHashMap<usize, GlNodes>,
}

impl NodeCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        NodeCache {
            rules: FxHashMap::default(),
        }
    }

    fn get(&mut self, n: usize, prec: usize) -> Option<&GlNodes> {
        let stale = match self.rules.get(&n) {
            Some(rule) => rule.prec < prec,
            None => true,
        };
        if stale {
            let rule = legendre_rule(n, prec)?;
            self.rules.insert(n, rule);
        }
        self.rules.get(&n)
    }
}

/// Attempts a tight enclosure of `∫ₐᵇ f` within the degree budget.
///
/// On success returns the enclosure and the number of integrand evaluations
/// spent (nodes plus the ellipse bound). On decline the caller should
/// bisect; per the driver's accounting contract a decline costs nothing.
pub fn gl_auto_degree<F: Integrand>(
    f: &mut F,
    a: &ComplexBall,
    b: &ComplexBall,
    tol: &Magnitude,
    deg_limit: i64,
    cache: &mut NodeCache,
    prec: usize,
) -> Result<(ComplexBall, i64), Decline> {
    if deg_limit < DEGREE_STEPS[0] as i64 {
        return Err(Decline::DegreeLimit(deg_limit));
    }

    let delta = b.sub(a, prec).mul_2exp(-1);
    let mid = a.add(b, prec).mul_2exp(-1);
    let delta_mag = delta.mag_upper();

    // One ball covering the ρ = 2 Bernstein ellipse: mid ± (5/4)|δ| in both
    // parts (the ellipse has semi-axes 5/4 and 3/4).
    let ell = &Magnitude::from_u64_upper(5).mul_2exp(-2) * &delta_mag;
    let mut wide = mid.clone();
    wide.add_error(&ell, &ell);
    let m = f.evaluate(&wide, 1, prec).mag_upper();
    if !m.is_finite() {
        return Err(Decline::NonFiniteBound);
    }

    // Smallest degree with M·|δ|·2^(4-2n) ≤ tol.
    let m_delta = &m * &delta_mag;
    let mut chosen = None;
    for &n in DEGREE_STEPS {
        if n as i64 > deg_limit {
            break;
        }
        let trunc = m_delta.mul_2exp(4 - 2 * n as i64);
        if trunc <= *tol {
            chosen = Some((n, trunc));
            break;
        }
    }
    let Some((n, trunc)) = chosen else {
        return Err(Decline::DegreeLimit(deg_limit));
    };

    let rule = cache.get(n, prec).ok_or(Decline::UnverifiedNodes)?;

    let mut sum = ComplexBall::zero();
    for i in 0..n {
        let x = ComplexBall::from_real(rule.nodes[i].clone());
        let z = mid.add(&delta.mul(&x, prec), prec);
        let y = f.evaluate(&z, 0, prec);
        let w = ComplexBall::from_real(rule.weights[i].clone());
        sum = sum.add(&y.mul(&w, prec), prec);
    }
    let mut res = sum.mul(&delta, prec);
    res.add_error(&trunc, &trunc);
    Ok((res, n as i64 + 1))
}

/// Computes a fully verified rule of degree `n`, or `None` if verification
/// fails at this precision.
fn legendre_rule(n: usize, prec: usize) -> Option<GlNodes> {
    let wp = prec + 32;
    let mut nodes = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);
    for i in 0..n {
        let guess = newton_f64(n, i);
        let node = verified_root(n, guess, prec, wp)?;
        let weight = gl_weight(n, &node, wp)?;
        nodes.push(node);
        weights.push(weight);
    }
    Some(GlNodes { prec, nodes, weights })
}

/// `P_n(x)` and `P_n'(x)` in f64, by the three-term recurrence.
fn legendre_f64(n: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0;
    let mut p1 = x;
    for k in 1..n {
        let p2 = ((2 * k + 1) as f64 * x * p1 - k as f64 * p0) / (k + 1) as f64;
        p0 = p1;
        p1 = p2;
    }
    let dp = n as f64 * (x * p1 - p0) / (x * x - 1.0);
    (p1, dp)
}

/// f64 Newton iteration from the standard asymptotic initial guess; gives
/// the `i`-th root (in descending order) to near machine precision.
fn newton_f64(n: usize, i: usize) -> f64 {
    let mut x = (std::f64::consts::PI * (4 * i + 3) as f64 / (4 * n + 2) as f64).cos();
    for _ in 0..20 {
        let (p, dp) = legendre_f64(n, x);
        if dp != 0.0 {
            x -= p / dp;
        }
    }
    x
}

/// `P_n(x)` and `P_n'(x)` in ball arithmetic.
fn legendre_ball(n: usize, x: &RealBall, wp: usize) -> (RealBall, RealBall) {
    let mut p0 = RealBall::one();
    let mut p1 = x.clone();
    for k in 1..n {
        let k = k as i64;
        let t = x
            .mul(&p1, wp)
            .mul_i64(2 * k + 1, wp)
            .sub(&p0.mul_i64(k, wp), wp)
            .div_i64(k + 1, wp);
        p0 = p1;
        p1 = t;
    }
    // P_n' = n (x P_n − P_{n−1}) / (x² − 1); the denominator is certainly
    // nonzero for the interior enclosures this is called on.
    let num = x.mul(&p1, wp).sub(&p0, wp).mul_i64(n as i64, wp);
    let den = x.mul(x, wp).sub(&RealBall::one(), wp);
    let dp = num.div(&den, wp);
    (p1, dp)
}

/// Certifies the root near `guess` and refines it below `2^-(prec+4)`.
///
/// Containment proof: `P_n` changes sign across `[guess − 2^-30,
/// guess + 2^-30]` (Legendre roots are separated by far more than `2^-29`,
/// so the bracket holds exactly one root). Interval Newton then contracts
/// the enclosure without ever losing the root.
fn verified_root(n: usize, guess: f64, prec: usize, wp: usize) -> Option<RealBall> {
    let xf = Float::from_f64(guess);
    let r0 = Float::one().mul_2exp(-30);

    let p_lo = legendre_ball(n, &RealBall::from_float(&xf - &r0), wp).0;
    let p_hi = legendre_ball(n, &RealBall::from_float(&xf + &r0), wp).0;
    let (s_lo, s_hi) = (p_lo.sign_certain()?, p_hi.sign_certain()?);
    if s_lo * s_hi != -1 {
        return None;
    }

    let mut x = RealBall::new(xf, Magnitude::pow2(-30));
    let mut iters = 2usize;
    let mut reach = 30usize;
    while reach < wp {
        reach *= 2;
        iters += 1;
    }
    for _ in 0..iters {
        let m = RealBall::from_float(x.mid().clone());
        let (p_m, _) = legendre_ball(n, &m, wp);
        let (_, dp) = legendre_ball(n, &x, wp);
        if dp.contains_zero() {
            return None;
        }
        x = m.sub(&p_m.div(&dp, wp), wp);
    }

    if *x.rad() <= Magnitude::pow2(-(prec as i64 + 4)) {
        Some(x)
    } else {
        None
    }
}

/// The weight `2 / ((1 − x²)·P_n'(x)²)` for an enclosed node.
fn gl_weight(n: usize, x: &RealBall, wp: usize) -> Option<RealBall> {
    let (_, dp) = legendre_ball(n, x, wp);
    let den = RealBall::one()
        .sub(&x.mul(x, wp), wp)
        .mul(&dp.mul(&dp, wp), wp);
    let w = RealBall::from_i64(2).div(&den, wp);
    if w.is_finite() {
        Some(w)
    } else {
        None
    }
}
