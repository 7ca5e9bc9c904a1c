//! The direct enclosure rule.

use certus_ball::ComplexBall;

use crate::integrand::Integrand;

/// Bounds `∫ₐᵇ f` from a single evaluation: `f(wide) · (b − a)`, where
/// `wide` is one ball covering every point of the segment from `a` to `b`.
///
/// Crude but unconditional: the result is always a valid enclosure, the
/// radius is simply large when `f` varies over the interval. Exactly one
/// function evaluation; no failure mode.
pub fn integrate_direct<F: Integrand>(
    f: &mut F,
    a: &ComplexBall,
    b: &ComplexBall,
    prec: usize,
) -> ComplexBall {
    let delta = b.sub(a, prec).mul_2exp(-1);
    let mid = a.add(b, prec).mul_2exp(-1);

    // wide = mid ± |delta| in each part: covers the whole segment
    let mut wide = mid;
    wide.add_error(&delta.re().mag_upper(), &delta.im().mag_upper());

    f.evaluate(&wide, 0, prec).mul(&delta, prec).mul_2exp(1)
}
