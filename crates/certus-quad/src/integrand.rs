//! The integrand contract.

use certus_ball::ComplexBall;

/// A function that can be evaluated rigorously on a region.
///
/// `z` is a box, not a point: the returned ball must enclose `f(w)` for
/// *every* `w` in `z`. An implementation that cannot bound the region may
/// return a non-finite ball; the driver treats that as "subdivide further",
/// never as an error.
///
/// `order` extends the contract for the high-order rule:
/// - `order == 0`: enclose the plain function values (all the adaptive
///   driver ever requests).
/// - `order == 1`: additionally *verify analyticity*: the implementation
///   must return a non-finite ball unless `f` is holomorphic on the whole
///   region. Functions built from entire operations can ignore the
///   distinction; anything with branch cuts or poles must check.
///
/// Implemented for any `FnMut(&ComplexBall, u32, usize) -> ComplexBall`
/// closure, which carries its own captured context in place of an opaque
/// parameter pointer.
pub trait Integrand {
    /// Evaluates the function on the region `z` at `prec` working bits.
    fn evaluate(&mut self, z: &ComplexBall, order: u32, prec: usize) -> ComplexBall;
}

impl<F> Integrand for F
where
    F: FnMut(&ComplexBall, u32, usize) -> ComplexBall,
{
    fn evaluate(&mut self, z: &ComplexBall, order: u32, prec: usize) -> ComplexBall {
        self(z, order, prec)
    }
}
