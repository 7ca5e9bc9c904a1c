//! Rigorous adaptive quadrature over ball arithmetic.
//!
//! Computes certified enclosures of `∫ₐᵇ f(z) dz` along straight segments
//! in the complex plane. The result is a ball guaranteed to contain the
//! true integral; every failure mode (singularities, budget exhaustion,
//! non-analytic regions) widens the ball instead of raising an error.
//!
//! The strategy is globally adaptive bisection with an automatic-degree
//! Gauss-Legendre rule on each subinterval:
//!
//! - [`integrate`] is the driver: error-greedy subdivision under
//!   user-settable degree, evaluation, and depth budgets ([`QuadOptions`]).
//! - [`integrate_direct`] is the fallback rule: one evaluation on a ball
//!   covering the whole subinterval, always valid, never tight.
//! - [`gl_auto_degree`] is the high-order rule: it certifies its own
//!   truncation error from a single bound evaluation on a Bernstein
//!   ellipse, using verified nodes and weights.
//!
//! Integrands implement [`Integrand`] (any suitable closure qualifies) and
//! must follow its enclosure contract: the output ball covers `f` over the
//! whole input ball, and `order == 1` requests an analyticity check.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adaptive;
pub mod direct;
pub mod gauss_legendre;
pub mod integrand;
pub mod options;

pub use adaptive::integrate;
pub use direct::integrate_direct;
pub use gauss_legendre::{gl_auto_degree, Decline, NodeCache};
pub use integrand::Integrand;
pub use options::QuadOptions;
