//! # Certus
//!
//! Certified numerical integration in Rust.
//!
//! Certus computes *enclosures*: every result is a ball (midpoint plus
//! guaranteed error radius) that provably contains the true value. When
//! something goes wrong (a singularity on the path, an exhausted budget,
//! a function the library cannot bound) the answer gets wider, never
//! wrong.
//!
//! ## Crates
//!
//! - **certus-ball**: the arithmetic substrate. Arbitrary-precision
//!   floats, round-up magnitudes, real and complex balls, and rigorous
//!   elementary functions
//! - **certus-quad**: the adaptive integrator. Error-greedy bisection
//!   with an automatic-degree Gauss-Legendre rule
//!
//! ## Quick Start
//!
//! ```rust
//! use certus::prelude::*;
//!
//! // ∫₀¹ x dx = 1/2, certified to ~2⁻³² absolute error
//! let mut f = |z: &ComplexBall, _order: u32, _prec: usize| z.clone();
//! let v = integrate(
//!     &mut f,
//!     &ComplexBall::zero(),
//!     &ComplexBall::one(),
//!     32,
//!     &Magnitude::pow2(-32),
//!     &QuadOptions::default(),
//!     64,
//! );
//! assert!(v.re().contains_f64(0.5));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use certus_ball as ball;
pub use certus_quad as quad;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use certus_ball::functions;
    pub use certus_ball::{ComplexBall, Float, Magnitude, RealBall};
    pub use certus_quad::{integrate, integrate_direct, Integrand, QuadOptions};
}
