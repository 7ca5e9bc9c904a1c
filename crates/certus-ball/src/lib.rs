//! # certus-ball
//!
//! Ball arithmetic for verified numerics: every value is a midpoint plus a
//! guaranteed error radius, and every operation keeps the true mathematical
//! result inside the ball.
//!
//! This crate wraps `dashu` to provide:
//! - Exact-or-bounded arbitrary precision binary floats ([`Float`])
//! - Directed-rounding error bounds ([`Magnitude`])
//! - Real and complex enclosures ([`RealBall`], [`ComplexBall`])
//! - Verified elementary functions and constants ([`functions`])
//!
//! ## Soundness model
//!
//! Midpoints round; radii absorb the rounding. Radius arithmetic only ever
//! rounds up, so no operation can understate its error. "Don't know" is
//! expressed as an infinite radius, which propagates through arithmetic
//! instead of raising errors.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod complex;
pub mod float;
pub mod functions;
pub mod magnitude;
pub mod real;

#[cfg(test)]
mod proptests;

pub use complex::ComplexBall;
pub use float::Float;
pub use magnitude::Magnitude;
pub use real::RealBall;
