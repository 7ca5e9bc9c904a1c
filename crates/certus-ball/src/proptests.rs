//! Property-based tests for the ball substrate.
//!
//! Soundness of the whole integrator rests on these contracts: magnitudes
//! never understate, and ball operations always enclose the exact result.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{ComplexBall, Float, Magnitude, RealBall};

    // Strategy for dyadic values that are exact in both f64 and Float
    fn small_f64() -> impl Strategy<Value = f64> {
        (-1_000_000i64..1_000_000i64, -20i32..20i32)
            .prop_map(|(m, e)| (m as f64) * (2.0f64).powi(e))
    }

    fn positive_f64() -> impl Strategy<Value = f64> {
        (1u64..1_000_000u64, -20i32..20i32).prop_map(|(m, e)| (m as f64) * (2.0f64).powi(e))
    }

    proptest! {
        // Magnitude axioms: directed rounding, never understate.

        #[test]
        fn magnitude_add_never_understates(a in positive_f64(), b in positive_f64()) {
            let ma = Magnitude::from_f64_upper(a);
            let mb = Magnitude::from_f64_upper(b);
            let s = &ma + &mb;
            prop_assert!(s.to_f64() >= a + b || s == Magnitude::Infinity);
        }

        #[test]
        fn magnitude_mul_never_understates(a in positive_f64(), b in positive_f64()) {
            let ma = Magnitude::from_f64_upper(a);
            let mb = Magnitude::from_f64_upper(b);
            let p = &ma * &mb;
            // a*b in f64 rounds to nearest; scale out one ulp of slack
            prop_assert!(p.to_f64() >= (a * b) * (1.0 - 1e-15));
        }

        #[test]
        fn magnitude_max_is_exact(a in positive_f64(), b in positive_f64()) {
            let ma = Magnitude::from_f64_upper(a);
            let mb = Magnitude::from_f64_upper(b);
            let m = ma.clone().max(mb.clone());
            prop_assert!(m >= ma && m >= mb);
            prop_assert!(m == ma || m == mb);
        }

        #[test]
        fn magnitude_sub_lower_is_lower_bound(a in 1u64..1_000_000u64, b in 1u64..1_000_000u64) {
            // exact inputs (< 2^32), so the bound must not exceed a - b
            let d = Magnitude::from_u64_upper(a).sub_lower(&Magnitude::from_u64_upper(b));
            prop_assert!(d.to_f64() <= (a as f64 - b as f64).max(0.0));
        }

        // Float: exact operators really are exact on dyadics.

        #[test]
        fn float_exact_ops_match_f64(a in small_f64(), b in small_f64()) {
            let fa = Float::from_f64(a);
            let fb = Float::from_f64(b);
            // products of 20-bit-scaled million-range values stay exact in f64
            prop_assert_eq!((&fa + &fb).to_f64(), a + b);
            prop_assert_eq!((&fa - &fb).to_f64(), a - b);
        }

        #[test]
        fn float_rounding_error_is_bounded(a in small_f64(), b in small_f64()) {
            let fa = Float::from_f64(a);
            let fb = Float::from_f64(b);
            let (r, err) = fa.add(&fb, 16);
            let exact = &fa + &fb;
            let diff = (&exact - &r).abs();
            prop_assert!(diff.mag_lower() <= err);
        }

        // Ball ops: the exact result is always enclosed.

        #[test]
        fn ball_add_encloses(a in small_f64(), b in small_f64()) {
            let s = RealBall::from_f64(a).add(&RealBall::from_f64(b), 24);
            prop_assert!(s.contains_f64(a + b));
        }

        #[test]
        fn ball_mul_encloses(a in small_f64(), b in small_f64()) {
            let p = RealBall::from_f64(a).mul(&RealBall::from_f64(b), 24);
            // exact product of dyadics: compute in Float and compare exactly
            let exact = &Float::from_f64(a) * &Float::from_f64(b);
            let diff = (exact - p.mid().clone()).abs();
            prop_assert!(diff.mag_lower() <= *p.rad());
        }

        #[test]
        fn ball_div_encloses_quotient(a in small_f64(), b in positive_f64()) {
            let q = RealBall::from_f64(a).div(&RealBall::from_f64(b), 53);
            let approx = a / b;
            prop_assert!((q.mid_f64() - approx).abs() <= q.rad_f64() + approx.abs() * 1e-15);
        }

        #[test]
        fn complex_mul_encloses(a in small_f64(), b in small_f64(), c in small_f64(), d in small_f64()) {
            let x = ComplexBall::new(RealBall::from_f64(a), RealBall::from_f64(b));
            let y = ComplexBall::new(RealBall::from_f64(c), RealBall::from_f64(d));
            let p = x.mul(&y, 30);
            let re = &(&Float::from_f64(a) * &Float::from_f64(c))
                - &(&Float::from_f64(b) * &Float::from_f64(d));
            let im = &(&Float::from_f64(a) * &Float::from_f64(d))
                + &(&Float::from_f64(b) * &Float::from_f64(c));
            prop_assert!((re - p.re().mid().clone()).abs().mag_lower() <= *p.re().rad());
            prop_assert!((im - p.im().mid().clone()).abs().mag_lower() <= *p.im().rad());
        }
    }
}
