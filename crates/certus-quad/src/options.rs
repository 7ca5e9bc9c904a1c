//! Integration options and budget defaults.

/// Tuning knobs for [`crate::integrate`].
///
/// The numeric limits are budgets, not accuracy targets: accuracy is driven
/// by `goal` and `tol` on the call itself. Non-positive limits select
/// precision-derived defaults at call time.
#[derive(Clone, Debug)]
pub struct QuadOptions {
    /// Maximum degree the high-order rule may use; `<= 0` means
    /// `goal / 2 + 10`.
    pub deg_limit: i64,
    /// Hard ceiling on integrand evaluations; `<= 0` means `1000 * prec`.
    pub eval_limit: i64,
    /// Hard ceiling on the bisection stack height; `<= 0` means `2 * prec`.
    pub depth_limit: i64,
    /// Emit `tracing` debug events for stopping reasons and the completion
    /// summary. Purely diagnostic; has no effect on the result.
    pub verbose: bool,
}

impl Default for QuadOptions {
    fn default() -> Self {
        QuadOptions {
            deg_limit: 0,
            eval_limit: 0,
            depth_limit: 0,
            verbose: false,
        }
    }
}

/// Budgets after default resolution; all strictly positive.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Limits {
    pub deg_limit: i64,
    pub eval_limit: i64,
    pub depth_limit: i64,
}

impl QuadOptions {
    pub(crate) fn resolve(&self, goal: i64, prec: usize) -> Limits {
        let prec = prec as i64;
        let depth_limit = if self.depth_limit <= 0 {
            2 * prec
        } else {
            self.depth_limit
        }
        .max(1);
        let eval_limit = if self.eval_limit <= 0 {
            1000 * prec
        } else {
            self.eval_limit
        }
        .max(1);
        let deg_limit = if self.deg_limit <= 0 {
            goal / 2 + 10
        } else {
            self.deg_limit
        };
        Limits {
            deg_limit,
            eval_limit,
            depth_limit,
        }
    }
}
