use crate::math::{Real, Vector2};
use na::Matrix2;

/// The outcome of a two-parameter least-squares fit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FitResult {
    /// The best parameters found.
    pub params: [Real; 2],
    /// The norm of the residual at `params`.
    pub residual: Real,
    /// The number of iterations performed.
    pub iterations: usize,
}

/// Minimizes `‖residual(p)‖²` over two parameters, each constrained to `[0, 1]`.
///
/// This is a Levenberg–Marquardt iteration with a forward-difference Jacobian.
pub fn levenberg_marquardt2(
    residual: impl Fn([Real; 2]) -> Vector2<Real>,
    init: [Real; 2],
    tolerance: Real,
    max_iterations: usize,
) -> FitResult {
    const STEP: Real = 1.0e-6;

    let clamp = |p: [Real; 2]| [p[0].clamp(0.0, 1.0), p[1].clamp(0.0, 1.0)];
    let mut params = clamp(init);
    let mut r = residual(params);
    let mut cost = r.norm_squared();
    let mut damping = 1.0e-3;
    let mut iterations = 0;

    while iterations < max_iterations && cost.sqrt() > tolerance {
        iterations += 1;

        let mut jac = Matrix2::zeros();
        for k in 0..2 {
            let mut shifted = params;
            // Differentiate backward near the upper bound.
            let h = if shifted[k] + STEP > 1.0 { -STEP } else { STEP };
            shifted[k] += h;
            let column = (residual(shifted) - r) / h;
            jac.set_column(k, &column);
        }

        let jtj = jac.transpose() * jac;
        let jtr = jac.transpose() * r;
        let mut improved = false;

        for _ in 0..16 {
            let damped = jtj + Matrix2::from_diagonal(&jtj.diagonal().map(|d| d.max(1.0e-12))) * damping;
            let Some(delta) = damped.lu().solve(&(-jtr)) else {
                damping *= 10.0;
                continue;
            };

            let candidate = clamp([params[0] + delta.x, params[1] + delta.y]);
            let candidate_r = residual(candidate);
            let candidate_cost = candidate_r.norm_squared();

            if candidate_cost < cost {
                params = candidate;
                r = candidate_r;
                cost = candidate_cost;
                damping = (damping * 0.1).max(1.0e-12);
                improved = true;
                break;
            }

            damping *= 10.0;
        }

        if !improved {
            break;
        }
    }

    FitResult {
        params,
        residual: cost.sqrt(),
        iterations,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fits_a_linear_system() {
        // Solution at (0.25, 0.75).
        let fit = levenberg_marquardt2(
            |p| Vector2::new(p[0] + p[1] - 1.0, p[0] - p[1] + 0.5),
            [0.5, 0.5],
            1.0e-9,
            50,
        );
        assert!(fit.residual < 1.0e-8);
        assert_relative_eq!(fit.params[0], 0.25, epsilon = 1.0e-6);
        assert_relative_eq!(fit.params[1], 0.75, epsilon = 1.0e-6);
    }

    #[test]
    fn reports_unreachable_targets() {
        let fit = levenberg_marquardt2(|p| Vector2::new(p[0] - 2.0, p[1]), [0.5, 0.5], 1.0e-9, 50);
        assert_relative_eq!(fit.params[0], 1.0, epsilon = 1.0e-6);
        assert!(fit.residual > 0.5);
    }
}
