//! Least squares solver.
//!
//! The pseudo-likelihood estimator repeatedly regresses one variable on a
//! small, growing set of neighbor columns, so we solve many tall, skinny
//! least-squares problems:
//!
//! ```text
//! minimize Σ_i (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - SVD solve, which handles tall systems and near-collinear neighbor
//!   columns robustly. (Nalgebra's `QR::solve` is intended for square
//!   systems and will panic for non-square matrices.)
//! - Neighborhood sizes are tiny (a handful of columns), so SVD cost is
//!   negligible next to the estimator loop around it.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails.
    // Heavily correlated variables can make neighbor columns nearly
    // collinear, and a slightly damped solution is still useful to the
    // grow/shrink scoring around this call.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Residual sum of squares of `y` against the fit `x β`.
pub fn residual_sum_of_squares(x: &DMatrix<f64>, y: &DVector<f64>, beta: &DVector<f64>) -> f64 {
    let fitted = x * beta;
    let mut rss = 0.0;
    for i in 0..y.len() {
        let r = y[i] - fitted[i];
        rss += r * r;
    }
    rss
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn rss_is_zero_for_exact_fit() {
        let x = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 3.0]);
        let y = DVector::from_row_slice(&[2.0, 4.0, 6.0]);
        let beta = solve_least_squares(&x, &y).unwrap();
        assert!(residual_sum_of_squares(&x, &y, &beta) < 1e-18);
    }
}
