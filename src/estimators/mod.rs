//! Structure-learning estimators.
//!
//! Every estimator has the same shape: an observation matrix in, a boolean
//! adjacency matrix out (symmetric, zero diagonal), with one scalar
//! regularization strength controlling sparsity. [`estimate`] dispatches on
//! [`Method`]; adding a method means adding an enum variant and an arm
//! here, so an unhandled method is a compile error rather than a runtime
//! fallthrough.

pub mod glasso;
pub mod neighborhood;
pub mod skeptic;

pub use glasso::{glasso, graphical_lasso, GlassoFit};
pub use neighborhood::{gsmn, gsmple, iamb};
pub use skeptic::skeptic;

use nalgebra::DMatrix;

use crate::domain::types::Method;
use crate::error::SelectError;

/// Off-diagonal precision entries within this distance of zero are treated
/// as absent edges.
const EDGE_ATOL: f64 = 1e-8;

/// Estimate the adjacency matrix of a Markov random field from the
/// observations `x` (rows are samples, columns are variables) at
/// regularization strength `lamb`.
pub fn estimate(
    method: Method,
    x: &DMatrix<f64>,
    lamb: f64,
) -> Result<DMatrix<bool>, SelectError> {
    match method {
        Method::Glasso => glasso(x, lamb),
        Method::Skeptic => skeptic(x, lamb),
        Method::Gsmn => gsmn(x, lamb),
        Method::Iamb => iamb(x, lamb),
        Method::Gsmple => gsmple(x, lamb),
    }
}

/// Boundary checks shared by every estimator entry point: at least two
/// observations (a single row has no variance to standardize or estimate
/// with) and a finite, non-negative regularization strength.
pub(crate) fn validate_estimation_input(x: &DMatrix<f64>, lamb: f64) -> Result<(), SelectError> {
    if x.nrows() < 2 {
        return Err(SelectError::InvalidInput(format!(
            "need at least 2 observations, got {}",
            x.nrows()
        )));
    }
    if !(lamb.is_finite() && lamb >= 0.0) {
        return Err(SelectError::InvalidInput(format!(
            "regularization strength must be finite and non-negative, got {lamb}"
        )));
    }
    Ok(())
}

/// Read the edge pattern off a precision matrix: an edge wherever the
/// off-diagonal entry is not numerically zero. The diagonal is `false`.
pub fn adjacency_from_precision(precision: &DMatrix<f64>) -> DMatrix<bool> {
    let d = precision.nrows();
    DMatrix::from_fn(d, d, |i, j| i != j && precision[(i, j)].abs() > EDGE_ATOL)
}

/// Invert a symmetric positive (semi-)definite matrix: Cholesky when it
/// holds, SVD pseudo-inverse as the rank-deficient fallback.
pub(crate) fn invert_spd(m: &DMatrix<f64>) -> Result<DMatrix<f64>, SelectError> {
    if let Some(chol) = m.clone().cholesky() {
        return Ok(chol.inverse());
    }
    m.clone()
        .pseudo_inverse(1e-12)
        .map_err(|e| SelectError::Numerical(format!("covariance is not invertible: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::sample_gaussian_mrf;

    #[test]
    fn adjacency_threshold_separates_zero_from_nonzero() {
        let mut precision = DMatrix::<f64>::identity(3, 3);
        precision[(0, 1)] = 1e-9; // below the cutoff
        precision[(1, 0)] = 1e-9;
        precision[(1, 2)] = 1e-7; // above it
        precision[(2, 1)] = 1e-7;

        let adj = adjacency_from_precision(&precision);
        assert!(!adj[(0, 1)]);
        assert!(adj[(1, 2)]);
        for i in 0..3 {
            assert!(!adj[(i, i)], "diagonal must never be an edge");
        }
    }

    #[test]
    fn every_method_produces_a_symmetric_hollow_adjacency() {
        let precision = DMatrix::<f64>::identity(3, 3);
        let x = sample_gaussian_mrf(80, &precision, 41).unwrap();

        for method in Method::ALL {
            let adj = estimate(method, &x, 0.3).unwrap();
            assert_eq!(adj.nrows(), 3);
            assert_eq!(adj.ncols(), 3);
            for i in 0..3 {
                assert!(!adj[(i, i)], "{}: diagonal edge", method.display_name());
                for j in 0..3 {
                    assert_eq!(
                        adj[(i, j)],
                        adj[(j, i)],
                        "{}: asymmetric at ({i},{j})",
                        method.display_name()
                    );
                }
            }
        }
    }

    #[test]
    fn invert_spd_matches_the_analytic_inverse() {
        let m = DMatrix::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 2.0]);
        let inv = invert_spd(&m).unwrap();
        assert!((inv[(0, 0)] - 0.25).abs() < 1e-12);
        assert!((inv[(1, 1)] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn every_method_rejects_a_single_observation() {
        let x = DMatrix::from_row_slice(1, 3, &[0.3, -1.2, 0.7]);
        for method in Method::ALL {
            assert!(
                matches!(
                    estimate(method, &x, 0.1),
                    Err(SelectError::InvalidInput(_))
                ),
                "{} accepted a single observation",
                method.display_name()
            );
        }
    }

    #[test]
    fn every_method_rejects_degenerate_penalties() {
        let precision = DMatrix::<f64>::identity(3, 3);
        let x = sample_gaussian_mrf(30, &precision, 43).unwrap();
        for method in Method::ALL {
            for bad in [f64::NAN, f64::INFINITY, -0.1] {
                assert!(
                    matches!(
                        estimate(method, &x, bad),
                        Err(SelectError::InvalidInput(_))
                    ),
                    "{} accepted penalty {bad}",
                    method.display_name()
                );
            }
        }
    }
}
