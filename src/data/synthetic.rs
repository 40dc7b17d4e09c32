//! Synthetic Gaussian Markov random fields.
//!
//! Deterministic, seeded generators used by tests and demos:
//!
//! - [`chain_precision`] builds the precision matrix of a chain graph,
//!   the canonical example with known structure and known conditional
//!   independences (non-adjacent nodes are separated by the path between
//!   them).
//! - [`sample_gaussian_mrf`] draws observations from the zero-mean
//!   Gaussian with a given precision matrix, so the edge pattern of the
//!   generating model is exactly its non-zero off-diagonal entries.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::SelectError;

/// Precision matrix of the chain `x0 - x1 - ... - x(d-1)`: unit diagonal,
/// `-coupling` on the first off-diagonal, zero elsewhere.
///
/// `|coupling|` must stay below 0.5 so the matrix is strictly diagonally
/// dominant, hence positive definite for every chain length.
pub fn chain_precision(d: usize, coupling: f64) -> Result<DMatrix<f64>, SelectError> {
    if d < 2 {
        return Err(SelectError::InvalidInput(format!(
            "a chain needs at least 2 nodes, got {d}"
        )));
    }
    if !(coupling.is_finite() && coupling.abs() < 0.5) {
        return Err(SelectError::InvalidInput(format!(
            "coupling must satisfy |coupling| < 0.5, got {coupling}"
        )));
    }

    let mut precision = DMatrix::<f64>::identity(d, d);
    for i in 0..d - 1 {
        precision[(i, i + 1)] = -coupling;
        precision[(i + 1, i)] = -coupling;
    }
    Ok(precision)
}

/// Draw `n` rows from the zero-mean Gaussian MRF with the given precision
/// matrix. Same seed, same observations.
pub fn sample_gaussian_mrf(
    n: usize,
    precision: &DMatrix<f64>,
    seed: u64,
) -> Result<DMatrix<f64>, SelectError> {
    let d = precision.nrows();
    if precision.ncols() != d || d == 0 {
        return Err(SelectError::InvalidInput(format!(
            "precision must be square and non-empty, got {}x{}",
            d,
            precision.ncols()
        )));
    }
    if n == 0 {
        return Err(SelectError::InvalidInput(
            "cannot sample 0 observations".to_string(),
        ));
    }

    // Covariance is the inverse precision; its Cholesky factor maps
    // standard normal draws onto the target distribution.
    let sigma = precision
        .clone()
        .cholesky()
        .ok_or_else(|| {
            SelectError::InvalidInput("precision matrix is not positive definite".to_string())
        })?
        .inverse();
    let factor = sigma
        .cholesky()
        .ok_or_else(|| {
            SelectError::Numerical("covariance lost positive definiteness".to_string())
        })?
        .l();

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| SelectError::Numerical(format!("failed to construct unit normal: {e}")))?;
    let mut rng = StdRng::seed_from_u64(seed);

    // Row-major fill keeps the draw order independent of matrix storage.
    let mut z = DMatrix::<f64>::zeros(n, d);
    for r in 0..n {
        for c in 0..d {
            z[(r, c)] = normal.sample(&mut rng);
        }
    }
    Ok(z * factor.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::covariance;

    #[test]
    fn chain_precision_is_tridiagonal() {
        let precision = chain_precision(4, 0.4).unwrap();
        for i in 0..4usize {
            for j in 0..4 {
                let expected = if i == j {
                    1.0
                } else if i.abs_diff(j) == 1 {
                    -0.4
                } else {
                    0.0
                };
                assert_eq!(precision[(i, j)], expected, "at ({i},{j})");
            }
        }
    }

    #[test]
    fn chain_precision_rejects_degenerate_inputs() {
        assert!(matches!(
            chain_precision(1, 0.4),
            Err(SelectError::InvalidInput(_))
        ));
        assert!(matches!(
            chain_precision(4, 0.5),
            Err(SelectError::InvalidInput(_))
        ));
        assert!(matches!(
            chain_precision(4, f64::NAN),
            Err(SelectError::InvalidInput(_))
        ));
    }

    #[test]
    fn sampling_is_deterministic_per_seed() {
        let precision = chain_precision(3, 0.3).unwrap();
        let a = sample_gaussian_mrf(50, &precision, 5).unwrap();
        let b = sample_gaussian_mrf(50, &precision, 5).unwrap();
        let c = sample_gaussian_mrf(50, &precision, 6).unwrap();
        assert_eq!(a, b, "same seed must reproduce the draw");
        assert_ne!(a, c, "different seeds must differ");
    }

    #[test]
    fn sample_covariance_approaches_the_model_covariance() {
        let precision = chain_precision(4, 0.4).unwrap();
        let sigma = precision.clone().try_inverse().unwrap();
        let x = sample_gaussian_mrf(2000, &precision, 99).unwrap();
        let emp = covariance(&x);
        for i in 0..4 {
            for j in 0..4 {
                let err = (emp[(i, j)] - sigma[(i, j)]).abs();
                assert!(
                    err < 0.15,
                    "covariance entry ({i},{j}) off by {err}: {} vs {}",
                    emp[(i, j)],
                    sigma[(i, j)]
                );
            }
        }
    }

    #[test]
    fn adjacent_chain_nodes_correlate_more_than_distant_ones() {
        let precision = chain_precision(4, 0.4).unwrap();
        let x = sample_gaussian_mrf(2000, &precision, 7).unwrap();
        let emp = covariance(&x);
        let corr = |i: usize, j: usize| emp[(i, j)] / (emp[(i, i)] * emp[(j, j)]).sqrt();
        assert!(corr(0, 1) > 0.2, "adjacent correlation too weak");
        assert!(
            corr(0, 3).abs() < corr(0, 1),
            "distant correlation should be weaker than adjacent"
        );
    }

    #[test]
    fn rejects_non_positive_definite_precision() {
        let mut precision = DMatrix::<f64>::identity(2, 2);
        precision[(0, 1)] = 2.0;
        precision[(1, 0)] = 2.0;
        assert!(matches!(
            sample_gaussian_mrf(10, &precision, 1),
            Err(SelectError::InvalidInput(_))
        ));
    }
}
