//! Column standardization and empirical covariance.
//!
//! The estimators in this crate work on standardized data (zero mean, unit
//! variance per variable). Two denominator conventions are in play and must
//! not be mixed up:
//!
//! - standardization divides by the **population** standard deviation
//!   (denominator `n`),
//! - the empirical covariance divides by `n - 1`.
//!
//! Their composition means the covariance of a standardized matrix has
//! `n / (n - 1)` on its diagonal, not exactly 1. The graphical-lasso
//! estimator depends on reproducing that exactly.

use nalgebra::DMatrix;

/// Scale below which a column is treated as constant and left unscaled.
const SCALE_EPS: f64 = 1e-12;

/// Standardize each column to zero mean and unit population variance.
///
/// Constant (zero-variance) columns are centered but not scaled, so they
/// come out as all zeros instead of NaN.
///
/// The input is never mutated; a standardized copy is returned.
pub fn standardize(x: &DMatrix<f64>) -> DMatrix<f64> {
    let n = x.nrows();
    let d = x.ncols();
    let mut out = x.clone();

    for j in 0..d {
        let mut mean = 0.0;
        for i in 0..n {
            mean += x[(i, j)];
        }
        mean /= n as f64;

        let mut var = 0.0;
        for i in 0..n {
            let c = x[(i, j)] - mean;
            var += c * c;
        }
        var /= n as f64;

        let scale = var.sqrt();
        let scale = if scale > SCALE_EPS { scale } else { 1.0 };

        for i in 0..n {
            out[(i, j)] = (x[(i, j)] - mean) / scale;
        }
    }

    out
}

/// Empirical covariance matrix of the columns of `x` (denominator `n - 1`).
///
/// # Panics
/// Panics if `x` has fewer than two rows.
pub fn covariance(x: &DMatrix<f64>) -> DMatrix<f64> {
    let n = x.nrows();
    let d = x.ncols();
    assert!(n >= 2, "covariance requires at least two observations");

    let mut centered = x.clone();
    for j in 0..d {
        let mut mean = 0.0;
        for i in 0..n {
            mean += x[(i, j)];
        }
        mean /= n as f64;
        for i in 0..n {
            centered[(i, j)] -= mean;
        }
    }

    let mut cov = DMatrix::<f64>::zeros(d, d);
    let denom = (n - 1) as f64;
    for a in 0..d {
        for b in a..d {
            let mut s = 0.0;
            for i in 0..n {
                s += centered[(i, a)] * centered[(i, b)];
            }
            let v = s / denom;
            cov[(a, b)] = v;
            cov[(b, a)] = v;
        }
    }
    cov
}
