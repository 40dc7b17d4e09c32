//! Neighborhood-selection estimators.
//!
//! These build the graph one node at a time by growing and shrinking a
//! candidate neighbor set, instead of solving a global penalized problem:
//!
//! - `gsmn` grows the set with the first candidate whose conditional mutual
//!   information with the node clears the threshold, then shrinks it by
//!   dropping any neighbor the rest of the set renders conditionally
//!   independent (grow–shrink).
//! - `iamb` grows with the single highest-scoring candidate per step
//!   (incremental association), then shrinks the same way.
//! - `gsmple` scores candidates by Gaussian pseudo-likelihood gain, i.e.
//!   the log residual-variance ratio of per-node regressions.
//!
//! Dependence is measured by Gaussian conditional mutual information,
//! `-0.5 * ln(1 - rho^2)` for the partial correlation `rho` obtained from
//! the inverse of the relevant covariance submatrix. The regularization
//! strength is the admission threshold in nats.
//!
//! `gsmn` and `iamb` reconcile the per-node neighbor sets with the AND rule
//! (both endpoints must agree); `gsmple` uses the OR rule, which is the
//! usual pairing for pseudo-likelihood scoring.

use nalgebra::{DMatrix, DVector};

use crate::error::SelectError;
use crate::estimators::{invert_spd, validate_estimation_input};
use crate::math::{covariance, residual_sum_of_squares, solve_least_squares, standardize};

/// Cap on the squared partial correlation, so a numerically perfect fit
/// yields a large finite score instead of infinity.
const MAX_RHO_SQ: f64 = 1.0 - 1e-12;

/// Floor on regression residuals, for the same reason.
const RSS_FLOOR: f64 = 1e-12;

/// Estimate the adjacency matrix with the grow–shrink algorithm at
/// conditional-independence threshold `lamb`.
pub fn gsmn(x: &DMatrix<f64>, lamb: f64) -> Result<DMatrix<bool>, SelectError> {
    validate_estimation_input(x, lamb)?;
    let d = x.ncols();
    let cov = covariance(&standardize(x));
    let mut adj = DMatrix::from_element(d, d, false);

    for i in 0..d {
        // Grow: admit the first candidate that is conditionally dependent on
        // i given the current neighbor set; repeat until none clears.
        loop {
            let blanket = row_neighbors(&adj, i);
            let mut grew = false;
            for j in 0..d {
                if j == i || adj[(i, j)] {
                    continue;
                }
                if gaussian_cmi(&cov, i, j, &blanket)? > lamb {
                    adj[(i, j)] = true;
                    grew = true;
                    break;
                }
            }
            if !grew {
                break;
            }
        }
        shrink_phase(&mut adj, &cov, i, lamb)?;
    }

    symmetrize_and(&mut adj);
    Ok(adj)
}

/// Estimate the adjacency matrix with incremental association at
/// conditional-independence threshold `lamb`.
///
/// Differs from [`gsmn`] only in the grow phase: each step admits the
/// single candidate with the highest conditional mutual information, and
/// only if that maximum clears the threshold.
pub fn iamb(x: &DMatrix<f64>, lamb: f64) -> Result<DMatrix<bool>, SelectError> {
    validate_estimation_input(x, lamb)?;
    let d = x.ncols();
    let cov = covariance(&standardize(x));
    let mut adj = DMatrix::from_element(d, d, false);

    for i in 0..d {
        loop {
            let blanket = row_neighbors(&adj, i);
            let mut best: Option<(usize, f64)> = None;
            for j in 0..d {
                if j == i || adj[(i, j)] {
                    continue;
                }
                let cmi = gaussian_cmi(&cov, i, j, &blanket)?;
                if best.map_or(true, |(_, top)| cmi > top) {
                    best = Some((j, cmi));
                }
            }
            match best {
                Some((j, cmi)) if cmi > lamb => adj[(i, j)] = true,
                _ => break,
            }
        }
        shrink_phase(&mut adj, &cov, i, lamb)?;
    }

    symmetrize_and(&mut adj);
    Ok(adj)
}

/// Estimate the adjacency matrix by grow–shrink over the Gaussian
/// pseudo-likelihood at gain threshold `lamb`.
///
/// For node i with neighbor set S, the score of adding j is
/// `0.5 * ln(RSS_S / RSS_{S + j})` from least-squares regressions of x_i on
/// the standardized neighbor columns. For Gaussian data this estimates the
/// same conditional mutual information as [`gsmn`], through residuals
/// instead of covariance inversion.
pub fn gsmple(x: &DMatrix<f64>, lamb: f64) -> Result<DMatrix<bool>, SelectError> {
    validate_estimation_input(x, lamb)?;
    let d = x.ncols();
    let xs = standardize(x);
    let mut adj = DMatrix::from_element(d, d, false);

    for i in 0..d {
        let y = xs.column(i).into_owned();

        loop {
            let blanket = row_neighbors(&adj, i);
            let rss_current = residual_for(&xs, &y, &blanket)?;
            let mut grew = false;
            for j in 0..d {
                if j == i || adj[(i, j)] {
                    continue;
                }
                let mut with_j = blanket.clone();
                with_j.push(j);
                let rss_with = residual_for(&xs, &y, &with_j)?;
                if 0.5 * (rss_current / rss_with).ln() > lamb {
                    adj[(i, j)] = true;
                    grew = true;
                    break;
                }
            }
            if !grew {
                break;
            }
        }

        loop {
            let blanket = row_neighbors(&adj, i);
            let rss_current = residual_for(&xs, &y, &blanket)?;
            let mut shrank = false;
            for &j in &blanket {
                let rest: Vec<usize> = blanket.iter().copied().filter(|&k| k != j).collect();
                let rss_without = residual_for(&xs, &y, &rest)?;
                if 0.5 * (rss_without / rss_current).ln() <= lamb {
                    adj[(i, j)] = false;
                    shrank = true;
                    break;
                }
            }
            if !shrank {
                break;
            }
        }
    }

    symmetrize_or(&mut adj);
    Ok(adj)
}

/// Gaussian conditional mutual information `I(x_i; x_j | x_cond)` in nats,
/// from the covariance matrix of all variables.
fn gaussian_cmi(
    cov: &DMatrix<f64>,
    i: usize,
    j: usize,
    cond: &[usize],
) -> Result<f64, SelectError> {
    let mut order = Vec::with_capacity(cond.len() + 2);
    order.push(i);
    order.push(j);
    order.extend_from_slice(cond);

    let k = order.len();
    let mut sub = DMatrix::<f64>::zeros(k, k);
    for (a, &ia) in order.iter().enumerate() {
        for (b, &ib) in order.iter().enumerate() {
            sub[(a, b)] = cov[(ia, ib)];
        }
    }

    let omega = invert_spd(&sub)?;
    let denom = omega[(0, 0)] * omega[(1, 1)];
    if !(denom.is_finite() && denom > 0.0) {
        return Err(SelectError::Numerical(format!(
            "partial correlation of variables {i} and {j} is undefined \
             (degenerate conditional covariance)"
        )));
    }
    let rho = -omega[(0, 1)] / denom.sqrt();
    let rho_sq = (rho * rho).min(MAX_RHO_SQ);
    Ok(-0.5 * (1.0 - rho_sq).ln())
}

/// Residual sum of squares of regressing `y` on the given columns of `xs`.
/// An empty column set means the null model (no intercept is needed,
/// `xs` columns and `y` are centered).
fn residual_for(xs: &DMatrix<f64>, y: &DVector<f64>, cols: &[usize]) -> Result<f64, SelectError> {
    if cols.is_empty() {
        return Ok(y.dot(y).max(RSS_FLOOR));
    }
    let n = xs.nrows();
    let mut design = DMatrix::<f64>::zeros(n, cols.len());
    for (c, &j) in cols.iter().enumerate() {
        design.set_column(c, &xs.column(j));
    }
    let beta = solve_least_squares(&design, y).ok_or_else(|| {
        SelectError::Numerical(
            "pseudo-likelihood regression did not produce finite coefficients".to_string(),
        )
    })?;
    Ok(residual_sum_of_squares(&design, y, &beta).max(RSS_FLOOR))
}

/// Drop neighbors of node `i` that the rest of its neighbor set renders
/// conditionally independent of it.
fn shrink_phase(
    adj: &mut DMatrix<bool>,
    cov: &DMatrix<f64>,
    i: usize,
    lamb: f64,
) -> Result<(), SelectError> {
    loop {
        let blanket = row_neighbors(adj, i);
        let mut shrank = false;
        for &j in &blanket {
            let rest: Vec<usize> = blanket.iter().copied().filter(|&k| k != j).collect();
            if gaussian_cmi(cov, i, j, &rest)? <= lamb {
                adj[(i, j)] = false;
                shrank = true;
                break;
            }
        }
        if !shrank {
            return Ok(());
        }
    }
}

fn row_neighbors(adj: &DMatrix<bool>, i: usize) -> Vec<usize> {
    (0..adj.ncols()).filter(|&j| adj[(i, j)]).collect()
}

/// Keep an edge only when both endpoints selected each other.
fn symmetrize_and(adj: &mut DMatrix<bool>) {
    let d = adj.nrows();
    for i in 0..d {
        for j in (i + 1)..d {
            let both = adj[(i, j)] && adj[(j, i)];
            adj[(i, j)] = both;
            adj[(j, i)] = both;
        }
    }
}

/// Keep an edge when either endpoint selected the other.
fn symmetrize_or(adj: &mut DMatrix<bool>) {
    let d = adj.nrows();
    for i in 0..d {
        for j in (i + 1)..d {
            let either = adj[(i, j)] || adj[(j, i)];
            adj[(i, j)] = either;
            adj[(j, i)] = either;
        }
    }
}
