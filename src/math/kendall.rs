//! Kendall rank correlation (tau-b).
//!
//! The rank-based `skeptic` estimator replaces the Pearson correlation with
//! a transform of Kendall's tau, which makes it invariant under monotone
//! transformations of each variable. We use the tau-b form so that ties are
//! handled; on continuous data without ties it coincides with plain tau.
//!
//! The pairwise counting loop is O(n²) per variable pair. Variable counts in
//! this problem are small, so this stays comfortably cheap and avoids the
//! bookkeeping of the O(n log n) merge-sort formulation.

use nalgebra::DMatrix;

/// Kendall tau-b of two equal-length series.
///
/// Returns 0.0 when either series is constant (tau is undefined there; zero
/// keeps downstream correlation matrices finite).
pub fn kendall_tau(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    if n < 2 {
        return 0.0;
    }

    let mut concordant = 0u64;
    let mut discordant = 0u64;
    let mut ties_x = 0u64;
    let mut ties_y = 0u64;
    let mut ties_xy = 0u64;

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 && dy == 0.0 {
                ties_xy += 1;
            } else if dx == 0.0 {
                ties_x += 1;
            } else if dy == 0.0 {
                ties_y += 1;
            } else if (dx > 0.0) == (dy > 0.0) {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }

    let n0 = (n as u64) * (n as u64 - 1) / 2;
    let n1 = ties_x + ties_xy;
    let n2 = ties_y + ties_xy;
    let denom = ((n0 - n1) as f64 * (n0 - n2) as f64).sqrt();
    if denom <= 0.0 {
        return 0.0;
    }

    (concordant as f64 - discordant as f64) / denom
}

/// Pairwise Kendall tau-b matrix of the columns of `x` (diagonal = 1).
pub fn kendall_tau_matrix(x: &DMatrix<f64>) -> DMatrix<f64> {
    let d = x.ncols();
    let columns: Vec<Vec<f64>> = (0..d).map(|j| x.column(j).iter().copied().collect()).collect();

    let mut tau = DMatrix::<f64>::identity(d, d);
    for a in 0..d {
        for b in (a + 1)..d {
            let t = kendall_tau(&columns[a], &columns[b]);
            tau[(a, b)] = t;
            tau[(b, a)] = t;
        }
    }
    tau
}
