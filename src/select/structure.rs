//! Structure selection entry point.
//!
//! [`select_structure`] is the one call most users need: resolve the
//! configuration, run the stability scan to choose a regularization
//! strength, then run the estimator once more on the full, unsubsampled
//! data at that strength. The subsample adjacencies from the scan are
//! never reused — only the final full-data estimate is authoritative.

use nalgebra::DMatrix;

use crate::domain::types::{Criteria, SelectConfig, Selection, StarsConfig};
use crate::error::SelectError;
use crate::estimators::estimate;
use crate::select::lambda_grid::{default_lambdas, descending};
use crate::select::stars::stars;

/// Learn the structure of a Markov random field from the observations `x`
/// (rows are samples, columns are variables).
///
/// Fails fast on malformed input; propagates estimator failures and an
/// explicit error when no candidate strength is stable. On success the
/// returned [`Selection`] carries the adjacency matrix, the chosen
/// strength, and the instability profile of the scan.
pub fn select_structure(x: &DMatrix<f64>, config: &SelectConfig) -> Result<Selection, SelectError> {
    let n = x.nrows();
    let d = x.ncols();
    if d < 2 {
        return Err(SelectError::InvalidInput(format!(
            "need at least 2 variables to estimate a graph, got {d}"
        )));
    }
    if n < 2 {
        return Err(SelectError::InvalidInput(format!(
            "need at least 2 observations, got {n}"
        )));
    }

    let grid = match &config.lambdas {
        Some(lambdas) => descending(lambdas)?,
        None => default_lambdas(),
    };

    let chosen = match config.criteria {
        Criteria::Stars => {
            let stars_config = StarsConfig::resolve(n, config)?;
            stars(x, config.method, &grid, &stars_config, config.seed)?
        }
    };

    let adjacency = estimate(config.method, x, chosen.lambda)?;
    Ok(Selection {
        adjacency,
        lambda: chosen.lambda,
        profile: chosen.profile,
    })
}
