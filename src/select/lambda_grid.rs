//! Candidate grids of regularization strengths.
//!
//! The stability scan walks a fixed grid rather than optimizing over a
//! continuum:
//!
//! - it is deterministic given the same inputs/flags
//! - each candidate's instability is a self-contained, parallelizable job
//! - the scan semantics ("first violation, return the previous candidate")
//!   only make sense on an ordered grid

use crate::error::SelectError;

/// Default candidate strengths, weakest first. The scan itself always runs
/// strongest-first; see [`descending`].
pub const DEFAULT_LAMBDAS: [f64; 18] = [
    1e-5, 1e-4, 1e-3, 5e-3, 0.01, 0.03, 0.05, 0.08, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9,
    1.0,
];

/// The default grid as an owned vector.
pub fn default_lambdas() -> Vec<f64> {
    DEFAULT_LAMBDAS.to_vec()
}

/// Validate candidates and sort them into scan order (strongest
/// regularization first). Accepts any input order.
pub fn descending(lambdas: &[f64]) -> Result<Vec<f64>, SelectError> {
    if lambdas.is_empty() {
        return Err(SelectError::InvalidInput(
            "need at least one candidate regularization strength".to_string(),
        ));
    }
    for &lamb in lambdas {
        if !(lamb.is_finite() && lamb >= 0.0) {
            return Err(SelectError::InvalidInput(format!(
                "candidate strengths must be finite and non-negative, got {lamb}"
            )));
        }
    }
    let mut sorted = lambdas.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    Ok(sorted)
}

/// Generate `steps` log-spaced strengths between `min` and `max`
/// (inclusive), weakest first. An alternative to [`default_lambdas`] when
/// the interesting region is known.
pub fn log_spaced(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, SelectError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(SelectError::InvalidInput(format!(
            "invalid strength range: min={min}, max={max} (must be finite, >0, and max>min)"
        )));
    }
    if steps < 2 {
        return Err(SelectError::InvalidInput(
            "a log-spaced grid needs at least 2 steps".to_string(),
        ));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    Ok(out)
}
