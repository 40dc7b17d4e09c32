//! Crate-wide error type.
//!
//! Every failure surfaces to the immediate caller; nothing in this crate
//! retries or recovers internally. The variants identify which stage failed
//! (dispatch, input validation, numerical estimation, or the stability scan).

/// Errors produced by structure selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectError {
    /// The requested structure-learning method name is not recognized.
    UnsupportedMethod(String),

    /// The requested selection criterion name is not recognized.
    UnsupportedCriteria(String),

    /// Malformed input rejected at the boundary (bad observation matrix,
    /// empty or invalid candidate list, out-of-range configuration value).
    InvalidInput(String),

    /// An estimator produced a non-finite or non-invertible intermediate.
    /// Propagated as-is from the estimator; fatal for the whole call.
    Numerical(String),

    /// The stability scan finished without any candidate exceeding the
    /// instability threshold, so no regularization strength was selected.
    ///
    /// A sentinel strength of 0.0 would be indistinguishable from a
    /// legitimately selected strength, so the condition is reported
    /// explicitly. `candidates` is the number of candidates evaluated.
    NoStableRegularization { candidates: usize },
}

impl std::fmt::Display for SelectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectError::UnsupportedMethod(name) => {
                write!(f, "Method '{name}' is not implemented.")
            }
            SelectError::UnsupportedCriteria(name) => {
                write!(f, "Criteria '{name}' is not implemented.")
            }
            SelectError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            SelectError::Numerical(msg) => write!(f, "Numerical failure: {msg}"),
            SelectError::NoStableRegularization { candidates } => write!(
                f,
                "No regularization strength exceeded the instability threshold \
                 across {candidates} candidates; nothing was selected."
            ),
        }
    }
}

impl std::error::Error for SelectError {}
