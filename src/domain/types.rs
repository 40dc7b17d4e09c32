//! Shared domain types.
//!
//! These types are intentionally lightweight:
//!
//! - the enums form the closed dispatch surface (no string-keyed lookup at
//!   call time; names resolve once via `FromStr` at the boundary)
//! - the config structs make every tunable an explicit, validated field
//!   rather than an open-ended keyword bag
//! - the small result/profile types are serializable for downstream tooling

use std::str::FromStr;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::SelectError;

/// Default instability threshold (`beta`) for the stars criterion.
pub const DEFAULT_BETA: f64 = 0.1;

/// Default number of subsampling repetitions for the stars criterion.
pub const DEFAULT_REP_NUM: usize = 20;

/// Sample-size boundary of the subsampling-ratio heuristic: above this,
/// the ratio shrinks as `10 / sqrt(n)`; at or below it, a fixed 0.8 keeps
/// subsamples large enough to estimate anything at all.
const RATIO_N_BOUNDARY: usize = 144;

/// Subsampling ratio used for small samples (`n <= 144`).
const SMALL_N_RATIO: f64 = 0.8;

/// Structure-learning method used to estimate an adjacency matrix at a
/// given regularization strength.
///
/// All methods share one capability: `(observations, strength) -> boolean
/// adjacency matrix` (symmetric, zero diagonal). They differ in what the
/// strength means internally (an l1 penalty for the covariance-based
/// methods, a conditional-independence threshold for the grow–shrink ones),
/// but larger always means sparser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Graphical lasso on the empirical covariance of standardized data.
    Glasso,
    /// Nonparanormal SKEPTIC: graphical lasso on a Kendall-tau-derived
    /// correlation estimate (robust to monotone marginal transforms).
    Skeptic,
    /// Grow–shrink Markov-network neighborhood selection.
    Gsmn,
    /// Incremental-association Markov-blanket neighborhood selection.
    Iamb,
    /// Grow–shrink neighborhood selection scored by Gaussian
    /// pseudo-likelihood gain.
    Gsmple,
}

impl Method {
    /// All methods, in dispatch order.
    pub const ALL: [Method; 5] = [
        Method::Glasso,
        Method::Skeptic,
        Method::Gsmn,
        Method::Iamb,
        Method::Gsmple,
    ];

    /// Canonical lowercase name (the same string `FromStr` accepts).
    pub fn display_name(self) -> &'static str {
        match self {
            Method::Glasso => "glasso",
            Method::Skeptic => "skeptic",
            Method::Gsmn => "gsmn",
            Method::Iamb => "iamb",
            Method::Gsmple => "gsmple",
        }
    }
}

impl FromStr for Method {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "glasso" => Ok(Method::Glasso),
            "skeptic" => Ok(Method::Skeptic),
            "gsmn" => Ok(Method::Gsmn),
            "iamb" => Ok(Method::Iamb),
            "gsmple" => Ok(Method::Gsmple),
            other => Err(SelectError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Criterion for choosing the regularization strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criteria {
    /// Stability selection: pick the strongest regularization whose edge
    /// set stays stable under subsampling.
    Stars,
}

impl Criteria {
    /// All criteria.
    pub const ALL: [Criteria; 1] = [Criteria::Stars];

    /// Canonical lowercase name (the same string `FromStr` accepts).
    pub fn display_name(self) -> &'static str {
        match self {
            Criteria::Stars => "stars",
        }
    }
}

impl FromStr for Criteria {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stars" => Ok(Criteria::Stars),
            other => Err(SelectError::UnsupportedCriteria(other.to_string())),
        }
    }
}

/// A full selection run's configuration.
///
/// `lambdas`, `beta`, `ratio` and `rep_num` are optional; `None` means "use
/// the documented default" (for `ratio`, a default derived from the sample
/// count at run time). Values are validated when the run starts, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectConfig {
    /// Structure-learning method.
    pub method: Method,
    /// Selection criterion.
    pub criteria: Criteria,
    /// Candidate regularization strengths. Sorted descending internally
    /// regardless of the order given here. `None` uses the default grid.
    pub lambdas: Option<Vec<f64>>,
    /// Emit a per-candidate diagnostic line on stderr during the scan.
    pub verbose: bool,
    /// Seed for the subsampling RNG. Same seed, same subsamples.
    pub seed: u64,
    /// Instability threshold override (`beta` in (0, 1)).
    pub beta: Option<f64>,
    /// Subsample-fraction override (`ratio` in (0, 1]).
    pub ratio: Option<f64>,
    /// Repetition-count override (`rep_num` >= 1).
    pub rep_num: Option<usize>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            method: Method::Glasso,
            criteria: Criteria::Stars,
            lambdas: None,
            verbose: false,
            seed: 42,
            beta: None,
            ratio: None,
            rep_num: None,
        }
    }
}

impl SelectConfig {
    /// Config for the given method with every other field at its default.
    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }
}

/// Resolved stars parameters (defaults applied, values validated).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StarsConfig {
    /// Instability threshold in (0, 1).
    pub beta: f64,
    /// Fraction of rows drawn per subsample, in (0, 1].
    pub ratio: f64,
    /// Number of subsampling repetitions per candidate.
    pub rep_num: usize,
    /// Emit a per-candidate diagnostic line on stderr.
    pub verbose: bool,
}

impl StarsConfig {
    /// Default subsample fraction for a sample of `n` rows:
    /// `10 / sqrt(n)` when `n > 144`, else `0.8`.
    pub fn default_ratio(n: usize) -> f64 {
        if n > RATIO_N_BOUNDARY {
            10.0 * (n as f64).powf(-0.5)
        } else {
            SMALL_N_RATIO
        }
    }

    /// Fill defaults from `config` (using `n` for the ratio heuristic) and
    /// validate the result. Out-of-range overrides are rejected here, at
    /// construction, rather than somewhere inside the scan.
    pub fn resolve(n: usize, config: &SelectConfig) -> Result<Self, SelectError> {
        let resolved = Self {
            beta: config.beta.unwrap_or(DEFAULT_BETA),
            ratio: config.ratio.unwrap_or_else(|| Self::default_ratio(n)),
            rep_num: config.rep_num.unwrap_or(DEFAULT_REP_NUM),
            verbose: config.verbose,
        };
        resolved.validate()?;
        Ok(resolved)
    }

    /// Validate field ranges.
    pub fn validate(&self) -> Result<(), SelectError> {
        if !(self.beta.is_finite() && self.beta > 0.0 && self.beta < 1.0) {
            return Err(SelectError::InvalidInput(format!(
                "beta must be in (0, 1), got {}",
                self.beta
            )));
        }
        if !(self.ratio.is_finite() && self.ratio > 0.0 && self.ratio <= 1.0) {
            return Err(SelectError::InvalidInput(format!(
                "ratio must be in (0, 1], got {}",
                self.ratio
            )));
        }
        if self.rep_num == 0 {
            return Err(SelectError::InvalidInput(
                "rep_num must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Instability measured for one candidate regularization strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LambdaInstability {
    /// The candidate strength.
    pub lambda: f64,
    /// Total edge-selection instability in [0, 1].
    pub instability: f64,
}

/// Output of the stability scan alone (no final full-data estimate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarsSelection {
    /// The chosen regularization strength.
    pub lambda: f64,
    /// Instability of every candidate that was evaluated, in scan order
    /// (strongest first). When the scan stops early the remaining
    /// candidates never appear here.
    pub profile: Vec<LambdaInstability>,
}

/// Output of a full structure-selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Estimated adjacency matrix: symmetric, zero diagonal.
    pub adjacency: DMatrix<bool>,
    /// The regularization strength the adjacency was estimated at.
    pub lambda: f64,
    /// Per-candidate instability profile from the stability scan.
    pub profile: Vec<LambdaInstability>,
}

impl Selection {
    /// Number of edges (unordered pairs) in the adjacency matrix.
    pub fn edge_count(&self) -> usize {
        let d = self.adjacency.nrows();
        let mut count = 0;
        for i in 0..d {
            for j in (i + 1)..d {
                if self.adjacency[(i, j)] {
                    count += 1;
                }
            }
        }
        count
    }

    /// Edge density: edges divided by the `d (d-1) / 2` possible pairs.
    pub fn density(&self) -> f64 {
        let d = self.adjacency.nrows();
        if d < 2 {
            return 0.0;
        }
        let possible = d * (d - 1) / 2;
        self.edge_count() as f64 / possible as f64
    }
}
