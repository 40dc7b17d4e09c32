//! Mathematical utilities: standardization, covariance, rank correlation,
//! and least squares.

pub mod kendall;
pub mod ols;
pub mod standardize;

pub use kendall::*;
pub use ols::*;
pub use standardize::*;
