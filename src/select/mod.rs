//! Regularization selection and the structure-learning entry point.

pub mod lambda_grid;
pub mod stars;
pub mod structure;

pub use lambda_grid::{default_lambdas, log_spaced, DEFAULT_LAMBDAS};
pub use stars::stars;
pub use structure::select_structure;
