//! `mrf-select` library crate.
//!
//! Learns the structure of Markov random fields: which variable pairs are
//! conditionally dependent, encoded as a symmetric boolean adjacency
//! matrix. The regularization strength is not picked by hand — it is
//! chosen by stability selection (StARS), which scans a candidate grid
//! and keeps the strongest regularization whose edge set stays stable
//! under subsampling.
//!
//! Modules are split so that:
//!
//! - estimators stay interchangeable behind one dispatch point
//! - selection logic is testable against synthetic instability functions
//! - formatting and data generation stay out of the numerical core

pub mod data;
pub mod domain;
pub mod error;
pub mod estimators;
pub mod math;
pub mod report;
pub mod select;
