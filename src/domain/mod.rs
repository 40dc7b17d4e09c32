//! Domain types used throughout the crate.
//!
//! Everything here is plain data: enums for the closed dispatch surfaces,
//! config structs with documented defaults, and small result types.

pub mod types;

pub use types::*;
