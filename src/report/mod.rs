//! Report rendering for degree summaries.

pub mod generator;

pub use generator::*;
