//! Analysis modules.
//!
//! Pure aggregations over degree-award records.

pub mod aggregator;

pub use aggregator::*;
