//! uhdegrees - statistics over University of Hawaii degree-award data.
//!
//! The [`analysis`] module holds the aggregations: total degrees, the
//! Hawaiian-legacy percentage, per-year and per-campus totals, the
//! yearly maximum and the doctoral program list. Each one is a pure
//! function over a slice of [`Record`]s and fails with an
//! [`AggregateError`] when an `AWARDS` value is missing or not numeric.
//!
//! ```
//! use serde_json::json;
//! use uhdegrees::{analysis, Record};
//!
//! let data: Vec<Record> = serde_json::from_value(json!([
//!     {"CAMPUS": "Manoa", "FISCAL_YEAR": 2012, "AWARDS": 5},
//!     {"CAMPUS": "Hilo", "FISCAL_YEAR": 2012, "AWARDS": 10},
//! ]))
//! .unwrap();
//!
//! assert_eq!(analysis::total_degrees(&data), Ok(15));
//! assert_eq!(analysis::list_campuses(&data), vec!["Manoa", "Hilo"]);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod report;

pub use error::AggregateError;
pub use models::{DegreeSummary, Record};
