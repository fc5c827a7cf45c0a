//! Error types for degree aggregation.
//!
//! The aggregator returns `AggregateError` for invalid records. Everything
//! above it (loading, config, reporting) propagates with `anyhow`.

use thiserror::Error;

/// Errors raised while validating or summing award records.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateError {
    /// A record has no `AWARDS` key at all.
    #[error("Object AWARDS field is missing")]
    MissingField,

    /// A record's `AWARDS` value cannot be read as a number.
    #[error("Object AWARDS field is not an integer")]
    NotANumber,

    /// An `AWARDS` value or a running total does not fit in a degree count.
    #[error("Object AWARDS total is out of range")]
    OutOfRange,
}

/// Result alias used throughout the aggregator.
pub type Result<T> = std::result::Result<T, AggregateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AggregateError::MissingField.to_string(),
            "Object AWARDS field is missing"
        );
        assert_eq!(
            AggregateError::NotANumber.to_string(),
            "Object AWARDS field is not an integer"
        );
        assert_eq!(
            AggregateError::OutOfRange.to_string(),
            "Object AWARDS total is out of range"
        );
    }
}
