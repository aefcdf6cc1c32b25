//! # Validation Errors
//!
//! Construction-time failures for domain primitives. Each variant carries the
//! rejected input so operators can see exactly what was refused.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Country code is not exactly two ASCII letters.
    #[error("invalid country code: \"{0}\" (expected two ASCII letters)")]
    InvalidCountryCode(String),

    /// Country code has the right shape but is not an assigned ISO 3166-1 code.
    #[error("unknown country code: \"{0}\" (not an assigned ISO 3166-1 alpha-2 code)")]
    UnknownCountry(String),

    /// Timestamp string is neither RFC 3339 nor a naive ISO 8601 date-time.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
