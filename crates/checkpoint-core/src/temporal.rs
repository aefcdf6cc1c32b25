//! # Timestamp Parsing
//!
//! All timestamps in the service are `chrono::DateTime<Utc>`. Callers send
//! either RFC 3339 strings (`2022-01-10T12:00:00Z`) or naive ISO 8601
//! date-times without an offset (`2022-01-10T12:00:00`), which are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ValidationError;

/// Naive formats accepted after RFC 3339 fails, most specific first.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse a caller-supplied timestamp into UTC.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTimestamp`] if no accepted format matches.
pub fn parse_utc(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();
    let rfc_err = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e,
    };
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidTimestamp {
            value: value.to_string(),
            reason: rfc_err.to_string(),
        })
}
