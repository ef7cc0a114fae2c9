use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from hilal operations.
///
/// A missing sunset is not an error: it is reported as
/// [`Likelihood::Unknown`](crate::Likelihood::Unknown).
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum HilalError {
    /// Date outside the civil converter's supported range.
    #[error("Date {date} is out of supported range ({min_year} to {max_year})")]
    DateOutOfRange {
        date: NaiveDate,
        min_year: i32,
        max_year: i32,
    },

    /// Hijri month or day outside declared bounds, or not a real day of that month.
    #[error("Invalid Hijri date {year}-{month:02}-{day:02}")]
    InvalidHijriDate {
        year: usize,
        month: usize,
        day: usize,
    },

    /// Invalid input value (e.g. coordinates).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Configuration source could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl HilalError {
    /// Creates a `DateOutOfRange` error for the given Gregorian year bounds.
    pub fn date_out_of_range(date: NaiveDate, min_year: i32, max_year: i32) -> Self {
        Self::DateOutOfRange { date, min_year, max_year }
    }

    /// Creates an `InvalidConfiguration` error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { reason: reason.into() }
    }
}
