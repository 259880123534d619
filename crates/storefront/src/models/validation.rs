//! Client-side input validation errors.
//!
//! Anything rejected here is never sent to the backend.

use atelier_core::EmailError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required fields were missing or blank.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A numeric field did not parse.
    #[error("{field} must be a number (got '{value}')")]
    NotANumber { field: &'static str, value: String },

    /// A numeric field was below zero.
    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

/// Whether an optional text field holds something other than whitespace.
pub(crate) fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
