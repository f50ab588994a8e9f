//! Field-level validation shared by the course and student drafts.
//!
//! Every violation converts into an `invalid_request` [`Error`] whose details
//! name the offending field and a stable violation code.

use serde_json::json;

use super::Error;

/// A single field constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// A required field was blank.
    #[error("{field} must not be empty")]
    Required { field: &'static str },
    /// A text field exceeded its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    /// A numeric field fell outside its accepted range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
    /// A date field was not strictly in the past.
    #[error("{field} must be in the past")]
    NotInPast { field: &'static str },
}

impl FieldError {
    /// Name of the offending field in API payloads.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::TooLong { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotInPast { field } => field,
        }
    }

    /// Stable violation code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Required { .. } => "required",
            Self::TooLong { .. } => "too_long",
            Self::OutOfRange { .. } => "out_of_range",
            Self::NotInPast { .. } => "not_in_past",
        }
    }
}

impl From<FieldError> for Error {
    fn from(value: FieldError) -> Self {
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.code(),
        }))
    }
}

/// Trim `raw` and require 1..=`max` characters.
pub(crate) fn required_text(field: &'static str, raw: &str, max: usize) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required { field });
    }
    optional_text(field, trimmed, max)
}

/// Trim `raw` and require at most `max` characters; blank is allowed.
pub(crate) fn optional_text(field: &'static str, raw: &str, max: usize) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > max {
        return Err(FieldError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Require `value` to fall within `min..=max`.
pub(crate) fn in_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64, FieldError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FieldError::OutOfRange { field, min, max })
    }
}
