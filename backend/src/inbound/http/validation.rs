//! Request parsing helpers shared by the HTTP handlers.
//!
//! Path and query values arrive as strings so malformed input produces the
//! portal's own `invalid_request` payload instead of Actix's plain-text
//! extractor errors. JSON bodies get the same treatment through
//! [`json_body_error`].

use actix_web::HttpRequest;
use actix_web::error::JsonPayloadError;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{CourseSort, Error};

/// Stable codes placed in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidSort,
    InvalidChoice,
    MalformedBody,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidSort => "invalid_sort",
            Self::InvalidChoice => "invalid_choice",
            Self::MalformedBody => "malformed_body",
        }
    }
}

/// Name of a request field as the client spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

fn rejection(field: FieldName, code: ValidationCode, message: String, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.0, "code": code.as_str(), "value": value }),
        None => json!({ "field": field.0, "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    rejection(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {}", field.0),
        None,
    )
}

/// Parse a UUID-backed identifier such as `CourseId`.
pub(crate) fn parse_id<T: From<Uuid>>(value: &str, field: FieldName) -> Result<T, Error> {
    Uuid::parse_str(value.trim()).map(T::from).map_err(|_| {
        rejection(
            field,
            ValidationCode::InvalidUuid,
            format!("{} must be a valid UUID", field.0),
            Some(value),
        )
    })
}

/// Parse an optional `sort` query value; absent means the default order.
pub(crate) fn parse_sort(value: Option<&str>) -> Result<CourseSort, Error> {
    let Some(raw) = value.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(CourseSort::default());
    };
    raw.trim().parse().map_err(|err: crate::domain::UnknownSort| {
        rejection(
            FieldName::new("sort"),
            ValidationCode::InvalidSort,
            err.to_string(),
            Some(raw),
        )
    })
}

/// Reject a value outside a fixed set of choices.
pub(crate) fn invalid_choice_error(field: FieldName, value: &str, expected: &str) -> Error {
    rejection(
        field,
        ValidationCode::InvalidChoice,
        format!("{} must be one of {expected}", field.0),
        Some(value),
    )
}

/// `JsonConfig` error handler: report an unreadable body as `invalid_request`.
pub(crate) fn json_body_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::Deserialize(cause) => format!("request body is not valid: {cause}"),
        other => format!("request body could not be read: {other}"),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": ValidationCode::MalformedBody.as_str() }))
        .into()
}
