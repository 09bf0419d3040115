//! Error types for chain validation.

use crate::location::Location;
use fieldchain_core::{ApiError, FieldError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One failed validator for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Where the field was read from
    pub location: Location,
    /// Formatted message
    pub message: String,
    /// Field name
    pub field: String,
    /// Value as extracted, before sanitizers ran
    pub value: String,
}

impl ValidationError {
    pub fn new(
        location: Location,
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            location,
            message: message.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.location, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        FieldError {
            location: err.location.as_str().to_string(),
            field: err.field,
            message: err.message,
            value: err.value,
        }
    }
}

/// Errors drained from a request, ready to be turned into a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Errors recorded for `field` at `location`.
    pub fn for_field(&self, location: Location, field: &str) -> Vec<&ValidationError> {
        self.0
            .iter()
            .filter(|e| e.location == location && e.field == field)
            .collect()
    }

    /// Ok if no errors, Err otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Convert to the standard 422 error response.
    pub fn into_api_error(self) -> ApiError {
        ApiError::validation(self.0.into_iter().map(FieldError::from).collect())
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        errors.into_api_error()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {} error(s)", self.len())
    }
}

impl std::error::Error for ValidationErrors {}

/// A field value could not be read from the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("unsupported content type `{0}`")]
    UnsupportedContentType(String),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("malformed query string: {0}")]
    MalformedQuery(String),

    #[error("header `{0}` is not valid visible ASCII")]
    InvalidHeader(String),

    #[error("request body was already consumed")]
    BodyUnavailable,
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

/// Matched data was requested before any chain wrote to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchedDataError {
    #[error("no matched data has been recorded for this request")]
    NotPresent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn serializes_with_public_keys() {
        let err = ValidationError::new(Location::Body, "name", "Invalid value", "John");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "location": "body",
                "message": "Invalid value",
                "field": "name",
                "value": "John"
            })
        );
    }

    #[test]
    fn converts_to_unprocessable_api_error() {
        let errors = ValidationErrors(vec![
            ValidationError::new(Location::Query, "page", "Must be an integer", "two"),
            ValidationError::new(Location::Body, "email", "Invalid email", "x@"),
        ]);

        let api = errors.into_api_error();
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields = api.fields.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].location, "query");
        assert_eq!(fields[1].value, "x@");
    }

    #[test]
    fn empty_collection_is_ok() {
        assert!(ValidationErrors::default().into_result().is_ok());
    }

    #[test]
    fn extraction_error_is_bad_request() {
        let api: ApiError = ExtractError::MalformedBody("expected value".into()).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.message.contains("malformed request body"));
    }
}
