//! HTTP request handlers for the clinic REST API.
//!
//! All handlers are generic over the storage backend and follow the same
//! contract: bodies are taken as raw JSON and decoded explicitly so both
//! malformed bodies and validation failures come back as 400 with a
//! field-level error list.

pub mod admissions;
pub mod appointments;
pub mod auth;
pub mod dashboard;
pub mod doctors;
pub mod drugs;
pub mod health;
pub mod patients;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use clinic_model::{FieldError, Validate};

use crate::error::ApiError;

/// Query string for the search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring to match; required and non-blank.
    pub q: Option<String>,
}

impl SearchQuery {
    /// Returns the trimmed query, or 400 when missing or blank.
    pub fn require(&self) -> Result<&str, ApiError> {
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => Ok(q),
            _ => Err(ApiError::bad_request("Search query is required")),
        }
    }
}

/// Decodes and validates a request body.
///
/// Deserialization failures are reported the same way validation failures
/// are, so clients see a single 400 shape for bad input.
pub(crate) fn parse_body<T>(value: serde_json::Value) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = serde_json::from_value(value).map_err(|e| ApiError::Validation {
        errors: vec![FieldError {
            field: "body",
            message: e.to_string(),
        }],
    })?;
    parsed.validate()?;
    Ok(parsed)
}
