//! Error types for the clinic REST API.
//!
//! Every error renders as a JSON body with a `message` field; validation
//! failures additionally carry an `errors` array of field-level entries.
//! Storage failures are logged with their detail and surfaced to clients
//! as an opaque 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use clinic_model::FieldError;
use clinic_persistence::StorageError;

/// The primary error type for REST API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No valid session accompanied the request.
    #[error("unauthorized")]
    Unauthorized,

    /// The addressed entity does not exist.
    #[error("{resource} not found")]
    NotFound {
        /// Entity kind, capitalized for the client message.
        resource: &'static str,
    },

    /// The request body failed validation.
    #[error("validation failed")]
    Validation {
        /// Field-level validation failures.
        errors: Vec<FieldError>,
    },

    /// The request was malformed in some other way.
    #[error("{message}")]
    BadRequest {
        /// Client-facing detail.
        message: String,
    },

    /// Something went wrong server-side; detail stays in the logs.
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    /// Shorthand for a 404 on the named entity kind.
    pub fn not_found(resource: &'static str) -> Self {
        ApiError::NotFound { resource }
    }

    /// Shorthand for a 400 with a plain message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "storage operation failed");
        ApiError::Internal
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation { errors }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthorized" })),
            )
                .into_response(),
            ApiError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": format!("{resource} not found") })),
            )
                .into_response(),
            ApiError::Validation { errors } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Validation error", "errors": errors })),
            )
                .into_response(),
            ApiError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": message })),
            )
                .into_response(),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

/// Result type alias for handler functions.
pub type ApiResult<T> = Result<T, ApiError>;
