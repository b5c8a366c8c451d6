//! HTTP error handling
//!
//! Provides consistent JSON error responses for every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use structree_core::StructureServiceError;

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const STRUCTURE_NOT_FOUND: &str = "STRUCTURE_NOT_FOUND";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const PERSISTENCE_ERROR: &str = "PERSISTENCE_ERROR";

/// HTTP error response body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detail safe to show to the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create a new HTTP error with details
    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    /// Missing or rejected bearer token
    pub fn unauthorized(details: impl Into<String>) -> Self {
        Self::with_details("Authentication required.", UNAUTHORIZED, details)
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            STRUCTURE_NOT_FOUND => StatusCode::NOT_FOUND,
            VALIDATION_ERROR => StatusCode::UNPROCESSABLE_ENTITY,
            UNAUTHORIZED => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<StructureServiceError> for HttpError {
    fn from(err: StructureServiceError) -> Self {
        let code = match &err {
            StructureServiceError::NotFound { .. } => STRUCTURE_NOT_FOUND,
            StructureServiceError::ValidationFailed(_) => VALIDATION_ERROR,
            // Internal detail was logged by the service; never serialised
            StructureServiceError::PersistenceFailed { .. } => PERSISTENCE_ERROR,
        };
        HttpError::new(err.user_message(), code)
    }
}
