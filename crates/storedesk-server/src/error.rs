//! Server error types with HTTP status code mapping

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storedesk_core::application::ApplicationError;
use thiserror::Error;

/// Errors a handler can return
#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid request input, reported against a single field
    #[error("{message}")]
    Validation { field: String, message: String },

    /// No authenticated identity where one is required
    #[error("{0}")]
    Unauthorized(String),

    /// Not Found (404)
    #[error("{0}")]
    NotFound(String),

    /// Anything the client cannot fix
    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    /// Map error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Create a validation error (422)
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServerError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unauthorized error (401)
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ServerError::Unauthorized(msg.into())
    }

    /// Create an internal error (500)
    pub fn internal(msg: impl Into<String>) -> Self {
        ServerError::Internal(msg.into())
    }
}

impl From<ApplicationError> for ServerError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::Validation { field, message } => {
                ServerError::Validation { field, message }
            }
            ApplicationError::NotFound { .. } => ServerError::NotFound(e.to_string()),
            ApplicationError::Domain(inner) => {
                ServerError::Internal(format!("[{}] {}", inner.code(), inner))
            }
        }
    }
}

impl From<storedesk_core::Error> for ServerError {
    fn from(e: storedesk_core::Error) -> Self {
        ServerError::Internal(format!("[{}] {}", e.code(), e))
    }
}

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Field-level messages, present on validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            ServerError::Validation { field, message } => ErrorResponse {
                message: message.clone(),
                errors: Some(BTreeMap::from([(field, vec![message])])),
            },
            ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                ErrorResponse {
                    message: "Internal server error".to_string(),
                    errors: None,
                }
            }
            other => ErrorResponse {
                message: other.to_string(),
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
