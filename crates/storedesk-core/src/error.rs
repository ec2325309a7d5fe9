//! Error types for Storedesk

use thiserror::Error;

/// Result type alias using Storedesk's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Storedesk error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Search source errors (E100-E199)
    #[error("Search source '{source_name}' failed: {message}")]
    SourceFailed { source_name: String, message: String },

    #[error("Search source '{0}' did not answer within {1} ms")]
    SourceTimeout(String, u64),

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Failed to parse stored value: {0}")]
    Parse(String),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a source failure from any displayable cause
    pub fn source_failed(source_name: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::SourceFailed {
            source_name: source_name.into(),
            message: cause.to_string(),
        }
    }

    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::SourceFailed { .. } => "E100",
            Self::SourceTimeout(..) => "E101",
            Self::DatabaseError(_) => "E400",
            Self::Parse(_) => "E401",
            Self::Other(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::DatabaseError(_) => Some("storedesk migrate".to_string()),
            Self::SourceTimeout(..) => {
                Some("storedesk config set search.request_deadline_ms <ms>".to_string())
            }
            _ => None,
        }
    }
}
