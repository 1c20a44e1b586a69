//! Error types for Pantry Engine
//!
//! The matching core never fails: malformed records degrade to empty ingredient
//! lists and "no match" is an empty result. Errors here belong to the layers
//! around it:
//! - configuration and substitution-table loading
//! - dataset I/O
//! - HTTP request validation, with status code mapping for API responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;

/// Result type alias for Pantry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Pantry Engine
#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Configuration error: {message}")]
    Config {
        message: Cow<'static, str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig {
        key: &'static str,
        message: Cow<'static, str>,
    },

    // ========================================================================
    // Dataset Errors
    // ========================================================================
    #[error("Dataset error: {message}")]
    Dataset {
        message: Cow<'static, str>,
        #[source]
        source: Option<polars::error::PolarsError>,
    },

    #[error("Dataset file not found: {path}")]
    DatasetNotFound { path: String },

    #[error("Invalid substitution table: {message}")]
    SubstitutionTable { message: Cow<'static, str> },

    // ========================================================================
    // API Errors
    // ========================================================================
    #[error("Bad request: {message}")]
    BadRequest { message: Cow<'static, str> },

    #[error("Internal server error")]
    Internal {
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error wrapping its cause
    pub fn config(
        message: impl Into<Cow<'static, str>>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a dataset error with the underlying polars failure attached
    pub fn dataset_with_source(
        message: impl Into<Cow<'static, str>>,
        source: polars::error::PolarsError,
    ) -> Self {
        Self::Dataset {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal {
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this error should be logged at error level
    pub fn is_error_level(&self) -> bool {
        matches!(
            self,
            Error::Dataset { .. } | Error::Internal { .. } | Error::Io(_)
        )
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::DatasetNotFound { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } | Error::InvalidConfig { .. } => "CONFIG_ERROR",
            Error::Dataset { .. } | Error::DatasetNotFound { .. } => "DATASET_ERROR",
            Error::SubstitutionTable { .. } => "SUBSTITUTION_TABLE_ERROR",
            Error::BadRequest { .. } => "BAD_REQUEST",
            Error::Io(_) => "IO_ERROR",
            Error::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

// ============================================================================
// Error Response for API
// ============================================================================

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_error_level() {
            tracing::error!(error = %self, code, "request failed");
        }

        // Don't expose internal error details
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::SubstitutionTable {
            message: err.message().to_string().into(),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            Error::bad_request("top_n too large").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::DatasetNotFound {
                path: "archive/recipes.csv".to_string()
            }
            .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            Error::Internal { source: None }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::config("bad .env", std::io::Error::other("line 1")).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(
            Error::DatasetNotFound {
                path: "recipes.csv".to_string()
            }
            .error_code(),
            "DATASET_ERROR"
        );
        assert_eq!(
            Error::SubstitutionTable {
                message: "empty".into()
            }
            .error_code(),
            "SUBSTITUTION_TABLE_ERROR"
        );
    }

    #[test]
    fn test_error_level_classification() {
        assert!(Error::Io(std::io::Error::other("disk")).is_error_level());
        assert!(!Error::DatasetNotFound {
            path: "recipes.csv".to_string()
        }
        .is_error_level());
        assert!(!Error::bad_request("nope").is_error_level());
    }
}
