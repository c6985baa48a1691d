//! Error types for Constellation services
//!
//! Provides:
//! - Distinct error types for the upstream, lookup and internal failure modes
//! - HTTP status code mapping
//! - Error codes for client handling
//!
//! Rendering into a response body lives at the request boundary (the gateway),
//! which knows the endpoint summary and whether details may be exposed.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Message used when the upstream document lacks the expected shape
pub const INVALID_UPSTREAM_MESSAGE: &str = "Invalid response from Wikipedia API";

/// Message used when no search strategy produced hits
pub const NO_RESULTS_MESSAGE: &str = "No results found for this topic";

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    TopicTooShort,

    // Resource errors (4xxx)
    NoResults,

    // External service errors (8xxx)
    UpstreamError,
    InvalidUpstreamResponse,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::TopicTooShort => 1002,

            ErrorCode::NoResults => 4001,

            ErrorCode::UpstreamError => 8001,
            ErrorCode::InvalidUpstreamResponse => 8002,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Search term is too short")]
    TopicTooShort { min_len: usize },

    // Lookup errors
    #[error("No results found for this topic")]
    NoResults { suggestions: Vec<String> },

    // External service errors
    #[error("Wikipedia API error {code}: {info}")]
    Upstream { code: String, info: String },

    #[error("{}", INVALID_UPSTREAM_MESSAGE)]
    InvalidUpstream { context: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::TopicTooShort { .. } => ErrorCode::TopicTooShort,
            AppError::NoResults { .. } => ErrorCode::NoResults,
            AppError::Upstream { .. } => ErrorCode::UpstreamError,
            AppError::InvalidUpstream { .. } => ErrorCode::InvalidUpstreamResponse,
            AppError::HttpClient(_) => ErrorCode::UpstreamError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration(_) => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// Every failure that is not a lookup miss or a bad request surfaces as 500,
    /// upstream failures included.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::TopicTooShort { .. } |
            AppError::NoResults { .. } => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            AppError::Upstream { .. } |
            AppError::InvalidUpstream { .. } |
            AppError::HttpClient(_) |
            AppError::Internal { .. } |
            AppError::Configuration(_) |
            AppError::Serialization(_) |
            AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error body returned by every endpoint
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorResponse {
    /// Build the body for `err`, raised while serving an endpoint described by `summary`.
    ///
    /// `stack` is only filled when `expose_details` is set.
    pub fn from_error(summary: &str, err: &AppError, expose_details: bool) -> Self {
        match err {
            AppError::TopicTooShort { .. } => Self {
                error: err.to_string(),
                message: Some("Please try a longer, more specific search term".to_string()),
                ..Self::default()
            },
            AppError::NoResults { suggestions } => Self {
                error: err.to_string(),
                suggestions: (!suggestions.is_empty()).then(|| suggestions.clone()),
                ..Self::default()
            },
            AppError::InvalidUpstream { .. } => Self {
                error: err.to_string(),
                ..Self::default()
            },
            _ => Self {
                error: summary.to_string(),
                message: Some(err.to_string()),
                stack: expose_details.then(|| format!("{:?}", err)),
                ..Self::default()
            },
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string()
        }
    }
}
