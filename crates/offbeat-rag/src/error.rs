//! Error types for the travel advisor

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG system errors
#[derive(Debug, Error)]
pub enum Error {
    /// The query encoder is unavailable or could not vectorize the input
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// The query was empty after trimming
    #[error("Encoding failed: query is empty")]
    EmptyQuery,

    /// The similarity search store is unreachable, the index is missing,
    /// or the search request was malformed
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// The answer generator is unreachable, rejected the request,
    /// or returned no completion
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse error
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of an [`Error`] by the pipeline stage that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Encoding,
    Retrieval,
    Generation,
    Other,
}

impl Error {
    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Which pipeline stage this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Encoding(_) | Error::EmptyQuery => ErrorKind::Encoding,
            Error::Retrieval(_) => ErrorKind::Retrieval,
            Error::Generation(_) => ErrorKind::Generation,
            _ => ErrorKind::Other,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::EmptyQuery => (StatusCode::BAD_REQUEST, "empty_query"),
            Error::Encoding(_) => (StatusCode::BAD_GATEWAY, "encoding_error"),
            Error::Retrieval(_) => (StatusCode::BAD_GATEWAY, "retrieval_error"),
            Error::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_error"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Toml(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
