//! Error types for the Infobase RAG service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::types::Lang;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Library errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding provider error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector index error
    #[error("Vector index error: {0}")]
    VectorDb(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Hosted API answered with an error status
    #[error("{service} returned HTTP {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Article scraping error
    #[error("Failed to scrape '{url}': {message}")]
    Scrape { url: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector index error
    pub fn vector_db(message: impl Into<String>) -> Self {
        Self::VectorDb(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an error for a non-success API response
    pub fn api(service: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            service,
            status,
            body: body.into(),
        }
    }

    /// Create a scrape error
    pub fn scrape(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Scrape {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether repeating the request could succeed. Client errors other
    /// than timeouts and rate limits will fail again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api { status, .. } => !(400..500).contains(status) || matches!(status, 408 | 429),
            Error::Config(_) => false,
            _ => true,
        }
    }
}

/// Errors surfaced to HTTP clients.
///
/// Bodies are `{"error": ...}` for English and `{"erreur": ...}` for French.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// No `query` parameter
    NoQuery(Lang),
    /// Query contains code-like punctuation
    InvalidQuery(Lang),
    /// Query exceeds the configured length
    QueryTooLong(Lang),
    /// Unknown or expired cache id
    InvalidId(Lang),
    /// Anything that went wrong upstream
    Internal(Lang),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoQuery(_) | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidQuery(_) => StatusCode::FORBIDDEN,
            ApiError::QueryTooLong(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Language of the response body
    pub fn lang(&self) -> Lang {
        match *self {
            ApiError::NoQuery(lang)
            | ApiError::InvalidQuery(lang)
            | ApiError::QueryTooLong(lang)
            | ApiError::InvalidId(lang)
            | ApiError::Internal(lang) => lang,
        }
    }

    /// Localized message
    pub fn message(&self) -> &'static str {
        match (self, self.lang()) {
            (ApiError::NoQuery(_), Lang::En) => "No query provided",
            (ApiError::NoQuery(_), Lang::Fr) => "Aucune requête fournie",
            (ApiError::InvalidQuery(_), Lang::En) => "Invalid query",
            (ApiError::InvalidQuery(_), Lang::Fr) => "Requête invalide",
            (ApiError::QueryTooLong(_), Lang::En) => "Query too long",
            (ApiError::QueryTooLong(_), Lang::Fr) => "Requête trop longue",
            (ApiError::InvalidId(_), Lang::En) => "Invalid id",
            (ApiError::InvalidId(_), Lang::Fr) => "Identifiant invalide",
            (ApiError::Internal(_), Lang::En) => "Internal server error",
            (ApiError::Internal(_), Lang::Fr) => "Erreur interne du serveur",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.lang() {
            Lang::En => json!({ "error": self.message() }),
            Lang::Fr => json!({ "erreur": self.message() }),
        };

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NoQuery(Lang::En).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidQuery(Lang::En).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::QueryTooLong(Lang::Fr).status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ApiError::InvalidId(Lang::Fr).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal(Lang::En).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_localized_message() {
        assert_eq!(ApiError::InvalidId(Lang::En).message(), "Invalid id");
        assert_eq!(ApiError::InvalidId(Lang::Fr).message(), "Identifiant invalide");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(!Error::api("Voyage", 401, "bad key").is_retryable());
        assert!(!Error::api("Anthropic", 400, "bad request").is_retryable());
        assert!(Error::api("Voyage", 429, "slow down").is_retryable());
        assert!(Error::api("Anthropic", 529, "overloaded").is_retryable());
        assert!(Error::llm("connection reset").is_retryable());
    }

    #[test]
    fn test_scrape_error_display() {
        let err = Error::scrape("https://example.org/a", "no <main> element");
        assert_eq!(
            err.to_string(),
            "Failed to scrape 'https://example.org/a': no <main> element"
        );
    }
}
