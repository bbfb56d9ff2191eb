//! Error types for harvest operations.
//!
//! Messages follow the What/Why/Fix pattern used across the project.
//! Malformed provider responses are deliberately absent here: they end
//! pagination as an empty page instead of failing the harvest.

use thiserror::Error;

/// Errors that can end a harvest or reject a request before it starts.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// A transient failure persisted through every retry attempt
    #[error(
        "request to '{url}' failed after {attempts} attempt(s): {source}\n  Suggestion: Check your network connection or try again later"
    )]
    RetriesExhausted {
        /// The request URL
        url: String,
        /// Attempts made, including the first
        attempts: u32,
        /// The last transport error
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status
    #[error("provider returned HTTP {status} for '{url}'\n  Suggestion: {suggestion}")]
    HttpStatus {
        /// The request URL
        url: String,
        /// HTTP status code
        status: u16,
        /// How to fix the issue
        suggestion: String,
    },

    /// A non-retryable transport error
    #[error("request to '{url}' failed: {source}\n  Suggestion: Check the provider URL and proxy settings")]
    Request {
        /// The request URL
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be constructed
    #[error("HTTP client construction failed: {reason}\n  Suggestion: Check TLS and proxy configuration")]
    ClientBuild {
        /// Why construction failed
        reason: String,
    },

    /// The search request is unusable as given
    #[error("invalid search request: {reason}\n  Suggestion: {suggestion}")]
    InvalidRequest {
        /// What is wrong with the request
        reason: String,
        /// How to fix the request
        suggestion: String,
    },
}

impl HarvestError {
    /// Creates a `RetriesExhausted` error.
    #[must_use]
    pub fn retries_exhausted(url: &str, attempts: u32, source: reqwest::Error) -> Self {
        Self::RetriesExhausted {
            url: url.to_string(),
            attempts,
            source,
        }
    }

    /// Creates an `HttpStatus` error with a suggestion matched to the status class.
    #[must_use]
    pub fn http_status(url: &str, status: u16) -> Self {
        let suggestion = match status {
            400 => "Simplify the query or remove unsupported filters",
            429 => "The provider is rate limiting; wait and retry, and set a contact mailto",
            500..=599 => "The provider is having trouble; try again later",
            _ => "Check the query parameters and provider status",
        };
        Self::HttpStatus {
            url: url.to_string(),
            status,
            suggestion: suggestion.to_string(),
        }
    }

    /// Creates a `Request` error.
    #[must_use]
    pub fn request(url: &str, source: reqwest::Error) -> Self {
        Self::Request {
            url: url.to_string(),
            source,
        }
    }

    /// Creates a `ClientBuild` error.
    #[must_use]
    pub fn client_build(reason: impl Into<String>) -> Self {
        Self::ClientBuild {
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(reason: &str, suggestion: &str) -> Self {
        Self::InvalidRequest {
            reason: reason.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    /// True for failures caused by a transient network condition.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }
}
