//! HTTP client port

use async_trait::async_trait;
use kvconform_domain::{request::ApiRequest, response::ApiResponse};
use thiserror::Error;

/// Transport-level failures of an HTTP call.
///
/// A response with any status code is a success at this level; only the
/// absence of a response is an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete within its timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport error.
    #[error("HTTP error: {0}")]
    Other(String),
}

impl HttpClientError {
    /// Returns true for timeouts.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing the runner
/// to be independent of specific HTTP libraries.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes a request and returns whatever response the service produced.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received (network failure,
    /// timeout, unreadable body).
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, HttpClientError>;
}
