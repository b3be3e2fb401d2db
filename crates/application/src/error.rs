//! Application error types

use kvconform_domain::{ConfigError, DomainError};
use thiserror::Error;

use crate::ports::StoreError;

/// Errors that stop a run before (or instead of) producing a report.
///
/// Failures inside a single case never surface here; they are recorded in
/// that case's result.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The suite is malformed.
    #[error("invalid suite: {0}")]
    Suite(#[from] DomainError),

    /// The store could not be reached at startup.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The HTTP client could not be created.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
