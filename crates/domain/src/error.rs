//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while validating cases, suites and requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A template references a placeholder the fixture cannot provide.
    #[error("invalid template '{template}': {reason}")]
    InvalidTemplate {
        /// The offending template text.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A status expectation is malformed (e.g. an inverted range).
    #[error("invalid status expectation: {0}")]
    InvalidStatusExpectation(String),

    /// A conformance case is structurally invalid.
    #[error("invalid case '{name}': {reason}")]
    InvalidCase {
        /// Case name (may be empty when the name itself is the problem).
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two cases in one suite share a name.
    #[error("duplicate case name: {0}")]
    DuplicateCase(String),

    /// A case tried to move backwards (or sideways) through its lifecycle.
    #[error("invalid case transition: {from} -> {to}")]
    InvalidTransition {
        /// Phase the case was in.
        from: String,
        /// Phase that was requested.
        to: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised while validating harness configuration.
///
/// Any of these aborts a run before the first case executes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not provided by any source.
    #[error("missing required configuration value `{field}`")]
    Missing {
        /// Dotted path of the missing setting.
        field: &'static str,
    },

    /// A setting was provided but cannot be used.
    #[error("invalid configuration value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending setting.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
