//! Expected outcomes of a conformance case.

use serde::{Deserialize, Serialize};

use super::Template;
use crate::error::{DomainError, DomainResult};

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Inclusive range of status codes (e.g., 401-499).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }

    /// Create an inclusive range expectation.
    #[must_use]
    pub const fn range(min: u16, max: u16) -> Self {
        Self::Range { min, max }
    }

    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => code.to_string(),
            Self::Range { min, max } => format!("{min}..={max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("one of [{}]", codes_str.join(", "))
            }
        }
    }

    /// Rejects ranges that can never match.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusExpectation` for inverted ranges or empty sets.
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            Self::Range { min, max } if min > max => Err(DomainError::InvalidStatusExpectation(
                format!("range {min}..={max} is empty"),
            )),
            Self::OneOf(codes) if codes.is_empty() => Err(DomainError::InvalidStatusExpectation(
                "empty set of codes".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::Exact(200)
    }
}

/// Expected content of the `{ "error": ... }` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorExpectation {
    /// Message must equal this text exactly.
    Exact(String),
    /// Message must match this regular expression.
    Matches {
        /// Regex pattern.
        matches: String,
    },
}

impl ErrorExpectation {
    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(message) => format!("\"{message}\""),
            Self::Matches { matches } => format!("/{matches}/"),
        }
    }
}

/// State the store must be in once the request has completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExpectedState {
    /// Key holds exactly this value.
    Equals {
        /// Expected value template.
        value: Template,
    },
    /// Key does not exist.
    Absent,
}

/// Store post-state check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreExpectation {
    /// Key to inspect. Defaults to the key the request targeted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Template>,
    /// Expected state.
    #[serde(flatten)]
    pub state: ExpectedState,
}

/// Everything a case expects to observe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expectation {
    /// Status code or range.
    #[serde(default)]
    pub status: StatusExpectation,
    /// Error body message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorExpectation>,
    /// Store post-state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreExpectation>,
}
