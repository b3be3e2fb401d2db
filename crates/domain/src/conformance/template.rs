//! Fixture templates
//!
//! Cases are declared before their fixture exists, so keys and values are
//! written as templates such as `{{key}}` or `{{id}}-newValue` and resolved
//! per execution. Text without placeholders is a literal.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::CaseFixture;
use crate::error::{DomainError, DomainResult};

/// Placeholders a template may reference.
pub const PLACEHOLDERS: &[&str] = &["id", "key", "value"];

/// A string with optional `{{id}}`, `{{key}}` and `{{value}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template(String);

impl Template {
    /// Wraps template text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// `{{key}}`
    #[must_use]
    pub fn key() -> Self {
        Self::new("{{key}}")
    }

    /// `{{value}}`
    #[must_use]
    pub fn value() -> Self {
        Self::new("{{value}}")
    }

    /// The raw template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the template contains no placeholders.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        !self.0.contains("{{")
    }

    /// Checks that every placeholder is known and closed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTemplate` for unknown or unterminated placeholders.
    pub fn validate(&self) -> DomainResult<()> {
        let mut rest = self.0.as_str();
        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                return Err(self.invalid("unterminated placeholder"));
            };
            let name = after[..end].trim();
            if !PLACEHOLDERS.contains(&name) {
                return Err(self.invalid(format!("unknown placeholder '{name}'")));
            }
            rest = &after[end + 2..];
        }
        Ok(())
    }

    /// Substitutes fixture values into the template.
    ///
    /// Unknown placeholders are left in place; call [`Template::validate`] first
    /// to reject them.
    #[must_use]
    pub fn resolve(&self, fixture: &CaseFixture) -> String {
        let mut out = String::with_capacity(self.0.len() + 48);
        let mut rest = self.0.as_str();
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };
            match after[..end].trim() {
                "id" => out.push_str(&fixture.id().to_string()),
                "key" => out.push_str(fixture.key()),
                "value" => out.push_str(fixture.value()),
                _ => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        out
    }

    fn invalid(&self, reason: impl Into<String>) -> DomainError {
        DomainError::InvalidTemplate {
            template: self.0.clone(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Template {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Template {
    fn from(value: String) -> Self {
        Self(value)
    }
}
