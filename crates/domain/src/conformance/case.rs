//! Conformance case model.

use serde::{Deserialize, Serialize};

use super::{
    ErrorExpectation, Expectation, ExpectedState, StatusExpectation, StoreExpectation, Template,
};
use crate::error::{DomainError, DomainResult};
use crate::request::{AuthHeader, HttpMethod, ParamEncoding};

/// Timing threshold used by the reference performance case.
pub const DEFAULT_TIMING_THRESHOLD_MS: u64 = 3000;

/// Which token a case sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// The token from the harness configuration.
    #[default]
    Configured,
    /// No token header.
    Missing,
    /// A specific token, e.g. a deliberately invalid one.
    Token(String),
}

impl AuthMode {
    /// Resolves the header against the configured token.
    #[must_use]
    pub fn resolve(&self, configured: &str) -> AuthHeader {
        match self {
            Self::Configured => AuthHeader::token(configured),
            Self::Missing => AuthHeader::Missing,
            Self::Token(token) => AuthHeader::token(token.clone()),
        }
    }
}

/// Direct store mutation applied before the request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Precondition {
    /// `SET key value`
    Set {
        /// Key template.
        key: Template,
        /// Value template.
        value: Template,
    },
    /// `DEL key`
    Delete {
        /// Key template.
        key: Template,
    },
}

impl Precondition {
    /// Sets the fixture key to the fixture value.
    #[must_use]
    pub fn seed_fixture() -> Self {
        Self::Set {
            key: Template::key(),
            value: Template::value(),
        }
    }

    fn templates(&self) -> Vec<&Template> {
        match self {
            Self::Set { key, value } => vec![key, value],
            Self::Delete { key } => vec![key],
        }
    }
}

/// What kind of measurement a case performs besides its assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CaseKind {
    /// Status, body and store checks only.
    #[default]
    Standard,
    /// Additionally compares the HTTP call against a direct store `SET`.
    ///
    /// This is a coarse regression guard, not a benchmark.
    Timing {
        /// Maximum allowed `api_ms - store_ms`.
        max_overhead_ms: u64,
    },
}

/// A named scenario asserting one documented behaviour of the keys API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceCase {
    /// Unique name within the suite.
    pub name: String,
    /// Display name shown in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Triage tags such as `bug`, `auth` or `performance`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// HTTP method.
    pub method: HttpMethod,
    /// `name` query parameter; omitted when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Template>,
    /// `value` query parameter; omitted when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Template>,
    /// Encoding of the `name` parameter.
    #[serde(default)]
    pub key_encoding: ParamEncoding,
    /// Token to send.
    #[serde(default)]
    pub auth: AuthMode,
    /// Store mutations applied before the request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preconditions: Vec<Precondition>,
    /// Expected outcome.
    #[serde(default)]
    pub expect: Expectation,
    /// Measurement kind.
    #[serde(default)]
    pub kind: CaseKind,
}

impl ConformanceCase {
    /// Creates a case with no parameters that expects a 200.
    #[must_use]
    pub fn new(name: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            name: name.into(),
            description: None,
            tags: Vec::new(),
            method,
            key: None,
            value: None,
            key_encoding: ParamEncoding::Encode,
            auth: AuthMode::Configured,
            preconditions: Vec::new(),
            expect: Expectation::default(),
            kind: CaseKind::Standard,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Sends the fixture key and value.
    #[must_use]
    pub fn with_fixture_pair(self) -> Self {
        self.with_key(Template::key()).with_value(Template::value())
    }

    /// Sets the `name` parameter.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<Template>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets a pre-encoded `name` parameter that is sent verbatim.
    #[must_use]
    pub fn with_verbatim_key(mut self, key: impl Into<Template>) -> Self {
        self.key = Some(key.into());
        self.key_encoding = ParamEncoding::Verbatim;
        self
    }

    /// Sets the `value` parameter.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Template>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the token mode.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    /// Adds a precondition.
    #[must_use]
    pub fn given(mut self, precondition: Precondition) -> Self {
        self.preconditions.push(precondition);
        self
    }

    /// Expects an exact status.
    #[must_use]
    pub fn expect_status(mut self, status: u16) -> Self {
        self.expect.status = StatusExpectation::exact(status);
        self
    }

    /// Expects a status within an inclusive range.
    #[must_use]
    pub fn expect_status_in(mut self, min: u16, max: u16) -> Self {
        self.expect.status = StatusExpectation::range(min, max);
        self
    }

    /// Expects an exact error message.
    #[must_use]
    pub fn expect_error(mut self, message: impl Into<String>) -> Self {
        self.expect.error = Some(ErrorExpectation::Exact(message.into()));
        self
    }

    /// Expects the request key to hold `value` afterwards.
    #[must_use]
    pub fn expect_stored(mut self, value: impl Into<Template>) -> Self {
        self.expect.store = Some(StoreExpectation {
            key: None,
            state: ExpectedState::Equals {
                value: value.into(),
            },
        });
        self
    }

    /// Expects the request key to be absent afterwards.
    #[must_use]
    pub fn expect_absent(mut self) -> Self {
        self.expect.store = Some(StoreExpectation {
            key: None,
            state: ExpectedState::Absent,
        });
        self
    }

    /// Turns the case into a timing case.
    #[must_use]
    pub const fn timing(mut self, max_overhead_ms: u64) -> Self {
        self.kind = CaseKind::Timing { max_overhead_ms };
        self
    }

    /// Name shown in reports.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }

    /// Case-insensitive tag membership.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Returns the auth header for this case.
    #[must_use]
    pub fn auth_header(&self, configured_token: &str) -> AuthHeader {
        self.auth.resolve(configured_token)
    }

    /// Checks the case is executable.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` describing the first problem found.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }

        self.expect.status.validate()?;

        let mut templates: Vec<&Template> = Vec::new();
        templates.extend(self.key.iter());
        templates.extend(self.value.iter());
        for precondition in &self.preconditions {
            templates.extend(precondition.templates());
        }
        if let Some(store) = &self.expect.store {
            templates.extend(store.key.iter());
            if let ExpectedState::Equals { value } = &store.state {
                templates.push(value);
            }
            if store.key.is_none() && self.key.is_none() {
                return Err(self.invalid("store expectation needs a key when the request has none"));
            }
        }
        for template in templates {
            template.validate()?;
        }

        if matches!(self.kind, CaseKind::Timing { .. }) && self.key.is_none() {
            return Err(self.invalid("timing case needs a key to write"));
        }

        Ok(())
    }

    fn invalid(&self, reason: &str) -> DomainError {
        DomainError::InvalidCase {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}
