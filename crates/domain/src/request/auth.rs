//! Authentication header state for API requests.

use serde::{Deserialize, Serialize};

/// Name of the header the service reads its API token from.
pub const TOKEN_HEADER: &str = "token";

/// The authentication header a request carries.
///
/// `Missing` is a value in its own right so negative auth cases state their
/// intent instead of relying on a forgotten builder call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthHeader {
    /// Send `token: <value>`.
    Token(String),
    /// Send no token header at all.
    Missing,
}

impl AuthHeader {
    /// Creates a token header.
    #[must_use]
    pub fn token(value: impl Into<String>) -> Self {
        Self::Token(value.into())
    }

    /// Returns the `(name, value)` pair to send, if any.
    #[must_use]
    pub fn header(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::Token(value) => Some((TOKEN_HEADER, value.as_str())),
            Self::Missing => None,
        }
    }

    /// Returns true if no header will be sent.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}
