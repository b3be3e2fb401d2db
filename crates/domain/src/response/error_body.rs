//! Structured error bodies returned by the keys API.

use serde::{Deserialize, Serialize};

/// The `{ "error": "<message>" }` body the service sends on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Outcome of decoding a response body as an [`ErrorResponse`].
///
/// "No body" and "a body we could not parse" are kept apart so a report can
/// tell a silent service from a misbehaving one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyDecode {
    /// The body was a well-formed error object.
    Decoded(ErrorResponse),
    /// The body was empty or whitespace.
    Empty,
    /// The body was present but not an error object.
    Unparsable {
        /// Raw body as received.
        body: String,
        /// Parser message.
        reason: String,
    },
}

impl ErrorResponse {
    /// Decodes a response body.
    #[must_use]
    pub fn decode(body: &str) -> BodyDecode {
        if body.trim().is_empty() {
            return BodyDecode::Empty;
        }
        match serde_json::from_str::<Self>(body) {
            Ok(parsed) => BodyDecode::Decoded(parsed),
            Err(e) => BodyDecode::Unparsable {
                body: body.to_string(),
                reason: e.to_string(),
            },
        }
    }
}
