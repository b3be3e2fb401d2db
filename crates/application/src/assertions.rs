//! Assertion checks applied to a case's observations.
//!
//! Each check returns `Ok(())` or the `AssertionFailure` to record; the
//! runner stops at the first failure.

use std::time::Duration;

use kvconform_domain::conformance::{ErrorExpectation, StatusExpectation};
use kvconform_domain::report::{AssertionFailure, Check};
use kvconform_domain::response::{ApiResponse, BodyDecode, ErrorResponse, StatusCode};
use regex::Regex;

/// Longest body excerpt copied into a failure.
const BODY_PREVIEW_CHARS: usize = 1024;

/// Store state the runner expects after the request, fixture already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedState {
    /// Key holds exactly this value.
    Equals(String),
    /// Key does not exist.
    Absent,
}

/// Checks the response status against the expectation.
///
/// # Errors
///
/// Returns the failure if the status does not match.
pub fn check_status(
    expected: &StatusExpectation,
    response: &ApiResponse,
) -> Result<(), AssertionFailure> {
    if expected.matches(response.status) {
        Ok(())
    } else {
        Err(AssertionFailure::new(
            Check::Status,
            expected.description(),
            response.status.to_string(),
        )
        .with_detail(StatusCode::new(response.status).to_string()))
    }
}

/// Decodes the body as `{ "error": ... }` and compares the message.
///
/// An empty body and an unparsable body fail with distinct messages; the
/// unparsable body is included verbatim.
///
/// # Errors
///
/// Returns the failure if the body does not carry the expected message.
pub fn check_error_message(
    expected: &ErrorExpectation,
    response: &ApiResponse,
) -> Result<(), AssertionFailure> {
    match ErrorResponse::decode(&response.body) {
        BodyDecode::Decoded(body) => {
            if error_matches(expected, &body.error)? {
                Ok(())
            } else {
                Err(AssertionFailure::new(
                    Check::ErrorMessage,
                    expected.description(),
                    format!("\"{}\"", body.error),
                ))
            }
        }
        BodyDecode::Empty => Err(AssertionFailure::new(
            Check::ErrorBody,
            expected.description(),
            "empty body",
        )),
        BodyDecode::Unparsable { body, reason } => Err(AssertionFailure::new(
            Check::ErrorBody,
            expected.description(),
            "unparsable body",
        )
        .with_detail(format!("{reason}; body: {}", preview(&body)))),
    }
}

fn error_matches(expected: &ErrorExpectation, actual: &str) -> Result<bool, AssertionFailure> {
    match expected {
        ErrorExpectation::Exact(message) => Ok(message == actual),
        ErrorExpectation::Matches { matches } => Regex::new(matches)
            .map(|re| re.is_match(actual))
            .map_err(|e| {
                AssertionFailure::new(Check::ErrorMessage, expected.description(), actual)
                    .with_detail(format!("invalid regex pattern: {e}"))
            }),
    }
}

/// Compares the value read from the store with the expected state.
///
/// # Errors
///
/// Returns the failure on mismatch.
pub fn check_store_state(
    key: &str,
    expected: &ResolvedState,
    actual: Option<&str>,
) -> Result<(), AssertionFailure> {
    let holds = match (expected, actual) {
        (ResolvedState::Equals(want), Some(got)) => want == got,
        (ResolvedState::Absent, None) => true,
        _ => false,
    };
    if holds {
        Ok(())
    } else {
        Err(AssertionFailure::new(
            Check::StorePostState,
            describe_state(expected),
            actual.map_or_else(|| "absent".to_string(), |v| format!("\"{v}\"")),
        )
        .with_detail(format!("key \"{key}\"")))
    }
}

fn describe_state(state: &ResolvedState) -> String {
    match state {
        ResolvedState::Equals(value) => format!("\"{value}\""),
        ResolvedState::Absent => "absent".to_string(),
    }
}

/// Checks that the API call's overhead over a direct store write stays
/// under `max_overhead_ms`.
///
/// # Errors
///
/// Returns the failure if the overhead reaches the threshold.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn check_timing_overhead(
    api: Duration,
    store: Duration,
    max_overhead_ms: u64,
) -> Result<(), AssertionFailure> {
    let overhead = api.as_millis() as i64 - store.as_millis() as i64;
    if overhead < max_overhead_ms as i64 {
        Ok(())
    } else {
        Err(AssertionFailure::new(
            Check::TimingOverhead,
            format!("< {max_overhead_ms}ms"),
            format!("{overhead}ms"),
        )
        .with_detail(format!(
            "api {}ms, store set {}ms",
            api.as_millis(),
            store.as_millis()
        )))
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > BODY_PREVIEW_CHARS {
        let cut: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        body.to_string()
    }
}
