//! Case outcomes and run reports.
//!
//! A case walks `Pending -> PreconditionApplied? -> RequestSent ->
//! ResponseReceived -> Asserted` and ends `Passed` or `Failed`; it ends
//! `Errored` if execution breaks before assertions complete, or `NotRun` if
//! the run stopped before reaching it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conformance::ConformanceCase;
use crate::error::{DomainError, DomainResult};

/// Lifecycle phase of a case execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePhase {
    /// Not started.
    Pending,
    /// Preconditions written to the store.
    PreconditionApplied,
    /// Request handed to the HTTP client.
    RequestSent,
    /// Response fully read.
    ResponseReceived,
    /// All assertions evaluated.
    Asserted,
}

impl CasePhase {
    /// Moves forward to `next`.
    ///
    /// Skipping `PreconditionApplied` is allowed; going backwards or staying put is not.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` for a non-forward move.
    pub fn advance(self, next: Self) -> DomainResult<Self> {
        let allowed = match self {
            Self::Pending => matches!(next, Self::PreconditionApplied | Self::RequestSent),
            Self::PreconditionApplied => next == Self::RequestSent,
            Self::RequestSent => next == Self::ResponseReceived,
            Self::ResponseReceived => next == Self::Asserted,
            Self::Asserted => false,
        };
        if allowed {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for CasePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::PreconditionApplied => "precondition_applied",
            Self::RequestSent => "request_sent",
            Self::ResponseReceived => "response_received",
            Self::Asserted => "asserted",
        })
    }
}

/// Final status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Every assertion held.
    Passed,
    /// An assertion did not hold.
    Failed,
    /// Transport, timeout or store failure prevented a verdict.
    Errored,
    /// The run stopped before this case started.
    NotRun,
}

impl CaseStatus {
    /// Short uppercase label for console output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Errored => "ERROR",
            Self::NotRun => "NOT RUN",
        }
    }
}

/// The assertion that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Response status code.
    Status,
    /// `{ "error": ... }` message.
    ErrorMessage,
    /// Error body could not be decoded.
    ErrorBody,
    /// Value observed in the store after the request.
    StorePostState,
    /// API overhead over a direct store write.
    TimingOverhead,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Status => "status",
            Self::ErrorMessage => "error message",
            Self::ErrorBody => "error body",
            Self::StorePostState => "store post-state",
            Self::TimingOverhead => "timing overhead",
        })
    }
}

/// An expected-versus-actual mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    /// Which check failed.
    pub check: Check,
    /// Expected value, verbatim.
    pub expected: String,
    /// Observed value, verbatim.
    pub actual: String,
    /// Extra diagnostics (e.g. the raw body of an unparsable response).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AssertionFailure {
    /// Creates a failure.
    #[must_use]
    pub fn new(check: Check, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            check,
            expected: expected.into(),
            actual: actual.into(),
            detail: None,
        }
    }

    /// Attaches diagnostics.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.check, self.expected, self.actual
        )?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

/// Category of an execution error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionErrorKind {
    /// The request could not be built.
    Request,
    /// The HTTP transport failed.
    Transport,
    /// The HTTP call or a store operation exceeded its timeout.
    Timeout,
    /// The store was unreachable or rejected an operation.
    Store,
    /// The run deadline expired while the case was in flight.
    RunDeadline,
}

/// Why a case could not reach a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionError {
    /// Category.
    pub kind: ExecutionErrorKind,
    /// Last phase the case reached.
    pub phase: CasePhase,
    /// Underlying error text.
    pub message: String,
}

impl ExecutionError {
    /// Creates an execution error.
    #[must_use]
    pub fn new(kind: ExecutionErrorKind, phase: CasePhase, message: impl Into<String>) -> Self {
        Self {
            kind,
            phase,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} during {}: {}", self.kind, self.phase, self.message)
    }
}

/// Timings recorded for a case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseTiming {
    /// Wall-clock duration of the HTTP call.
    pub api_ms: u64,
    /// Wall-clock duration of the direct store write (timing cases only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_set_ms: Option<u64>,
}

impl CaseTiming {
    /// `api_ms - store_set_ms`, negative when the API was faster.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn overhead_ms(&self) -> Option<i64> {
        self.store_set_ms
            .map(|store| self.api_ms as i64 - store as i64)
    }
}

/// Result of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case name.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// Case tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Final status.
    pub status: CaseStatus,
    /// Furthest phase reached.
    pub phase: CasePhase,
    /// Fixture identifier used, if the case started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture_id: Option<String>,
    /// Request line issued, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    /// HTTP status observed, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Assertion failures (at most one: failures short-circuit).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<AssertionFailure>,
    /// Execution error, for `Errored` cases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionError>,
    /// Reason the case was not run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_reason: Option<String>,
    /// Timings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<CaseTiming>,
    /// Total case duration in milliseconds.
    pub duration_ms: u64,
}

impl CaseResult {
    /// Creates a pending result for a case.
    #[must_use]
    pub fn pending(case: &ConformanceCase) -> Self {
        Self {
            name: case.name.clone(),
            display_name: case.display_name().to_string(),
            tags: case.tags.clone(),
            status: CaseStatus::NotRun,
            phase: CasePhase::Pending,
            fixture_id: None,
            request: None,
            http_status: None,
            failures: Vec::new(),
            error: None,
            skipped_reason: None,
            timing: None,
            duration_ms: 0,
        }
    }

    /// A case the run never started.
    #[must_use]
    pub fn not_run(case: &ConformanceCase, reason: impl Into<String>) -> Self {
        let mut result = Self::pending(case);
        result.skipped_reason = Some(reason.into());
        result
    }

    /// Returns true if the case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Passed
    }
}

/// Counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Number of cases.
    pub total: usize,
    /// Passed cases.
    pub passed: usize,
    /// Failed cases.
    pub failed: usize,
    /// Errored cases.
    pub errored: usize,
    /// Cases not run.
    pub not_run: usize,
}

impl StatusCounts {
    fn record(&mut self, status: CaseStatus) {
        self.total += 1;
        match status {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Failed => self.failed += 1,
            CaseStatus::Errored => self.errored += 1,
            CaseStatus::NotRun => self.not_run += 1,
        }
    }

    /// Returns true if every counted case passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Report for one run of a suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Suite name.
    pub suite: String,
    /// Run start.
    pub started_at: DateTime<Utc>,
    /// Run end.
    pub finished_at: DateTime<Utc>,
    /// Overall counts.
    pub summary: StatusCounts,
    /// Counts per tag (lower-cased), for triage.
    pub by_tag: BTreeMap<String, StatusCounts>,
    /// Every case, in execution order.
    pub cases: Vec<CaseResult>,
}

impl RunReport {
    /// Builds a report and computes the counts.
    #[must_use]
    pub fn new(
        suite: impl Into<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        cases: Vec<CaseResult>,
    ) -> Self {
        let mut summary = StatusCounts::default();
        let mut by_tag: BTreeMap<String, StatusCounts> = BTreeMap::new();
        for case in &cases {
            summary.record(case.status);
            for tag in &case.tags {
                by_tag
                    .entry(tag.to_ascii_lowercase())
                    .or_default()
                    .record(case.status);
            }
        }

        Self {
            suite: suite.into(),
            started_at,
            finished_at,
            summary,
            by_tag,
            cases,
        }
    }

    /// Check if all cases passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.summary.all_passed()
    }

    /// Run duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.summary.total == 0 {
            100.0
        } else {
            (self.summary.passed as f64 / self.summary.total as f64) * 100.0
        }
    }

    /// Looks a case result up by name.
    #[must_use]
    pub fn case(&self, name: &str) -> Option<&CaseResult> {
        self.cases.iter().find(|c| c.name == name)
    }
}
