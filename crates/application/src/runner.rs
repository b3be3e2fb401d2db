//! Sequential conformance runner.
//!
//! Executes every case of a suite against the HTTP API, using the store as
//! the oracle for preconditions and post-state checks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use kvconform_domain::conformance::{
    CaseFixture, CaseKind, ConformanceCase, ConformanceSuite, ExpectedState, Precondition,
};
use kvconform_domain::config::DEFAULT_REQUEST_TIMEOUT_MS;
use kvconform_domain::report::{
    AssertionFailure, CasePhase, CaseResult, CaseStatus, CaseTiming, ExecutionError,
    ExecutionErrorKind, RunReport,
};
use kvconform_domain::request::ApiRequest;
use kvconform_domain::response::ApiResponse;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::assertions::{
    ResolvedState, check_error_message, check_status, check_store_state, check_timing_overhead,
};
use crate::error::ApplicationResult;
use crate::ports::{Clock, HttpClient, HttpClientError, KeyValueStore, StoreError};
use crate::request_builder::ApiRequestBuilder;

/// Reason recorded on cases skipped after the run deadline expired.
pub const DEADLINE_REASON: &str = "run deadline exceeded";

/// Options controlling scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop scheduling after the first case that does not pass.
    pub stop_on_failure: bool,
    /// Deadline for the whole run.
    pub run_timeout: Option<Duration>,
}

impl RunOptions {
    /// Set whether to stop on first failure.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Sets the run deadline.
    #[must_use]
    pub const fn with_run_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.run_timeout = timeout;
        self
    }
}

/// Runs conformance suites over one HTTP client and one store connection.
///
/// `run` consumes the runner so the store connection is closed exactly once.
pub struct ConformanceRunner<C, S> {
    http: Arc<C>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    endpoint: String,
    api_token: String,
    request_timeout: Duration,
    options: RunOptions,
}

impl<C, S> ConformanceRunner<C, S>
where
    C: HttpClient,
    S: KeyValueStore,
{
    /// Creates a runner against `endpoint` (the fully-qualified keys URL).
    #[must_use]
    pub fn new(
        http: Arc<C>,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        endpoint: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            store,
            clock,
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            options: RunOptions::default(),
        }
    }

    /// Sets the per-request HTTP timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets scheduling options.
    #[must_use]
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs every case of `suite` in order and closes the store.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Suite` if the suite fails validation; no
    /// case runs in that situation. Case-level problems are recorded in the
    /// report instead.
    pub async fn run(self, suite: &ConformanceSuite) -> ApplicationResult<RunReport> {
        let outcome = self.run_suite(suite).await;
        if let Err(e) = self.store.close().await {
            warn!(error = %e, "Failed to close store connection");
        }
        outcome
    }

    async fn run_suite(&self, suite: &ConformanceSuite) -> ApplicationResult<RunReport> {
        suite.validate()?;

        info!(suite = %suite.name, cases = suite.len(), "Starting conformance run");
        let started_at = self.clock.now();
        let deadline = self.options.run_timeout.map(|t| Instant::now() + t);
        let mut results = Vec::with_capacity(suite.len());
        let mut halted: Option<String> = None;

        for case in &suite.cases {
            if let Some(reason) = &halted {
                results.push(CaseResult::not_run(case, reason.clone()));
                continue;
            }

            let fixture = CaseFixture::generate();
            let mut result = CaseResult::pending(case);
            let start = Instant::now();

            match deadline {
                None => self.run_case(case, &fixture, &mut result).await,
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        halted = Some(DEADLINE_REASON.to_string());
                        results.push(CaseResult::not_run(case, DEADLINE_REASON));
                        continue;
                    }
                    let run = self.run_case(case, &fixture, &mut result);
                    if tokio::time::timeout(remaining, run).await.is_err() {
                        result.status = CaseStatus::Errored;
                        result.error = Some(ExecutionError::new(
                            ExecutionErrorKind::RunDeadline,
                            result.phase,
                            DEADLINE_REASON,
                        ));
                        halted = Some(DEADLINE_REASON.to_string());
                    }
                }
            }

            result.duration_ms = elapsed_ms(start);
            log_result(&result);

            if self.options.stop_on_failure && halted.is_none() && !result.passed() {
                halted = Some(format!("stopped after '{}' did not pass", case.name));
            }
            results.push(result);
        }

        let report = RunReport::new(&suite.name, started_at, self.clock.now(), results);
        info!(
            total = report.summary.total,
            passed = report.summary.passed,
            failed = report.summary.failed,
            errored = report.summary.errored,
            not_run = report.summary.not_run,
            "Conformance run finished"
        );
        Ok(report)
    }

    /// Executes one case, recording progress into `result` as it goes.
    ///
    /// `result` always reflects the furthest phase reached, so a caller that
    /// abandons the future still sees where the case stopped.
    async fn run_case(&self, case: &ConformanceCase, fixture: &CaseFixture, result: &mut CaseResult) {
        result.fixture_id = Some(fixture.id().to_string());
        let span = info_span!("case", name = %case.name, fixture = %fixture.id());
        let outcome = self.execute(case, fixture, result).instrument(span).await;

        match outcome {
            Ok(None) => result.status = CaseStatus::Passed,
            Ok(Some(failure)) => {
                result.status = CaseStatus::Failed;
                result.failures.push(failure);
            }
            Err(error) => {
                result.status = CaseStatus::Errored;
                result.error = Some(error);
            }
        }
    }

    async fn execute(
        &self,
        case: &ConformanceCase,
        fixture: &CaseFixture,
        result: &mut CaseResult,
    ) -> Result<Option<AssertionFailure>, ExecutionError> {
        if !case.preconditions.is_empty() {
            for precondition in &case.preconditions {
                self.apply_precondition(precondition, fixture)
                    .await
                    .map_err(|e| store_error(&e, result.phase))?;
            }
            advance(result, CasePhase::PreconditionApplied)?;
        }

        let key = case.key.as_ref().map(|t| t.resolve(fixture));
        let request = self.build_request(case, fixture, key.as_deref()).map_err(|reason| {
            ExecutionError::new(ExecutionErrorKind::Request, result.phase, reason)
        })?;
        result.request = Some(request.summary());

        advance(result, CasePhase::RequestSent)?;
        debug!(request = %request.summary(), "Sending request");
        let start = Instant::now();
        let response = self
            .http
            .execute(&request)
            .await
            .map_err(|e| http_error(&e, result.phase))?;
        let api_elapsed = start.elapsed();
        advance(result, CasePhase::ResponseReceived)?;
        result.http_status = Some(response.status);
        result.timing = Some(CaseTiming {
            api_ms: duration_ms(api_elapsed),
            store_set_ms: None,
        });

        let failure = self
            .assert_response(case, fixture, key.as_deref(), &response, api_elapsed, result)
            .await?;
        advance(result, CasePhase::Asserted)?;
        Ok(failure)
    }

    async fn assert_response(
        &self,
        case: &ConformanceCase,
        fixture: &CaseFixture,
        key: Option<&str>,
        response: &ApiResponse,
        api_elapsed: Duration,
        result: &mut CaseResult,
    ) -> Result<Option<AssertionFailure>, ExecutionError> {
        if let Err(failure) = check_status(&case.expect.status, response) {
            return Ok(Some(failure));
        }

        if let Some(expected) = &case.expect.error
            && let Err(failure) = check_error_message(expected, response)
        {
            return Ok(Some(failure));
        }

        if let Some(expectation) = &case.expect.store {
            let target = expectation
                .key
                .as_ref()
                .map(|t| t.resolve(fixture))
                .or_else(|| key.map(str::to_string))
                .unwrap_or_default();
            let expected = match &expectation.state {
                ExpectedState::Equals { value } => ResolvedState::Equals(value.resolve(fixture)),
                ExpectedState::Absent => ResolvedState::Absent,
            };
            let actual = self
                .store
                .get(&target)
                .await
                .map_err(|e| store_error(&e, result.phase))?;
            if let Err(failure) = check_store_state(&target, &expected, actual.as_deref()) {
                return Ok(Some(failure));
            }
        }

        if let CaseKind::Timing { max_overhead_ms } = case.kind {
            let baseline_key = format!("{}-1", key.unwrap_or(fixture.key()));
            let start = Instant::now();
            self.store
                .set(&baseline_key, fixture.value())
                .await
                .map_err(|e| store_error(&e, result.phase))?;
            let store_elapsed = start.elapsed();
            if let Some(timing) = result.timing.as_mut() {
                timing.store_set_ms = Some(duration_ms(store_elapsed));
            }
            if let Err(failure) = check_timing_overhead(api_elapsed, store_elapsed, max_overhead_ms)
            {
                return Ok(Some(failure));
            }
        }

        Ok(None)
    }

    async fn apply_precondition(
        &self,
        precondition: &Precondition,
        fixture: &CaseFixture,
    ) -> Result<(), StoreError> {
        match precondition {
            Precondition::Set { key, value } => {
                let key = key.resolve(fixture);
                debug!(key = %key, "Precondition: set");
                self.store.set(&key, &value.resolve(fixture)).await
            }
            Precondition::Delete { key } => {
                let key = key.resolve(fixture);
                let removed = self.store.delete(&key).await?;
                debug!(key = %key, removed, "Precondition: delete");
                Ok(())
            }
        }
    }

    fn build_request(
        &self,
        case: &ConformanceCase,
        fixture: &CaseFixture,
        key: Option<&str>,
    ) -> Result<ApiRequest, String> {
        let mut builder = ApiRequestBuilder::new(
            self.endpoint.clone(),
            case.method,
            case.auth_header(&self.api_token),
        )
        .timeout(self.request_timeout);
        if let Some(key) = key {
            builder = builder.key_with(key, case.key_encoding);
        }
        if let Some(value) = &case.value {
            builder = builder.value(value.resolve(fixture));
        }
        builder.build().map_err(|e| e.to_string())
    }
}

fn advance(result: &mut CaseResult, next: CasePhase) -> Result<(), ExecutionError> {
    result.phase = result.phase.advance(next).map_err(|e| {
        ExecutionError::new(ExecutionErrorKind::Request, result.phase, e.to_string())
    })?;
    Ok(())
}

fn store_error(error: &StoreError, phase: CasePhase) -> ExecutionError {
    let kind = if error.is_timeout() {
        ExecutionErrorKind::Timeout
    } else {
        ExecutionErrorKind::Store
    };
    ExecutionError::new(kind, phase, error.to_string())
}

fn http_error(error: &HttpClientError, phase: CasePhase) -> ExecutionError {
    let kind = match error {
        HttpClientError::Timeout { .. } => ExecutionErrorKind::Timeout,
        HttpClientError::InvalidUrl(_) => ExecutionErrorKind::Request,
        _ => ExecutionErrorKind::Transport,
    };
    ExecutionError::new(kind, phase, error.to_string())
}

fn log_result(result: &CaseResult) {
    match result.status {
        CaseStatus::Passed => info!(case = %result.name, "PASS"),
        CaseStatus::Failed => {
            for failure in &result.failures {
                warn!(case = %result.name, %failure, "FAIL");
            }
        }
        CaseStatus::Errored => {
            if let Some(error) = &result.error {
                warn!(case = %result.name, %error, "ERROR");
            }
        }
        CaseStatus::NotRun => {}
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

fn elapsed_ms(start: Instant) -> u64 {
    duration_ms(start.elapsed())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use kvconform_domain::conformance::Template;
    use kvconform_domain::report::Check;
    use kvconform_domain::request::HttpMethod;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ENDPOINT: &str = "http://api.test/keys";

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp(1_700_000_000, 0).unwrap()
        }
    }

    /// Answers every request with the same status and body.
    struct ScriptedHttp {
        status: u16,
        body: String,
        delay: Duration,
        fail: Option<HttpClientError>,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedHttp {
        fn answering(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                delay: Duration::ZERO,
                fail: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: HttpClientError) -> Self {
            let mut http = Self::answering(0, "");
            http.fail = Some(error);
            http
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for ScriptedHttp {
        async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, HttpClientError> {
            self.seen.lock().unwrap().push(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if let Some(error) = &self.fail {
                return Err(error.clone());
            }
            Ok(ApiResponse::new(
                self.status,
                HashMap::new(),
                self.body.as_bytes(),
                self.delay,
            ))
        }
    }

    #[derive(Default)]
    struct FakeStore {
        entries: Mutex<HashMap<String, String>>,
        closes: AtomicUsize,
        unavailable: bool,
    }

    #[async_trait]
    impl KeyValueStore for FakeStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.unavailable {
                return Err(StoreError::unavailable("connection refused"));
            }
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.unavailable {
                return Err(StoreError::unavailable("connection refused"));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<u64, StoreError> {
            if self.unavailable {
                return Err(StoreError::unavailable("connection refused"));
            }
            Ok(u64::from(self.entries.lock().unwrap().remove(key).is_some()))
        }

        async fn close(&self) -> Result<(), StoreError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn runner(http: &Arc<ScriptedHttp>, store: &Arc<FakeStore>) -> ConformanceRunner<ScriptedHttp, FakeStore> {
        ConformanceRunner::new(
            Arc::clone(http),
            Arc::clone(store),
            Arc::new(FixedClock),
            ENDPOINT,
            "secret",
        )
    }

    fn suite(cases: Vec<ConformanceCase>) -> ConformanceSuite {
        cases
            .into_iter()
            .fold(ConformanceSuite::new("unit"), ConformanceSuite::with_case)
    }

    #[tokio::test]
    async fn passing_case_walks_every_phase() {
        let http = Arc::new(ScriptedHttp::answering(200, ""));
        let store = Arc::new(FakeStore::default());
        let case = ConformanceCase::new("post", HttpMethod::Post).with_fixture_pair();

        let report = runner(&http, &store).run(&suite(vec![case])).await.unwrap();

        let result = report.case("post").unwrap();
        assert_eq!(result.status, CaseStatus::Passed);
        assert_eq!(result.phase, CasePhase::Asserted);
        assert_eq!(result.http_status, Some(200));
        assert!(result.fixture_id.is_some());

        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].headers.get("token"), Some("secret"));
        assert!(requests[0].url.starts_with("http://api.test/keys?name="));
    }

    #[tokio::test]
    async fn status_mismatch_fails_with_expected_and_actual() {
        let http = Arc::new(ScriptedHttp::answering(200, ""));
        let store = Arc::new(FakeStore::default());
        let case = ConformanceCase::new("dup", HttpMethod::Post)
            .with_fixture_pair()
            .given(Precondition::seed_fixture())
            .expect_status(400)
            .expect_error("Key already exists");

        let report = runner(&http, &store).run(&suite(vec![case])).await.unwrap();

        let result = report.case("dup").unwrap();
        assert_eq!(result.status, CaseStatus::Failed);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].check, Check::Status);
        assert_eq!(result.failures[0].expected, "400");
        assert_eq!(result.failures[0].actual, "200");
    }

    #[tokio::test]
    async fn preconditions_reach_the_store_before_the_request() {
        let http = Arc::new(ScriptedHttp::answering(200, ""));
        let store = Arc::new(FakeStore::default());
        let case = ConformanceCase::new("put", HttpMethod::Put)
            .with_key(Template::key())
            .with_value("{{id}}-newValue")
            .given(Precondition::seed_fixture())
            .expect_stored(Template::value());

        let report = runner(&http, &store).run(&suite(vec![case])).await.unwrap();

        // The fake API never writes, so the seeded value is still there.
        let result = report.case("put").unwrap();
        assert_eq!(result.status, CaseStatus::Passed);
        assert_eq!(store.entries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn store_post_state_mismatch_fails() {
        let http = Arc::new(ScriptedHttp::answering(200, ""));
        let store = Arc::new(FakeStore::default());
        let case = ConformanceCase::new("post", HttpMethod::Post)
            .with_fixture_pair()
            .expect_stored(Template::value());

        let report = runner(&http, &store).run(&suite(vec![case])).await.unwrap();

        let result = report.case("post").unwrap();
        assert_eq!(result.status, CaseStatus::Failed);
        assert_eq!(result.failures[0].check, Check::StorePostState);
        assert_eq!(result.failures[0].actual, "absent");
    }

    #[tokio::test]
    async fn transport_error_marks_case_errored_and_run_continues() {
        let http = Arc::new(ScriptedHttp::failing(HttpClientError::ConnectionFailed(
            "refused".to_string(),
        )));
        let store = Arc::new(FakeStore::default());
        let cases = vec![
            ConformanceCase::new("a", HttpMethod::Post).with_fixture_pair(),
            ConformanceCase::new("b", HttpMethod::Post).with_fixture_pair(),
        ];

        let report = runner(&http, &store).run(&suite(cases)).await.unwrap();

        assert_eq!(report.summary.errored, 2);
        let error = report.case("a").unwrap().error.as_ref().unwrap();
        assert_eq!(error.kind, ExecutionErrorKind::Transport);
        assert_eq!(error.phase, CasePhase::RequestSent);
    }

    #[tokio::test]
    async fn store_failure_during_precondition_is_errored() {
        let http = Arc::new(ScriptedHttp::answering(200, ""));
        let store = Arc::new(FakeStore {
            unavailable: true,
            ..FakeStore::default()
        });
        let case = ConformanceCase::new("seeded", HttpMethod::Post)
            .with_fixture_pair()
            .given(Precondition::seed_fixture());

        let report = runner(&http, &store).run(&suite(vec![case])).await.unwrap();

        let result = report.case("seeded").unwrap();
        assert_eq!(result.status, CaseStatus::Errored);
        assert_eq!(result.error.as_ref().unwrap().kind, ExecutionErrorKind::Store);
        assert_eq!(result.phase, CasePhase::Pending);
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn stop_on_failure_marks_remaining_not_run() {
        let http = Arc::new(ScriptedHttp::answering(500, ""));
        let store = Arc::new(FakeStore::default());
        let cases = vec![
            ConformanceCase::new("first", HttpMethod::Post).with_fixture_pair(),
            ConformanceCase::new("second", HttpMethod::Post).with_fixture_pair(),
        ];

        let report = runner(&http, &store)
            .with_options(RunOptions::default().with_stop_on_failure(true))
            .run(&suite(cases))
            .await
            .unwrap();

        assert_eq!(report.case("first").unwrap().status, CaseStatus::Failed);
        let second = report.case("second").unwrap();
        assert_eq!(second.status, CaseStatus::NotRun);
        assert!(second.skipped_reason.as_ref().unwrap().contains("first"));
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn run_deadline_errors_in_flight_case_and_skips_the_rest() {
        let mut slow = ScriptedHttp::answering(200, "");
        slow.delay = Duration::from_millis(500);
        let http = Arc::new(slow);
        let store = Arc::new(FakeStore::default());
        let cases = vec![
            ConformanceCase::new("slow", HttpMethod::Post).with_fixture_pair(),
            ConformanceCase::new("later", HttpMethod::Post).with_fixture_pair(),
        ];

        let report = runner(&http, &store)
            .with_options(RunOptions::default().with_run_timeout(Some(Duration::from_millis(50))))
            .run(&suite(cases))
            .await
            .unwrap();

        let slow = report.case("slow").unwrap();
        assert_eq!(slow.status, CaseStatus::Errored);
        let error = slow.error.as_ref().unwrap();
        assert_eq!(error.kind, ExecutionErrorKind::RunDeadline);
        assert_eq!(error.phase, CasePhase::RequestSent);

        let later = report.case("later").unwrap();
        assert_eq!(later.status, CaseStatus::NotRun);
        assert_eq!(later.skipped_reason.as_deref(), Some(DEADLINE_REASON));
        assert_eq!(store.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn timing_case_writes_baseline_key_and_records_overhead() {
        let http = Arc::new(ScriptedHttp::answering(200, ""));
        let store = Arc::new(FakeStore::default());
        let case = ConformanceCase::new("timing", HttpMethod::Post)
            .with_fixture_pair()
            .timing(3000);

        let report = runner(&http, &store).run(&suite(vec![case])).await.unwrap();

        let result = report.case("timing").unwrap();
        assert_eq!(result.status, CaseStatus::Passed);
        let timing = result.timing.unwrap();
        assert!(timing.store_set_ms.is_some());

        let entries = store.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        let (key, _) = entries.iter().next().unwrap();
        assert!(key.ends_with("-key-1"));
    }

    #[tokio::test]
    async fn timing_case_over_threshold_fails() {
        let mut slow = ScriptedHttp::answering(200, "");
        slow.delay = Duration::from_millis(60);
        let http = Arc::new(slow);
        let store = Arc::new(FakeStore::default());
        let case = ConformanceCase::new("timing", HttpMethod::Post)
            .with_fixture_pair()
            .timing(10);

        let report = runner(&http, &store).run(&suite(vec![case])).await.unwrap();

        let result = report.case("timing").unwrap();
        assert_eq!(result.status, CaseStatus::Failed);
        assert_eq!(result.failures[0].check, Check::TimingOverhead);
    }

    #[tokio::test]
    async fn invalid_suite_is_rejected_and_store_still_closed() {
        let http = Arc::new(ScriptedHttp::answering(200, ""));
        let store = Arc::new(FakeStore::default());
        let cases = vec![
            ConformanceCase::new("same", HttpMethod::Post),
            ConformanceCase::new("same", HttpMethod::Put),
        ];

        let result = runner(&http, &store).run(&suite(cases)).await;

        assert!(result.is_err());
        assert!(http.requests().is_empty());
        assert_eq!(store.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn every_case_gets_a_fresh_fixture() {
        let http = Arc::new(ScriptedHttp::answering(200, ""));
        let store = Arc::new(FakeStore::default());
        let cases = vec![
            ConformanceCase::new("a", HttpMethod::Post).with_fixture_pair(),
            ConformanceCase::new("b", HttpMethod::Post).with_fixture_pair(),
        ];

        let report = runner(&http, &store).run(&suite(cases)).await.unwrap();

        assert_ne!(report.cases[0].fixture_id, report.cases[1].fixture_id);
        let requests = http.requests();
        assert_ne!(requests[0].url, requests[1].url);
    }

    #[tokio::test]
    async fn missing_auth_sends_no_token() {
        let http = Arc::new(ScriptedHttp::answering(401, r#"{"error":"Unauthorized"}"#));
        let store = Arc::new(FakeStore::default());
        let case = ConformanceCase::new("no_token", HttpMethod::Post)
            .with_fixture_pair()
            .with_auth(kvconform_domain::conformance::AuthMode::Missing)
            .expect_status(401)
            .expect_error("Unauthorized");

        let report = runner(&http, &store).run(&suite(vec![case])).await.unwrap();

        assert_eq!(report.case("no_token").unwrap().status, CaseStatus::Passed);
        assert!(!http.requests()[0].headers.contains("token"));
    }
}
