//! Built-in reference suite for the keys API.

use kvconform_domain::conformance::{
    AuthMode, ConformanceCase, ConformanceSuite, Precondition, Template,
};
use kvconform_domain::request::HttpMethod;

/// Name of the built-in suite.
pub const REFERENCE_SUITE_NAME: &str = "keys-api";

/// Literal key used by the percent-encoding case.
const PERCENT_KEY: &str = "%25";

/// Returns the reference suite.
///
/// `timing_threshold_ms` bounds the API overhead in the timing case.
#[must_use]
pub fn reference_suite(timing_threshold_ms: u64) -> ConformanceSuite {
    ConformanceSuite::new(REFERENCE_SUITE_NAME)
        .with_case(
            ConformanceCase::new("post_key_value_pair", HttpMethod::Post)
                .described("Post: Key/Value pair - 200 Response")
                .with_fixture_pair()
                .expect_status(200)
                .expect_stored(Template::value()),
        )
        .with_case(
            ConformanceCase::new("post_key_already_exists", HttpMethod::Post)
                .described("Post: Attempt to post a key that already exists - 400 Response")
                .tagged("bug")
                .given(Precondition::seed_fixture())
                .with_fixture_pair()
                .expect_status(400)
                .expect_stored(Template::value()),
        )
        .with_case(
            ConformanceCase::new("post_percent_encoded_key", HttpMethod::Post)
                .described("Post: POST HTML encoded characters - 200 Response")
                .tagged("bug")
                .given(Precondition::Delete {
                    key: Template::new(PERCENT_KEY),
                })
                .with_verbatim_key(PERCENT_KEY)
                .with_value(Template::value())
                .expect_status(200)
                .expect_stored(Template::value()),
        )
        .with_case(
            ConformanceCase::new("put_existing_key", HttpMethod::Put)
                .described("PUT: Update Value for an existing Key - 200 Response")
                .given(Precondition::seed_fixture())
                .with_key(Template::key())
                .with_value("{{id}}-newValue")
                .expect_status(200)
                .expect_stored("{{id}}-newValue"),
        )
        .with_case(
            ConformanceCase::new("put_missing_key", HttpMethod::Put)
                .described("PUT: Attempt to update a value for a key that does not exist - 400 Response")
                .with_key(Template::key())
                .with_value("{{id}}-newValue")
                .expect_status(400)
                .expect_error("Key does not exist")
                .expect_absent(),
        )
        .with_case(
            ConformanceCase::new("delete_existing_key", HttpMethod::Delete)
                .described("DELETE: Delete an existing key - 200 Response")
                .tagged("bug")
                .given(Precondition::seed_fixture())
                .with_key(Template::key())
                .expect_status(200)
                .expect_absent(),
        )
        .with_case(
            ConformanceCase::new("delete_missing_key", HttpMethod::Delete)
                .described("DELETE: Attempt to delete a key that does not exist - 400 Response")
                .with_key(Template::key())
                .expect_status(400)
                .expect_error("Key does not exist"),
        )
        .with_case(
            ConformanceCase::new("post_missing_token", HttpMethod::Post)
                .described("Post: Missing token on POST - 401 Response")
                .tagged("auth")
                .with_fixture_pair()
                .with_auth(AuthMode::Missing)
                .expect_status(401)
                .expect_error("Unauthorized"),
        )
        .with_case(
            ConformanceCase::new("post_missing_parameters", HttpMethod::Post)
                .described("Post: Missing parameters on request")
                .tagged("bug")
                .expect_status_in(401, 499),
        )
        .with_case(
            ConformanceCase::new("get_unsupported_method", HttpMethod::Get)
                .described("GET: Unsupported Method")
                .tagged("bug")
                .expect_status(405),
        )
        .with_case(
            ConformanceCase::new("post_timing_overhead", HttpMethod::Post)
                .described("PERFORMANCE: Time it takes an api POST request to be made over a set command")
                .tagged("performance")
                .with_fixture_pair()
                .expect_status(200)
                .timing(timing_threshold_ms),
        )
}
