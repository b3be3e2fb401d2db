//! Builds requests against the keys endpoint.

use std::time::Duration;

use kvconform_domain::config::DEFAULT_REQUEST_TIMEOUT_MS;
use kvconform_domain::request::{
    ApiRequest, AuthHeader, Header, Headers, HttpMethod, ParamEncoding, QueryParam, QueryParams,
};
use kvconform_domain::{DomainError, DomainResult};

/// Query parameter carrying the key.
pub const KEY_PARAM: &str = "name";
/// Query parameter carrying the value.
pub const VALUE_PARAM: &str = "value";

/// Builder for a single keys API request.
///
/// # Example
///
/// ```
/// use kvconform_application::ApiRequestBuilder;
/// use kvconform_domain::request::{AuthHeader, HttpMethod};
///
/// let request =
///     ApiRequestBuilder::new("http://localhost:8080/keys", HttpMethod::Post, AuthHeader::Missing)
///         .key_verbatim("%25")
///         .value("v 1")
///         .build()
///         .unwrap();
///
/// assert_eq!(request.url, "http://localhost:8080/keys?name=%25&value=v+1");
/// assert!(request.headers.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequestBuilder {
    endpoint: String,
    method: HttpMethod,
    params: QueryParams,
    auth: AuthHeader,
    timeout: Duration,
}

impl ApiRequestBuilder {
    /// Starts a request to `endpoint` (the fully-qualified keys URL).
    ///
    /// `auth` has no default; pass [`AuthHeader::Missing`] to omit the token.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, method: HttpMethod, auth: AuthHeader) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            params: QueryParams::new(),
            auth,
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Adds the key, percent-encoded.
    #[must_use]
    pub fn key(self, key: impl Into<String>) -> Self {
        self.param(QueryParam::new(KEY_PARAM, key))
    }

    /// Adds an already-encoded key, sent as-is.
    #[must_use]
    pub fn key_verbatim(self, key: impl Into<String>) -> Self {
        self.param(QueryParam::verbatim(KEY_PARAM, key))
    }

    /// Adds the key with an explicit encoding.
    #[must_use]
    pub fn key_with(self, key: impl Into<String>, encoding: ParamEncoding) -> Self {
        self.param(QueryParam::with_encoding(KEY_PARAM, key, encoding))
    }

    /// Adds the value, percent-encoded.
    #[must_use]
    pub fn value(self, value: impl Into<String>) -> Self {
        self.param(QueryParam::new(VALUE_PARAM, value))
    }

    /// Adds an arbitrary query parameter.
    #[must_use]
    pub fn param(mut self, param: QueryParam) -> Self {
        self.params.add(param);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Produces the request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the endpoint plus query does not parse.
    pub fn build(self) -> DomainResult<ApiRequest> {
        let mut url = self.endpoint;
        if !self.params.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&self.params.to_query_string());
        }

        let mut headers = Headers::new();
        if let Some((name, value)) = self.auth.header() {
            headers.add(Header::new(name, value));
        }

        let request = ApiRequest {
            method: self.method,
            url,
            headers,
            timeout: self.timeout,
        };
        request
            .parse_url()
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", request.url)))?;
        Ok(request)
    }
}
