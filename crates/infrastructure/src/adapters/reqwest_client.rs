//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. Redirects are never
//! followed: the status the service returns is the status asserted.

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use kvconform_application::ports::{HttpClient, HttpClientError};
use kvconform_domain::{
    request::{ApiRequest, HttpMethod},
    response::ApiResponse,
};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Method, Url};
use tracing::debug;

/// HTTP client implementation using reqwest.
///
/// One instance is shared by every case of a run.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client.
    ///
    /// Default configuration:
    /// - Redirects: not followed
    /// - TLS verification: enabled
    /// - User-Agent: "kvconform/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("kvconform/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }
        if error.is_connect() {
            return HttpClientError::ConnectionFailed(error.to_string());
        }
        if error.is_body() || error.is_decode() {
            return HttpClientError::Body(error.to_string());
        }
        HttpClientError::Other(error.to_string())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[allow(clippy::cast_possible_truncation)]
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, HttpClientError> {
        let timeout_ms = request.timeout.as_millis() as u64;

        // `Url::parse` keeps existing percent-escapes, so verbatim keys survive.
        let url = Url::parse(&request.url)
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {}", request.url)))?;

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(request.timeout);
        // hyper omits the length of an empty body; some front ends answer 411 without it.
        if request.method.carries_body() {
            builder = builder.header(CONTENT_LENGTH, "0");
        }
        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_ascii_lowercase(),
                    v.to_str().unwrap_or("<binary>").to_string(),
                )
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;
        let duration = start.elapsed();

        debug!(
            method = %request.method,
            status,
            elapsed_ms = duration.as_millis() as u64,
            "Received response"
        );

        Ok(ApiResponse::new(status, headers, &body, duration))
    }
}
