//! Harness configuration.
//!
//! [`RawConfig`] is what configuration sources deserialize into; every field
//! is optional there. [`HarnessConfig::from_raw`] validates it eagerly so a
//! missing setting fails the run before any case executes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::conformance::DEFAULT_TIMING_THRESHOLD_MS;
use crate::error::ConfigError;
use crate::tls::StoreTls;

/// Default per-request HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Default per-operation store timeout.
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

/// Unvalidated store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStoreConfig {
    /// Store host.
    pub host: Option<String>,
    /// Store port.
    pub port: Option<u16>,
    /// Store password.
    pub password: Option<String>,
    /// TLS mode.
    pub tls: Option<StoreTls>,
}

/// Unvalidated harness settings as loaded from files and the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Base URL of the service; the keys endpoint is `{base_url}keys`.
    pub base_url: Option<String>,
    /// API token sent in the `token` header.
    pub api_token: Option<String>,
    /// Store settings.
    pub store: RawStoreConfig,
    /// Per-request HTTP timeout in milliseconds.
    pub request_timeout_ms: Option<u64>,
    /// Per-operation store timeout in milliseconds.
    pub store_timeout_ms: Option<u64>,
    /// Deadline for the whole run in milliseconds.
    pub run_timeout_ms: Option<u64>,
    /// Threshold for timing cases in milliseconds.
    pub timing_threshold_ms: Option<u64>,
}

/// Validated store connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Store host.
    pub host: String,
    /// Store port.
    pub port: u16,
    /// Store password, if the store requires one.
    pub password: Option<String>,
    /// TLS mode.
    pub tls: StoreTls,
    /// Per-operation timeout.
    pub timeout: Duration,
}

impl StoreConfig {
    /// `host:port` for logs.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("tls", &self.tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Validated harness settings.
#[derive(Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Base URL, always ending in `/`.
    pub base_url: Url,
    /// API token.
    pub api_token: String,
    /// Store settings.
    pub store: StoreConfig,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Optional deadline for the whole run.
    pub run_timeout: Option<Duration>,
    /// Threshold for timing cases.
    pub timing_threshold_ms: u64,
}

impl std::fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &"<redacted>")
            .field("store", &self.store)
            .field("request_timeout", &self.request_timeout)
            .field("run_timeout", &self.run_timeout)
            .field("timing_threshold_ms", &self.timing_threshold_ms)
            .finish()
    }
}

impl HarnessConfig {
    /// Validates raw settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` for absent required values and
    /// `ConfigError::Invalid` for unusable ones.
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&required(raw.base_url, "base_url")?)?;
        let api_token = required(raw.api_token, "api_token")?;
        let host = required(raw.store.host, "store.host")?;
        let port = raw.store.port.ok_or(ConfigError::Missing {
            field: "store.port",
        })?;
        if port == 0 {
            return Err(ConfigError::Invalid {
                field: "store.port",
                reason: "port must be between 1 and 65535".to_string(),
            });
        }

        let store = StoreConfig {
            host,
            port,
            password: raw.store.password.filter(|p| !p.is_empty()),
            tls: raw.store.tls.unwrap_or_default(),
            timeout: positive_millis(
                raw.store_timeout_ms.unwrap_or(DEFAULT_STORE_TIMEOUT_MS),
                "store_timeout_ms",
            )?,
        };

        let run_timeout = raw
            .run_timeout_ms
            .map(|ms| positive_millis(ms, "run_timeout_ms"))
            .transpose()?;

        Ok(Self {
            base_url,
            api_token,
            store,
            request_timeout: positive_millis(
                raw.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
                "request_timeout_ms",
            )?,
            run_timeout,
            timing_threshold_ms: raw
                .timing_threshold_ms
                .unwrap_or(DEFAULT_TIMING_THRESHOLD_MS),
        })
    }

    /// `{base_url}keys`
    #[must_use]
    pub fn keys_endpoint(&self) -> String {
        format!("{}keys", self.base_url)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing { field }),
    }
}

fn positive_millis(ms: u64, field: &'static str) -> Result<Duration, ConfigError> {
    if ms == 0 {
        Err(ConfigError::Invalid {
            field,
            reason: "must be greater than zero".to_string(),
        })
    } else {
        Ok(Duration::from_millis(ms))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&with_slash).map_err(|e| ConfigError::Invalid {
        field: "base_url",
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            field: "base_url",
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Invalid {
            field: "base_url",
            reason: "must not contain a query or fragment".to_string(),
        });
    }
    Ok(url)
}
