//! Redis adapter for the `KeyValueStore` port.
//!
//! One multiplexed connection is opened per run and shared by every case.
//! Each command is bounded by the configured store timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use kvconform_application::ports::{KeyValueStore, StoreError};
use kvconform_domain::{StoreConfig, StoreTls};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, ErrorKind, RedisError, RedisResult};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// Builds the `redis://` / `rediss://` URL for a store configuration.
///
/// The password is percent-encoded into the userinfo; `InsecureSkipVerify`
/// adds the `#insecure` fragment understood by the redis client.
///
/// # Errors
///
/// Returns `StoreError::Unavailable` if the host cannot form a valid URL.
pub fn connection_url(config: &StoreConfig) -> Result<Url, StoreError> {
    let scheme = if config.tls.uses_tls() { "rediss" } else { "redis" };
    let host = if config.host.contains(':') && !config.host.starts_with('[') {
        format!("[{}]", config.host)
    } else {
        config.host.clone()
    };

    let mut url = Url::parse(&format!("{scheme}://{host}:{}/", config.port))
        .map_err(|e| StoreError::unavailable(format!("invalid store address: {e}")))?;
    if let Some(password) = &config.password {
        url.set_password(Some(password))
            .map_err(|()| StoreError::unavailable("store URL cannot carry a password"))?;
    }
    if config.tls == StoreTls::InsecureSkipVerify {
        url.set_fragment(Some("insecure"));
    }
    Ok(url)
}

/// Redis-backed key-value store.
pub struct RedisStore {
    connection: Mutex<Option<MultiplexedConnection>>,
    timeout: Duration,
    endpoint: String,
}

impl RedisStore {
    /// Connects and authenticates, verifying the link with a `PING`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Timeout` if the handshake exceeds the store
    /// timeout and `StoreError::Unavailable` for network, TLS or
    /// authentication failures.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let endpoint = config.endpoint();
        for warning in config.tls.security_warnings() {
            warn!(endpoint = %endpoint, "{}", warning.message());
        }

        let url = connection_url(config)?;
        let client = Client::open(url.as_str()).map_err(|e| map_error("connect", &e))?;

        let handshake = async {
            let mut connection = client.get_multiplexed_async_connection().await?;
            let _: String = redis::cmd("PING").query_async(&mut connection).await?;
            Ok::<_, RedisError>(connection)
        };
        let connection = tokio::time::timeout(config.timeout, handshake)
            .await
            .map_err(|_| StoreError::Timeout {
                operation: "connect",
                timeout_ms: millis(config.timeout),
            })?
            .map_err(|e| map_error("connect", &e))?;

        info!(endpoint = %endpoint, tls = ?config.tls, "Connected to store");
        Ok(Self {
            connection: Mutex::new(Some(connection)),
            timeout: config.timeout,
            endpoint,
        })
    }

    /// Host and port this store talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        self.connection.lock().await.clone().ok_or(StoreError::Closed)
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        command: impl Future<Output = RedisResult<T>> + Send,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, command).await {
            Ok(result) => result.map_err(|e| map_error(operation, &e)),
            Err(_) => Err(StoreError::Timeout {
                operation,
                timeout_ms: millis(self.timeout),
            }),
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.connection().await?;
        let value: Option<String> = self.bounded("GET", connection.get(key)).await?;
        debug!(key, found = value.is_some(), "GET");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut connection = self.connection().await?;
        let () = self.bounded("SET", connection.set(key, value)).await?;
        debug!(key, "SET");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<u64, StoreError> {
        let mut connection = self.connection().await?;
        let removed: u64 = self.bounded("DEL", connection.del(key)).await?;
        debug!(key, removed, "DEL");
        Ok(removed)
    }

    async fn close(&self) -> Result<(), StoreError> {
        if self.connection.lock().await.take().is_some() {
            debug!(endpoint = %self.endpoint, "Closed store connection");
        }
        Ok(())
    }
}

fn map_error(operation: &'static str, error: &RedisError) -> StoreError {
    if error.is_timeout() {
        return StoreError::Timeout {
            operation,
            timeout_ms: 0,
        };
    }
    if error.is_io_error()
        || error.is_connection_refusal()
        || error.is_connection_dropped()
        || error.kind() == ErrorKind::AuthenticationFailed
    {
        return StoreError::unavailable(error.to_string());
    }
    StoreError::Rejected {
        operation,
        message: error.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
