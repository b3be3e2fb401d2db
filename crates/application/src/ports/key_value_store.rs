//! Key-value store port
//!
//! The store is the oracle: the runner reads and writes it directly to set
//! up preconditions and to verify what the service did.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a store client.
///
/// A missing key is never an error: `get` returns `None` and `delete`
/// returns `0`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached (network, TLS or authentication failure).
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Underlying error text.
        message: String,
    },

    /// An operation did not complete within its timeout.
    #[error("store {operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// Command that timed out.
        operation: &'static str,
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The store answered but refused the command.
    #[error("store rejected {operation}: {message}")]
    Rejected {
        /// Command that was refused.
        operation: &'static str,
        /// Store error text.
        message: String,
    },

    /// The connection has already been closed.
    #[error("store connection is closed")]
    Closed,
}

impl StoreError {
    /// Builds an `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Returns true for timeouts.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Port for direct key-value store access.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `GET key`; `None` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// `SET key value`; returns once the store acknowledged the write.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// `DEL key`; returns the number of keys removed (0 if it did not exist).
    async fn delete(&self, key: &str) -> Result<u64, StoreError>;

    /// Releases the connection. Calling it again is a no-op.
    async fn close(&self) -> Result<(), StoreError>;
}
