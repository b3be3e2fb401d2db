//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the runner and external systems.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod clock;
mod http_client;
mod key_value_store;

pub use clock::Clock;
pub use http_client::{HttpClient, HttpClientError};
pub use key_value_store::{KeyValueStore, StoreError};
