//! kvconform Domain - Core harness types
//!
//! This crate defines the model of a key/value API conformance run:
//! requests, responses, cases, expectations, outcomes and configuration.
//! All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod conformance;
pub mod error;
pub mod report;
pub mod request;
pub mod response;
pub mod tls;

pub use config::{HarnessConfig, RawConfig, RawStoreConfig, StoreConfig};
pub use error::{ConfigError, DomainError, DomainResult};
pub use report::{CasePhase, CaseResult, CaseStatus, RunReport};
pub use tls::StoreTls;
