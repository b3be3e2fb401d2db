//! kvconform Application - Ports and the conformance runner
//!
//! This crate defines the ports the runner depends on (HTTP client,
//! key-value store, clock), the request builder, the assertion checks,
//! the runner itself and the built-in reference suite.

pub mod assertions;
pub mod catalog;
pub mod error;
pub mod ports;
pub mod request_builder;
pub mod runner;

pub use catalog::{REFERENCE_SUITE_NAME, reference_suite};
pub use error::{ApplicationError, ApplicationResult};
pub use request_builder::{ApiRequestBuilder, KEY_PARAM, VALUE_PARAM};
pub use runner::{ConformanceRunner, DEADLINE_REASON, RunOptions};
