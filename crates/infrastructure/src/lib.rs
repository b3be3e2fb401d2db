//! kvconform Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration, suite and
//! report file handling.

pub mod adapters;
pub mod report;
pub mod serialization;
pub mod settings;
pub mod suite;

pub use adapters::{MemoryStore, RedisStore, ReqwestHttpClient, SystemClock, connection_url};
pub use report::{ReportWriteError, render_console, write_json_report};
pub use serialization::{SerializationError, from_json, to_json_stable};
pub use settings::{ConfigLoadError, ConfigLoader};
pub use suite::{SuiteFormat, SuiteLoadError, load_suite, parse_suite};
