//! Suite files.

mod loader;

pub use loader::{SuiteFormat, SuiteLoadError, load_suite, parse_suite};
