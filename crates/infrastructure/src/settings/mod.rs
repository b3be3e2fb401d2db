//! Harness settings loading.

mod loader;

pub use loader::{ConfigLoadError, ConfigLoader, ENV_PREFIX, LEGACY_ENV_VARS};
