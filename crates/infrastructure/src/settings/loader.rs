//! Layered harness configuration.
//!
//! Sources, lowest precedence first:
//! 1. Legacy variable names (`QA_DEBUGGING_URL`, `API_TOKEN`, `REDIS_HOST`,
//!    `REDIS_PORT`, `REDIS_PASSWORD`)
//! 2. An optional configuration file (format chosen by extension)
//! 3. `KVCONFORM_*` variables, nested with `__` (e.g. `KVCONFORM_STORE__HOST`)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError as SourceError, Environment, File};
use kvconform_domain::{ConfigError, HarnessConfig, RawConfig};
use thiserror::Error;
use tracing::debug;

/// Prefix of structured environment variables.
pub const ENV_PREFIX: &str = "KVCONFORM";

/// Legacy variable names and the setting each one feeds.
pub const LEGACY_ENV_VARS: [(&str, &str); 5] = [
    ("QA_DEBUGGING_URL", "base_url"),
    ("API_TOKEN", "api_token"),
    ("REDIS_HOST", "store.host"),
    ("REDIS_PORT", "store.port"),
    ("REDIS_PASSWORD", "store.password"),
];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// A source could not be read or deserialized.
    #[error("failed to read configuration: {0}")]
    Source(#[from] SourceError),

    /// The merged configuration is incomplete or invalid.
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Builds a [`HarnessConfig`] from the layered sources.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Creates a loader reading the process environment and no file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a configuration file; it must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reads variables from `vars` instead of the process environment.
    #[must_use]
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Merges every source without validating.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError::Source` if a source cannot be read.
    pub fn load_raw(&self) -> Result<RawConfig, ConfigLoadError> {
        let vars = self
            .env
            .clone()
            .unwrap_or_else(|| std::env::vars().collect());

        let mut builder = Config::builder();
        for (var, key) in LEGACY_ENV_VARS {
            if let Some(value) = vars.get(var) {
                debug!(var, key, "Using legacy configuration variable");
                builder = builder.set_default(key, value.as_str())?;
            }
        }
        if let Some(path) = &self.file {
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars)),
        );

        Ok(builder.build()?.try_deserialize::<RawConfig>()?)
    }

    /// Merges and validates.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoadError::Source` for unreadable sources and
    /// `ConfigLoadError::Invalid` for missing or unusable settings.
    pub fn load(&self) -> Result<HarnessConfig, ConfigLoadError> {
        Ok(HarnessConfig::from_raw(self.load_raw()?)?)
    }
}
