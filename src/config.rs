//! Configuration file
//!
//! ```json
//! {
//!   "unknown_keys": "ignore",
//!   "schema_dir": "./schemas",
//!   "log_level": "info"
//! }
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::observability::Severity;
use crate::schema::UnknownKeyPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Policy for input keys with no field declaration (default: ignore)
    #[serde(default)]
    pub unknown_keys: UnknownKeyPolicy,

    /// Directory of extra definition files loaded at startup
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,

    /// Lowest severity written to the log (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unknown_keys: UnknownKeyPolicy::default(),
            schema_dir: None,
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.schema_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("schema_dir must not be empty".into()));
            }
            if dir.exists() && !dir.is_dir() {
                return Err(ConfigError::Invalid(format!(
                    "schema_dir '{}' is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}
