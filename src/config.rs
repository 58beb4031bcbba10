//! Store configuration
//!
//! A single JSON file naming the two storage roots. Fields fall back to
//! defaults when omitted; loading validates the result before anything
//! opens a directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for the expected shape
    #[error("Invalid config JSON in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Config parsed but its values do not make sense together
    #[error("Config rejected: {0}")]
    Rejected(String),
}

/// Store configuration file contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding document content and metadata
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory holding schema documents
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./storage")
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("./schemas")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            schema_dir: default_schema_dir(),
        }
    }
}

impl StoreConfig {
    /// Loads and validates configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: StoreConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Invalid {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the parsed values. Documents and schemas share a storage
    /// implementation, so the two roots must not collide.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir == self.schema_dir {
            return Err(ConfigError::Rejected(format!(
                "data_dir and schema_dir must differ (both are {})",
                self.data_dir.display()
            )));
        }
        Ok(())
    }
}
