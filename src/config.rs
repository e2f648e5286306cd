//! Repository configuration
//!
//! Loaded from a JSON file, e.g.:
//!
//! ```json
//! {
//!   "database_path": "./events.db",
//!   "query": { "default_limit": 10, "max_limit": 1000 },
//!   "log_level": "info"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Query-string defaults and bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Rows returned when `limit` is absent (default: 10)
    #[serde(default = "default_limit")]
    pub default_limit: i64,

    /// Largest accepted `limit` (default: unbounded)
    #[serde(default)]
    pub max_limit: Option<i64>,
}

fn default_limit() -> i64 {
    10
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: None,
        }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_limit < 0 {
            return Err(ConfigError::Invalid(
                "query.default_limit must be >= 0".to_string(),
            ));
        }
        if let Some(max) = self.max_limit {
            if max < self.default_limit {
                return Err(ConfigError::Invalid(format!(
                    "query.max_limit ({}) must be >= query.default_limit ({})",
                    max, self.default_limit
                )));
            }
        }
        Ok(())
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// SQLite database file (required)
    pub database_path: String,

    #[serde(default)]
    pub query: QueryConfig,

    /// Minimum log severity: trace, info, warn, error, fatal (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl RepoConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: RepoConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "database_path must not be empty".to_string(),
            ));
        }
        self.query.validate()?;
        self.severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> Result<Severity, ConfigError> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            ConfigError::Invalid(format!("Unknown log_level: '{}'", self.log_level))
        })
    }

    pub fn database_path(&self) -> &Path {
        Path::new(&self.database_path)
    }
}
