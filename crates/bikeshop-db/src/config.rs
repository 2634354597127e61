//! Application configuration.
//!
//! Loaded from environment variables with fallback to defaults. The CLI
//! applies its flags on top.
//!
//! | Variable                    | Default     | Meaning                         |
//! |-----------------------------|-------------|---------------------------------|
//! | `BIKESHOP_DB_PATH`          | `:memory:`  | SQLite file, or in-memory       |
//! | `BIKESHOP_DATA_DIR`         | `./data`    | Directory holding CSV fixtures  |
//! | `BIKESHOP_MAX_CONNECTIONS`  | `5`         | Pool size for file databases    |

use std::env;
use std::path::PathBuf;

use serde::Serialize;

use crate::pool::{DbConfig, IN_MEMORY_PATH};

/// Default fixture directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "./data";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Bikeshop configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    /// SQLite database path (`:memory:` for an in-memory database)
    pub db_path: PathBuf,

    /// Directory holding the CSV fixtures
    pub data_dir: PathBuf,

    /// Pool size; ignored for in-memory databases
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: PathBuf::from(IN_MEMORY_PATH),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        let db_path = lookup("BIKESHOP_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let data_dir = lookup("BIKESHOP_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let max_connections = match lookup("BIKESHOP_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("BIKESHOP_MAX_CONNECTIONS".to_string()))?,
            None => defaults.max_connections,
        };

        Ok(AppConfig {
            db_path,
            data_dir,
            max_connections,
        })
    }

    /// The pool configuration this app config describes.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path).max_connections(self.max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing value for command-line option {0}")]
    MissingArgument(String),

    #[error("Unknown command-line option {0}")]
    UnknownArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.db_config().is_in_memory());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BIKESHOP_DB_PATH", "/tmp/bikeshop.db"),
            ("BIKESHOP_DATA_DIR", "/srv/fixtures"),
            ("BIKESHOP_MAX_CONNECTIONS", "8"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/bikeshop.db"));
        assert_eq!(config.data_dir, PathBuf::from("/srv/fixtures"));
        assert_eq!(config.max_connections, 8);
        assert!(!config.db_config().is_in_memory());
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[("BIKESHOP_DATA_DIR", "  ")])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn test_invalid_pool_size() {
        for bad in ["zero", "0", "-1"] {
            let err = AppConfig::from_lookup(lookup(&[("BIKESHOP_MAX_CONNECTIONS", bad)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "BIKESHOP_MAX_CONNECTIONS"));
        }
    }
}
