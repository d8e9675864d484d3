//! Layered server configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. `strata.toml` in the working directory, or the file named by `STRATA_CONFIG`
//! 3. `STRATA__*` environment variables, `__` separating sections
//!    (`STRATA__SERVER__PORT=8080`)

use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use strata_core::logging_facility::Profile;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "strata.toml";
const CONFIG_PATH_VAR: &str = "STRATA_CONFIG";
const ENV_PREFIX: &str = "STRATA";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("cache.max_entries must be at least 1")]
    InvalidCacheCapacity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub server: HttpSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub max_entries: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub profile: Profile,
}

impl ServerConfig {
    /// Load from the default file location and the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(Some(&file), None)
    }

    /// Load from an optional file and an explicit environment
    ///
    /// `env` replaces the process environment when given. A missing file is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or a value is out of range.
    pub fn load_from(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.path", "strata.db")?
            .set_default("cache.max_entries", 100)?
            .set_default("logging.profile", "development")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }

        let config: ServerConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        config.cache_capacity()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `InvalidCacheCapacity` when `cache.max_entries` is zero.
    pub fn cache_capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.cache.max_entries).ok_or(ConfigError::InvalidCacheCapacity)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load_from(None, env(&[])).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.database.path, PathBuf::from("strata.db"));
        assert_eq!(config.cache_capacity().unwrap().get(), 100);
        assert_eq!(config.logging.profile, Profile::Development);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        std::fs::write(
            &path,
            "[server]\nport = 7000\n\n[database]\npath = \"city.db\"\n",
        )
        .unwrap();

        let config = ServerConfig::load_from(
            Some(&path),
            env(&[
                ("STRATA__SERVER__PORT", "8080"),
                ("STRATA__LOGGING__PROFILE", "production"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, PathBuf::from("city.db"));
        assert_eq!(config.logging.profile, Profile::Production);
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let config =
            ServerConfig::load_from(Some(Path::new("/nonexistent/strata.toml")), env(&[]))
                .unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_zero_cache_capacity_rejected() {
        let err = ServerConfig::load_from(None, env(&[("STRATA__CACHE__MAX_ENTRIES", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCacheCapacity));
    }
}
