//! # Configuration
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`ordo.toml` in the working directory, or `--config`)
//! 3. Environment: `ORDO_DATABASE`, `ORDO_RATE_LIMIT`, `ORDO_CORS_ORIGINS`, `ORDO_LOG_FORMAT`
//! 4. CLI flags (applied by the `cli` module)
//!
//! ```toml
//! database = "todos.db"
//! backend = "sqlite"
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100
//! cors_origins = "http://localhost:3000"
//! log_format = "json"
//! ```

use clap::ValueEnum;
use ordo_core::{Board, OrdoError, primitives::DEFAULT_DATABASE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ordo.toml";

/// Default requests per second for the HTTP API.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

// =============================================================================
// ENUMS
// =============================================================================

/// Which item store to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Durable SQLite database file.
    #[default]
    Sqlite,
    /// Volatile, lost on exit.
    Memory,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: PathBuf,
    pub backend: BackendKind,
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Comma-separated origins, or `*`. Unset means localhost only.
    pub cors_origins: Option<String>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            backend: BackendKind::default(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: None,
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, OrdoError> {
        toml::from_str(contents).map_err(|e| OrdoError::Io(format!("Invalid config: {}", e)))
    }

    /// Read the file layer.
    ///
    /// An explicit `path` must exist. Without one, `ordo.toml` is used when
    /// present and the defaults otherwise.
    pub fn from_file(path: Option<&Path>) -> Result<Self, OrdoError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            OrdoError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(database) = lookup("ORDO_DATABASE") {
            self.database = PathBuf::from(database);
        }
        if let Some(raw) = lookup("ORDO_RATE_LIMIT") {
            match raw.trim().parse() {
                Ok(rate) => self.rate_limit = rate,
                Err(_) => tracing::warn!("Ignoring invalid ORDO_RATE_LIMIT '{}'", raw),
            }
        }
        if let Some(origins) = lookup("ORDO_CORS_ORIGINS") {
            self.cors_origins = Some(origins);
        }
        if let Some(raw) = lookup("ORDO_LOG_FORMAT") {
            match LogFormat::parse(&raw) {
                Some(format) => self.log_format = format,
                None => tracing::warn!("Ignoring invalid ORDO_LOG_FORMAT '{}'", raw),
            }
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// File layer followed by the environment layer.
    pub fn load(path: Option<&Path>) -> Result<Self, OrdoError> {
        let mut config = Self::from_file(path)?;
        config.apply_env();
        Ok(config)
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Open the board this configuration points at.
    pub fn open_board(&self) -> Result<Board, OrdoError> {
        match self.backend {
            BackendKind::Sqlite => Board::with_sqlite(&self.database),
            BackendKind::Memory => Ok(Board::new()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_toml_is_default() {
        let config = Config::from_toml_str("").expect("parse");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            backend = "memory"
            port = 9000
            log_format = "json"
            "#,
        )
        .expect("parse");

        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.rate_limit, DEFAULT_RATE_LIMIT);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(matches!(
            Config::from_toml_str(r#"backend = "redis""#),
            Err(OrdoError::Io(_))
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.toml");
        assert!(Config::from_file(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ordo.toml");
        std::fs::write(&path, "database = \"/tmp/elsewhere.db\"\nrate_limit = 0\n")
            .expect("write");

        let config = Config::from_file(Some(&path)).expect("load");
        assert_eq!(config.database, PathBuf::from("/tmp/elsewhere.db"));
        assert_eq!(config.rate_limit, 0);
    }

    #[test]
    fn env_overrides_file_values() {
        let vars = env(&[
            ("ORDO_RATE_LIMIT", "7"),
            ("ORDO_CORS_ORIGINS", "*"),
            ("ORDO_LOG_FORMAT", "JSON"),
            ("ORDO_DATABASE", "other.db"),
        ]);
        let mut config = Config::default();
        config.apply_env_with(|key| vars.get(key).cloned());

        assert_eq!(config.rate_limit, 7);
        assert_eq!(config.cors_origins.as_deref(), Some("*"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.database, PathBuf::from("other.db"));
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let vars = env(&[("ORDO_RATE_LIMIT", "fast"), ("ORDO_LOG_FORMAT", "xml")]);
        let mut config = Config::default();
        config.apply_env_with(|key| vars.get(key).cloned());

        assert_eq!(config.rate_limit, DEFAULT_RATE_LIMIT);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn memory_backend_opens_empty_board() {
        let config = Config {
            backend: BackendKind::Memory,
            ..Config::default()
        };
        let board = config.open_board().expect("open");
        assert!(!board.is_persistent());
    }

    #[test]
    fn sqlite_backend_opens_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            database: dir.path().join("cfg.db"),
            ..Config::default()
        };
        let board = config.open_board().expect("open");
        assert!(board.is_persistent());
        assert!(config.database.exists());
    }
}
