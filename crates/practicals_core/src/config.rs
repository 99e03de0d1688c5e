//! Process configuration.
//!
//! # Responsibility
//! - Describe where the database lives and how logging is set up.
//! - Load overrides from `PRACTICALS_*` environment variables.
//!
//! # Invariants
//! - A missing `db_path` selects an in-memory database.
//! - Logging is file-based only; without `log_dir` it stays disabled.

use crate::db::OpenOptions;
use crate::logging::{default_log_level, init_logging};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "PRACTICALS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PRACTICALS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PRACTICALS_LOG_DIR";
pub const ENV_BUSY_TIMEOUT_MS: &str = "PRACTICALS_BUSY_TIMEOUT_MS";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Startup configuration shared by every entry point.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file path; `None` means in-memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
    /// Writer wait for the SQLite write lock, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl AppConfig {
    /// Builds a configuration from process environment variables.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = read(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms = raw
                .parse()
                .map_err(|err| format!("{ENV_BUSY_TIMEOUT_MS} must be an integer: {err}"))?;
        }
        Ok(config)
    }

    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }

    /// Starts file logging when `log_dir` is set. Returns whether logging
    /// is active.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(dir) = self.log_dir.as_ref() else {
            return Ok(false);
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: {}", dir.display()))?;
        init_logging(&self.log_level, dir)?;
        Ok(true)
    }
}
