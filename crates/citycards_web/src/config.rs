//! Environment-based runtime configuration.

use citycards_core::default_log_level;
use std::path::PathBuf;

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address, e.g. `127.0.0.1:8000`.
    pub addr: String,
    /// SQLite database file path.
    pub db_path: PathBuf,
    /// Root directory for uploaded images.
    pub media_dir: PathBuf,
    /// Directory for rolling log files.
    pub log_dir: PathBuf,
    /// Log level string understood by the logging bootstrap.
    pub log_level: String,
}

impl Config {
    /// Reads configuration from `CITYCARDS_*` environment variables,
    /// falling back to local-development defaults.
    pub fn from_env() -> Self {
        Self {
            addr: env_or("CITYCARDS_ADDR", "127.0.0.1:8000"),
            db_path: PathBuf::from(env_or("CITYCARDS_DB", "citycards.db")),
            media_dir: PathBuf::from(env_or("CITYCARDS_MEDIA_DIR", "media")),
            log_dir: PathBuf::from(env_or("CITYCARDS_LOG_DIR", "logs")),
            log_level: env_or("CITYCARDS_LOG_LEVEL", default_log_level()),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
