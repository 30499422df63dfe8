// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://microsites.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;
const DEFAULT_SUBMIT_RESET_SECS: u64 = 10;
const DEFAULT_SESSION_IDLE_HOURS: u64 = 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub sites_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_content_length: usize,
    /// How long the submit button stays in the "Generating..." state before it
    /// is restored even though the submission never finished.
    pub submit_reset_after: Duration,
    pub session_idle: Duration,
}

impl AppConfig {
    /// Reads the configuration from the process environment. `.env` is expected
    /// to be loaded by the caller.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr: parse_var("BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())?,
            upload_dir: PathBuf::from(var_or("UPLOAD_DIR", "static/uploads")),
            sites_dir: PathBuf::from(var_or("SITES_DIR", "sites")),
            static_dir: PathBuf::from(var_or("STATIC_DIR", "static")),
            max_content_length: parse_var(
                "MAX_CONTENT_LENGTH",
                Some(DEFAULT_MAX_CONTENT_LENGTH),
            )?,
            submit_reset_after: Duration::from_secs(parse_var(
                "SUBMIT_RESET_SECS",
                Some(DEFAULT_SUBMIT_RESET_SECS),
            )?),
            session_idle: Duration::from_secs(
                parse_var("SESSION_IDLE_HOURS", Some(DEFAULT_SESSION_IDLE_HOURS))? * 3600,
            ),
        })
    }

    /// Configuration rooted in `root`, used by tests.
    #[cfg(test)]
    pub fn for_root(root: &std::path::Path) -> Self {
        Self {
            database_url: format!("sqlite://{}?mode=rwc", root.join("test.db").display()),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            upload_dir: root.join("uploads"),
            sites_dir: root.join("sites"),
            static_dir: root.join("static"),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            submit_reset_after: Duration::from_secs(DEFAULT_SUBMIT_RESET_SECS),
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_HOURS * 3600),
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    default: Option<T>,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidValue { name, value: raw })
        }
        _ => default.ok_or(ConfigError::InvalidValue {
            name,
            value: String::new(),
        }),
    }
}
