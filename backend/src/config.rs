//! Server configuration, read from `PIGGY_*` environment variables.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite:piggymetrics.db";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    /// Origin allowed by CORS
    pub allowed_origin: String,
    /// Directory of client assets served for unknown paths
    pub static_dir: Option<PathBuf>,
    /// Minimum time between two accepted saves of the same login; zero disables the gate
    pub min_save_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            static_dir: None,
            min_save_interval: Duration::ZERO,
        }
    }
}

impl ServerConfig {
    /// Read `.env` from the working directory (or a parent) into the process
    /// environment, then build the config from it. Variables already set win.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("Failed to read .env"),
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("PIGGY_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("PIGGY_BIND_ADDR must be a socket address like 127.0.0.1:3000")?;

        let min_save_interval = match get("PIGGY_MIN_SAVE_INTERVAL_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse::<u64>()
                    .context("PIGGY_MIN_SAVE_INTERVAL_MS must be a whole number of milliseconds")?,
            ),
            None => Duration::ZERO,
        };

        Ok(Self {
            bind_addr,
            database_url: get("PIGGY_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            allowed_origin: get("PIGGY_ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
            static_dir: get("PIGGY_STATIC_DIR").map(PathBuf::from),
            min_save_interval,
        })
    }
}
