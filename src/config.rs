//! Configuration types for the Redis token backend
//!
//! Configuration can come from a JSON file (kebab-case keys) or from the
//! broker plugin's flat option map (`redis_token_*` keys). Malformed numeric
//! values in the option map are ignored and the default is kept.

use crate::error::ConfigError;
use crate::store::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Redis Token Backend Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RedisTokenConfig {
    /// Redis host
    pub host: String,

    /// Redis port
    pub port: u16,

    /// Redis password (none = no AUTH)
    pub password: Option<String>,

    /// Redis logical database
    pub db: i64,

    /// Fixed delay between startup connection attempts
    pub retry_interval_ms: u64,

    /// Give up waiting for Redis at startup after this many seconds (none = wait until cancelled)
    pub startup_timeout_secs: Option<u64>,

    /// TCP connect timeout for each attempt
    pub connect_timeout_ms: u64,

    /// Read timeout applied to every command (none = block)
    pub read_timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for RedisTokenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            password: None,
            db: DEFAULT_DB,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
            startup_timeout_secs: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: None,
            log_level: default_log_level(),
        }
    }
}

impl RedisTokenConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build configuration from the broker plugin option map
    pub fn from_auth_opts(opts: &HashMap<String, String>) -> Self {
        let mut config = Self::default();
        config.apply_auth_opts(opts);
        config
    }

    /// Overlay plugin options on top of the current values
    pub fn apply_auth_opts(&mut self, opts: &HashMap<String, String>) {
        if let Some(host) = opts.get("redis_token_host") {
            self.host = host.clone();
        }

        if let Some(port) = opts.get("redis_token_port") {
            parse_or_keep(&mut self.port, "redis_token_port", port);
        }

        if let Some(password) = opts.get("redis_token_password") {
            self.password = Some(password.clone()).filter(|p| !p.is_empty());
        }

        if let Some(db) = opts.get("redis_token_db") {
            let mut db32: i32 = 0;
            if parse_or_keep(&mut db32, "redis_token_db", db) {
                self.db = i64::from(db32);
            }
        }

        if let Some(interval) = opts.get("redis_token_retry_interval_ms") {
            parse_or_keep(&mut self.retry_interval_ms, "redis_token_retry_interval_ms", interval);
        }

        if let Some(timeout) = opts.get("redis_token_startup_timeout_secs") {
            let mut secs = self.startup_timeout_secs.unwrap_or_default();
            if parse_or_keep(&mut secs, "redis_token_startup_timeout_secs", timeout) {
                self.startup_timeout_secs = Some(secs);
            }
        }

        if let Some(level) = opts.get("log_level") {
            self.log_level = level.clone();
        }
    }

    /// `host:port` address used for logging
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Startup retry policy derived from this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(self.retry_interval_ms),
            deadline: self.startup_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}

/// Split a `key=value` plugin option
pub fn parse_option(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidOption(raw.to_string())),
    }
}

fn parse_or_keep<T: std::str::FromStr>(slot: &mut T, key: &str, raw: &str) -> bool {
    match raw.trim().parse() {
        Ok(value) => {
            *slot = value;
            true
        }
        Err(_) => {
            debug!(option = key, value = raw, "Ignoring malformed plugin option");
            false
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

const DEFAULT_PORT: u16 = 6379;
const DEFAULT_DB: i64 = 1;
const DEFAULT_RETRY_INTERVAL_MS: u64 = 2000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

fn default_host() -> String {
    "localhost".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
