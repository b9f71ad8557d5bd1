//! Error types
//!
//! Errors never cross the decision functions: `authenticate`, `is_superuser`
//! and `check_acl` collapse them into a negative answer. They exist so the
//! store layer can tell "absent" from "failed" and so startup and config
//! loading can report what went wrong.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to the key/value/set store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("store connection is closed")]
    Closed,

    #[error("startup cancelled before the store became ready")]
    Cancelled,

    #[error("store not ready after {0:?}")]
    DeadlineExceeded(Duration),

    #[error("key '{0}' holds a value of the wrong type")]
    WrongType(String),

    #[error("injected failure on {0}")]
    Injected(String),
}

/// Failure loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid plugin option '{0}', expected key=value")]
    InvalidOption(String),
}
