//! Redis Token Authentication Backend for MQTT brokers
//!
//! Answers the three questions a broker asks its auth plugin, using tokens
//! and topic ACLs kept in Redis:
//!
//! - **Authentication**: does the presented token equal the token stored under `{id}`?
//! - **Superuser**: does `{id}:su` hold `"true"`?
//! - **Access Control**: does any rule for the requested access mode match the topic?
//!
//! # ACL Layout
//!
//! Rules are topic filters (with `+` and `#` wildcards) stored in Redis sets.
//! Each identity owns `{id}:sacls`, `{id}:racls`, `{id}:wacls` and
//! `{id}:rwacls`; the `common:*` sets of the same names apply to everyone and
//! may use `%u` (identity) and `%c` (client id) placeholders.
//!
//! | Requested mode | Sets consulted        |
//! |----------------|-----------------------|
//! | subscribe      | `sacls`               |
//! | read           | `racls`, `rwacls`     |
//! | write          | `wacls`, `rwacls`     |
//!
//! # Example
//!
//! ```
//! use sentinel_redis_token_auth::acl::AccessMode;
//! use sentinel_redis_token_auth::store::MemoryStore;
//! use sentinel_redis_token_auth::RedisTokenBackend;
//!
//! let store = MemoryStore::new();
//! store.add_to_set("common:racls", "devices/%u/#");
//!
//! let backend = RedisTokenBackend::with_store(store);
//! assert!(backend.check_acl("u1", "devices/u1/state", "c1", AccessMode::Read));
//! assert!(!backend.check_acl("u1", "devices/u2/state", "c1", AccessMode::Read));
//! ```

pub mod acl;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod mqtt;
pub mod store;

// Re-export main types
pub use backend::RedisTokenBackend;
pub use config::RedisTokenConfig;
pub use error::{ConfigError, StoreError};
