//! Redis-backed store

use super::{wait_until_ready, KeyValueStore};
use crate::config::RedisTokenConfig;
use crate::error::StoreError;
use parking_lot::Mutex;
use redis::{Connection, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, RedisResult};
use std::sync::atomic::AtomicBool;
use tracing::{debug, info};

/// Store backed by a single Redis connection
///
/// Commands from concurrent callers are serialized on the connection.
pub struct RedisStore {
    address: String,
    conn: Mutex<Option<Connection>>,
}

impl RedisStore {
    /// Open a connection and verify it with `PING`
    pub fn open(config: &RedisTokenConfig) -> Result<Self, StoreError> {
        let client = redis::Client::open(connection_info(config))?;
        let mut conn = client.get_connection_with_timeout(config.connect_timeout())?;
        conn.set_read_timeout(config.read_timeout())?;
        redis::cmd("PING").query::<String>(&mut conn)?;

        debug!(address = %config.address(), db = config.db, "Connected to Redis");

        Ok(Self {
            address: config.address(),
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Open a connection, retrying on the configured interval until Redis
    /// answers, the startup deadline passes, or `cancel` is set
    pub fn connect(
        config: &RedisTokenConfig,
        cancel: Option<&AtomicBool>,
    ) -> Result<Self, StoreError> {
        info!(address = %config.address(), db = config.db, "Connecting to Redis");
        wait_until_ready(&config.retry_policy(), cancel, || Self::open(config))
    }

    /// `host:port` this store is connected to
    pub fn address(&self) -> &str {
        &self.address
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> RedisResult<T>,
    ) -> Result<T, StoreError> {
        let mut guard = self.conn.lock();
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        Ok(f(conn)?)
    }
}

impl KeyValueStore for RedisStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_conn(|conn| redis::cmd("GET").arg(key).query(conn))
    }

    fn get_set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.with_conn(|conn| redis::cmd("SMEMBERS").arg(key).query(conn))
    }

    fn ping(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| redis::cmd("PING").query::<String>(conn))
            .map(|_| ())
    }

    fn close(&self) -> Result<(), StoreError> {
        let Some(mut conn) = self.conn.lock().take() else {
            return Ok(());
        };

        redis::cmd("QUIT").query::<()>(&mut conn)?;
        debug!(address = %self.address, "Redis connection closed");
        Ok(())
    }
}

fn connection_info(config: &RedisTokenConfig) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
        redis: RedisConnectionInfo {
            db: config.db,
            password: config.password.clone(),
            ..Default::default()
        },
    }
}
