//! In-process store

use super::KeyValueStore;
use crate::error::StoreError;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
enum Value {
    String(String),
    Set(BTreeSet<String>),
}

/// In-memory store with Redis-like string and set semantics
///
/// Strings and sets share one keyspace: reading a set as a string (or the
/// other way round) fails like a Redis `WRONGTYPE` reply. Individual keys can
/// be marked as failing to simulate an unavailable store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
    failing: RwLock<HashSet<String>>,
    failing_close: AtomicBool,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `SET key value`
    pub fn set_string(&self, key: &str, value: &str) {
        self.values
            .write()
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    /// `SADD key member`, returns whether the member was new.
    /// A string stored under `key` is replaced by the set.
    pub fn add_to_set(&self, key: &str, member: &str) -> bool {
        let mut values = self.values.write();
        if let Some(Value::Set(members)) = values.get_mut(key) {
            return members.insert(member.to_string());
        }

        values.insert(
            key.to_string(),
            Value::Set(BTreeSet::from([member.to_string()])),
        );
        true
    }

    /// `DEL key`
    pub fn remove(&self, key: &str) -> bool {
        self.values.write().remove(key).is_some()
    }

    /// `FLUSHDB`
    pub fn flush(&self) {
        self.values.write().clear();
    }

    /// Make every read of `key` fail
    pub fn fail_key(&self, key: &str) {
        self.failing.write().insert(key.to_string());
    }

    /// Make `close` report an error. The store still ends up closed.
    pub fn fail_close(&self) {
        self.failing_close.store(true, Ordering::SeqCst);
    }

    /// Stop failing reads
    pub fn clear_failures(&self) {
        self.failing.write().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn check_available(&self, key: &str) -> Result<(), StoreError> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        if self.failing.read().contains(key) {
            return Err(StoreError::Injected(format!("key '{}'", key)));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available(key)?;

        match self.values.read().get(key) {
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(Value::Set(_)) => Err(StoreError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }

    fn get_set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.check_available(key)?;

        match self.values.read().get(key) {
            Some(Value::Set(members)) => Ok(members.iter().cloned().collect()),
            Some(Value::String(_)) => Err(StoreError::WrongType(key.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn ping(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.failing_close.load(Ordering::SeqCst) {
            return Err(StoreError::Injected("close".to_string()));
        }
        Ok(())
    }
}
