//! Key/value/set store access
//!
//! The backend only ever needs two reads: a string by key and the members of
//! a set by key. Everything is hidden behind [`KeyValueStore`] so the ACL
//! logic can be driven by Redis in production and by [`MemoryStore`] in tests.

pub mod keys;
mod memory;
mod redis_store;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

use crate::error::StoreError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Read-only view of the key/value/set store
///
/// `Ok(None)` and an empty member list mean the key is absent. `Err` means the
/// store could not answer.
pub trait KeyValueStore: Send + Sync {
    /// Get a string value
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Get all members of a set
    fn get_set_members(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Check that the store answers
    fn ping(&self) -> Result<(), StoreError>;

    /// Release the connection. Calling it again is a no-op.
    fn close(&self) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_string(key)
    }

    fn get_set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        (**self).get_set_members(key)
    }

    fn ping(&self) -> Result<(), StoreError> {
        (**self).ping()
    }

    fn close(&self) -> Result<(), StoreError> {
        (**self).close()
    }
}

/// Startup retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed delay between attempts
    pub interval: Duration,
    /// Stop retrying after this long (none = until cancelled)
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            deadline: None,
        }
    }
}

const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Run `attempt` until it succeeds, the deadline passes, or `cancel` is set
///
/// Without a cancel flag only the deadline (if any) stops the wait.
pub fn wait_until_ready<T, F>(
    policy: &RetryPolicy,
    cancel: Option<&AtomicBool>,
    mut attempt: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Result<T, StoreError>,
{
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        if is_cancelled(cancel) {
            return Err(StoreError::Cancelled);
        }

        attempts += 1;
        let err = match attempt() {
            Ok(value) => {
                if attempts > 1 {
                    info!(attempts, "Store is ready");
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        let mut wait = policy.interval;
        if let Some(deadline) = policy.deadline {
            let elapsed = started.elapsed();
            if elapsed >= deadline {
                error!(error = %err, attempts, "Store not ready, giving up");
                return Err(StoreError::DeadlineExceeded(deadline));
            }
            wait = wait.min(deadline - elapsed);
        }

        error!(
            error = %err,
            attempt = attempts,
            retry_in_ms = wait.as_millis() as u64,
            "Store not ready, will retry"
        );

        sleep_unless_cancelled(wait, cancel);
    }
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}

fn sleep_unless_cancelled(wait: Duration, cancel: Option<&AtomicBool>) {
    let until = Instant::now() + wait;
    loop {
        let now = Instant::now();
        if now >= until || is_cancelled(cancel) {
            return;
        }
        std::thread::sleep((until - now).min(CANCEL_POLL));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast_policy(deadline: Option<Duration>) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(1),
            deadline,
        }
    }

    #[test]
    fn test_ready_after_failures() {
        let calls = Cell::new(0);

        let value = wait_until_ready(&fast_policy(None), None, || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(StoreError::Closed)
            } else {
                Ok("ready")
            }
        })
        .unwrap();

        assert_eq!(value, "ready");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_cancelled_before_first_attempt() {
        let cancel = AtomicBool::new(true);
        let calls = Cell::new(0);

        let result: Result<(), _> = wait_until_ready(&fast_policy(None), Some(&cancel), || {
            calls.set(calls.get() + 1);
            Ok(())
        });

        assert!(matches!(result, Err(StoreError::Cancelled)));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_cancelled_while_retrying() {
        let cancel = AtomicBool::new(false);
        let calls = Cell::new(0);

        let result: Result<(), _> = wait_until_ready(&fast_policy(None), Some(&cancel), || {
            calls.set(calls.get() + 1);
            if calls.get() == 2 {
                cancel.store(true, Ordering::Relaxed);
            }
            Err(StoreError::Closed)
        });

        assert!(matches!(result, Err(StoreError::Cancelled)));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_deadline_exceeded() {
        let policy = fast_policy(Some(Duration::from_millis(20)));

        let result: Result<(), _> = wait_until_ready(&policy, None, || Err(StoreError::Closed));

        match result {
            Err(StoreError::DeadlineExceeded(d)) => assert_eq!(d, Duration::from_millis(20)),
            other => panic!("expected deadline error, got {:?}", other),
        }
    }
}
