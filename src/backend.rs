//! Redis token backend
//!
//! Host-facing surface: authentication, superuser and ACL checks. Every
//! decision reads the current store state and answers with a plain bool;
//! store failures come back as a negative answer.

use crate::acl::{AccessMode, AclDecision, AclRequest, AclResolver, RuleFetcher};
use crate::auth::CredentialVerifier;
use crate::config::RedisTokenConfig;
use crate::error::StoreError;
use crate::store::{KeyValueStore, RedisStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Token authentication and ACL backend over a key/value store
pub struct RedisTokenBackend<S = RedisStore> {
    store: Arc<S>,
    verifier: CredentialVerifier<S>,
    fetcher: RuleFetcher<S>,
    resolver: AclResolver,
    halted: AtomicBool,
}

impl RedisTokenBackend<RedisStore> {
    /// Connect to Redis, waiting until it answers
    ///
    /// Retries on the configured interval. Fails only when the startup
    /// deadline passes or `cancel` is set.
    pub fn connect(
        config: &RedisTokenConfig,
        cancel: Option<&AtomicBool>,
    ) -> Result<Self, StoreError> {
        let store = RedisStore::connect(config, cancel)?;
        info!(address = %store.address(), db = config.db, "Redis token backend ready");
        Ok(Self::with_store(store))
    }
}

impl<S: KeyValueStore> RedisTokenBackend<S> {
    /// Backend name reported to the host
    pub const NAME: &'static str = "RedisToken";

    pub fn with_store(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Build a backend over a store that the caller keeps a handle to
    pub fn from_shared(store: Arc<S>) -> Self {
        Self {
            verifier: CredentialVerifier::new(store.clone()),
            fetcher: RuleFetcher::new(store.clone()),
            resolver: AclResolver::new(),
            store,
            halted: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Check `token` against the token stored for `identity`
    pub fn authenticate(&self, identity: &str, token: &str, client_id: &str) -> bool {
        let result = self.verifier.check(identity, token);

        debug!(
            identity = %identity,
            client_id = %client_id,
            authenticated = result.authenticated,
            reason = ?result.reason,
            "Authentication checked"
        );

        result.authenticated
    }

    pub fn is_superuser(&self, identity: &str) -> bool {
        self.verifier.is_superuser(identity)
    }

    /// Evaluate an ACL request and keep the details of the decision
    pub fn evaluate(&self, request: &AclRequest<'_>) -> AclDecision {
        let candidates = self.fetcher.fetch(request.identity, request.mode);
        self.resolver.resolve(request, &candidates)
    }

    /// Whether `identity` (on session `client_id`) may access `topic` with `mode`
    pub fn check_acl(&self, identity: &str, topic: &str, client_id: &str, mode: AccessMode) -> bool {
        self.evaluate(&AclRequest {
            identity,
            topic,
            client_id,
            mode,
        })
        .allowed
    }

    /// [`check_acl`](Self::check_acl) with the broker's numeric access constant.
    /// Unknown constants are denied.
    pub fn check_acl_raw(&self, identity: &str, topic: &str, client_id: &str, acc: i32) -> bool {
        match AccessMode::from_mosquitto(acc) {
            Some(mode) => self.check_acl(identity, topic, client_id, mode),
            None => {
                let decision = AclDecision::unknown_mode(acc);
                debug!(identity = %identity, topic = %topic, reason = %decision.reason, "ACL denied");
                decision.allowed
            }
        }
    }

    /// Release the store connection
    ///
    /// Close errors are logged, never returned. Only the first call does
    /// anything.
    pub fn halt(&self) {
        if self.halted.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.store.close() {
            Ok(()) => info!(backend = Self::NAME, "Backend halted"),
            Err(e) => error!(backend = Self::NAME, error = %e, "Store cleanup error"),
        }
    }
}
