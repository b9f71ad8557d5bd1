//! Store-backed token verification

use super::AuthResult;
use crate::store::{keys, KeyValueStore};
use std::sync::Arc;
use tracing::debug;

/// Value of the superuser flag that grants superuser rights
const SUPERUSER_FLAG: &str = "true";

/// Verifies identity tokens and superuser flags
pub struct CredentialVerifier<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> CredentialVerifier<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Compare `token` with the token stored for `identity`
    ///
    /// An unknown identity, a wrong token and a failed lookup are all
    /// failures; only the reason differs.
    pub fn check(&self, identity: &str, token: &str) -> AuthResult {
        match self.store.get_string(&keys::credential(identity)) {
            Ok(Some(stored)) if stored == token => AuthResult::success(),
            Ok(Some(_)) => AuthResult::failure("Invalid token"),
            Ok(None) => AuthResult::failure("Unknown identity"),
            Err(e) => {
                debug!(identity = %identity, error = %e, "Credential lookup failed");
                AuthResult::failure("Credential lookup failed")
            }
        }
    }

    pub fn verify(&self, identity: &str, token: &str) -> bool {
        self.check(identity, token).authenticated
    }

    /// Whether `{identity}:su` holds exactly `"true"`
    pub fn is_superuser(&self, identity: &str) -> bool {
        match self.store.get_string(&keys::superuser(identity)) {
            Ok(flag) => flag.as_deref() == Some(SUPERUSER_FLAG),
            Err(e) => {
                debug!(identity = %identity, error = %e, "Superuser lookup failed");
                false
            }
        }
    }
}
