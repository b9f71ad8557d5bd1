//! Authentication module
//!
//! Token and superuser checks against the key/value store.

mod credentials;

pub use credentials::CredentialVerifier;

/// Result of authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// Whether authentication succeeded
    pub authenticated: bool,
    /// Reason for failure (if not authenticated)
    pub reason: Option<String>,
}

impl AuthResult {
    pub fn success() -> Self {
        Self {
            authenticated: true,
            reason: None,
        }
    }

    pub fn failure(reason: &str) -> Self {
        Self {
            authenticated: false,
            reason: Some(reason.to_string()),
        }
    }
}
