//! Key naming convention
//!
//! These names are shared with existing deployments and the tools that
//! provision them, so they must not change:
//!
//! | Key                  | Type   | Meaning                          |
//! |----------------------|--------|----------------------------------|
//! | `{id}`               | string | token for the identity           |
//! | `{id}:su`            | string | `"true"` marks a superuser       |
//! | `{id}:{suffix}`      | set    | rules owned by the identity      |
//! | `common:{suffix}`    | set    | rules shared by every identity   |
//!
//! where `{suffix}` is one of `sacls`, `racls`, `wacls`, `rwacls`.

use crate::acl::{RuleCategory, RuleSource};

/// Prefix of the shared rule sets
pub const COMMON_PREFIX: &str = "common";

/// Credential token key
pub fn credential(identity: &str) -> String {
    identity.to_string()
}

/// Superuser flag key
pub fn superuser(identity: &str) -> String {
    format!("{}:su", identity)
}

/// Rule set owned by `identity`
pub fn identity_rules(identity: &str, category: RuleCategory) -> String {
    format!("{}:{}", identity, category.key_suffix())
}

/// Rule set shared by every identity
pub fn shared_rules(category: RuleCategory) -> String {
    format!("{}:{}", COMMON_PREFIX, category.key_suffix())
}

/// Rule set key for either source
pub fn rules(source: RuleSource, identity: &str, category: RuleCategory) -> String {
    match source {
        RuleSource::Identity => identity_rules(identity, category),
        RuleSource::Shared => shared_rules(category),
    }
}
