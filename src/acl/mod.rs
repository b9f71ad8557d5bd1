//! Access Control List (ACL) module
//!
//! Resolves topic access from rule sets held in the key/value store:
//! [`RuleFetcher`] loads the identity and shared rule sets for an access mode,
//! [`AclResolver`] expands shared placeholders and runs the wildcard match.

mod fetcher;
mod resolver;
mod rules;

pub use fetcher::RuleFetcher;
pub use resolver::{expand_placeholders, AclResolver};
pub use rules::{
    AccessMode, AclDecision, AclRequest, CandidateRules, FetchFailure, RuleCategory, RuleSource,
};
