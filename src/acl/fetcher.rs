//! Rule set retrieval

use crate::store::{keys, KeyValueStore};
use std::sync::Arc;
use tracing::debug;

use super::rules::{AccessMode, CandidateRules, FetchFailure, RuleCategory, RuleSource};

/// Loads the identity and shared rule sets relevant to an access mode
pub struct RuleFetcher<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> RuleFetcher<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Gather candidate rules for `identity` requesting `mode`
    ///
    /// A rule set that fails to load is recorded in `failures` and contributes
    /// no rules; the other sets are still used. Losing rules can only narrow
    /// what is permitted.
    pub fn fetch(&self, identity: &str, mode: AccessMode) -> CandidateRules {
        let mut candidates = CandidateRules::default();

        for &category in mode.categories() {
            self.collect(RuleSource::Identity, identity, category, &mut candidates);
            self.collect(RuleSource::Shared, identity, category, &mut candidates);
        }

        candidates
    }

    fn collect(
        &self,
        source: RuleSource,
        identity: &str,
        category: RuleCategory,
        candidates: &mut CandidateRules,
    ) {
        let key = keys::rules(source, identity, category);

        match self.store.get_set_members(&key) {
            Ok(members) => {
                let target = match source {
                    RuleSource::Identity => &mut candidates.identity_rules,
                    RuleSource::Shared => &mut candidates.shared_rules,
                };
                target.extend(members);
            }
            Err(e) => {
                debug!(key = %key, error = %e, "Failed to fetch ACL rule set");
                candidates.failures.push(FetchFailure {
                    source,
                    category,
                    key,
                    error: e.to_string(),
                });
            }
        }
    }
}
