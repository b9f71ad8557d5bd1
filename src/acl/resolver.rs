//! ACL resolution: placeholder expansion and wildcard matching

use crate::mqtt::TopicMatcher;
use tracing::debug;

use super::rules::{AclDecision, AclRequest, CandidateRules, RuleSource};

/// Decides whether a topic is granted by a set of candidate rules
#[derive(Debug, Clone, Default)]
pub struct AclResolver {
    topic_matcher: TopicMatcher,
}

impl AclResolver {
    pub fn new() -> Self {
        Self {
            topic_matcher: TopicMatcher::new(),
        }
    }

    /// Resolve a request against the candidate rules
    ///
    /// Identity rules are matched as stored and tried first. Shared rules have
    /// their `%u` / `%c` placeholders expanded before matching. The first match
    /// wins; no match means deny.
    pub fn resolve(&self, request: &AclRequest<'_>, candidates: &CandidateRules) -> AclDecision {
        if candidates.is_empty() {
            debug!(
                identity = %request.identity,
                topic = %request.topic,
                mode = %request.mode,
                failed_sets = candidates.failures.len(),
                "No ACL rules for request"
            );
            return AclDecision::no_match();
        }

        if let Some(rule) = candidates
            .identity_rules
            .iter()
            .find(|rule| self.matches(request, RuleSource::Identity, rule))
        {
            return self.matched(request, RuleSource::Identity, rule);
        }

        for rule in &candidates.shared_rules {
            let pattern = expand_placeholders(rule, request.identity, request.client_id);
            if self.matches(request, RuleSource::Shared, &pattern) {
                return self.matched(request, RuleSource::Shared, &pattern);
            }
        }

        debug!(
            identity = %request.identity,
            topic = %request.topic,
            mode = %request.mode,
            candidates = candidates.len(),
            failed_sets = candidates.failures.len(),
            "No ACL rule matched"
        );

        AclDecision::no_match()
    }

    /// Match one pattern, noting malformed patterns without changing the result
    fn matches(&self, request: &AclRequest<'_>, source: RuleSource, pattern: &str) -> bool {
        if !self.topic_matcher.is_valid_filter(pattern) {
            debug!(
                identity = %request.identity,
                source = ?source,
                pattern = %pattern,
                "Malformed ACL pattern"
            );
        }
        self.topic_matcher.matches(request.topic, pattern)
    }

    fn matched(&self, request: &AclRequest<'_>, source: RuleSource, pattern: &str) -> AclDecision {
        debug!(
            identity = %request.identity,
            topic = %request.topic,
            mode = %request.mode,
            source = ?source,
            pattern = %pattern,
            "ACL rule matched"
        );
        AclDecision::allow(source, pattern)
    }
}

/// Replace `%u` with the identity and `%c` with the client identifier
///
/// Expansion is a single pass over the rule, so placeholder-like text inside
/// the substituted values is never expanded again. A `%` not followed by `u`
/// or `c` is kept as is.
pub fn expand_placeholders(rule: &str, identity: &str, client_id: &str) -> String {
    let mut expanded = String::with_capacity(rule.len() + identity.len() + client_id.len());
    let mut rest = rule;

    while let Some(pos) = rest.find('%') {
        expanded.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("%u") {
            expanded.push_str(identity);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("%c") {
            expanded.push_str(client_id);
            rest = after;
        } else {
            expanded.push('%');
            rest = &tail[1..];
        }
    }

    expanded.push_str(rest);
    expanded
}
