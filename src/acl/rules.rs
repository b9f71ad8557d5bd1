//! ACL request, decision and rule category types

use std::fmt;
use std::str::FromStr;

/// Operation a client attempts against a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    Subscribe,
    Read,
    Write,
}

impl AccessMode {
    /// Broker constant for a read (deliver to subscriber) check
    pub const MOSQ_ACL_READ: i32 = 0x01;
    /// Broker constant for a write (publish) check
    pub const MOSQ_ACL_WRITE: i32 = 0x02;
    /// Broker constant for a subscribe check
    pub const MOSQ_ACL_SUBSCRIBE: i32 = 0x04;

    /// Map the broker's numeric access constant
    pub fn from_mosquitto(acc: i32) -> Option<Self> {
        match acc {
            Self::MOSQ_ACL_READ => Some(Self::Read),
            Self::MOSQ_ACL_WRITE => Some(Self::Write),
            Self::MOSQ_ACL_SUBSCRIBE => Some(Self::Subscribe),
            _ => None,
        }
    }

    /// Rule categories consulted for this mode
    ///
    /// `ReadWrite` rules grant both reads and writes but never subscriptions.
    pub fn categories(self) -> &'static [RuleCategory] {
        match self {
            Self::Subscribe => &[RuleCategory::Subscribe],
            Self::Read => &[RuleCategory::Read, RuleCategory::ReadWrite],
            Self::Write => &[RuleCategory::Write, RuleCategory::ReadWrite],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "subscribe" | "sub" => Ok(Self::Subscribe),
            "read" => Ok(Self::Read),
            "write" | "publish" | "pub" => Ok(Self::Write),
            other => Err(format!(
                "unknown access mode '{}', expected subscribe, read or write",
                other
            )),
        }
    }
}

/// Storage-level grouping of rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    Subscribe,
    Read,
    Write,
    ReadWrite,
}

impl RuleCategory {
    /// Suffix of the rule set key for this category
    pub fn key_suffix(self) -> &'static str {
        match self {
            Self::Subscribe => "sacls",
            Self::Read => "racls",
            Self::Write => "wacls",
            Self::ReadWrite => "rwacls",
        }
    }
}

/// Where a rule was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSource {
    /// Rule set owned by the requesting identity
    Identity,
    /// `common:*` rule set, subject to placeholder expansion
    Shared,
}

/// ACL evaluation request
#[derive(Debug, Clone, Copy)]
pub struct AclRequest<'a> {
    /// Identity (username) of the client
    pub identity: &'a str,
    /// Topic being accessed
    pub topic: &'a str,
    /// Client identifier of the session
    pub client_id: &'a str,
    /// Requested access
    pub mode: AccessMode,
}

/// A rule set that could not be read
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub source: RuleSource,
    pub category: RuleCategory,
    pub key: String,
    pub error: String,
}

/// Rules gathered for one request
#[derive(Debug, Clone, Default)]
pub struct CandidateRules {
    /// Rules owned by the identity, matched as stored
    pub identity_rules: Vec<String>,
    /// Shared rules, expanded before matching
    pub shared_rules: Vec<String>,
    /// Rule sets that failed to load and contributed nothing
    pub failures: Vec<FetchFailure>,
}

impl CandidateRules {
    pub fn is_empty(&self) -> bool {
        self.identity_rules.is_empty() && self.shared_rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.identity_rules.len() + self.shared_rules.len()
    }
}

/// Result of ACL evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclDecision {
    /// Whether access is allowed
    pub allowed: bool,
    /// Source of the matching rule (if any)
    pub source: Option<RuleSource>,
    /// Matching pattern after placeholder expansion (if any)
    pub pattern: Option<String>,
    /// Reason for the decision
    pub reason: String,
}

impl AclDecision {
    pub fn allow(source: RuleSource, pattern: &str) -> Self {
        let origin = match source {
            RuleSource::Identity => "identity rule",
            RuleSource::Shared => "shared rule",
        };

        Self {
            allowed: true,
            source: Some(source),
            pattern: Some(pattern.to_string()),
            reason: format!("Allowed by {}: {}", origin, pattern),
        }
    }

    pub fn no_match() -> Self {
        Self {
            allowed: false,
            source: None,
            pattern: None,
            reason: "No matching rule".to_string(),
        }
    }

    pub fn unknown_mode(acc: i32) -> Self {
        Self {
            allowed: false,
            source: None,
            pattern: None,
            reason: format!("Unknown access mode {}", acc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_categories() {
        assert_eq!(AccessMode::Subscribe.categories(), &[RuleCategory::Subscribe]);
        assert_eq!(
            AccessMode::Read.categories(),
            &[RuleCategory::Read, RuleCategory::ReadWrite]
        );
        assert_eq!(
            AccessMode::Write.categories(),
            &[RuleCategory::Write, RuleCategory::ReadWrite]
        );
    }

    #[test]
    fn test_readwrite_never_grants_subscribe() {
        assert!(!AccessMode::Subscribe
            .categories()
            .contains(&RuleCategory::ReadWrite));
    }

    #[test]
    fn test_mosquitto_constants() {
        assert_eq!(AccessMode::from_mosquitto(1), Some(AccessMode::Read));
        assert_eq!(AccessMode::from_mosquitto(2), Some(AccessMode::Write));
        assert_eq!(AccessMode::from_mosquitto(4), Some(AccessMode::Subscribe));
        assert_eq!(AccessMode::from_mosquitto(0), None);
        assert_eq!(AccessMode::from_mosquitto(3), None);
        assert_eq!(AccessMode::from_mosquitto(-1), None);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("subscribe".parse::<AccessMode>().unwrap(), AccessMode::Subscribe);
        assert_eq!("READ".parse::<AccessMode>().unwrap(), AccessMode::Read);
        assert_eq!("publish".parse::<AccessMode>().unwrap(), AccessMode::Write);
        assert!("readwrite".parse::<AccessMode>().is_err());
    }

    #[test]
    fn test_decision_reasons() {
        let decision = AclDecision::allow(RuleSource::Shared, "u1/c1");
        assert!(decision.allowed);
        assert_eq!(decision.reason, "Allowed by shared rule: u1/c1");

        let decision = AclDecision::no_match();
        assert!(!decision.allowed);
        assert!(decision.pattern.is_none());
    }
}
