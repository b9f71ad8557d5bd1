//! MQTT topic handling
//!
//! Wildcard matching of stored ACL patterns against requested topics.

mod topic;

pub use topic::TopicMatcher;
