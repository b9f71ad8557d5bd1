//! MQTT topic filter matching
//!
//! Stored ACL patterns are treated as topic filters and may carry the
//! single-level (`+`) and multi-level (`#`) wildcards. The requested topic is
//! always compared literally: a `+` or `#` inside it is just a character.

/// Topic matcher for ACL patterns
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicMatcher;

impl TopicMatcher {
    /// Create a new topic matcher
    pub fn new() -> Self {
        Self
    }

    /// Check if `topic` is covered by the ACL pattern `filter`
    ///
    /// # Wildcard Rules
    /// * `+` matches exactly one topic level
    /// * `#` matches the remaining levels, including none, and only as the last level
    /// * Partial-level wildcards such as `foo*` or `a+` are compared literally
    ///
    /// # Examples
    /// ```
    /// use sentinel_redis_token_auth::mqtt::TopicMatcher;
    ///
    /// let matcher = TopicMatcher::new();
    /// assert!(matcher.matches("devices/42/state", "devices/+/state"));
    /// assert!(matcher.matches("devices/42/state", "devices/#"));
    /// assert!(!matcher.matches("devices/+/state", "devices/42/state"));
    /// ```
    pub fn matches(&self, topic: &str, filter: &str) -> bool {
        let mut topic_levels = topic.split('/');
        let mut filter_levels = filter.split('/').peekable();

        while let Some(f_level) = filter_levels.next() {
            if f_level == "#" {
                return filter_levels.peek().is_none();
            }

            match topic_levels.next() {
                Some(t_level) if f_level == "+" || f_level == t_level => {}
                _ => return false,
            }
        }

        topic_levels.next().is_none()
    }

    /// Check if an ACL pattern is a well-formed topic filter
    ///
    /// `#` must be alone and last, `+` must fill its whole level, and empty
    /// levels (`a//b`) are rejected.
    pub fn is_valid_filter(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return false;
        }

        let level_count = filter.split('/').count();

        filter.split('/').enumerate().all(|(i, level)| {
            if level.is_empty() {
                return false;
            }
            if level.contains('#') && (level != "#" || i != level_count - 1) {
                return false;
            }
            !(level.contains('+') && level != "+")
        })
    }

    /// Check if a requested topic is a concrete topic name (no wildcards)
    pub fn is_valid_topic(&self, topic: &str) -> bool {
        !topic.is_empty()
            && !topic.contains(['+', '#'])
            && !topic.split('/').any(str::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let matcher = TopicMatcher::new();
        assert!(matcher.matches("u1/topic/1", "u1/topic/1"));
        assert!(!matcher.matches("u1/topic/2", "u1/topic/1"));
        assert!(!matcher.matches("u1/topic", "u1/topic/1"));
        assert!(!matcher.matches("u1/topic/1/extra", "u1/topic/1"));
    }

    #[test]
    fn test_single_level_wildcard() {
        let matcher = TopicMatcher::new();

        assert!(matcher.matches("shared/42/x", "shared/+/x"));
        assert!(matcher.matches("a", "+"));
        assert!(matcher.matches("a/b/c", "+/b/+"));

        assert!(!matcher.matches("shared/x", "shared/+/x"));
        assert!(!matcher.matches("shared/1/2/x", "shared/+/x"));
    }

    #[test]
    fn test_multi_level_wildcard() {
        let matcher = TopicMatcher::new();

        assert!(matcher.matches("u1", "u1/#"));
        assert!(matcher.matches("u1/a", "u1/#"));
        assert!(matcher.matches("u1/a/b/c", "u1/#"));
        assert!(matcher.matches("anything/at/all", "#"));
        assert!(matcher.matches("a/b/c", "+/b/#"));

        assert!(!matcher.matches("u2/a", "u1/#"));
    }

    #[test]
    fn test_hash_not_last_never_matches() {
        let matcher = TopicMatcher::new();
        assert!(!matcher.matches("a/b/c", "a/#/c"));
        assert!(!matcher.matches("a", "#/a"));
    }

    #[test]
    fn test_wildcards_in_topic_are_literal() {
        let matcher = TopicMatcher::new();

        // A strict pattern never grants a wildcard request
        assert!(!matcher.matches("u1/topic/+", "u1/topic/1"));
        assert!(!matcher.matches("u1/#", "u1/topic/1"));

        // but the literal characters still compare equal
        assert!(matcher.matches("u1/topic/+", "u1/topic/+"));
        assert!(matcher.matches("u1/topic/+", "u1/topic/#"));
    }

    #[test]
    fn test_no_partial_level_wildcards() {
        let matcher = TopicMatcher::new();
        assert!(!matcher.matches("foobar/x", "foo*/x"));
        assert!(!matcher.matches("foobar/x", "foo+/x"));
        assert!(matcher.matches("foo+/x", "foo+/x"));
    }

    #[test]
    fn test_empty_levels() {
        let matcher = TopicMatcher::new();
        assert!(matcher.matches("a//b", "a/+/b"));
        assert!(matcher.matches("/a", "+/a"));
        assert!(!matcher.matches("a/b", "a//b"));
    }

    #[test]
    fn test_valid_filters() {
        let matcher = TopicMatcher::new();

        assert!(matcher.is_valid_filter("u1/topic/1"));
        assert!(matcher.is_valid_filter("u1/+/1"));
        assert!(matcher.is_valid_filter("u1/#"));
        assert!(matcher.is_valid_filter("#"));

        assert!(!matcher.is_valid_filter(""));
        assert!(!matcher.is_valid_filter("u1//1"));
        assert!(!matcher.is_valid_filter("u1/top+c"));
        assert!(!matcher.is_valid_filter("u1/#/1"));
        assert!(!matcher.is_valid_filter("u1/x#"));
    }

    #[test]
    fn test_valid_topics() {
        let matcher = TopicMatcher::new();

        assert!(matcher.is_valid_topic("u1/topic/1"));
        assert!(matcher.is_valid_topic("$SYS/broker/clients"));

        assert!(!matcher.is_valid_topic("u1/+"));
        assert!(!matcher.is_valid_topic("u1/#"));
        assert!(!matcher.is_valid_topic(""));
        assert!(!matcher.is_valid_topic("u1//1"));
    }
}
