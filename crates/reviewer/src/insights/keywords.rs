/// A fixed set of lowercase substrings matched against log messages,
/// without regard to case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordSet {
    name: &'static str,
    keywords: &'static [&'static str],
}

/// Messages describing a failed action.
pub const FAILURE: KeywordSet = KeywordSet::new("failure", &["fail"]);

/// Messages attributed to the system side.
pub const SYSTEM: KeywordSet = KeywordSet::new("system", &["system", "server", "service"]);

/// Messages attributed to agents / clients.
pub const AGENT: KeywordSet = KeywordSet::new("agent", &["agent", "worker", "client"]);

impl KeywordSet {
    /// Keywords must already be lowercase.
    pub const fn new(name: &'static str, keywords: &'static [&'static str]) -> Self {
        Self { name, keywords }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        self.keywords
    }

    pub fn matches(&self, message: &str) -> bool {
        self.matches_lowercase(&message.to_lowercase())
    }

    /// Same as [`matches`](Self::matches) for a message lowercased by the caller.
    pub fn matches_lowercase(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercase() {
        for set in [FAILURE, SYSTEM, AGENT] {
            for keyword in set.keywords() {
                assert_eq!(*keyword, keyword.to_lowercase(), "{} in {}", keyword, set.name());
            }
        }
    }

    #[test]
    fn test_failure_matches_substring_any_case() {
        assert!(FAILURE.matches("Authentication FAILED"));
        assert!(FAILURE.matches("failure detected"));
        assert!(!FAILURE.matches("all good"));
    }

    #[test]
    fn test_system_set() {
        assert!(SYSTEM.matches("System halted"));
        assert!(SYSTEM.matches("upstream SERVER closed connection"));
        assert!(SYSTEM.matches("microservice restarted"));
        assert!(!SYSTEM.matches("user logged in"));
    }

    #[test]
    fn test_agent_set() {
        assert!(AGENT.matches("Agent timed out"));
        assert!(AGENT.matches("worker pool exhausted"));
        assert!(AGENT.matches("HTTP client error"));
        assert!(!AGENT.matches("disk full"));
    }

    #[test]
    fn test_sets_are_independent() {
        let message = "client could not reach server";
        assert!(SYSTEM.matches(message));
        assert!(AGENT.matches(message));
    }

    #[test]
    fn test_custom_set() {
        const NETWORK: KeywordSet = KeywordSet::new("network", &["timeout", "refused"]);
        assert!(NETWORK.matches("Connection REFUSED"));
        assert_eq!(NETWORK.name(), "network");
    }
}
