//! Keyword sets and the substring matcher.
//!
//! Matching is plain case-insensitive containment. There is no word
//! boundary handling, so `"553"` also matches `"model 553x released"`.

const HARD_SUBJECT: &[&str] = &[
    "undelivered mail",
    "mail delivery failed",
    "failure notice",
    "delivery failure",
    "delivery status notification (failure)",
    "undeliverable:",
    "wasn't delivered",
    "returned mail",
    "message delivery failure",
    "your message wasn't delivered",
];

const HARD_BODY: &[&str] = &[
    "550",
    "551",
    "552",
    "553",
    "user unknown",
    "unknown user",
    "no such user",
    "mailbox unavailable",
    "mailbox does not exist",
    "address doesn't exist",
    "address not found",
    "recipient address rejected",
    "recipient not found",
    "user not found",
    "account disabled",
    "account not found",
    "invalid recipient",
    "unrouteable address",
];

const SOFT_BODY: &[&str] = &[
    "mailbox full",
    "over quota",
    "quota exceeded",
    "temporarily deferred",
    "temporary failure",
    "deferred",
    "greylisted",
    "server busy",
    "connection timed out",
    "resources temporarily unavailable",
    "try again later",
    "temporary local problem",
];

/// An ordered list of lowercase phrase fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet(Vec<String>);

impl PatternSet {
    /// Build a set, lowercasing every fragment. Empty fragments are dropped.
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            fragments
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn fragments(&self) -> &[String] {
        &self.0
    }

    pub fn contains_any(&self, text: &str) -> bool {
        contains_any(text, self)
    }
}

/// The three keyword sets a classifier works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSets {
    pub hard_subject: PatternSet,
    pub hard_body: PatternSet,
    pub soft_body: PatternSet,
}

impl Default for PatternSets {
    fn default() -> Self {
        Self {
            hard_subject: PatternSet::new(HARD_SUBJECT),
            hard_body: PatternSet::new(HARD_BODY),
            soft_body: PatternSet::new(SOFT_BODY),
        }
    }
}

/// Whether the lowercased `text` contains any fragment of `patterns`.
pub fn contains_any(text: &str, patterns: &PatternSet) -> bool {
    let text = text.to_lowercase();
    patterns.0.iter().any(|p| text.contains(p.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_ignores_case() {
        let sets = PatternSets::default();
        assert!(contains_any("Undelivered Mail Returned to Sender", &sets.hard_subject));
        assert!(contains_any("MAILBOX FULL", &sets.soft_body));
    }

    #[test]
    fn test_no_match() {
        let sets = PatternSets::default();
        assert!(!contains_any("Re: hello", &sets.hard_subject));
        assert!(!contains_any("thanks, got it", &sets.hard_body));
        assert!(!contains_any("thanks, got it", &sets.soft_body));
    }

    #[test]
    fn test_numeric_fragments_match_inside_words() {
        let sets = PatternSets::default();
        assert!(contains_any("model 553x released", &sets.hard_body));
    }

    #[test]
    fn test_whitespace_is_not_collapsed() {
        let sets = PatternSets::default();
        assert!(!contains_any("mailbox   full", &sets.soft_body));
    }

    #[test]
    fn test_custom_set_is_lowercased() {
        let set = PatternSet::new(["Relay DENIED", ""]);
        assert_eq!(set.fragments(), &["relay denied".to_string()]);
        assert!(set.contains_any("550 5.7.1 Relay denied"));
    }

    #[test]
    fn test_empty_set_never_matches() {
        let set = PatternSet::new(Vec::<String>::new());
        assert!(!set.contains_any("anything at all"));
    }
}
