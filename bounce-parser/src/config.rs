//! Configuration module for environment variable parsing.
//!
//! Every setting is optional. Pattern overrides replace a whole keyword set;
//! an unset variable keeps the built-in set.

use std::env;
use tracing::warn;

use crate::bounce::{Classifier, IterationPolicy, PatternSet, PatternSets};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Keyword sets used by the classifier
    pub patterns: PatternSets,

    /// Propagate part-iteration faults instead of treating them as end of message
    pub strict_iteration: bool,

    /// Print non-bounces too when scanning files
    pub report_all: bool,

    // =========================================================================
    // Web Server Configuration
    // =========================================================================

    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret expected in the X-Custom-Auth header
    pub auth_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = PatternSets::default();

        Config {
            patterns: PatternSets {
                hard_subject: parse_patterns("BOUNCE_HARD_SUBJECT_PATTERNS")
                    .unwrap_or(defaults.hard_subject),
                hard_body: parse_patterns("BOUNCE_HARD_BODY_PATTERNS")
                    .unwrap_or(defaults.hard_body),
                soft_body: parse_patterns("BOUNCE_SOFT_BODY_PATTERNS")
                    .unwrap_or(defaults.soft_body),
            },

            strict_iteration: parse_bool("BOUNCE_STRICT_ITERATION", false),

            report_all: parse_bool("BOUNCE_REPORT_ALL", false),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            auth_token: env::var("BOUNCE_AUTH_TOKEN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    /// Build the classifier described by this configuration.
    pub fn classifier(&self) -> Classifier {
        let policy = if self.strict_iteration {
            IterationPolicy::Strict
        } else {
            IterationPolicy::Lenient
        };
        Classifier::new(self.patterns.clone()).with_iteration_policy(policy)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            patterns: PatternSets::default(),
            strict_iteration: false,
            report_all: false,
            port: 8080,
            auth_token: None,
        }
    }
}

/// Parse a comma-separated pattern list. An empty list counts as unset.
fn parse_patterns(name: &str) -> Option<PatternSet> {
    let fragments = parse_csv(name)?;
    if fragments.is_empty() {
        warn!(env_var = name, "Empty pattern list, using default");
        return None;
    }
    Some(PatternSet::new(fragments))
}

/// Parse a boolean flag such as "true", "1", "yes".
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean, using default");
            default
        }
    }
}

/// Parse a comma-separated list of strings.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_values() {
        env::set_var("TEST_BOUNCE_BOOL_TRUE", "Yes");
        env::set_var("TEST_BOUNCE_BOOL_FALSE", "0");
        env::set_var("TEST_BOUNCE_BOOL_BAD", "maybe");
        assert!(parse_bool("TEST_BOUNCE_BOOL_TRUE", false));
        assert!(!parse_bool("TEST_BOUNCE_BOOL_FALSE", true));
        assert!(parse_bool("TEST_BOUNCE_BOOL_BAD", true));
        env::remove_var("TEST_BOUNCE_BOOL_TRUE");
        env::remove_var("TEST_BOUNCE_BOOL_FALSE");
        env::remove_var("TEST_BOUNCE_BOOL_BAD");
    }

    #[test]
    fn test_parse_bool_default() {
        assert!(!parse_bool("NONEXISTENT_VAR", false));
    }

    #[test]
    fn test_parse_patterns() {
        env::set_var("TEST_BOUNCE_PATTERNS", "Mailbox Full, , over quota");
        let result = parse_patterns("TEST_BOUNCE_PATTERNS").unwrap();
        assert_eq!(
            result.fragments(),
            &["mailbox full".to_string(), "over quota".to_string()]
        );
        env::remove_var("TEST_BOUNCE_PATTERNS");
    }

    #[test]
    fn test_parse_patterns_empty_is_unset() {
        env::set_var("TEST_BOUNCE_PATTERNS_EMPTY", " , ");
        assert!(parse_patterns("TEST_BOUNCE_PATTERNS_EMPTY").is_none());
        env::remove_var("TEST_BOUNCE_PATTERNS_EMPTY");
    }

    #[test]
    fn test_parse_csv() {
        env::set_var("TEST_BOUNCE_CSV", "foo, bar, baz");
        let result = parse_csv("TEST_BOUNCE_CSV");
        assert_eq!(result, Some(vec!["foo".to_string(), "bar".to_string(), "baz".to_string()]));
        env::remove_var("TEST_BOUNCE_CSV");
    }

    #[test]
    fn test_classifier_policy() {
        let config = Config {
            strict_iteration: true,
            ..Config::default()
        };
        assert_eq!(config.classifier().iteration_policy(), IterationPolicy::Strict);
        assert_eq!(
            Config::default().classifier().iteration_policy(),
            IterationPolicy::Lenient
        );
    }
}
