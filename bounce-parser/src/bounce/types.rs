//! Classification result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reason reported when the subject alone identifies a hard bounce.
pub const REASON_SUBJECT_HARD: &str = "Mailbox unreachable";

/// Reason reported when a part body contains a hard-bounce phrase.
pub const REASON_BODY_HARD: &str = "Hard bounce body";

/// Reason reported when a part body contains a soft-bounce phrase.
pub const REASON_BODY_SOFT: &str = "Soft bounce body";

/// Kind of delivery failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BounceType {
    /// Permanent failure, e.g. unknown mailbox.
    Hard,
    /// Transient failure, e.g. full mailbox.
    Soft,
    /// Not a bounce.
    None,
}

impl BounceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BounceType::Hard => "hard",
            BounceType::Soft => "soft",
            BounceType::None => "none",
        }
    }

    pub fn is_bounce(&self) -> bool {
        !matches!(self, BounceType::None)
    }
}

impl fmt::Display for BounceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one classification call.
///
/// Built once and never mutated; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BounceResult {
    #[serde(rename = "type")]
    bounce_type: BounceType,
    reason: String,
    subject: String,
    mailbox: String,
}

impl BounceResult {
    pub(crate) fn bounce(
        bounce_type: BounceType,
        reason: &str,
        subject: &str,
        mailbox: String,
    ) -> Self {
        Self {
            bounce_type,
            reason: reason.to_string(),
            subject: subject.to_string(),
            mailbox,
        }
    }

    pub(crate) fn not_bounce(subject: &str) -> Self {
        Self {
            bounce_type: BounceType::None,
            reason: String::new(),
            subject: subject.to_string(),
            mailbox: String::new(),
        }
    }

    pub fn bounce_type(&self) -> BounceType {
        self.bounce_type
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The subject exactly as passed in.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Failed recipient, or empty when none could be found.
    pub fn mailbox(&self) -> &str {
        &self.mailbox
    }
}

impl fmt::Display for BounceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (Subject: {}) Mailbox: {}",
            self.bounce_type, self.reason, self.subject, self.mailbox
        )
    }
}
