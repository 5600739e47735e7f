//! Raw message processing.
//!
//! Parses raw RFC 5322 content with mailparse and runs it through a
//! [`Classifier`]. Used by both binaries.
//!
//! ## Processing Flow
//!
//! ```text
//! raw bytes → parse_mail() → ParsedMailReader → Classifier::classify() → BounceReport
//! ```

use anyhow::{Context, Result};
use mailparse::{parse_mail, MailHeaderMap};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bounce::{BounceResult, Classifier};
use crate::mime::ParsedMailReader;

/// Classification of one raw message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BounceReport {
    /// Message-Id header value (without angle brackets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub result: BounceResult,
}

/// Parse and classify a raw message.
///
/// # Arguments
///
/// * `raw_content` - Raw email bytes (headers + body)
/// * `subject` - Subject to classify with; the message's own `Subject`
///   header is used when `None`
/// * `classifier` - Classifier holding the keyword sets
pub fn process_raw_email(
    raw_content: &[u8],
    subject: Option<&str>,
    classifier: &Classifier,
) -> Result<BounceReport> {
    info!(raw_content_length = raw_content.len(), "bounce_process_start");

    let mail = parse_mail(raw_content).context("Failed to parse email")?;

    let message_id = mail
        .headers
        .get_first_value("Message-Id")
        .map(|id| id.trim().trim_matches(|c| c == '<' || c == '>').to_string())
        .filter(|id| !id.is_empty());

    let subject = match subject {
        Some(subject) => subject.to_string(),
        None => mail.headers.get_first_value("Subject").unwrap_or_default(),
    };

    let mut reader = ParsedMailReader::new(&mail);
    let result = classifier
        .classify(&subject, &mut reader)
        .context("Failed to classify email")?;

    info!(
        message_id = ?message_id,
        bounce_type = %result.bounce_type(),
        reason = result.reason(),
        has_mailbox = !result.mailbox().is_empty(),
        "bounce_process_complete"
    );

    Ok(BounceReport { message_id, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounce::{BounceType, PatternSet, PatternSets};

    #[test]
    fn test_process_uses_subject_header() {
        let raw = r#"Message-Id: <bounce1@mx.example.com>
Subject: Mail delivery failed: returning message to sender
X-Failed-Recipients: alice@x.com
Content-Type: text/plain

This message was created automatically by mail delivery software."#;

        let report = process_raw_email(raw.as_bytes(), None, &Classifier::default()).unwrap();

        assert_eq!(report.message_id, Some("bounce1@mx.example.com".to_string()));
        assert_eq!(report.result.bounce_type(), BounceType::Hard);
        assert_eq!(report.result.reason(), "Mailbox unreachable");
        assert_eq!(report.result.mailbox(), "alice@x.com");
    }

    #[test]
    fn test_process_subject_override() {
        let raw = r#"Subject: Mail delivery failed
Content-Type: text/plain

thanks, got it"#;

        let report =
            process_raw_email(raw.as_bytes(), Some("Re: hello"), &Classifier::default()).unwrap();

        assert!(report.message_id.is_none());
        assert_eq!(report.result.bounce_type(), BounceType::None);
        assert_eq!(report.result.subject(), "Re: hello");
    }

    #[test]
    fn test_process_multipart_report() {
        let raw = r#"Message-Id: <dsn@example.net>
Subject: Delivery Status Notification (Delay)
Content-Type: multipart/report; report-type=delivery-status; boundary="r"

--r
Content-Type: text/plain

Delivery to the following recipient has been delayed: try again later.

--r
Content-Type: message/delivery-status

Reporting-MTA: dns; mx.example.net

Final-Recipient: rfc822; bob@example.com
Action: delayed

--r--"#;

        let report = process_raw_email(raw.as_bytes(), None, &Classifier::default()).unwrap();

        assert_eq!(report.result.bounce_type(), BounceType::Soft);
        assert_eq!(report.result.mailbox(), "bob@example.com");
    }

    #[test]
    fn test_process_with_custom_patterns() {
        let classifier = Classifier::new(PatternSets {
            hard_subject: PatternSet::new(["non remis"]),
            ..PatternSets::default()
        });
        let raw = "Subject: Non remis : facture\r\n\r\n";

        let report = process_raw_email(raw.as_bytes(), None, &classifier).unwrap();

        assert_eq!(report.result.bounce_type(), BounceType::Hard);
    }

    #[test]
    fn test_report_serialization() {
        let raw = "Message-Id: <x@y>\r\nSubject: hi\r\n\r\nhello\r\n";
        let report = process_raw_email(raw.as_bytes(), None, &Classifier::default()).unwrap();

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"message_id\":\"x@y\""));
        assert!(json.contains("\"type\":\"none\""));
    }
}
