//! Best-effort lookup of the failed recipient.
//!
//! Sources, in order:
//! 1. the top-level `X-Failed-Recipients` header
//! 2. recipient fields of a `message/delivery-status` part
//! 3. the `To` header of an embedded `message/rfc822` part
//!
//! Nothing here fails. Unreadable bodies and unparsable embedded messages
//! are treated as parts that name no recipient.

use std::io::Read;

use tracing::{debug, info};

use crate::mime::{read_body, HeaderLookup, MimeReader};

/// Top-level header some MTAs set on bounces.
pub const FAILED_RECIPIENTS_HEADER: &str = "X-Failed-Recipients";

const DELIVERY_STATUS: &str = "message/delivery-status";
const EMBEDDED_MESSAGE: &str = "message/rfc822";

const RECIPIENT_FIELDS: &[&str] = &[
    "final-recipient:",
    "original-recipient:",
    "x-failed-recipients:",
];

/// Find the failed recipient, continuing from the reader's current position.
///
/// The part cursor is **not** restarted. Parts already consumed (for
/// instance by [`Classifier::classify`](crate::Classifier::classify)) are
/// never looked at again, so calling this on a reader that has been fully
/// walked only consults the top-level header. Returns an empty string when
/// nothing is found.
pub fn extract_mailbox<R: MimeReader>(reader: &mut R) -> String {
    resume(reader, None)
}

/// A part the classifier has already drained, still under the cursor.
pub(crate) struct CurrentPart<'a> {
    pub content_type: &'a str,
    pub body: &'a str,
}

pub(crate) fn resume<R: MimeReader>(reader: &mut R, current: Option<CurrentPart<'_>>) -> String {
    if let Some(failed) = reader.header(FAILED_RECIPIENTS_HEADER) {
        let failed = failed.trim();
        if !failed.is_empty() {
            info!(source = "header", "bounce_mailbox_found");
            debug!(mailbox = %failed, "bounce_mailbox_value");
            return failed.to_string();
        }
    }

    if let Some(part) = current {
        let mut body = part.body.as_bytes();
        if let Some(mailbox) = mailbox_in_part(reader, part.content_type, &mut body) {
            info!(source = %part.content_type, "bounce_mailbox_found");
            debug!(mailbox = %mailbox, "bounce_mailbox_value");
            return mailbox;
        }
    }

    loop {
        let mut part = match reader.next_part() {
            Ok(Some(part)) => part,
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "bounce_mailbox_iteration_ended");
                break;
            }
        };

        if let Some(mailbox) = mailbox_in_part(reader, &part.content_type, &mut part.body) {
            info!(source = %part.content_type, "bounce_mailbox_found");
            debug!(mailbox = %mailbox, "bounce_mailbox_value");
            return mailbox;
        }
    }

    debug!("bounce_mailbox_not_found");
    String::new()
}

fn mailbox_in_part<R: MimeReader>(
    reader: &R,
    content_type: &str,
    body: &mut dyn Read,
) -> Option<String> {
    let content_type = content_type.to_lowercase();

    if content_type.starts_with(DELIVERY_STATUS) {
        return match read_body(body) {
            Ok(text) => recipient_from_status(&text),
            Err(e) => {
                debug!(error = %e, "bounce_mailbox_status_unreadable");
                None
            }
        };
    }

    if content_type.starts_with(EMBEDDED_MESSAGE) {
        let embedded = match reader.parse_embedded(body) {
            Ok(embedded) => embedded,
            Err(e) => {
                debug!(error = %e, "bounce_mailbox_embedded_unparsable");
                return None;
            }
        };
        let to = embedded.header("To")?;
        let to = to.trim();
        return (!to.is_empty()).then(|| to.to_string());
    }

    None
}

/// First recipient field in a delivery-status body, e.g.
/// `Final-Recipient: rfc822; bob@example.com` gives `bob@example.com`.
///
/// A field line with no `;` is skipped.
fn recipient_from_status(body: &str) -> Option<String> {
    body.lines().find_map(|line| {
        let lower = line.to_lowercase();
        if !RECIPIENT_FIELDS.iter().any(|f| lower.starts_with(f)) {
            return None;
        }
        let (_, address) = line.rsplit_once(';')?;
        Some(address.trim().to_string())
    })
}
