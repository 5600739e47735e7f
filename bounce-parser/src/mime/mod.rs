//! The MIME capability consumed by the classifier.
//!
//! Retrieval and MIME decoding live outside this crate. The classifier only
//! needs three things from a decoded message:
//! - case-insensitive lookup of top-level headers
//! - a forward-only, single-pass sequence of parts
//! - a way to read the headers of an embedded `message/rfc822` body
//!
//! [`ParsedMailReader`] provides all three over a `mailparse` message.
//!
//! ## Cursor semantics
//!
//! [`MimeReader::next_part`] consumes. A part handed out once is never
//! handed out again, and there is no rewind. Classification and mailbox
//! extraction share the same cursor.

pub mod parsed_mail;

use std::io::Read;

use crate::error::{BounceError, MimeError};

pub use parsed_mail::{OwnedHeaders, ParsedMailReader, PartBody};

/// Case-insensitive header lookup.
pub trait HeaderLookup {
    /// First value of the named header, if present.
    fn header(&self, name: &str) -> Option<String>;
}

/// Whether a part carries inline header metadata.
///
/// Only [`HeaderKind::Present`] parts are scanned for bounce phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Present,
    Absent,
}

/// One leaf part handed out by a [`MimeReader`].
#[derive(Debug)]
pub struct Part<B> {
    pub header: HeaderKind,
    /// Media type, e.g. `message/delivery-status`.
    pub content_type: String,
    pub body: B,
}

/// A decoded message with a single-pass part cursor.
pub trait MimeReader: HeaderLookup {
    type Body: Read;
    type Embedded: HeaderLookup;

    /// Advance the cursor.
    ///
    /// `Ok(None)` means the parts are exhausted. An `Err` may mean either a
    /// genuine fault or an early end; callers cannot tell the two apart.
    fn next_part(&mut self) -> Result<Option<Part<Self::Body>>, MimeError>;

    /// Parse a byte stream as a nested message and expose its headers.
    fn parse_embedded(&self, body: &mut dyn Read) -> Result<Self::Embedded, MimeError>;
}

/// Drain a part body into text.
///
/// On failure the error carries the text read so far.
pub fn read_body<R: Read>(mut body: R) -> Result<String, BounceError> {
    let mut buf = Vec::new();
    match body.read_to_end(&mut buf) {
        Ok(_) => Ok(String::from_utf8_lossy(&buf).into_owned()),
        Err(source) => Err(BounceError::BodyRead {
            source,
            partial: String::from_utf8_lossy(&buf).into_owned(),
        }),
    }
}
