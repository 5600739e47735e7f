//! Error types for bounce classification.
//!
//! Only two things can fail a classification call: draining a part body,
//! and (under [`IterationPolicy::Strict`](crate::IterationPolicy::Strict))
//! a fault reported by the MIME reader while advancing to the next part.
//! Everything that goes wrong during mailbox extraction is swallowed.

use std::io;

use thiserror::Error;

/// Errors surfaced by [`Classifier::classify`](crate::Classifier::classify).
#[derive(Debug, Error)]
pub enum BounceError {
    /// Reading a part body failed part-way through.
    ///
    /// `partial` holds whatever text was read before the failure.
    #[error("{source}: {partial}")]
    BodyRead {
        #[source]
        source: io::Error,
        partial: String,
    },

    /// The reader reported a fault while advancing to the next part.
    #[error("part iteration failed: {0}")]
    Iteration(#[source] MimeError),
}

/// Errors reported by a [`MimeReader`](crate::mime::MimeReader).
#[derive(Debug, Error)]
pub enum MimeError {
    #[error("failed to parse message: {0}")]
    Parse(#[from] mailparse::MailParseError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed message: {0}")]
    Malformed(String),
}
