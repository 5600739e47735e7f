//! Bounce classification.
//!
//! Precedence is fixed and the first satisfied condition wins:
//!
//! ```text
//! subject hard match > body hard match > body soft match > none
//! ```
//!
//! Body checks run part by part, so a soft phrase in an early part beats a
//! hard phrase in a later one.

use tracing::{debug, error, info, warn};

use super::mailbox::{self, CurrentPart};
use super::patterns::PatternSets;
use super::types::{
    BounceResult, BounceType, REASON_BODY_HARD, REASON_BODY_SOFT, REASON_SUBJECT_HARD,
};
use crate::error::BounceError;
use crate::mime::{read_body, HeaderKind, MimeReader};

/// How a fault reported while advancing the part cursor is handled.
///
/// Readers report "no more parts" and "the message is broken here" through
/// the same channel in many MIME libraries, so the default treats both as
/// the end of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterationPolicy {
    /// Any iteration error ends the scan normally.
    #[default]
    Lenient,
    /// Iteration errors abort classification with [`BounceError::Iteration`].
    Strict,
}

/// Classifies one message at a time against a set of keyword patterns.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    patterns: PatternSets,
    iteration: IterationPolicy,
}

impl Classifier {
    pub fn new(patterns: PatternSets) -> Self {
        Self {
            patterns,
            iteration: IterationPolicy::default(),
        }
    }

    pub fn with_iteration_policy(mut self, iteration: IterationPolicy) -> Self {
        self.iteration = iteration;
        self
    }

    pub fn patterns(&self) -> &PatternSets {
        &self.patterns
    }

    pub fn iteration_policy(&self) -> IterationPolicy {
        self.iteration
    }

    /// Classify a message and, for bounces, look up the failed recipient.
    ///
    /// Consumes parts from `reader` up to and including the first matching
    /// one. Mailbox extraction then continues from that same position: the
    /// matched part is inspected, followed by the parts after it. Parts
    /// consumed before the match are never revisited, so a delivery-status
    /// part that precedes the matching part cannot supply the mailbox.
    ///
    /// # Errors
    ///
    /// [`BounceError::BodyRead`] if a part body cannot be drained, and
    /// [`BounceError::Iteration`] under [`IterationPolicy::Strict`].
    pub fn classify<R: MimeReader>(
        &self,
        subject: &str,
        reader: &mut R,
    ) -> Result<BounceResult, BounceError> {
        debug!(subject = %subject, "bounce_classify_start");

        if self.patterns.hard_subject.contains_any(subject) {
            info!(subject = %subject, "bounce_subject_match");
            let mailbox = mailbox::resume(reader, None);
            return Ok(BounceResult::bounce(
                BounceType::Hard,
                REASON_SUBJECT_HARD,
                subject,
                mailbox,
            ));
        }

        let mut part_index = 0usize;
        loop {
            let part = match reader.next_part() {
                Ok(Some(part)) => part,
                Ok(None) => break,
                Err(e) => match self.iteration {
                    IterationPolicy::Lenient => {
                        warn!(part_index, error = %e, "bounce_iteration_ended");
                        break;
                    }
                    IterationPolicy::Strict => {
                        error!(part_index, error = %e, "bounce_iteration_failed");
                        return Err(BounceError::Iteration(e));
                    }
                },
            };

            if part.header == HeaderKind::Absent {
                debug!(part_index, content_type = %part.content_type, "bounce_part_skipped");
                part_index += 1;
                continue;
            }

            let body = read_body(part.body).map_err(|e| {
                error!(part_index, content_type = %part.content_type, error = %e, "bounce_body_read_failed");
                e
            })?;

            let verdict = if self.patterns.hard_body.contains_any(&body) {
                Some((BounceType::Hard, REASON_BODY_HARD))
            } else if self.patterns.soft_body.contains_any(&body) {
                Some((BounceType::Soft, REASON_BODY_SOFT))
            } else {
                None
            };

            if let Some((bounce_type, reason)) = verdict {
                info!(
                    part_index,
                    content_type = %part.content_type,
                    bounce_type = %bounce_type,
                    "bounce_body_match"
                );
                let current = CurrentPart {
                    content_type: &part.content_type,
                    body: &body,
                };
                let mailbox = mailbox::resume(reader, Some(current));
                return Ok(BounceResult::bounce(bounce_type, reason, subject, mailbox));
            }

            part_index += 1;
        }

        debug!(parts_scanned = part_index, "bounce_classify_none");
        Ok(BounceResult::not_bounce(subject))
    }
}

/// Classify with the built-in keyword sets and the lenient iteration policy.
pub fn classify<R: MimeReader>(subject: &str, reader: &mut R) -> Result<BounceResult, BounceError> {
    Classifier::default().classify(subject, reader)
}
