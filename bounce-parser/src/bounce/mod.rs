//! Bounce classification and failed-recipient extraction.
//!
//! ## Flow
//!
//! ```text
//! subject + MimeReader → Classifier → (bounce?) → mailbox extraction → BounceResult
//! ```
//!
//! Classification and extraction share the reader's part cursor, see
//! [`Classifier::classify`] and [`extract_mailbox`].

pub mod classifier;
pub mod mailbox;
pub mod patterns;
pub mod types;

pub use classifier::{classify, Classifier, IterationPolicy};
pub use mailbox::{extract_mailbox, FAILED_RECIPIENTS_HEADER};
pub use patterns::{contains_any, PatternSet, PatternSets};
pub use types::{
    BounceResult, BounceType, REASON_BODY_HARD, REASON_BODY_SOFT, REASON_SUBJECT_HARD,
};
