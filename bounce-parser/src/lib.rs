//! Bounce Parser - delivery-failure notification classifier.
//!
//! Classifies a message as a hard bounce, soft bounce or non-bounce by
//! case-insensitive keyword matching on the subject and part bodies, and
//! makes a best-effort attempt to find the mailbox that failed.
//!
//! This library provides shared modules for the two binaries:
//! - `bounce-scan`: classifies raw `.eml` files and prints JSON lines
//! - `bounce-web`: webhook receiver that classifies posted messages
//!
//! ## Architecture
//!
//! ```text
//! raw message → mailparse → ParsedMailReader → Classifier → BounceResult
//! ```

pub mod bounce;
pub mod config;
pub mod error;
pub mod mime;
pub mod process;
pub mod web;

// Re-export commonly used types
pub use bounce::{
    classify, extract_mailbox, BounceResult, BounceType, Classifier, IterationPolicy, PatternSet,
    PatternSets,
};
pub use config::Config;
pub use error::{BounceError, MimeError};
pub use mime::{HeaderKind, HeaderLookup, MimeReader, ParsedMailReader, Part};
pub use process::{process_raw_email, BounceReport};
pub use web::AppState;
