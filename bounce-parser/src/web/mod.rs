//! Web server module for classifying messages posted by mail gateways.
//!
//! This module provides a small web server that:
//! - Receives raw bounce messages as JSON webhooks
//! - Verifies a shared-secret header
//! - Classifies the message and answers with the result

pub mod handlers;

pub use handlers::{
    bounce_webhook, health, AppState, BouncePayload, HealthResponse, WebhookResponse,
};
