//! Webhook endpoint handlers.
//!
//! The bounce webhook:
//! 1. Verifies authentication
//! 2. Classifies the posted raw message
//! 3. Returns the classification as JSON

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::bounce::{BounceResult, Classifier};
use crate::process::process_raw_email;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub classifier: Arc<Classifier>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let classifier = config.classifier();
        Self {
            config: Arc::new(config),
            classifier: Arc::new(classifier),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Bounce Webhook
// =============================================================================

/// Bounce webhook JSON payload.
#[derive(Debug, Deserialize)]
pub struct BouncePayload {
    /// Overrides the message's own Subject header when present
    #[serde(default)]
    pub subject: Option<String>,
    /// Raw RFC 5322 email content (headers + body)
    pub raw_content: String,
}

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<BounceResult>,
}

impl WebhookResponse {
    fn status(status: &'static str) -> Self {
        Self {
            status,
            message_id: None,
            result: None,
        }
    }
}

/// Bounce webhook endpoint.
///
/// This endpoint:
/// 1. Verifies the X-Custom-Auth header (if a token is configured)
/// 2. Classifies the raw message
/// 3. Returns 200 OK with the result
pub async fn bounce_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<BouncePayload>,
) -> impl IntoResponse {
    info!(
        has_subject = payload.subject.is_some(),
        raw_content_length = payload.raw_content.len(),
        "bounce_webhook_received"
    );

    // Verify authentication header
    let auth_header = headers
        .get("X-Custom-Auth")
        .and_then(|v| v.to_str().ok());

    let expected_token = state.config.auth_token.as_deref();

    match (auth_header, expected_token) {
        (Some(provided), Some(expected)) if provided == expected => {
            // Auth passes
        }
        (None, Some(_)) => {
            warn!("bounce_auth_missing");
            return (
                StatusCode::UNAUTHORIZED,
                Json(WebhookResponse::status("unauthorized")),
            );
        }
        (Some(_), Some(_)) => {
            warn!("bounce_auth_invalid");
            return (
                StatusCode::UNAUTHORIZED,
                Json(WebhookResponse::status("unauthorized")),
            );
        }
        (_, None) => {
            // No auth configured, allow through
        }
    }

    match process_raw_email(
        payload.raw_content.as_bytes(),
        payload.subject.as_deref(),
        &state.classifier,
    ) {
        Ok(report) => {
            info!(
                message_id = ?report.message_id,
                bounce_type = %report.result.bounce_type(),
                "bounce_webhook_classified"
            );
            (
                StatusCode::OK,
                Json(WebhookResponse {
                    status: "classified",
                    message_id: report.message_id,
                    result: Some(report.result),
                }),
            )
        }
        Err(e) => {
            error!(error = %e, "bounce_webhook_process_failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(WebhookResponse::status("error")),
            )
        }
    }
}
