//! Request handlers.

use crate::user::{
    ports::UserRepository,
    services::{IdentityWebhookEvent, UserDirectoryService, UserSyncError},
};
use axum::{
    body::Bytes,
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mockable::Clock;
use serde_json::{error::Category, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not parseable JSON.
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(#[source] serde_json::Error),
    /// The body is JSON but a field has the wrong type.
    #[error("unexpected field type: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// Synchronising the webhook user failed.
    #[error(transparent)]
    Sync(#[from] UserSyncError),
}

impl ApiError {
    /// Status code the error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Sync(err) if err.is_invalid_payload() => StatusCode::BAD_REQUEST,
            Self::MalformedBody(_) | Self::Sync(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "identity webhook failed");
            "Internal Server Error".to_owned()
        } else {
            warn!(error = %self, "rejected identity webhook payload");
            format!("Invalid webhook payload: {self}")
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Decodes an identity webhook body.
///
/// # Errors
///
/// Returns [`ApiError::MalformedBody`] for syntax errors and truncated input,
/// and [`ApiError::InvalidPayload`] when the JSON does not match the event
/// shape.
pub fn decode_identity_event(body: &[u8]) -> Result<IdentityWebhookEvent, ApiError> {
    serde_json::from_slice(body).map_err(|err| match err.classify() {
        Category::Data => ApiError::InvalidPayload(err),
        Category::Io | Category::Syntax | Category::Eof => ApiError::MalformedBody(err),
    })
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// POST /webhooks/identity
///
/// Upserts the user carried by the identity provider's event. The body is
/// read as raw bytes so that decoding failures go through [`ApiError`].
///
/// # Errors
///
/// Returns [`ApiError`]: unparseable bodies and store failures map to `500`,
/// mistyped or incomplete payloads to `400`.
pub async fn identity_webhook<R, C>(
    State(directory): State<Arc<UserDirectoryService<R, C>>>,
    body: Bytes,
) -> Result<&'static str, ApiError>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    let event = decode_identity_event(&body)?;
    directory.sync_from_webhook(event).await?;
    Ok("Webhook processed successfully")
}
