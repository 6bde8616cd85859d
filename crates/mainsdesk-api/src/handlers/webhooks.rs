use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
}

/// Gateway webhook receiver.
///
/// The body is taken as raw bytes: the signature covers the exact bytes sent,
/// so it must be verified before any JSON parsing.
#[utoipa::path(
    post,
    path = "/api/v0/webhooks/razorpay",
    tag = "webhooks",
    request_body(content = String, description = "Raw gateway event JSON", content_type = "application/json"),
    params(
        ("x-razorpay-signature" = String, Header, description = "Hex HMAC-SHA256 of the raw body")
    ),
    responses(
        (status = 200, description = "Event acknowledged", body = WebhookAck),
        (status = 400, description = "Missing or invalid signature, or malformed event", body = ErrorResponse),
        (status = 500, description = "Ledger update failed; the gateway will retry", body = ErrorResponse)
    )
)]
pub async fn razorpay_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let signature = headers
        .get(state.config.signature_header())
        .and_then(|v| v.to_str().ok());

    let outcome = state.webhooks.process(&body, signature).await?;
    tracing::debug!(outcome = ?outcome, "Webhook processed");

    Ok((StatusCode::OK, Json(WebhookAck { received: true })))
}
