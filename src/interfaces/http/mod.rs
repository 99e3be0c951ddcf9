pub mod signature;

use crate::application::reconciler::PaymentReconciler;
use crate::domain::event::ProcessorEvent;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use signature::verify_signature;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, warn};

/// Header carrying the processor's HMAC signature over the raw body.
pub const SIGNATURE_HEADER: &str = "payment-signature";

#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<PaymentReconciler>,
    pub webhook_secret: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/webhooks/payments", post(payment_webhook))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Webhook entry point.
///
/// Only a missing/invalid signature or an unparseable payload is rejected;
/// everything past that point is acknowledged with 200 even on internal
/// failure, since the processor retries non-2xx indefinitely and most
/// failures here are not resolvable by redelivery.
async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let Some(sig) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("webhook delivery without signature header");
        return StatusCode::BAD_REQUEST;
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();
    if let Err(e) = verify_signature(&state.webhook_secret, sig, body.as_bytes(), now) {
        warn!(error = %e, "webhook signature verification failed");
        return StatusCode::BAD_REQUEST;
    }

    let event: ProcessorEvent = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "webhook payload not parseable");
            return StatusCode::BAD_REQUEST;
        }
    };

    if let Err(e) = state.reconciler.handle_event(&event).await {
        error!(event_id = %event.id, event_type = %event.event_type, error = %e,
            "event processing failed; acknowledged to stop redelivery");
    }
    StatusCode::OK
}
