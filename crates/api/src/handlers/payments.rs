//! Handlers for the payment provider: the buyer's return redirect and the
//! signed server-to-server notification.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use axum::Json;
use serde::{Deserialize, Serialize};
use tiendas_core::error::CoreError;
use tiendas_core::hashing::verify_hmac_sha256;
use tiendas_core::payment::{resolve_payment_return, PaymentOutcome};
use tiendas_core::types::DbId;
use tiendas_db::repositories::{NotificationOutcome, PaymentRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA256 of the raw notification body.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Query string the provider appends to the return URL.
#[derive(Debug, Deserialize)]
pub struct PaymentReturnParams {
    pub status: Option<String>,
    pub order_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct PaymentOutcomeResponse {
    pub outcome: PaymentOutcome,
    pub redirect_to: String,
}

/// Body of a provider notification.
#[derive(Debug, Deserialize)]
pub struct PaymentNotificationRequest {
    pub event_id: String,
    pub order_id: DbId,
    pub status: String,
    pub payment_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationAck {
    pub outcome: &'static str,
}

/// GET /api/v1/payments/return
///
/// Sends the buyer to the frontend result page for the provider's status.
/// Does not change the order; only a signed notification does.
pub async fn payment_return(
    State(state): State<AppState>,
    Query(params): Query<PaymentReturnParams>,
) -> Redirect {
    let outcome = resolve_payment_return(params.status.as_deref());
    let mut target = format!(
        "{}{}",
        state.config.frontend_url.trim_end_matches('/'),
        outcome.redirect_path()
    );
    if let Some(order_id) = params.order_id {
        target.push_str(&format!("?order_id={order_id}"));
    }
    Redirect::to(&target)
}

/// GET /api/v1/payments/outcome
///
/// The same mapping as the return redirect, as JSON for clients that route
/// on their own.
pub async fn payment_outcome(Query(params): Query<PaymentReturnParams>) -> Json<PaymentOutcomeResponse> {
    let outcome = resolve_payment_return(params.status.as_deref());
    Json(PaymentOutcomeResponse {
        outcome,
        redirect_to: outcome.redirect_path().to_string(),
    })
}

/// POST /api/v1/payments/notifications
///
/// Verifies the signature over the raw body before parsing it. Replays of
/// an event id are acknowledged without side effects.
pub async fn notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<NotificationAck>> {
    let secret = state.config.payment_webhook_secret.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Forbidden(
            "Payment notifications are not enabled".into(),
        ))
    })?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !verify_hmac_sha256(secret, &body, signature) {
        tracing::warn!("Rejected payment notification with a bad signature");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid notification signature".into(),
        )));
    }

    let input: PaymentNotificationRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid notification body: {e}")))?;

    let outcome = PaymentRepo::record_notification(
        &state.pool,
        &input.event_id,
        input.order_id,
        &input.status,
        input.payment_id.as_deref(),
    )
    .await?;

    let outcome = match outcome {
        NotificationOutcome::Applied => {
            tracing::info!(order_id = input.order_id, event_id = %input.event_id, "Payment applied to order");
            "applied"
        }
        NotificationOutcome::Recorded => {
            tracing::info!(order_id = input.order_id, status = %input.status, "Payment notification recorded");
            "recorded"
        }
        NotificationOutcome::Duplicate => {
            tracing::debug!(event_id = %input.event_id, "Duplicate payment notification");
            "duplicate"
        }
    };
    Ok(Json(NotificationAck { outcome }))
}
