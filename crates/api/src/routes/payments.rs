//! Route definitions for the `/payments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// GET  /return          -> payment_return (redirect)
/// GET  /outcome         -> payment_outcome
/// POST /notifications   -> notification (signed)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/return", get(payments::payment_return))
        .route("/outcome", get(payments::payment_outcome))
        .route("/notifications", post(payments::notification))
}
