//! Route definitions for the `/access` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::access;
use crate::state::AppState;

/// Routes mounted at `/access`.
///
/// ```text
/// POST /check  -> check (auth optional)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/check", post(access::check))
}
