//! Route definitions for the `/orders` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Routes mounted at `/orders`. All require auth.
///
/// ```text
/// POST /               -> checkout
/// GET  /               -> list_mine
/// GET  /{id}           -> get_by_id
/// PUT  /{id}/status    -> change_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_mine).post(orders::checkout))
        .route("/{id}", get(orders::get_by_id))
        .route("/{id}/status", put(orders::change_status))
}
