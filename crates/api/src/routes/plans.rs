//! Route definitions for the `/plans` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::plans;
use crate::state::AppState;

/// Routes mounted at `/plans`.
///
/// Reads are public; writes require SuperAdmin.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> deactivate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(plans::list).post(plans::create))
        .route(
            "/{id}",
            get(plans::get_by_id)
                .put(plans::update)
                .delete(plans::deactivate),
        )
}
