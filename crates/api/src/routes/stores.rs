//! Route definitions for the `/stores` resource and its nested catalog,
//! order and staff resources.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{categories, orders, products, stores};
use crate::state::AppState;

/// Routes mounted at `/stores`.
///
/// Every `{id}` route checks that the caller belongs to that store
/// (SuperAdmin may act on any store).
///
/// ```text
/// POST   /                                  -> create (Admin onboarding)
/// GET    /                                  -> list (SuperAdmin)
/// GET    /mine                              -> mine
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete (close)
/// PUT    /{id}/status                       -> change_status
/// PUT    /{id}/plan                         -> change_plan
/// GET    /{id}/staff                        -> list_staff
/// POST   /{id}/staff                        -> create_staff
///
/// GET    /{id}/categories                   -> categories::list
/// POST   /{id}/categories                   -> categories::create
/// PUT    /{id}/categories/{category_id}     -> categories::update
/// DELETE /{id}/categories/{category_id}     -> categories::delete
///
/// GET    /{id}/products                     -> products::list
/// POST   /{id}/products                     -> products::create
/// GET    /{id}/products/{product_id}        -> products::get_by_id
/// PUT    /{id}/products/{product_id}        -> products::update
/// DELETE /{id}/products/{product_id}        -> products::delete
///
/// GET    /{id}/orders                       -> orders::list_for_store
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::list).post(stores::create))
        .route("/mine", get(stores::mine))
        .route(
            "/{id}",
            get(stores::get_by_id)
                .put(stores::update)
                .delete(stores::delete),
        )
        .route("/{id}/status", put(stores::change_status))
        .route("/{id}/plan", put(stores::change_plan))
        .route(
            "/{id}/staff",
            get(stores::list_staff).post(stores::create_staff),
        )
        .route(
            "/{id}/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/{id}/categories/{category_id}",
            put(categories::update).delete(categories::delete),
        )
        .route(
            "/{id}/products",
            get(products::list).post(products::create),
        )
        .route(
            "/{id}/products/{product_id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/{id}/orders", get(orders::list_for_store))
}
