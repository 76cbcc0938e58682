//! Route definitions for the public `/storefront` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::storefront;
use crate::state::AppState;

/// Routes mounted at `/storefront`. No authentication.
///
/// ```text
/// GET /{subdomain}                          -> get_store
/// GET /{subdomain}/categories               -> list_categories
/// GET /{subdomain}/products                 -> list_products
/// GET /{subdomain}/products/{product_id}    -> get_product
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{subdomain}", get(storefront::get_store))
        .route("/{subdomain}/categories", get(storefront::list_categories))
        .route("/{subdomain}/products", get(storefront::list_products))
        .route(
            "/{subdomain}/products/{product_id}",
            get(storefront::get_product),
        )
}
