pub mod access;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod payments;
pub mod plans;
pub mod storefront;
pub mod stores;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user
/// /auth/sessions                                   signed-in devices
/// /auth/verify-email                               confirm e-mail code
/// /auth/resend-code                                issue a new code
/// /auth/change-password                            change password
///
/// /access/check                                    navigation gate (auth optional)
///
/// /plans                                           list (public), create (SuperAdmin)
/// /plans/{id}                                      get, update, deactivate
///
/// /stores                                          onboard (Admin), list (SuperAdmin)
/// /stores/mine                                     caller's store with quota
/// /stores/{id}                                     get, update, close
/// /stores/{id}/status                              lifecycle transition
/// /stores/{id}/plan                                switch plan
/// /stores/{id}/staff                               list, add warehouse staff
/// /stores/{id}/categories                          list, create
/// /stores/{id}/categories/{category_id}            update, delete
/// /stores/{id}/products                            list, create (quota-bound)
/// /stores/{id}/products/{product_id}               get, update, delete
/// /stores/{id}/orders                              store order queue
///
/// /storefront/{subdomain}                          public store page
/// /storefront/{subdomain}/categories               public categories
/// /storefront/{subdomain}/products                 public catalog
/// /storefront/{subdomain}/products/{product_id}    public product
///
/// /cart                                            get, clear (?store_id=)
/// /cart/items                                      add
/// /cart/items/{id}                                 set quantity, remove
///
/// /orders                                          checkout, list mine
/// /orders/{id}                                     get
/// /orders/{id}/status                              transition
///
/// /payments/return                                 provider return redirect
/// /payments/outcome                                outcome as JSON
/// /payments/notifications                          signed provider callback
///
/// /admin/users                                     list (SuperAdmin)
/// /admin/users/{id}                                update, deactivate
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/access", access::router())
        .nest("/plans", plans::router())
        .nest("/stores", stores::router())
        .nest("/storefront", storefront::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/payments", payments::router())
        .nest("/admin", admin::router())
}
