//! Public storefront: a store's page, categories and active catalog,
//! addressed by subdomain.
//!
//! Only `Activa` stores are visible. Draft, suspended and closed stores
//! answer 404 as if they did not exist.

use axum::extract::{Path, Query, State};
use axum::Json;
use tiendas_core::error::CoreError;
use tiendas_core::store::is_open_for_business;
use tiendas_core::types::DbId;
use tiendas_db::models::category::Category;
use tiendas_db::models::product::Product;
use tiendas_db::models::store::Store;
use tiendas_db::repositories::{CategoryRepo, ProductRepo, StoreRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::products::product_filter;
use crate::query::ProductListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/storefront/{subdomain}
pub async fn get_store(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> AppResult<Json<Store>> {
    Ok(Json(open_store(&state, &subdomain).await?))
}

/// GET /api/v1/storefront/{subdomain}/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let store = open_store(&state, &subdomain).await?;
    let categories = CategoryRepo::list_by_store(&state.pool, store.id).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/storefront/{subdomain}/products
///
/// Active products only; `include_inactive` is ignored here.
pub async fn list_products(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    Query(params): Query<ProductListParams>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let store = open_store(&state, &subdomain).await?;
    let filter = product_filter(&params, false);
    let products = ProductRepo::list_by_store(&state.pool, store.id, &filter).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/storefront/{subdomain}/products/{product_id}
pub async fn get_product(
    State(state): State<AppState>,
    Path((subdomain, id)): Path<(String, DbId)>,
) -> AppResult<Json<Product>> {
    let store = open_store(&state, &subdomain).await?;
    let product = ProductRepo::find_in_store(&state.pool, store.id, id)
        .await?
        .filter(|p| p.is_active)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Product", id }))?;
    Ok(Json(product))
}

async fn open_store(state: &AppState, subdomain: &str) -> AppResult<Store> {
    let subdomain = subdomain.trim().to_ascii_lowercase();
    StoreRepo::find_by_subdomain(&state.pool, &subdomain)
        .await?
        .filter(|s| is_open_for_business(s.status()))
        .ok_or(AppError::Core(CoreError::NotFoundByKey {
            entity: "Store",
            key: subdomain,
        }))
}
