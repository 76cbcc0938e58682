//! Handlers for a store's catalog (`/stores/{id}/products`).
//!
//! Creating or re-activating a product is bounded by the store's plan; the
//! repository performs that check under a row lock.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tiendas_core::access::ensure_store_access;
use tiendas_core::catalog::{validate_price, validate_product_name, validate_product_update, validate_stock};
use tiendas_core::error::CoreError;
use tiendas_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use tiendas_core::types::DbId;
use tiendas_db::models::product::{CreateProduct, Product, UpdateProduct};
use tiendas_db::repositories::product_repo::ProductFilter;
use tiendas_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireStoreStaff};
use crate::query::ProductListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/stores/{id}/products
///
/// Staff view of the catalog. Inactive products are included on request.
pub async fn list(
    State(state): State<AppState>,
    RequireStoreStaff(auth_user): RequireStoreStaff,
    Path(store_id): Path<DbId>,
    Query(params): Query<ProductListParams>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    ensure_store_access(&auth_user.session(), store_id)?;
    let filter = product_filter(&params, params.include_inactive);
    let products = ProductRepo::list_by_store(&state.pool, store_id, &filter).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/stores/{id}/products/{product_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireStoreStaff(auth_user): RequireStoreStaff,
    Path((store_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Product>> {
    ensure_store_access(&auth_user.session(), store_id)?;
    let product = ProductRepo::find_in_store(&state.pool, store_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Product", id }))?;
    Ok(Json(product))
}

/// POST /api/v1/stores/{id}/products
///
/// Fails with 409 when the plan's product limit is reached.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path(store_id): Path<DbId>,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    ensure_store_access(&auth_user.session(), store_id)?;
    validate_product_name(&input.name)?;
    validate_price(input.price)?;
    validate_stock(input.stock)?;

    let product = ProductRepo::create(&state.pool, store_id, &input).await?;
    tracing::info!(store_id, product_id = product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/v1/stores/{id}/products/{product_id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path((store_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<Product>> {
    ensure_store_access(&auth_user.session(), store_id)?;
    validate_product_update(input.name.as_deref(), input.price, input.stock)?;

    let product = ProductRepo::update(&state.pool, store_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Product", id }))?;
    Ok(Json(product))
}

/// DELETE /api/v1/stores/{id}/products/{product_id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path((store_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_store_access(&auth_user.session(), store_id)?;
    let deleted = ProductRepo::delete(&state.pool, store_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Product", id }));
    }
    tracing::info!(store_id, product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn product_filter(params: &ProductListParams, include_inactive: bool) -> ProductFilter {
    ProductFilter {
        category_id: params.category_id,
        include_inactive,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: clamp_offset(params.offset),
    }
}
