//! Handlers for a store's categories (`/stores/{id}/categories`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tiendas_core::access::ensure_store_access;
use tiendas_core::catalog::validate_category_name;
use tiendas_core::error::CoreError;
use tiendas_core::types::DbId;
use tiendas_db::models::category::{Category, CreateCategory, UpdateCategory};
use tiendas_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireStoreStaff};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/stores/{id}/categories
pub async fn list(
    State(state): State<AppState>,
    RequireStoreStaff(auth_user): RequireStoreStaff,
    Path(store_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    ensure_store_access(&auth_user.session(), store_id)?;
    let categories = CategoryRepo::list_by_store(&state.pool, store_id).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/stores/{id}/categories
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path(store_id): Path<DbId>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    ensure_store_access(&auth_user.session(), store_id)?;
    validate_category_name(&input.name)?;

    let category = CategoryRepo::create(&state.pool, store_id, &input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/v1/stores/{id}/categories/{category_id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path((store_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<Category>> {
    ensure_store_access(&auth_user.session(), store_id)?;
    if let Some(name) = &input.name {
        validate_category_name(name)?;
    }

    let category = CategoryRepo::update(&state.pool, store_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(category))
}

/// DELETE /api/v1/stores/{id}/categories/{category_id}
///
/// Products in the category become uncategorized.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path((store_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_store_access(&auth_user.session(), store_id)?;
    let deleted = CategoryRepo::delete(&state.pool, store_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
