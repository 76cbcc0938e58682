//! Platform-operator user management (`/admin/users`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tiendas_core::accounts::validate_full_name;
use tiendas_core::error::CoreError;
use tiendas_core::roles::Role;
use tiendas_core::types::DbId;
use tiendas_db::models::user::{UpdateUser, UserResponse};
use tiendas_db::repositories::{SessionRepo, StoreRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/users/{id}`. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub full_name: Option<String>,
    /// Role name, e.g. `"Deposito"`.
    pub role: Option<Role>,
    pub store_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let data = users.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Role and store changes take effect at the user's next token refresh.
pub async fn update_user(
    State(state): State<AppState>,
    RequireSuperAdmin(auth_user): RequireSuperAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AdminUpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    if let Some(name) = &input.full_name {
        validate_full_name(name)?;
    }
    if id == auth_user.user_id && input.role.is_some_and(|r| r != Role::SuperAdmin) {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot remove your own operator role".into(),
        )));
    }
    if id == auth_user.user_id && input.is_active == Some(false) {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot deactivate your own account".into(),
        )));
    }
    if let Some(store_id) = input.store_id {
        StoreRepo::find_by_id(&state.pool, store_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Store",
                id: store_id,
            }))?;
    }

    let update = UpdateUser {
        full_name: input.full_name.map(|n| n.trim().to_string()),
        role_id: input.role.map(Role::id),
        store_id: input.store_id,
        is_active: input.is_active,
    };
    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if input.is_active == Some(false) {
        SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    }
    tracing::info!(user_id = id, role = %user.role(), operator_id = auth_user.user_id, "User updated");
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Deactivates the account and revokes its sessions. Rows are kept.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireSuperAdmin(auth_user): RequireSuperAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == auth_user.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot deactivate your own account".into(),
        )));
    }
    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, operator_id = auth_user.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}
