//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement, using the same role rule as the navigation gate
//! (SuperAdmin passes wherever Admin does).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tiendas_core::access::ensure_role;
use tiendas_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[Role],
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    ensure_role(&user.session(), allowed)?;
    Ok(user)
}

/// Platform operator only.
pub struct RequireSuperAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, &[Role::SuperAdmin])
            .await
            .map(RequireSuperAdmin)
    }
}

/// Requires a store owner (`Admin`) or the platform operator.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, &[Role::Admin]).await.map(RequireAdmin)
    }
}

/// Requires store staff: `Admin`, `Deposito`, or the platform operator.
pub struct RequireStoreStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStoreStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, &[Role::Admin, Role::Deposito])
            .await
            .map(RequireStoreStaff)
    }
}

/// Any signed-in user. Used by the customer-facing cart and order routes.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
