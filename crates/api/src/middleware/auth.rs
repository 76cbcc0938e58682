//! Bearer-token extractors.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tiendas_core::access::Session;
use tiendas_core::error::CoreError;
use tiendas_core::roles::Role;
use tiendas_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Caller identified by a valid access token. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
    /// The store the caller administers or works for, as of token issue.
    pub store_id: Option<DbId>,
    pub email_verified: bool,
}

impl AuthUser {
    /// The access-gate view of this caller.
    pub fn session(&self) -> Session {
        Session {
            user_id: self.user_id,
            role: self.role,
            store_id: self.store_id,
            email_verified: self.email_verified,
        }
    }
}

impl From<Session> for AuthUser {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id,
            role: session.role,
            store_id: session.store_id,
            email_verified: session.email_verified,
        }
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Expected an Authorization: Bearer <token> header"))?;

        let claims = validate_token(token.trim(), &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(claims.session().into())
    }
}

/// Like [`AuthUser`], but `None` instead of a rejection when no
/// `Authorization` header is sent. A header that is present but invalid is
/// still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(MaybeAuthUser(None));
        }
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(MaybeAuthUser(Some(user)))
    }
}
