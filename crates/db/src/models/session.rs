//! Refresh-token sessions.

use sqlx::FromRow;
use tiendas_core::types::{DbId, Timestamp};

/// One issued refresh token. The token itself is never stored, only its
/// SHA-256 hash.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    /// `User-Agent` of the client that signed in, when it sent one.
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
}
