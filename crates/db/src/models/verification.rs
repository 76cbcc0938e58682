//! E-mail verification code rows.

use sqlx::FromRow;
use tiendas_core::types::{DbId, Timestamp};

/// A row from `email_verification_codes`. Only the code hash is stored.
#[derive(Debug, Clone, FromRow)]
pub struct EmailVerificationCode {
    pub id: DbId,
    pub user_id: DbId,
    pub code_hash: String,
    pub expires_at: Timestamp,
    pub consumed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
