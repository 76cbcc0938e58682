//! Repository for the `user_sessions` table.

use sqlx::PgPool;
use tiendas_core::types::DbId;

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str =
    "id, user_id, refresh_token_hash, expires_at, is_revoked, user_agent, created_at, updated_at";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at, user_agent)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Spend a refresh token: revoke its session and return the owner.
    ///
    /// Revocation and lookup are one statement, so two requests racing with
    /// the same token cannot both succeed. Returns `None` for unknown,
    /// expired or already spent tokens.
    pub async fn redeem(pool: &PgPool, refresh_token_hash: &str) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "UPDATE user_sessions SET is_revoked = true
             WHERE refresh_token_hash = $1
               AND is_revoked = false
               AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(refresh_token_hash)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(user_id,)| user_id))
    }

    /// Sessions a user can still refresh, newest first.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = $1 AND is_revoked = false AND expires_at > NOW()
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Sign a user out everywhere. Returns how many sessions were open.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true
             WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Purge sessions that can no longer be redeemed.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_sessions WHERE expires_at < NOW() OR is_revoked = true")
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
