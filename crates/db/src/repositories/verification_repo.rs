//! Repository for the `email_verification_codes` table.

use sqlx::PgPool;
use tiendas_core::types::{DbId, Timestamp};

use crate::models::verification::EmailVerificationCode;

const COLUMNS: &str = "id, user_id, code_hash, expires_at, consumed_at, created_at";

pub struct VerificationRepo;

impl VerificationRepo {
    /// Store a new code hash for a user.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        code_hash: &str,
        expires_at: Timestamp,
    ) -> Result<EmailVerificationCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_verification_codes (user_id, code_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailVerificationCode>(&query)
            .bind(user_id)
            .bind(code_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// When the most recent code for a user was issued, if any.
    pub async fn last_issued_at(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        let row: Option<(Timestamp,)> = sqlx::query_as(
            "SELECT created_at FROM email_verification_codes
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Consume a matching, unexpired, unused code.
    ///
    /// Returns `true` if a code was consumed. Consuming also invalidates all
    /// other outstanding codes for the user.
    pub async fn consume(pool: &PgPool, user_id: DbId, code_hash: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE email_verification_codes SET consumed_at = NOW()
             WHERE user_id = $1
               AND code_hash = $2
               AND consumed_at IS NULL
               AND expires_at > NOW()",
        )
        .bind(user_id)
        .bind(code_hash)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE email_verification_codes SET consumed_at = NOW()
             WHERE user_id = $1 AND consumed_at IS NULL",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET email_verified = true WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
