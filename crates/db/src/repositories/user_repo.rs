//! Repository for the `users` table.

use sqlx::PgPool;
use tiendas_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, UpdateUser, User};

const COLUMNS: &str = "id, email, full_name, password_hash, role_id, store_id, email_verified, \
                       is_active, last_login_at, failed_login_count, locked_until, \
                       created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// E-mail addresses are stored lowercased.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, full_name, password_hash, role_id, store_id)
             VALUES (LOWER($1), $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .bind(input.store_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by e-mail (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Every account on the platform, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// List the staff (Admin / Deposito) attached to a store.
    pub async fn list_by_store(pool: &PgPool, store_id: DbId) -> Result<Vec<User>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE store_id = $1 ORDER BY created_at ASC");
        sqlx::query_as::<_, User>(&query)
            .bind(store_id)
            .fetch_all(pool)
            .await
    }

    /// Patch a user; `None` fields are left alone. `None` if the id is unknown.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                full_name = COALESCE($2, full_name),
                role_id = COALESCE($3, role_id),
                store_id = COALESCE($4, store_id),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(input.role_id)
            .bind(input.store_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Disable sign-in for a user. `false` if they were already inactive.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a failed password attempt.
    ///
    /// The attempt that reaches `max_attempts` also locks the account until
    /// `lock_until`. Returns the lock expiry when this attempt set it.
    pub async fn record_failed_login(
        pool: &PgPool,
        id: DbId,
        max_attempts: i32,
        lock_until: Timestamp,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        let row: Option<(Option<Timestamp>,)> = sqlx::query_as(
            "UPDATE users SET
                failed_login_count = failed_login_count + 1,
                locked_until = CASE
                    WHEN failed_login_count + 1 >= $2 THEN $3
                    ELSE locked_until
                END
             WHERE id = $1
             RETURNING CASE WHEN failed_login_count >= $2 THEN locked_until END",
        )
        .bind(id)
        .bind(max_attempts)
        .bind(lock_until)
        .fetch_optional(pool)
        .await?;
        Ok(row.and_then(|(locked,)| locked))
    }

    /// Reset the failure counter and lock, and stamp `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store a new Argon2 hash.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
