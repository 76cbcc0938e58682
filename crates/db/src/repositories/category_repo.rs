//! Repository for the `categories` table. All access is scoped by store.

use sqlx::PgPool;
use tiendas_core::types::DbId;

use crate::models::category::{Category, CreateCategory, UpdateCategory};

const COLUMNS: &str = "id, store_id, name, description, created_at, updated_at";

pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn create(
        pool: &PgPool,
        store_id: DbId,
        input: &CreateCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (store_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(store_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_store(pool: &PgPool, store_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE store_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Category>(&query)
            .bind(store_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_in_store(
        pool: &PgPool,
        store_id: DbId,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 AND store_id = $2");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(store_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a category. Returns `None` if it does not exist in the store.
    pub async fn update(
        pool: &PgPool,
        store_id: DbId,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1 AND store_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(store_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Its products become uncategorized.
    pub async fn delete(pool: &PgPool, store_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
