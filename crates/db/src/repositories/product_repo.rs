//! Repository for the `products` table.
//!
//! Creating or re-activating a product is quota-checked against the store's
//! subscription plan inside the same transaction that writes the row.

use sqlx::{PgPool, Postgres, Transaction};
use tiendas_core::error::CoreError;
use tiendas_core::status::StoreStatus;
use tiendas_core::subscription::check_product_quota;
use tiendas_core::types::DbId;

use crate::error::RepoError;
use crate::models::product::{CreateProduct, Product, UpdateProduct};
use crate::repositories::store_repo::count_active_products;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, store_id, category_id, name, description, price, stock, image_url, \
                       is_active, created_at, updated_at";

/// Filters for catalog listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<DbId>,
    pub include_inactive: bool,
    pub limit: i64,
    pub offset: i64,
}

pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product after checking the store's plan has room for it.
    pub async fn create(
        pool: &PgPool,
        store_id: DbId,
        input: &CreateProduct,
    ) -> Result<Product, RepoError> {
        let mut tx = pool.begin().await?;

        ensure_quota(&mut tx, store_id).await?;
        if let Some(category_id) = input.category_id {
            ensure_category(&mut tx, store_id, category_id).await?;
        }

        let query = format!(
            "INSERT INTO products (store_id, category_id, name, description, price, stock, image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(store_id)
            .bind(input.category_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(&input.image_url)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(product)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_in_store(
        pool: &PgPool,
        store_id: DbId,
        id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1 AND store_id = $2");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(store_id)
            .fetch_optional(pool)
            .await
    }

    /// List a store's catalog, newest first.
    pub async fn list_by_store(
        pool: &PgPool,
        store_id: DbId,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE store_id = $1
               AND ($2::BIGINT IS NULL OR category_id = $2)
               AND (is_active = true OR $3)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(store_id)
            .bind(filter.category_id)
            .bind(filter.include_inactive)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Update a product. Only non-`None` fields in `input` are applied.
    ///
    /// Re-activating an inactive product consumes a quota slot, so it goes
    /// through the same plan check as a create. Returns `None` if the product
    /// does not exist in the store.
    pub async fn update(
        pool: &PgPool,
        store_id: DbId,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, RepoError> {
        let mut tx = pool.begin().await?;

        let current: Option<(bool,)> = sqlx::query_as(
            "SELECT is_active FROM products WHERE id = $1 AND store_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((was_active,)) = current else {
            return Ok(None);
        };

        if input.is_active == Some(true) && !was_active {
            ensure_quota(&mut tx, store_id).await?;
        }
        if let Some(category_id) = input.category_id {
            ensure_category(&mut tx, store_id, category_id).await?;
        }

        let query = format!(
            "UPDATE products SET
                category_id = COALESCE($3, category_id),
                name = COALESCE($4, name),
                description = COALESCE($5, description),
                price = COALESCE($6, price),
                stock = COALESCE($7, stock),
                image_url = COALESCE($8, image_url),
                is_active = COALESCE($9, is_active)
             WHERE id = $1 AND store_id = $2
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(store_id)
            .bind(input.category_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(&input.image_url)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(product))
    }

    /// Delete a product. Past order lines keep their name and price snapshot.
    pub async fn delete(pool: &PgPool, store_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Lock the store row and check one more active product fits in its plan.
async fn ensure_quota(tx: &mut Transaction<'_, Postgres>, store_id: DbId) -> Result<(), RepoError> {
    let row: Option<(i16, Option<i32>)> = sqlx::query_as(
        "SELECT s.status_id, p.max_products
         FROM stores s
         LEFT JOIN subscription_plans p ON p.id = s.plan_id
         WHERE s.id = $1
         FOR UPDATE OF s",
    )
    .bind(store_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some((status_id, max_products)) = row else {
        return Err(CoreError::NotFound {
            entity: "Store",
            id: store_id,
        }
        .into());
    };
    if StoreStatus::from_id(status_id)? == StoreStatus::Inactive {
        return Err(CoreError::Conflict("The store has been closed".into()).into());
    }

    let active = count_active_products(tx, store_id).await?;
    check_product_quota(active, max_products)?;
    Ok(())
}

async fn ensure_category(
    tx: &mut Transaction<'_, Postgres>,
    store_id: DbId,
    category_id: DbId,
) -> Result<(), RepoError> {
    let found: Option<(DbId,)> =
        sqlx::query_as("SELECT id FROM categories WHERE id = $1 AND store_id = $2")
            .bind(category_id)
            .bind(store_id)
            .fetch_optional(&mut **tx)
            .await?;
    if found.is_none() {
        return Err(CoreError::Validation(format!(
            "Category {category_id} does not belong to this store"
        ))
        .into());
    }
    Ok(())
}
