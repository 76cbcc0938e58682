//! Repository for the `cart_items` table.
//!
//! A buyer has one cart per store. Lines are always read joined with the
//! live product row so prices, stock and availability are current.

use sqlx::{PgPool, Postgres, Transaction};
use tiendas_core::cart::{merged_quantity, validate_added_quantity, validate_quantity};
use tiendas_core::error::CoreError;
use tiendas_core::status::StoreStatus;
use tiendas_core::store::is_open_for_business;
use tiendas_core::types::DbId;

use crate::error::RepoError;
use crate::models::cart::CartLine;

const LINE_SELECT: &str = "SELECT c.id, c.store_id, c.product_id, p.name AS product_name, \
                           p.image_url, p.price AS unit_price, p.stock, c.quantity, \
                           p.price * c.quantity AS subtotal, p.is_active AS is_available \
                           FROM cart_items c \
                           JOIN products p ON p.id = c.product_id";

pub struct CartRepo;

impl CartRepo {
    /// The buyer's cart lines for one store, oldest first. Lines whose product
    /// was deactivated are included with `is_available = false`.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        store_id: DbId,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        let query = format!(
            "{LINE_SELECT} WHERE c.user_id = $1 AND c.store_id = $2
             ORDER BY c.created_at ASC, c.id ASC"
        );
        sqlx::query_as::<_, CartLine>(&query)
            .bind(user_id)
            .bind(store_id)
            .fetch_all(pool)
            .await
    }

    /// Add `quantity` units of a product. An existing line for the same
    /// product is merged rather than duplicated.
    pub async fn add_item(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
        quantity: i32,
    ) -> Result<CartLine, RepoError> {
        validate_added_quantity(quantity)?;
        let mut tx = pool.begin().await?;
        let (store_id, stock) = sellable_product(&mut tx, product_id).await?;

        let existing: Option<(i32,)> = sqlx::query_as(
            "SELECT quantity FROM cart_items WHERE user_id = $1 AND product_id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;
        let quantity = match existing {
            Some((current,)) => merged_quantity(current, quantity),
            None => quantity,
        };
        validate_quantity(quantity, stock)?;

        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO cart_items (user_id, store_id, product_id, quantity)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_cart_items_user_id_product_id
             DO UPDATE SET quantity = EXCLUDED.quantity
             RETURNING id",
        )
        .bind(user_id)
        .bind(store_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&mut *tx)
        .await?;

        let line = fetch_line(&mut tx, user_id, id).await?;
        tx.commit().await?;
        Ok(line)
    }

    /// Replace the quantity of one of the buyer's lines.
    ///
    /// Returns `None` if the line does not exist.
    pub async fn set_quantity(
        pool: &PgPool,
        user_id: DbId,
        item_id: DbId,
        quantity: i32,
    ) -> Result<Option<CartLine>, RepoError> {
        let mut tx = pool.begin().await?;

        let line: Option<(DbId,)> = sqlx::query_as(
            "SELECT product_id FROM cart_items WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((product_id,)) = line else {
            return Ok(None);
        };

        let (_, stock) = sellable_product(&mut tx, product_id).await?;
        validate_quantity(quantity, stock)?;

        sqlx::query("UPDATE cart_items SET quantity = $3 WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

        let line = fetch_line(&mut tx, user_id, item_id).await?;
        tx.commit().await?;
        Ok(Some(line))
    }

    /// Remove one line. Returns `true` if it existed.
    pub async fn remove_item(pool: &PgPool, user_id: DbId, item_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Empty the buyer's cart for a store. Returns the number of lines removed.
    pub async fn clear(pool: &PgPool, user_id: DbId, store_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND store_id = $2")
            .bind(user_id)
            .bind(store_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Load a product that can currently be bought, returning its store and stock.
async fn sellable_product(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
) -> Result<(DbId, i32), RepoError> {
    let row: Option<(DbId, i32, bool, i16)> = sqlx::query_as(
        "SELECT p.store_id, p.stock, p.is_active, s.status_id
         FROM products p
         JOIN stores s ON s.id = p.store_id
         WHERE p.id = $1",
    )
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some((store_id, stock, _, status_id)) = row.filter(|(_, _, is_active, _)| *is_active) else {
        return Err(CoreError::NotFound {
            entity: "Product",
            id: product_id,
        }
        .into());
    };
    if !is_open_for_business(StoreStatus::from_id(status_id)?) {
        return Err(CoreError::Conflict("This store is not accepting orders".into()).into());
    }
    Ok((store_id, stock))
}

async fn fetch_line(
    tx: &mut Transaction<'_, Postgres>,
    user_id: DbId,
    item_id: DbId,
) -> Result<CartLine, sqlx::Error> {
    let query = format!("{LINE_SELECT} WHERE c.id = $1 AND c.user_id = $2");
    sqlx::query_as::<_, CartLine>(&query)
        .bind(item_id)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
}
