//! Repository for the `orders` and `order_items` tables.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tiendas_core::cart::validate_quantity;
use tiendas_core::error::CoreError;
use tiendas_core::order::{
    check_transition, check_transition_permission, compute_totals, restores_stock, PricedLine,
};
use tiendas_core::roles::Role;
use tiendas_core::status::{OrderStatus, StoreStatus};
use tiendas_core::store::is_open_for_business;
use tiendas_core::types::DbId;

use crate::error::RepoError;
use crate::models::order::{Order, OrderItem, OrderWithItems, ShippingDetails};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, store_id, customer_id, status_id, item_count, subtotal, \
                       shipping_cost, total, shipping_name, shipping_address, shipping_city, \
                       shipping_zip, payment_reference, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, unit_price, quantity, subtotal";

/// Filters for a store's order listing.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub limit: i64,
    pub offset: i64,
}

/// A cart line locked for checkout.
#[derive(sqlx::FromRow)]
struct CheckoutLine {
    product_id: DbId,
    name: String,
    price: Decimal,
    stock: i32,
    is_active: bool,
    quantity: i32,
}

pub struct OrderRepo;

impl OrderRepo {
    /// Turn the buyer's cart for a store into an order.
    ///
    /// In one transaction: lock the products in the cart, re-check stock,
    /// compute totals from current prices, write the order and its item
    /// snapshots, decrement stock and empty the cart.
    pub async fn checkout(
        pool: &PgPool,
        customer_id: DbId,
        store_id: DbId,
        shipping: &ShippingDetails,
    ) -> Result<OrderWithItems, RepoError> {
        let mut tx = pool.begin().await?;

        let store: Option<(i16, Decimal)> =
            sqlx::query_as("SELECT status_id, shipping_cost FROM stores WHERE id = $1 FOR SHARE")
                .bind(store_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((status_id, shipping_cost)) = store else {
            return Err(CoreError::NotFound {
                entity: "Store",
                id: store_id,
            }
            .into());
        };
        if !is_open_for_business(StoreStatus::from_id(status_id)?) {
            return Err(CoreError::Conflict("This store is not accepting orders".into()).into());
        }

        let lines = sqlx::query_as::<_, CheckoutLine>(
            "SELECT c.product_id, p.name, p.price, p.stock, p.is_active, c.quantity
             FROM cart_items c
             JOIN products p ON p.id = c.product_id
             WHERE c.user_id = $1 AND c.store_id = $2
             ORDER BY c.id
             FOR UPDATE OF p",
        )
        .bind(customer_id)
        .bind(store_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(CoreError::Validation("Your cart is empty".into()).into());
        }
        for line in &lines {
            if !line.is_active {
                return Err(CoreError::Conflict(format!(
                    "'{}' is no longer available",
                    line.name
                ))
                .into());
            }
            validate_quantity(line.quantity, line.stock).map_err(|e| match e {
                CoreError::Conflict(msg) => CoreError::Conflict(format!("'{}': {msg}", line.name)),
                other => other,
            })?;
        }

        let priced: Vec<PricedLine> = lines
            .iter()
            .map(|l| PricedLine {
                unit_price: l.price,
                quantity: l.quantity,
            })
            .collect();
        let totals = compute_totals(&priced, shipping_cost)?;

        let query = format!(
            "INSERT INTO orders (store_id, customer_id, item_count, subtotal, shipping_cost, total,
                                 shipping_name, shipping_address, shipping_city, shipping_zip)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(store_id)
            .bind(customer_id)
            .bind(totals.item_count)
            .bind(totals.subtotal)
            .bind(totals.shipping_cost)
            .bind(totals.total)
            .bind(shipping.name.trim())
            .bind(shipping.address.trim())
            .bind(shipping.city.trim())
            .bind(shipping.zip.trim())
            .fetch_one(&mut *tx)
            .await?;

        let item_query = format!(
            "INSERT INTO order_items (order_id, product_id, product_name, unit_price, quantity, subtotal)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ITEM_COLUMNS}"
        );
        let mut items = Vec::with_capacity(lines.len());
        for (line, priced) in lines.iter().zip(&priced) {
            let item = sqlx::query_as::<_, OrderItem>(&item_query)
                .bind(order.id)
                .bind(line.product_id)
                .bind(&line.name)
                .bind(line.price)
                .bind(line.quantity)
                .bind(priced.subtotal())
                .fetch_one(&mut *tx)
                .await?;
            items.push(item);

            sqlx::query("UPDATE products SET stock = stock - $2 WHERE id = $1")
                .bind(line.product_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND store_id = $2")
            .bind(customer_id)
            .bind(store_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(OrderWithItems { order, items })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Items of an order in checkout order.
    pub async fn items(pool: &PgPool, order_id: DbId) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// One page of a store's orders, newest first, optionally of one status.
    pub async fn list_by_store(
        pool: &PgPool,
        store_id: DbId,
        filter: &OrderFilter,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE store_id = $1
               AND ($2::SMALLINT IS NULL OR status_id = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(store_id)
            .bind(filter.status.map(OrderStatus::id))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// A buyer's orders across every store, newest first.
    pub async fn list_by_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// Move an order to `to` on behalf of a user with `role`.
    ///
    /// The order row is locked while the edge and the role are checked.
    /// Cancelling returns the reserved units to stock.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        role: Role,
        to: OrderStatus,
    ) -> Result<Order, RepoError> {
        let mut tx = pool.begin().await?;

        let from = lock_status(&mut tx, id).await?;
        check_transition(from, to)?;
        check_transition_permission(role, from, to)?;

        if restores_stock(to) {
            sqlx::query(
                "UPDATE products p SET stock = p.stock + oi.quantity
                 FROM order_items oi
                 WHERE oi.order_id = $1 AND p.id = oi.product_id",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!("UPDATE orders SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(to.id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }
}

/// Lock an order row and return its current status.
pub(crate) async fn lock_status(
    tx: &mut Transaction<'_, Postgres>,
    id: DbId,
) -> Result<OrderStatus, RepoError> {
    let row: Option<(i16,)> = sqlx::query_as("SELECT status_id FROM orders WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    match row {
        Some((status_id,)) => Ok(OrderStatus::from_id(status_id)?),
        None => Err(CoreError::NotFound {
            entity: "Order",
            id,
        }
        .into()),
    }
}
