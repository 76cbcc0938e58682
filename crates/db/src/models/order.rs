//! Order and order item models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tiendas_core::order::HasOrderStatus;
use tiendas_core::status::{OrderStatus, StatusId};
use tiendas_core::types::{DbId, Timestamp};

use crate::models::status::serialize_order_status;

/// A row from `orders`. Amounts are computed server-side at checkout.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub store_id: DbId,
    pub customer_id: DbId,
    #[serde(rename = "status", serialize_with = "serialize_order_status")]
    pub status_id: StatusId,
    pub item_count: i32,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub shipping_name: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_zip: String,
    pub payment_reference: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    pub fn status(&self) -> Result<OrderStatus, tiendas_core::error::CoreError> {
        OrderStatus::from_id(self.status_id)
    }
}

impl HasOrderStatus for Order {
    fn order_status(&self) -> OrderStatus {
        // Rows are constrained by the order_statuses FK, so an unknown id
        // cannot be stored.
        OrderStatus::from_id(self.status_id).unwrap_or(OrderStatus::Pending)
    }
}

/// A row from `order_items`. Name and price are snapshots taken at checkout.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub product_id: Option<DbId>,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

/// An order with its items, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Shipping details supplied at checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingDetails {
    pub name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
}
