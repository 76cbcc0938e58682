//! Cart line models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tiendas_core::order::PricedLine;
use tiendas_core::types::DbId;

/// A cart line joined with its product, as listed to the buyer.
///
/// `is_available` is false once the product has been deactivated; such lines
/// stay listed so the buyer can remove them, but are left out of the totals.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartLine {
    pub id: DbId,
    pub store_id: DbId,
    pub product_id: DbId,
    pub product_name: String,
    pub image_url: Option<String>,
    pub unit_price: Decimal,
    pub stock: i32,
    pub quantity: i32,
    pub subtotal: Decimal,
    pub is_available: bool,
}

impl CartLine {
    pub fn priced(&self) -> PricedLine {
        PricedLine {
            unit_price: self.unit_price,
            quantity: self.quantity,
        }
    }
}

/// Request body for adding a product to the cart.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCartItem {
    pub product_id: DbId,
    pub quantity: i32,
}
