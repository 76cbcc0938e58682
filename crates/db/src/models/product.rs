//! Product entity model and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tiendas_core::types::{DbId, Timestamp};

/// A row from `products`. Every product belongs to exactly one store.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub store_id: DbId,
    pub category_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a product. The store comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub category_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    pub image_url: Option<String>,
}

/// DTO for updating a product. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProduct {
    pub category_id: Option<DbId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}
