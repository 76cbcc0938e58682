//! Subscription plan model and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tiendas_core::types::{DbId, Timestamp};

/// A row from `subscription_plans`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubscriptionPlan {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub max_products: i32,
    pub monthly_price: Decimal,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a plan.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlan {
    pub name: String,
    pub description: Option<String>,
    pub max_products: i32,
    pub monthly_price: Decimal,
}

/// DTO for updating a plan. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlan {
    pub name: Option<String>,
    pub description: Option<String>,
    pub max_products: Option<i32>,
    pub monthly_price: Option<Decimal>,
    pub is_active: Option<bool>,
}
