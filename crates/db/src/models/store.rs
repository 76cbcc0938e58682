//! Store (tenant) entity model and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tiendas_core::status::{StatusId, StoreStatus};
use tiendas_core::types::{DbId, Timestamp};

use crate::models::status::serialize_store_status;

/// A store row from the `stores` table.
///
/// Payment credentials are never serialized; the storefront only ever sees
/// the public key.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Store {
    pub id: DbId,
    pub owner_id: DbId,
    pub plan_id: Option<DbId>,
    pub name: String,
    pub subdomain: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    #[serde(rename = "status", serialize_with = "serialize_store_status")]
    pub status_id: StatusId,
    pub shipping_origin_zip: Option<String>,
    pub shipping_cost: Decimal,
    #[serde(skip_serializing)]
    pub payment_access_token: Option<String>,
    pub payment_public_key: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Store {
    /// Resolve the status id. Unknown ids are treated as inactive.
    pub fn status(&self) -> StoreStatus {
        StoreStatus::from_id(self.status_id).unwrap_or(StoreStatus::Inactive)
    }

    /// Whether a payment integration has been configured.
    pub fn has_payment_credentials(&self) -> bool {
        self.payment_access_token
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }
}

/// DTO for creating a store. `subdomain` must already be normalized.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStore {
    pub name: String,
    pub subdomain: String,
    pub description: Option<String>,
    pub shipping_cost: Option<Decimal>,
}

/// DTO for updating a store. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStore {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub shipping_origin_zip: Option<String>,
    pub shipping_cost: Option<Decimal>,
    pub payment_access_token: Option<String>,
    pub payment_public_key: Option<String>,
}
