//! Payment notification log.

use serde::Serialize;
use sqlx::FromRow;
use tiendas_core::types::{DbId, Timestamp};

/// A processed provider notification. `provider_event_id` is unique, which
/// makes re-deliveries of the same event a no-op.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentNotification {
    pub id: DbId,
    pub provider_event_id: String,
    pub order_id: DbId,
    pub status: String,
    pub received_at: Timestamp,
}
