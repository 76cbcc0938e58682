//! Serde helpers rendering SMALLINT status ids as their display names.

use serde::Serializer;
use tiendas_core::status::{OrderStatus, StatusId, StoreStatus};

pub fn serialize_store_status<S: Serializer>(id: &StatusId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(StoreStatus::from_id(*id).map_or("unknown", StoreStatus::name))
}

pub fn serialize_order_status<S: Serializer>(id: &StatusId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(OrderStatus::from_id(*id).map_or("unknown", OrderStatus::name))
}
