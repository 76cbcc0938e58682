//! Shared query parameter types for API handlers.

use serde::Deserialize;
use tiendas_core::types::DbId;

/// Query parameters for list endpoints that support an `include_inactive` flag.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Catalog listing filters (`?category_id=&include_inactive=&limit=&offset=`).
///
/// `limit` / `offset` are clamped with `clamp_limit` / `clamp_offset` before
/// they reach the repository.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub include_inactive: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Order listing filter (`?status=Pendiente&limit=&offset=`). Accepts any
/// status name, case-insensitively. Paging applies to store listings.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Store listing filter for the platform operator.
#[derive(Debug, Default, Deserialize)]
pub struct StoreListParams {
    pub status: Option<String>,
}
