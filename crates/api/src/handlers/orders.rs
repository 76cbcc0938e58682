//! Handlers for orders: checkout, the buyer's history, store order queues
//! and status changes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tiendas_core::access::ensure_store_access;
use tiendas_core::error::CoreError;
use tiendas_core::order::{filter_by_status, validate_shipping};
use tiendas_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use tiendas_core::roles::Role;
use tiendas_core::status::OrderStatus;
use tiendas_core::types::DbId;
use tiendas_db::models::order::{Order, OrderWithItems, ShippingDetails};
use tiendas_db::repositories::{OrderFilter, OrderRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireStoreStaff};
use crate::query::OrderListParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub store_id: DbId,
    pub shipping: ShippingDetails,
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusRequest {
    /// Target status name, e.g. `"Enviado"`.
    pub status: String,
}

/// POST /api/v1/orders
///
/// Check out the caller's cart for one store. Prices and totals are taken
/// from the catalog at this moment, never from the client.
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(auth_user): RequireAuth,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<OrderWithItems>)> {
    if !auth_user.email_verified {
        return Err(AppError::Core(CoreError::Forbidden(
            "Verify your e-mail address before placing an order".into(),
        )));
    }
    let shipping = &input.shipping;
    validate_shipping(&shipping.name, &shipping.address, &shipping.city, &shipping.zip)?;

    let order = OrderRepo::checkout(&state.pool, auth_user.user_id, input.store_id, shipping).await?;
    tracing::info!(
        order_id = order.order.id,
        store_id = input.store_id,
        customer_id = auth_user.user_id,
        total = %order.order.total,
        "Order placed",
    );
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/v1/orders
///
/// The caller's own orders across every store, optionally `?status=`.
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(auth_user): RequireAuth,
    Query(params): Query<OrderListParams>,
) -> AppResult<Json<DataResponse<Vec<Order>>>> {
    let status = parse_status_filter(&params)?;
    let orders = OrderRepo::list_by_customer(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse {
        data: filter_by_status(orders, status),
    }))
}

/// GET /api/v1/stores/{id}/orders
///
/// Paged with `?limit=&offset=`; `?status=` is applied in the query.
pub async fn list_for_store(
    State(state): State<AppState>,
    RequireStoreStaff(auth_user): RequireStoreStaff,
    Path(store_id): Path<DbId>,
    Query(params): Query<OrderListParams>,
) -> AppResult<Json<DataResponse<Vec<Order>>>> {
    ensure_store_access(&auth_user.session(), store_id)?;
    let status = parse_status_filter(&params)?;
    let filter = OrderFilter {
        status,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: clamp_offset(params.offset),
    };
    let orders = OrderRepo::list_by_store(&state.pool, store_id, &filter).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/orders/{id}
///
/// Visible to the buyer and to the store's staff.
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(auth_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<OrderWithItems>> {
    let order = find_visible_order(&state, &auth_user, id).await?;
    let items = OrderRepo::items(&state.pool, id).await?;
    Ok(Json(OrderWithItems { order, items }))
}

/// PUT /api/v1/orders/{id}/status
///
/// Buyers may cancel their own pending orders; staff drive fulfillment.
pub async fn change_status(
    State(state): State<AppState>,
    RequireAuth(auth_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<OrderStatusRequest>,
) -> AppResult<Json<Order>> {
    let to = OrderStatus::from_name(&input.status)?;
    let order = find_visible_order(&state, &auth_user, id).await?;

    // Acting on your own purchase is always a customer action, whatever
    // your platform role.
    let role = if order.customer_id == auth_user.user_id {
        Role::Cliente
    } else {
        auth_user.role
    };

    let order = OrderRepo::transition(&state.pool, id, role, to).await?;
    tracing::info!(
        order_id = id,
        store_id = order.store_id,
        status = %to,
        user_id = auth_user.user_id,
        "Order status changed",
    );
    Ok(Json(order))
}

fn parse_status_filter(params: &OrderListParams) -> Result<Option<OrderStatus>, CoreError> {
    params
        .status
        .as_deref()
        .map(OrderStatus::from_name)
        .transpose()
}

/// Load an order the caller is allowed to see. Anything else is reported as
/// not found so order ids of other stores do not leak.
async fn find_visible_order(state: &AppState, auth_user: &AuthUser, id: DbId) -> AppResult<Order> {
    let not_found = || AppError::Core(CoreError::NotFound { entity: "Order", id });

    let order = OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    if order.customer_id == auth_user.user_id
        || ensure_store_access(&auth_user.session(), order.store_id).is_ok()
    {
        Ok(order)
    } else {
        Err(not_found())
    }
}
