//! Handlers for the caller's shopping cart. One cart per store.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tiendas_core::cart::{summarize, CartSummary};
use tiendas_core::error::CoreError;
use tiendas_core::order::PricedLine;
use tiendas_core::types::DbId;
use tiendas_db::models::cart::{AddCartItem, CartLine};
use tiendas_db::repositories::CartRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub store_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    /// New quantity. `0` removes the line.
    pub quantity: i32,
}

/// A cart listing with its live totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub summary: CartSummary,
}

impl CartView {
    fn new(items: Vec<CartLine>) -> Self {
        let priced: Vec<PricedLine> = items
            .iter()
            .filter(|line| line.is_available)
            .map(CartLine::priced)
            .collect();
        let summary = summarize(&priced);
        Self { items, summary }
    }
}

/// GET /api/v1/cart?store_id=
pub async fn get_cart(
    State(state): State<AppState>,
    RequireAuth(auth_user): RequireAuth,
    Query(params): Query<CartQuery>,
) -> AppResult<Json<CartView>> {
    let items = CartRepo::list_for_user(&state.pool, auth_user.user_id, params.store_id).await?;
    Ok(Json(CartView::new(items)))
}

/// POST /api/v1/cart/items
///
/// Adding a product already in the cart raises that line's quantity.
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(auth_user): RequireAuth,
    Json(input): Json<AddCartItem>,
) -> AppResult<(StatusCode, Json<CartLine>)> {
    let line =
        CartRepo::add_item(&state.pool, auth_user.user_id, input.product_id, input.quantity).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// PUT /api/v1/cart/items/{id}
///
/// Returns the updated line, or 204 when quantity `0` removed it.
pub async fn set_quantity(
    State(state): State<AppState>,
    RequireAuth(auth_user): RequireAuth,
    Path(item_id): Path<DbId>,
    Json(input): Json<SetQuantityRequest>,
) -> AppResult<Response> {
    if input.quantity == 0 {
        delete_line(&state, auth_user.user_id, item_id).await?;
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let line = CartRepo::set_quantity(&state.pool, auth_user.user_id, item_id, input.quantity)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CartItem",
            id: item_id,
        }))?;
    Ok(Json(line).into_response())
}

/// DELETE /api/v1/cart/items/{id}
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(auth_user): RequireAuth,
    Path(item_id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_line(&state, auth_user.user_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/cart?store_id=
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(auth_user): RequireAuth,
    Query(params): Query<CartQuery>,
) -> AppResult<StatusCode> {
    CartRepo::clear(&state.pool, auth_user.user_id, params.store_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_line(state: &AppState, user_id: DbId, item_id: DbId) -> AppResult<()> {
    let removed = CartRepo::remove_item(&state.pool, user_id, item_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CartItem",
            id: item_id,
        }));
    }
    Ok(())
}
