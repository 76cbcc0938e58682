//! Handlers for stores: onboarding, the owner's store, lifecycle, plan
//! switching, staff, and the operator's store list.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tiendas_core::access::ensure_store_access;
use tiendas_core::accounts::{validate_email, validate_full_name};
use tiendas_core::error::CoreError;
use tiendas_core::roles::Role;
use tiendas_core::status::StoreStatus;
use tiendas_core::store::{normalize_subdomain, validate_store_name, StatusActor};
use tiendas_core::subscription::QuotaUsage;
use tiendas_core::types::DbId;
use tiendas_db::models::plan::SubscriptionPlan;
use tiendas_db::models::store::{CreateStore, Store, UpdateStore};
use tiendas_db::models::user::{CreateUser, UserResponse};
use tiendas_db::repositories::{PlanRepo, StoreRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::{create_auth_response, load_user, user_agent, AuthResponse};
use crate::middleware::rbac::{RequireAdmin, RequireStoreStaff, RequireSuperAdmin};
use crate::query::StoreListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A store with its plan and how much of the plan's quota is in use.
#[derive(Debug, Serialize)]
pub struct StoreDetail {
    #[serde(flatten)]
    pub store: Store,
    pub plan: Option<SubscriptionPlan>,
    pub quota: Option<QuotaUsage>,
}

/// Response for onboarding: the new store plus tokens that carry its id.
#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub store: Store,
    pub auth: AuthResponse,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    /// Target status name, e.g. `"Activa"`.
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PlanChangeRequest {
    pub plan_id: DbId,
}

/// Request body for adding a warehouse account to a store.
#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/stores
///
/// Onboarding: an Admin without a store creates one. The store starts as
/// `Borrador`; the response carries new tokens with the store id.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    RequireAdmin(auth_user): RequireAdmin,
    Json(input): Json<CreateStore>,
) -> AppResult<(StatusCode, Json<OnboardingResponse>)> {
    validate_store_name(&input.name)?;
    validate_shipping_cost(input.shipping_cost)?;
    let subdomain = normalize_subdomain(&input.subdomain)?;

    let input = CreateStore {
        subdomain,
        ..input
    };
    let store = StoreRepo::create_for_owner(&state.pool, auth_user.user_id, &input).await?;
    tracing::info!(store_id = store.id, owner_id = auth_user.user_id, subdomain = %store.subdomain, "Store created");

    let owner = load_user(&state, &auth_user).await?;
    let auth = create_auth_response(&state, &owner, user_agent(&headers)).await?;
    Ok((StatusCode::CREATED, Json(OnboardingResponse { store, auth })))
}

/// GET /api/v1/stores
///
/// Every store on the platform, optionally filtered by `?status=`.
pub async fn list(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
    Query(params): Query<StoreListParams>,
) -> AppResult<Json<DataResponse<Vec<Store>>>> {
    let status = params
        .status
        .as_deref()
        .map(StoreStatus::from_name)
        .transpose()?;
    let stores = StoreRepo::list(&state.pool, status).await?;
    Ok(Json(DataResponse { data: stores }))
}

/// GET /api/v1/stores/mine
///
/// The store the caller owns or works for, with plan and quota usage.
pub async fn mine(
    State(state): State<AppState>,
    RequireStoreStaff(auth_user): RequireStoreStaff,
) -> AppResult<Json<StoreDetail>> {
    // Re-read: the token may predate onboarding or a reassignment.
    let user = load_user(&state, &auth_user).await?;
    let store_id = user.store_id.ok_or_else(|| {
        AppError::Core(CoreError::NotFoundByKey {
            entity: "Store",
            key: format!("of user {}", user.id),
        })
    })?;
    let store = find_store(&state, store_id).await?;
    Ok(Json(store_detail(&state, store).await?))
}

/// GET /api/v1/stores/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireStoreStaff(auth_user): RequireStoreStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<StoreDetail>> {
    ensure_store_access(&auth_user.session(), id)?;
    let store = find_store(&state, id).await?;
    Ok(Json(store_detail(&state, store).await?))
}

/// PUT /api/v1/stores/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStore>,
) -> AppResult<Json<Store>> {
    ensure_store_access(&auth_user.session(), id)?;
    if let Some(name) = &input.name {
        validate_store_name(name)?;
    }
    validate_shipping_cost(input.shipping_cost)?;

    let store = StoreRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Store", id }))?;
    Ok(Json(store))
}

/// DELETE /api/v1/stores/{id}
///
/// Closes the store (`Inactiva`). Rows are kept for order history.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let session = auth_user.session();
    ensure_store_access(&session, id)?;
    StoreRepo::transition_status(&state.pool, id, StoreStatus::Inactive, actor_for(&session)).await?;
    tracing::info!(store_id = id, user_id = auth_user.user_id, "Store closed");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/stores/{id}/status
///
/// Owners activate or close their store; only the operator suspends or
/// reinstates one.
pub async fn change_status(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChangeRequest>,
) -> AppResult<Json<Store>> {
    let session = auth_user.session();
    ensure_store_access(&session, id)?;
    let to = StoreStatus::from_name(&input.status)?;

    let store = StoreRepo::transition_status(&state.pool, id, to, actor_for(&session)).await?;
    tracing::info!(store_id = id, status = %to, user_id = auth_user.user_id, "Store status changed");
    Ok(Json(store))
}

/// PUT /api/v1/stores/{id}/plan
pub async fn change_plan(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<PlanChangeRequest>,
) -> AppResult<Json<StoreDetail>> {
    ensure_store_access(&auth_user.session(), id)?;

    let store = StoreRepo::change_plan(&state.pool, id, input.plan_id).await?;
    tracing::info!(store_id = id, plan_id = input.plan_id, "Subscription plan switched");
    Ok(Json(store_detail(&state, store).await?))
}

/// GET /api/v1/stores/{id}/staff
pub async fn list_staff(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    ensure_store_access(&auth_user.session(), id)?;
    let users = UserRepo::list_by_store(&state.pool, id).await?;
    let data = users.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/stores/{id}/staff
///
/// Create a `Deposito` account attached to the store.
pub async fn create_staff(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<CreateStaffRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    ensure_store_access(&auth_user.session(), id)?;
    find_store(&state, id).await?;
    validate_email(&input.email)?;
    validate_full_name(&input.full_name)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.trim().to_string(),
            full_name: input.full_name.trim().to_string(),
            password_hash,
            role_id: Role::Deposito.id(),
            store_id: Some(id),
        },
    )
    .await?;
    tracing::info!(store_id = id, user_id = user.id, "Warehouse account created");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn actor_for(session: &tiendas_core::access::Session) -> StatusActor {
    if session.is_super_admin() {
        StatusActor::Operator
    } else {
        StatusActor::Owner
    }
}

fn validate_shipping_cost(cost: Option<Decimal>) -> Result<(), CoreError> {
    match cost {
        Some(cost) if cost.is_sign_negative() => Err(CoreError::Validation(
            "Shipping cost must not be negative".into(),
        )),
        _ => Ok(()),
    }
}

pub(crate) async fn find_store(state: &AppState, id: DbId) -> AppResult<Store> {
    StoreRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Store", id }))
}

async fn store_detail(state: &AppState, store: Store) -> AppResult<StoreDetail> {
    let plan = match store.plan_id {
        Some(plan_id) => PlanRepo::find_by_id(&state.pool, plan_id).await?,
        None => None,
    };
    let quota = match &plan {
        Some(plan) => {
            let active = StoreRepo::active_product_count(&state.pool, store.id).await?;
            Some(QuotaUsage::new(active, plan.max_products))
        }
        None => None,
    };
    Ok(StoreDetail { store, plan, quota })
}
