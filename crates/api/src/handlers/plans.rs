//! Handlers for the subscription-plan catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tiendas_core::error::CoreError;
use tiendas_core::roles::Role;
use tiendas_core::subscription::validate_plan;
use tiendas_core::types::DbId;
use tiendas_db::models::plan::{CreatePlan, SubscriptionPlan, UpdatePlan};
use tiendas_db::repositories::PlanRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::middleware::rbac::RequireSuperAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/plans
///
/// Public. Retired plans are only listed for the platform operator.
pub async fn list(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<SubscriptionPlan>>>> {
    let is_operator = caller.is_some_and(|u| u.role == Role::SuperAdmin);
    let plans = PlanRepo::list(&state.pool, params.include_inactive && is_operator).await?;
    Ok(Json(DataResponse { data: plans }))
}

/// GET /api/v1/plans/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SubscriptionPlan>> {
    let plan = PlanRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubscriptionPlan",
            id,
        }))?;
    Ok(Json(plan))
}

/// POST /api/v1/plans
pub async fn create(
    State(state): State<AppState>,
    RequireSuperAdmin(auth_user): RequireSuperAdmin,
    Json(input): Json<CreatePlan>,
) -> AppResult<(StatusCode, Json<SubscriptionPlan>)> {
    validate_plan(&input.name, input.max_products, input.monthly_price)?;

    let plan = PlanRepo::create(&state.pool, &input).await?;
    tracing::info!(plan_id = plan.id, user_id = auth_user.user_id, "Subscription plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}

/// PUT /api/v1/plans/{id}
///
/// Lowering `max_products` does not touch stores already on the plan; their
/// existing products stay, new ones are refused until they fit.
pub async fn update(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlan>,
) -> AppResult<Json<SubscriptionPlan>> {
    let current = PlanRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubscriptionPlan",
            id,
        }))?;
    validate_plan(
        input.name.as_deref().unwrap_or(&current.name),
        input.max_products.unwrap_or(current.max_products),
        input.monthly_price.unwrap_or(current.monthly_price),
    )?;

    let plan = PlanRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubscriptionPlan",
            id,
        }))?;
    Ok(Json(plan))
}

/// DELETE /api/v1/plans/{id}
///
/// Retires the plan. Stores already subscribed keep it.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireSuperAdmin(auth_user): RequireSuperAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let retired = PlanRepo::deactivate(&state.pool, id).await?;
    if !retired {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "SubscriptionPlan",
            id,
        }));
    }
    tracing::info!(plan_id = id, user_id = auth_user.user_id, "Subscription plan retired");
    Ok(StatusCode::NO_CONTENT)
}
