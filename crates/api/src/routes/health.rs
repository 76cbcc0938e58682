//! Liveness and readiness checks, mounted at the root (outside `/api/v1`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
}

async fn check(state: &AppState) -> HealthResponse {
    let database = tiendas_db::health_check(&state.pool).await.is_ok();
    HealthResponse {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    }
}

/// GET /health -- always 200; `status` says whether Postgres answered.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(check(&state).await)
}

/// GET /health/ready -- 503 until the database is reachable.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let report = check(&state).await;
    let code = if report.database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
}
