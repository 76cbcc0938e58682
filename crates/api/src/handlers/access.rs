//! The navigation gate exposed to the SPA.

use axum::Json;
use serde::Deserialize;
use tiendas_core::access::{authorize, authorize_path, AccessDecision, AccessRequirement};

use crate::middleware::auth::MaybeAuthUser;

#[derive(Debug, Deserialize)]
pub struct AccessCheckRequest {
    pub path: String,
    /// Explicit requirement. When omitted the route table decides.
    pub requirement: Option<AccessRequirement>,
}

/// POST /api/v1/access/check
///
/// Anonymous callers are allowed; they get the login redirect where one
/// applies.
pub async fn check(
    MaybeAuthUser(caller): MaybeAuthUser,
    Json(input): Json<AccessCheckRequest>,
) -> Json<AccessDecision> {
    let session = caller.map(|u| u.session());
    let decision = match &input.requirement {
        Some(requirement) => authorize(session.as_ref(), requirement, &input.path),
        None => authorize_path(session.as_ref(), &input.path),
    };
    Json(decision)
}
