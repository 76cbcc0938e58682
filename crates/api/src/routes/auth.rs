//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register         -> register
/// POST /login            -> login
/// POST /refresh          -> refresh
/// POST /logout           -> logout (requires auth)
/// GET  /me               -> me (requires auth)
/// GET  /sessions         -> sessions (requires auth)
/// POST /verify-email     -> verify_email (requires auth)
/// POST /resend-code      -> resend_code (requires auth)
/// POST /change-password  -> change_password (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/sessions", get(auth::sessions))
        .route("/verify-email", post(auth::verify_email))
        .route("/resend-code", post(auth::resend_code))
        .route("/change-password", post(auth::change_password))
}
