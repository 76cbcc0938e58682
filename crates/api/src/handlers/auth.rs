//! Handlers for the `/auth` resource: registration, login, token refresh,
//! logout, e-mail verification and password change.

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tiendas_core::accounts::{validate_email, validate_full_name};
use tiendas_core::error::CoreError;
use tiendas_core::roles::Role;
use tiendas_core::types::{DbId, Timestamp};
use tiendas_core::verification::{
    check_resend_cooldown, code_expiry, generate_code, hash_code, validate_code_format,
};
use tiendas_db::models::session::CreateSession;
use tiendas_db::models::user::{CreateUser, User, UserResponse};
use tiendas_db::repositories::{SessionRepo, UserRepo, VerificationRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// Sign up as a merchant (`Admin`) instead of a customer.
    #[serde(default)]
    pub merchant: bool,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/verify-email`.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub code: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Successful authentication response returned by register, login, refresh
/// and anything else that changes what the access token must carry.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// One signed-in device, as listed by `GET /auth/sessions`.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub id: DbId,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Response for `POST /auth/resend-code`.
#[derive(Debug, Serialize)]
pub struct CodeIssued {
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account (customer by default, merchant on request) and issue a
/// first verification code. Returns 201 with tokens so the user is signed in
/// straight away.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_email(&input.email)?;
    validate_full_name(&input.full_name)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let role = if input.merchant { Role::Admin } else { Role::Cliente };

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.trim().to_string(),
            full_name: input.full_name.trim().to_string(),
            password_hash,
            role_id: role.id(),
            store_id: None,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, role = %role, "User registered");

    issue_verification_code(&state, &user).await?;

    let response = create_auth_response(&state, &user, user_agent(&headers)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with e-mail + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid e-mail or password".into(),
            ))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
        let locked =
            UserRepo::record_failed_login(&state.pool, user.id, MAX_FAILED_ATTEMPTS, lock_until)
                .await?;
        if let Some(locked_until) = locked {
            tracing::warn!(user_id = user.id, %locked_until, "Account locked after failed logins");
        }

        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid e-mail or password".into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let response = create_auth_response(&state, &user, user_agent(&headers)).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The old
/// session is revoked (rotation).
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user_id = SessionRepo::redeem(&state.pool, &hash_refresh_token(&input.refresh_token))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user, user_agent(&headers)).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<Json<UserResponse>> {
    let user = load_user(&state, &auth_user).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// GET /api/v1/auth/sessions
///
/// Devices that can still refresh a token for the caller.
pub async fn sessions(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<SessionInfo>>> {
    let rows = SessionRepo::list_active_for_user(&state.pool, auth_user.user_id).await?;
    let sessions = rows
        .into_iter()
        .map(|s| SessionInfo {
            id: s.id,
            user_agent: s.user_agent,
            created_at: s.created_at,
            expires_at: s.expires_at,
        })
        .collect();
    Ok(Json(sessions))
}

/// POST /api/v1/auth/verify-email
///
/// Consume a verification code. Returns fresh tokens whose claims carry
/// `email_verified = true`.
pub async fn verify_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    auth_user: AuthUser,
    Json(input): Json<VerifyEmailRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_code_format(&input.code)?;

    let user = load_user(&state, &auth_user).await?;
    if user.email_verified {
        return Err(AppError::Core(CoreError::Conflict(
            "E-mail address is already verified".into(),
        )));
    }

    let consumed = VerificationRepo::consume(&state.pool, user.id, &hash_code(&input.code)).await?;
    if !consumed {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid or expired verification code".into(),
        )));
    }
    tracing::info!(user_id = user.id, "E-mail verified");

    let user = load_user(&state, &auth_user).await?;
    let response = create_auth_response(&state, &user, user_agent(&headers)).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/resend-code
///
/// Issue a new verification code, subject to the resend cooldown.
/// Returns 202 Accepted.
pub async fn resend_code(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<(StatusCode, Json<CodeIssued>)> {
    let user = load_user(&state, &auth_user).await?;
    if user.email_verified {
        return Err(AppError::Core(CoreError::Conflict(
            "E-mail address is already verified".into(),
        )));
    }

    let last_issued = VerificationRepo::last_issued_at(&state.pool, user.id).await?;
    check_resend_cooldown(last_issued, Utc::now())?;

    let expires_at = issue_verification_code(&state, &user).await?;
    Ok((StatusCode::ACCEPTED, Json(CodeIssued { expires_at })))
}

/// POST /api/v1/auth/change-password
///
/// Replace the caller's password and sign out every other session.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = load_user(&state, &auth_user).await?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;
    SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the response.
pub(crate) async fn create_auth_response(
    state: &AppState,
    user: &User,
    user_agent: Option<String>,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(&user.session(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let session_input = CreateSession {
        user_id: user.id,
        refresh_token_hash: refresh_hash,
        expires_at,
        user_agent,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_lifetime_secs(),
        user: UserResponse::from(user),
    })
}

pub(crate) fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.chars().take(255).collect())
}

/// Load the caller's current row. Tokens outlive role or store changes, so
/// handlers that act on account state re-read it.
pub(crate) async fn load_user(state: &AppState, auth_user: &AuthUser) -> AppResult<User> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }
    Ok(user)
}

/// Store a new code hash for `user`. Codes are not e-mailed; the plaintext is
/// only written to the debug log for local development.
async fn issue_verification_code(state: &AppState, user: &User) -> AppResult<Timestamp> {
    let code = generate_code();
    let expires_at = code_expiry(Utc::now());
    VerificationRepo::create(&state.pool, user.id, &code.hash, expires_at).await?;
    tracing::debug!(user_id = user.id, code = %code.plaintext, "Verification code issued");
    Ok(expires_at)
}
