//! Access and refresh tokens.
//!
//! Access tokens are HS256 JWTs carrying the [`Session`] facts the access
//! gate needs (role, store, verification state), so a request can be
//! authorized without a database round-trip. Refresh tokens are opaque
//! random strings; only their SHA-256 hash is stored.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tiendas_core::access::Session;
use tiendas_core::hashing::{random_token, sha256_hex};
use tiendas_core::roles::Role;
use tiendas_core::types::DbId;
use uuid::Uuid;

use crate::config::env_parsed;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub role: Role,
    /// Store the user owns or works for.
    pub store_id: Option<DbId>,
    pub email_verified: bool,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    fn for_session(session: &Session, issued_at: i64, lifetime_secs: i64) -> Self {
        Self {
            sub: session.user_id,
            role: session.role,
            store_id: session.store_id,
            email_verified: session.email_verified,
            exp: issued_at + lifetime_secs,
            iat: issued_at,
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn session(&self) -> Session {
        Session {
            user_id: self.sub,
            role: self.role,
            store_id: self.store_id,
            email_verified: self.email_verified,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// If `JWT_SECRET` is missing or empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        Self {
            secret,
            access_token_expiry_mins: env_parsed("JWT_ACCESS_EXPIRY_MINS", 15),
            refresh_token_expiry_days: env_parsed("JWT_REFRESH_EXPIRY_DAYS", 7),
        }
    }

    /// Access token lifetime, as reported to clients in `expires_in`.
    pub fn access_lifetime_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

pub fn generate_access_token(
    session: &Session,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::for_session(session, Utc::now().timestamp(), config.access_lifetime_secs());
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry, returning the claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// New refresh token as `(plaintext, hash)`. Only the hash is persisted.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = random_token();
    let hash = hash_refresh_token(&plaintext);
    (plaintext, hash)
}

pub fn hash_refresh_token(token: &str) -> String {
    sha256_hex(token.as_bytes())
}
