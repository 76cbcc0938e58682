//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tiendas_core::access::Session;
use tiendas_core::roles::Role;
use tiendas_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub store_id: Option<DbId>,
    pub email_verified: bool,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Resolve the role id. Unknown ids fall back to the least privileged role.
    pub fn role(&self) -> Role {
        Role::from_id(self.role_id).unwrap_or(Role::Cliente)
    }

    pub fn session(&self) -> Session {
        Session {
            user_id: self.id,
            role: self.role(),
            store_id: self.store_id,
            email_verified: self.email_verified,
        }
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub store_id: Option<DbId>,
    pub email_verified: bool,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role(),
            store_id: user.store_id,
            email_verified: user.email_verified,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub store_id: Option<DbId>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub role_id: Option<DbId>,
    pub store_id: Option<DbId>,
    pub is_active: Option<bool>,
}
