//! Well-known role names and the [`Role`] enum.
//!
//! The names and ids must match the seed data in
//! `20260301000001_create_roles_table.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_SUPER_ADMIN: &str = "SuperAdmin";
pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_CLIENTE: &str = "Cliente";
pub const ROLE_DEPOSITO: &str = "Deposito";

/// Platform role carried in access tokens.
///
/// Serialized with the same names the `roles` table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Platform operator. Manages every store, plan and user.
    SuperAdmin,
    /// Store owner / merchant.
    Admin,
    /// Storefront customer.
    Cliente,
    /// Warehouse staff fulfilling a store's orders.
    Deposito,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::SuperAdmin, Role::Admin, Role::Cliente, Role::Deposito];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => ROLE_SUPER_ADMIN,
            Role::Admin => ROLE_ADMIN,
            Role::Cliente => ROLE_CLIENTE,
            Role::Deposito => ROLE_DEPOSITO,
        }
    }

    /// Primary key of the role in the `roles` lookup table.
    pub fn id(self) -> DbId {
        match self {
            Role::SuperAdmin => 1,
            Role::Admin => 2,
            Role::Cliente => 3,
            Role::Deposito => 4,
        }
    }

    pub fn from_id(id: DbId) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.id() == id)
    }

    /// Whether this role works inside a single store (and therefore needs a
    /// `store_id` to do anything useful).
    pub fn is_store_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Deposito)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown role '{s}'")))
    }
}
