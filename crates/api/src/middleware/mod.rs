//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller's session, decoded from a Bearer token.
//! - [`rbac::RequireSuperAdmin`] -- platform operator only.
//! - [`rbac::RequireAdmin`] -- store owner (or SuperAdmin).
//! - [`rbac::RequireStoreStaff`] -- Admin, Deposito (or SuperAdmin).
//! - [`rbac::RequireAuth`] -- any authenticated user.

pub mod auth;
pub mod rbac;
