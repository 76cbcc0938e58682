//! Credential primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token issuing/validation and refresh-token helpers.

pub mod jwt;
pub mod password;
