//! Request handlers.
//!
//! Each submodule holds the async handler functions for one resource.
//! Handlers validate input with the rules in `tiendas_core`, delegate to the
//! matching repository in `tiendas_db` and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod access;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod payments;
pub mod plans;
pub mod products;
pub mod storefront;
pub mod stores;
