//! Domain logic for the tiendas platform.
//!
//! This crate has no database or HTTP dependencies. Everything here is a
//! pure function over plain data so the API and repository layers can share
//! the same rules (and test them without a running server).

pub mod access;
pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod hashing;
pub mod order;
pub mod pagination;
pub mod payment;
pub mod roles;
pub mod status;
pub mod store;
pub mod subscription;
pub mod types;
pub mod verification;
