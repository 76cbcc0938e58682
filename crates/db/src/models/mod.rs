//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod cart;
pub mod category;
pub mod order;
pub mod payment;
pub mod plan;
pub mod product;
pub mod session;
pub mod status;
pub mod store;
pub mod user;
pub mod verification;
