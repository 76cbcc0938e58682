//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod cart_repo;
pub mod category_repo;
pub mod order_repo;
pub mod payment_repo;
pub mod plan_repo;
pub mod product_repo;
pub mod session_repo;
pub mod store_repo;
pub mod user_repo;
pub mod verification_repo;

pub use cart_repo::CartRepo;
pub use category_repo::CategoryRepo;
pub use order_repo::{OrderFilter, OrderRepo};
pub use payment_repo::{NotificationOutcome, PaymentRepo};
pub use plan_repo::PlanRepo;
pub use product_repo::ProductRepo;
pub use session_repo::SessionRepo;
pub use store_repo::StoreRepo;
pub use user_repo::UserRepo;
pub use verification_repo::VerificationRepo;
