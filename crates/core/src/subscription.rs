//! Subscription-plan quota rules.
//!
//! A store's plan bounds how many *active* products its catalog may hold.
//! The repository layer calls these checks inside the same transaction that
//! inserts or re-activates a product, after locking the store row, so two
//! concurrent creates cannot both squeeze into the last slot.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;

/// Longest plan name accepted.
pub const MAX_PLAN_NAME_LEN: usize = 100;

/// Quota usage summary returned alongside a store's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaUsage {
    pub active_products: i64,
    pub max_products: i64,
    pub remaining: i64,
}

impl QuotaUsage {
    pub fn new(active_products: i64, max_products: i32) -> Self {
        let max_products = i64::from(max_products);
        Self {
            active_products,
            max_products,
            remaining: (max_products - active_products).max(0),
        }
    }
}

/// Check that one more active product fits in the plan.
///
/// `max_products` is `None` when the store has not subscribed to a plan yet;
/// such stores cannot list products at all.
pub fn check_product_quota(active_products: i64, max_products: Option<i32>) -> Result<(), CoreError> {
    let Some(max) = max_products else {
        return Err(CoreError::Conflict(
            "The store has no subscription plan. Choose a plan before adding products".into(),
        ));
    };
    if active_products >= i64::from(max) {
        return Err(CoreError::Conflict(format!(
            "Plan limit reached: {active_products} of {max} products in use. \
             Upgrade the plan to add more products"
        )));
    }
    Ok(())
}

/// Check that switching to a plan with `new_max_products` keeps the current
/// catalog within bounds.
pub fn check_plan_change(active_products: i64, new_max_products: i32) -> Result<(), CoreError> {
    if active_products > i64::from(new_max_products) {
        return Err(CoreError::Conflict(format!(
            "The store has {active_products} active products but the selected plan allows \
             {new_max_products}. Deactivate products before downgrading"
        )));
    }
    Ok(())
}

/// Validate plan fields supplied by a SuperAdmin.
pub fn validate_plan(name: &str, max_products: i32, monthly_price: Decimal) -> Result<(), CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Plan name must not be empty".into()));
    }
    if name.chars().count() > MAX_PLAN_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Plan name must be at most {MAX_PLAN_NAME_LEN} characters"
        )));
    }
    if max_products < 1 {
        return Err(CoreError::Validation(
            "max_products must be at least 1".into(),
        ));
    }
    if monthly_price.is_sign_negative() {
        return Err(CoreError::Validation(
            "monthly_price must not be negative".into(),
        ));
    }
    Ok(())
}
