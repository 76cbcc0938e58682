//! Repository for the `subscription_plans` table.

use sqlx::PgPool;
use tiendas_core::types::DbId;

use crate::models::plan::{CreatePlan, SubscriptionPlan, UpdatePlan};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, max_products, monthly_price, is_active, created_at, updated_at";

/// Provides CRUD operations for subscription plans.
pub struct PlanRepo;

impl PlanRepo {
    /// Insert a new plan, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePlan) -> Result<SubscriptionPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscription_plans (name, description, max_products, monthly_price)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.max_products)
            .bind(input.monthly_price)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SubscriptionPlan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscription_plans WHERE id = $1");
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List plans ordered by price. Inactive plans are only included on request.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<SubscriptionPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscription_plans
             WHERE is_active = true OR $1
             ORDER BY monthly_price ASC, id ASC"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a plan. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlan,
    ) -> Result<Option<SubscriptionPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE subscription_plans SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                max_products = COALESCE($4, max_products),
                monthly_price = COALESCE($5, monthly_price),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.max_products)
            .bind(input.monthly_price)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Retire a plan so no new store can pick it. Existing subscribers keep it.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE subscription_plans SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
