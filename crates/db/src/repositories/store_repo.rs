//! Repository for the `stores` table.

use sqlx::{PgPool, Postgres, Transaction};
use tiendas_core::error::CoreError;
use tiendas_core::status::{StatusId, StoreStatus};
use tiendas_core::store::{check_status_transition, StatusActor};
use tiendas_core::subscription::check_plan_change;
use tiendas_core::types::DbId;

use crate::error::RepoError;
use crate::models::store::{CreateStore, Store, UpdateStore};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, plan_id, name, subdomain, description, logo_url, status_id, \
                       shipping_origin_zip, shipping_cost, payment_access_token, \
                       payment_public_key, created_at, updated_at";

/// Provides CRUD and lifecycle operations for stores.
pub struct StoreRepo;

impl StoreRepo {
    /// Create a store owned by `owner_id` and attach the owner to it.
    ///
    /// Runs in one transaction: the owner row is locked first so an owner can
    /// never end up with two stores.
    pub async fn create_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateStore,
    ) -> Result<Store, RepoError> {
        let mut tx = pool.begin().await?;

        let owner: Option<(Option<DbId>,)> =
            sqlx::query_as("SELECT store_id FROM users WHERE id = $1 FOR UPDATE")
                .bind(owner_id)
                .fetch_optional(&mut *tx)
                .await?;
        match owner {
            None => {
                return Err(CoreError::NotFound {
                    entity: "User",
                    id: owner_id,
                }
                .into())
            }
            Some((Some(_),)) => {
                return Err(CoreError::Conflict("This account already has a store".into()).into())
            }
            Some((None,)) => {}
        }

        let query = format!(
            "INSERT INTO stores (owner_id, name, subdomain, description, shipping_cost)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0))
             RETURNING {COLUMNS}"
        );
        let store = sqlx::query_as::<_, Store>(&query)
            .bind(owner_id)
            .bind(input.name.trim())
            .bind(&input.subdomain)
            .bind(&input.description)
            .bind(input.shipping_cost)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET store_id = $2 WHERE id = $1")
            .bind(owner_id)
            .bind(store.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(store)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Store>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE id = $1");
        sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a store by its (already normalized) subdomain.
    pub async fn find_by_subdomain(
        pool: &PgPool,
        subdomain: &str,
    ) -> Result<Option<Store>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE subdomain = $1");
        sqlx::query_as::<_, Store>(&query)
            .bind(subdomain)
            .fetch_optional(pool)
            .await
    }

    /// List all stores, optionally restricted to one status.
    pub async fn list(
        pool: &PgPool,
        status: Option<StoreStatus>,
    ) -> Result<Vec<Store>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stores
             WHERE ($1::SMALLINT IS NULL OR status_id = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Store>(&query)
            .bind(status.map(StatusId::from))
            .fetch_all(pool)
            .await
    }

    /// Update a store. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStore,
    ) -> Result<Option<Store>, sqlx::Error> {
        let query = format!(
            "UPDATE stores SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                logo_url = COALESCE($4, logo_url),
                shipping_origin_zip = COALESCE($5, shipping_origin_zip),
                shipping_cost = COALESCE($6, shipping_cost),
                payment_access_token = COALESCE($7, payment_access_token),
                payment_public_key = COALESCE($8, payment_public_key)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.logo_url)
            .bind(&input.shipping_origin_zip)
            .bind(input.shipping_cost)
            .bind(&input.payment_access_token)
            .bind(&input.payment_public_key)
            .fetch_optional(pool)
            .await
    }

    /// Move a store to a new lifecycle status.
    ///
    /// The row is locked while the transition is validated.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        to: StoreStatus,
        actor: StatusActor,
    ) -> Result<Store, RepoError> {
        let mut tx = pool.begin().await?;
        let store = Self::lock(&mut tx, id).await?;

        let from = StoreStatus::from_id(store.status_id)?;
        check_status_transition(from, to, store.plan_id.is_some(), actor)?;

        let query = format!("UPDATE stores SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let updated = sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .bind(to.id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Subscribe the store to another plan.
    ///
    /// The plan must be active and large enough for the products the store
    /// already has active.
    pub async fn change_plan(
        pool: &PgPool,
        id: DbId,
        plan_id: DbId,
    ) -> Result<Store, RepoError> {
        let mut tx = pool.begin().await?;
        let store = Self::lock(&mut tx, id).await?;

        let plan: Option<(i32, bool)> =
            sqlx::query_as("SELECT max_products, is_active FROM subscription_plans WHERE id = $1")
                .bind(plan_id)
                .fetch_optional(&mut *tx)
                .await?;
        let max_products = match plan {
            Some((max, true)) => max,
            _ => {
                return Err(CoreError::NotFound {
                    entity: "SubscriptionPlan",
                    id: plan_id,
                }
                .into())
            }
        };
        if store.plan_id == Some(plan_id) {
            return Err(CoreError::Conflict("The store is already on this plan".into()).into());
        }

        let active = count_active_products(&mut tx, id).await?;
        check_plan_change(active, max_products)?;

        let query = format!("UPDATE stores SET plan_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let updated = sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .bind(plan_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Number of active products in a store's catalog.
    pub async fn active_product_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM products WHERE store_id = $1 AND is_active = true",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    async fn lock(tx: &mut Transaction<'_, Postgres>, id: DbId) -> Result<Store, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Store",
                    id,
                }
                .into()
            })
    }
}

/// Count active products inside an open transaction.
pub(crate) async fn count_active_products(
    tx: &mut Transaction<'_, Postgres>,
    store_id: DbId,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM products WHERE store_id = $1 AND is_active = true")
            .bind(store_id)
            .fetch_one(&mut **tx)
            .await?;
    Ok(row.0)
}
