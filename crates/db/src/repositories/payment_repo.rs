//! Repository for the `payment_notifications` log.

use sqlx::PgPool;
use tiendas_core::order::check_transition;
use tiendas_core::payment::order_status_for_notification;
use tiendas_core::types::DbId;

use crate::error::RepoError;
use crate::repositories::order_repo::lock_status;

/// What happened to a verified provider notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The order moved to a new status.
    Applied,
    /// Logged; the order was left as it was.
    Recorded,
    /// The event id was seen before. Nothing changed.
    Duplicate,
}

pub struct PaymentRepo;

impl PaymentRepo {
    /// Record a provider notification and apply it to its order.
    ///
    /// Idempotent on `provider_event_id`. An approved payment moves a
    /// pending order to paid and stores the provider's reference; anything
    /// else, or an order that already left pending, is only logged.
    pub async fn record_notification(
        pool: &PgPool,
        provider_event_id: &str,
        order_id: DbId,
        status: &str,
        payment_reference: Option<&str>,
    ) -> Result<NotificationOutcome, RepoError> {
        let mut tx = pool.begin().await?;

        let current = lock_status(&mut tx, order_id).await?;

        let inserted: Option<(DbId,)> = sqlx::query_as(
            "INSERT INTO payment_notifications (provider_event_id, order_id, status)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_payment_notifications_provider_event_id DO NOTHING
             RETURNING id",
        )
        .bind(provider_event_id)
        .bind(order_id)
        .bind(status)
        .fetch_optional(&mut *tx)
        .await?;
        if inserted.is_none() {
            tracing::debug!(provider_event_id, order_id, "Duplicate payment notification");
            tx.rollback().await?;
            return Ok(NotificationOutcome::Duplicate);
        }

        let outcome = match order_status_for_notification(status) {
            Some(target) if check_transition(current, target).is_ok() => {
                sqlx::query(
                    "UPDATE orders SET status_id = $2, payment_reference = COALESCE($3, payment_reference)
                     WHERE id = $1",
                )
                .bind(order_id)
                .bind(target.id())
                .bind(payment_reference)
                .execute(&mut *tx)
                .await?;
                NotificationOutcome::Applied
            }
            _ => NotificationOutcome::Recorded,
        };

        tx.commit().await?;
        tracing::info!(order_id, status, ?outcome, "Payment notification recorded");
        Ok(outcome)
    }
}
