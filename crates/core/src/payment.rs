//! Payment-return and payment-notification handling.
//!
//! The payment provider redirects the buyer back with a `status` query
//! parameter and, separately, posts a signed notification. Only the signed
//! notification changes order state; the return redirect just picks the
//! page to show.

use serde::{Deserialize, Serialize};

use crate::status::OrderStatus;

pub const SUCCESS_PATH: &str = "/pago/exito";
pub const PENDING_PATH: &str = "/pago/pendiente";
pub const FAILURE_PATH: &str = "/pago/error";

/// Which result page the buyer lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Success,
    Pending,
    Failure,
}

impl PaymentOutcome {
    pub fn redirect_path(self) -> &'static str {
        match self {
            PaymentOutcome::Success => SUCCESS_PATH,
            PaymentOutcome::Pending => PENDING_PATH,
            PaymentOutcome::Failure => FAILURE_PATH,
        }
    }
}

/// Map a provider return `status` to the page outcome.
///
/// `approved` is success, `pending` / `in_process` are pending, anything
/// else (including a missing status) is a failure.
pub fn resolve_payment_return(status: Option<&str>) -> PaymentOutcome {
    match status.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("approved") => PaymentOutcome::Success,
        Some("pending" | "in_process") => PaymentOutcome::Pending,
        _ => PaymentOutcome::Failure,
    }
}

/// Order status a verified notification should move a pending order into.
///
/// Only an approved payment moves the order; other statuses are recorded but
/// leave the order pending so the buyer can retry.
pub fn order_status_for_notification(status: &str) -> Option<OrderStatus> {
    match resolve_payment_return(Some(status)) {
        PaymentOutcome::Success => Some(OrderStatus::Paid),
        PaymentOutcome::Pending | PaymentOutcome::Failure => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approved_goes_to_success_page() {
        let outcome = resolve_payment_return(Some("approved"));
        assert_eq!(outcome, PaymentOutcome::Success);
        assert_eq!(outcome.redirect_path(), "/pago/exito");
    }

    #[test]
    fn pending_goes_to_pending_page() {
        assert_eq!(resolve_payment_return(Some("pending")), PaymentOutcome::Pending);
        assert_eq!(resolve_payment_return(Some("in_process")), PaymentOutcome::Pending);
        assert_eq!(PaymentOutcome::Pending.redirect_path(), "/pago/pendiente");
    }

    #[test]
    fn everything_else_is_failure() {
        for status in [Some("rejected"), Some("cancelled"), Some(""), Some("null"), None] {
            assert_eq!(resolve_payment_return(status), PaymentOutcome::Failure);
        }
        assert_eq!(PaymentOutcome::Failure.redirect_path(), "/pago/error");
    }

    #[test]
    fn status_matching_ignores_case_and_whitespace() {
        assert_eq!(resolve_payment_return(Some(" APPROVED ")), PaymentOutcome::Success);
    }

    #[test]
    fn only_approved_notifications_mark_paid() {
        assert_eq!(order_status_for_notification("approved"), Some(OrderStatus::Paid));
        assert_eq!(order_status_for_notification("pending"), None);
        assert_eq!(order_status_for_notification("rejected"), None);
    }
}
