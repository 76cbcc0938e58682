//! Order state machine and server-side order totals.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;
use crate::roles::Role;
use crate::status::OrderStatus;

/// Anything that carries an order status (rows, summaries, DTOs).
pub trait HasOrderStatus {
    fn order_status(&self) -> OrderStatus;
}

/// Keep only the orders in `status`. `None` keeps everything.
pub fn filter_by_status<T: HasOrderStatus>(orders: Vec<T>, status: Option<OrderStatus>) -> Vec<T> {
    match status {
        Some(wanted) => orders
            .into_iter()
            .filter(|o| o.order_status() == wanted)
            .collect(),
        None => orders,
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Statuses reachable from `from`.
///
/// ```text
/// Pendiente  -> Pagado, Procesando, Cancelado
/// Pagado     -> Procesando, Cancelado
/// Procesando -> Enviado, Cancelado
/// Enviado    -> Entregado
/// Entregado, Cancelado: terminal
/// ```
pub fn allowed_transitions(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match from {
        Pending => &[Paid, Processing, Cancelled],
        Paid => &[Processing, Cancelled],
        Processing => &[Shipped, Cancelled],
        Shipped => &[Delivered],
        Delivered | Cancelled => &[],
    }
}

pub fn is_terminal(status: OrderStatus) -> bool {
    allowed_transitions(status).is_empty()
}

/// Validate that `from -> to` is an edge of the state machine.
pub fn check_transition(from: OrderStatus, to: OrderStatus) -> Result<(), CoreError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot change order status from {from} to {to}"
        )))
    }
}

/// Validate that `role` may drive the order into `to`.
///
/// Customers may only cancel an order that is still pending; warehouse staff
/// handle fulfillment; only the payment flow (or an admin reconciling by
/// hand) marks an order paid.
pub fn check_transition_permission(
    role: Role,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<(), CoreError> {
    use OrderStatus::*;
    let permitted = match role {
        Role::SuperAdmin | Role::Admin => true,
        Role::Deposito => matches!(to, Processing | Shipped | Delivered),
        Role::Cliente => to == Cancelled && from == Pending,
    };
    if permitted {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role {role} cannot move an order from {from} to {to}"
        )))
    }
}

/// Whether entering `to` returns reserved stock to the catalog.
pub fn restores_stock(to: OrderStatus) -> bool {
    to == OrderStatus::Cancelled
}

/// Validate the shipping block supplied at checkout. Every field is required.
pub fn validate_shipping(name: &str, address: &str, city: &str, zip: &str) -> Result<(), CoreError> {
    for (field, value) in [("name", name), ("address", address), ("city", city), ("zip", zip)] {
        if value.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Shipping {field} must not be empty"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// A priced order line used for total computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl PricedLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Server-computed order amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub item_count: i32,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
}

/// Compute item count, subtotal and total for a set of lines.
///
/// Rejects an empty order and non-positive quantities.
pub fn compute_totals(lines: &[PricedLine], shipping_cost: Decimal) -> Result<OrderTotals, CoreError> {
    if lines.is_empty() {
        return Err(CoreError::Validation("An order needs at least one item".into()));
    }
    if shipping_cost.is_sign_negative() {
        return Err(CoreError::Validation("Shipping cost must not be negative".into()));
    }

    let mut item_count: i32 = 0;
    let mut subtotal = Decimal::ZERO;
    for line in lines {
        if line.quantity <= 0 {
            return Err(CoreError::Validation(
                "Item quantities must be positive".into(),
            ));
        }
        item_count = item_count
            .checked_add(line.quantity)
            .ok_or_else(|| CoreError::Validation("Too many items in one order".into()))?;
        subtotal += line.subtotal();
    }

    Ok(OrderTotals {
        item_count,
        subtotal,
        shipping_cost,
        total: subtotal + shipping_cost,
    })
}
