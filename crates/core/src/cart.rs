//! Cart quantity rules and totals.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;
use crate::order::PricedLine;

/// Maximum units of one product per cart line.
pub const MAX_LINE_QUANTITY: i32 = 99;

/// Validate a requested line quantity against the per-line cap and the
/// product's available stock.
pub fn validate_quantity(quantity: i32, available_stock: i32) -> Result<(), CoreError> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(CoreError::Validation(format!(
            "Quantity must be between 1 and {MAX_LINE_QUANTITY}"
        )));
    }
    if quantity > available_stock {
        return Err(CoreError::Conflict(format!(
            "Only {} units in stock",
            available_stock.max(0)
        )));
    }
    Ok(())
}

/// Validate the units requested by a single add-to-cart call. Checked before
/// merging so a negative amount cannot shrink an existing line.
pub fn validate_added_quantity(quantity: i32) -> Result<(), CoreError> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(CoreError::Validation(format!(
            "Quantity must be between 1 and {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(())
}

/// Quantity after adding `extra` units to an existing line (saturating so an
/// overflow surfaces as a validation error instead of wrapping).
pub fn merged_quantity(existing: i32, extra: i32) -> i32 {
    existing.saturating_add(extra)
}

/// Cart total: the sum of every line subtotal.
pub fn cart_total(lines: &[PricedLine]) -> Decimal {
    lines.iter().map(PricedLine::subtotal).sum()
}

/// Totals block returned with a cart listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub item_count: i64,
    pub total: Decimal,
}

pub fn summarize(lines: &[PricedLine]) -> CartSummary {
    CartSummary {
        item_count: lines.iter().map(|l| i64::from(l.quantity)).sum(),
        total: cart_total(lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn line(price: &str, quantity: i32) -> PricedLine {
        PricedLine {
            unit_price: price.parse().unwrap(),
            quantity,
        }
    }

    #[test]
    fn total_is_sum_of_subtotals() {
        let lines = [line("19.99", 1), line("5.00", 3), line("0.01", 10)];
        let expected: Decimal = lines.iter().map(|l| l.subtotal()).sum();
        assert_eq!(cart_total(&lines), expected);
        assert_eq!(cart_total(&lines), "35.09".parse::<Decimal>().unwrap());
    }

    #[test]
    fn empty_cart_totals_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn summary_counts_units() {
        let summary = summarize(&[line("2", 2), line("3", 5)]);
        assert_eq!(summary.item_count, 7);
        assert_eq!(summary.total, Decimal::from(19));
    }

    #[test]
    fn quantity_bounds() {
        assert!(validate_quantity(1, 10).is_ok());
        assert!(validate_quantity(10, 10).is_ok());
        assert_matches!(validate_quantity(0, 10), Err(CoreError::Validation(_)));
        assert_matches!(validate_quantity(100, 500), Err(CoreError::Validation(_)));
    }

    #[test]
    fn quantity_cannot_exceed_stock() {
        assert_matches!(
            validate_quantity(4, 3),
            Err(CoreError::Conflict(msg)) if msg.contains("Only 3 units")
        );
        assert_matches!(
            validate_quantity(1, -2),
            Err(CoreError::Conflict(msg)) if msg.contains("Only 0 units")
        );
    }

    #[test]
    fn added_quantity_must_be_positive() {
        assert!(validate_added_quantity(1).is_ok());
        assert!(validate_added_quantity(MAX_LINE_QUANTITY).is_ok());
        assert_matches!(validate_added_quantity(0), Err(CoreError::Validation(_)));
        assert_matches!(validate_added_quantity(-3), Err(CoreError::Validation(_)));
        assert_matches!(validate_added_quantity(100), Err(CoreError::Validation(_)));
    }

    #[test]
    fn merge_saturates() {
        assert_eq!(merged_quantity(2, 3), 5);
        assert_eq!(merged_quantity(i32::MAX, 1), i32::MAX);
    }
}
