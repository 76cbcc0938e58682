//! Catalog field rules for categories and products.

use rust_decimal::Decimal;

use crate::error::CoreError;

pub const MAX_PRODUCT_NAME_LEN: usize = 200;
pub const MAX_CATEGORY_NAME_LEN: usize = 80;

fn check_name(kind: &str, name: &str, max: usize) -> Result<(), CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(format!("{kind} name must not be empty")));
    }
    if name.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{kind} name must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    check_name("Category", name, MAX_CATEGORY_NAME_LEN)
}

pub fn validate_product_name(name: &str) -> Result<(), CoreError> {
    check_name("Product", name, MAX_PRODUCT_NAME_LEN)
}

pub fn validate_price(price: Decimal) -> Result<(), CoreError> {
    if price.is_sign_negative() {
        return Err(CoreError::Validation("Price must not be negative".into()));
    }
    if price.scale() > 2 && price != price.round_dp(2) {
        return Err(CoreError::Validation(
            "Price must have at most two decimal places".into(),
        ));
    }
    Ok(())
}

pub fn validate_stock(stock: i32) -> Result<(), CoreError> {
    if stock < 0 {
        return Err(CoreError::Validation("Stock must not be negative".into()));
    }
    Ok(())
}

/// Validate the optional fields of a product update; `None` means unchanged.
pub fn validate_product_update(
    name: Option<&str>,
    price: Option<Decimal>,
    stock: Option<i32>,
) -> Result<(), CoreError> {
    if let Some(name) = name {
        validate_product_name(name)?;
    }
    if let Some(price) = price {
        validate_price(price)?;
    }
    if let Some(stock) = stock {
        validate_stock(stock)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn product_fields() {
        assert!(validate_product_name("Yerba 1kg").is_ok());
        assert!(validate_product_name(" ").is_err());
        assert!(validate_price(Decimal::new(1999, 2)).is_ok());
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert_matches!(validate_price(Decimal::new(-1, 0)), Err(CoreError::Validation(_)));
        assert!(validate_price(Decimal::new(19999, 3)).is_err());
        assert!(validate_price(Decimal::new(19990, 3)).is_ok());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn update_checks_only_present_fields() {
        assert!(validate_product_update(None, None, None).is_ok());
        assert!(validate_product_update(Some("Mate"), Some(Decimal::ONE), Some(3)).is_ok());
        assert!(validate_product_update(None, None, Some(-3)).is_err());
    }

    #[test]
    fn category_name_length() {
        assert!(validate_category_name("Bebidas").is_ok());
        assert!(validate_category_name(&"c".repeat(81)).is_err());
    }
}
