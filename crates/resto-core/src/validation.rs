//! # Validation Module
//!
//! Input validation for Resto.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Kiosk commands                                                │
//! │  ├── Argument parsing (clap, serde)                                     │
//! │  └── Catalog checks (item exists, in stock, takeaway available)         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Customer name, menu and category names                             │
//! │  └── Non-negative amounts, non-empty carts                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL constraints                                               │
//! │  └── UNIQUE category names                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::{Money, MAX_PRICE};
use crate::order::OrderLine;
use crate::types::{MenuItem, NewMenuItem};
use crate::{MAX_CUSTOMER_NAME_LEN, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Checks a required, length-limited text field and returns it trimmed.
fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates the name an order is placed under.
///
/// ## Rules
/// - Must not be blank (whitespace only counts as blank)
/// - At most `MAX_CUSTOMER_NAME_LEN` characters after trimming
///
/// ## Example
/// ```rust
/// use resto_core::validation::validate_customer_name;
///
/// assert_eq!(validate_customer_name("  Alice ").unwrap(), "Alice");
/// assert!(validate_customer_name("").is_err());
/// assert!(validate_customer_name(" \t ").is_err());
/// ```
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    required_text("customer_name", name, MAX_CUSTOMER_NAME_LEN)
}

/// Validates a menu item name.
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    required_text("name", name, MAX_NAME_LEN)
}

/// Validates a category name.
///
/// Category names are unique and case-sensitive, so only surrounding
/// whitespace is normalised.
pub fn validate_category_name(name: &str) -> ValidationResult<String> {
    required_text("category", name, MAX_NAME_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that an amount is zero or more.
///
/// ## Example
/// ```rust
/// use resto_core::money::Money;
/// use resto_core::validation::validate_amount;
///
/// assert!(validate_amount("price", Money::zero()).is_ok());
/// assert!(validate_amount("price", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a menu price or parcel charge: zero up to [`MAX_PRICE`].
///
/// ```rust
/// use resto_core::money::{Money, MAX_PRICE};
/// use resto_core::validation::validate_price;
///
/// assert!(validate_price("price", MAX_PRICE).is_ok());
/// assert!(validate_price("price", Money::from_major_f64(1e17)).is_err());
/// ```
pub fn validate_price(field: &str, amount: Money) -> ValidationResult<()> {
    validate_amount(field, amount)?;
    if amount > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE.major(),
        });
    }
    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a menu item before insert.
pub fn validate_new_menu_item(item: &NewMenuItem) -> ValidationResult<()> {
    validate_item_name(&item.name)?;
    validate_price("price", item.price)?;
    validate_price("parcel_charge", item.parcel_charge)?;
    Ok(())
}

/// Validates a menu item before update.
pub fn validate_menu_item(item: &MenuItem) -> ValidationResult<()> {
    validate_item_name(&item.name)?;
    validate_price("price", item.price)?;
    validate_price("parcel_charge", item.parcel_charge)?;
    Ok(())
}

/// An order needs at least one line.
pub fn validate_order_lines(lines: &[OrderLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    Ok(())
}

/// Validates a staff PIN: 4 to 8 ASCII digits.
///
/// ## Example
/// ```rust
/// use resto_core::validation::validate_staff_pin;
///
/// assert!(validate_staff_pin("1234").is_ok());
/// assert!(validate_staff_pin("12").is_err());
/// assert!(validate_staff_pin("12ab").is_err());
/// ```
pub fn validate_staff_pin(pin: &str) -> ValidationResult<()> {
    if !(4..=8).contains(&pin.len()) {
        return Err(ValidationError::OutOfRange {
            field: "staff_pin length".to_string(),
            min: 4,
            max: 8,
        });
    }

    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "staff_pin".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_customer_name() {
        assert_eq!(validate_customer_name("Alice").unwrap(), "Alice");
        assert!(matches!(
            validate_customer_name(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_customer_name(&"A".repeat(MAX_CUSTOMER_NAME_LEN + 1)),
            Err(ValidationError::TooLong { .. })
        ));
        // Length counts characters, not bytes
        assert!(validate_customer_name(&"é".repeat(MAX_CUSTOMER_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_validate_category_name_keeps_case() {
        assert_eq!(validate_category_name(" Main Course ").unwrap(), "Main Course");
        assert_eq!(validate_category_name("main course").unwrap(), "main course");
        assert!(validate_category_name("   ").is_err());
    }

    #[test]
    fn test_validate_new_menu_item() {
        let ok = NewMenuItem::new("Coke", Money::from_cents(4_000), "Beverages");
        assert!(validate_new_menu_item(&ok).is_ok());

        let free = NewMenuItem::new("Water", Money::zero(), "Beverages");
        assert!(validate_new_menu_item(&free).is_ok());

        let negative = NewMenuItem::new("Coke", Money::from_cents(-1), "Beverages");
        assert!(matches!(
            validate_new_menu_item(&negative),
            Err(ValidationError::Negative { .. })
        ));

        let negative_parcel = NewMenuItem::new("Coke", Money::from_cents(4_000), "Beverages")
            .with_parcel_charge(Money::from_cents(-500));
        assert!(validate_new_menu_item(&negative_parcel).is_err());

        let unnamed = NewMenuItem::new(" ", Money::from_cents(4_000), "Beverages");
        assert!(validate_new_menu_item(&unnamed).is_err());
    }

    #[test]
    fn test_prices_are_bounded() {
        let at_limit = NewMenuItem::new("Feast", MAX_PRICE, "Main Course")
            .with_parcel_charge(MAX_PRICE);
        assert!(validate_new_menu_item(&at_limit).is_ok());

        let huge = NewMenuItem::new("Feast", Money::from_major_f64(1e17), "Main Course");
        assert!(matches!(
            validate_new_menu_item(&huge),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "price"
        ));

        let huge_parcel = NewMenuItem::new("Coke", Money::from_cents(4_000), "Beverages")
            .with_parcel_charge(MAX_PRICE + Money::from_cents(1));
        assert!(validate_new_menu_item(&huge_parcel).is_err());

        let item = MenuItem::new(1, "Coke", Money::from_major_f64(1e17), "Beverages");
        assert!(validate_menu_item(&item).is_err());

        // Totals are only checked for sign
        assert!(validate_amount("total", Money::from_major_f64(1e17)).is_ok());
    }

    #[test]
    fn test_validate_menu_item() {
        let item = MenuItem::new(1, "Coke", Money::from_cents(4_000), "Beverages");
        assert!(validate_menu_item(&item).is_ok());

        let bad = MenuItem::new(1, "", Money::from_cents(4_000), "Beverages");
        assert!(validate_menu_item(&bad).is_err());
    }

    #[test]
    fn test_validate_order_lines() {
        assert!(matches!(validate_order_lines(&[]), Err(ValidationError::EmptyCart)));
    }

    #[test]
    fn test_validate_staff_pin() {
        assert!(validate_staff_pin("0000").is_ok());
        assert!(validate_staff_pin("12345678").is_ok());
        assert!(validate_staff_pin("123456789").is_err());
        assert!(validate_staff_pin("").is_err());
    }
}
