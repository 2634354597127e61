//! # Validation Module
//!
//! Field checks applied to fixture rows before they are inserted.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CSV decoding (fixtures.rs)                                   │
//! │  ├── Column count, integer/float/date parsing                          │
//! │  └── NULL sentinel → None                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required text present, column lengths                             │
//! │  └── Ranges (model year, discount, quantities)                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Referential integrity is never checked here: that is SQLite's job.
//!
//! ## Usage
//! ```rust
//! use bikeshop_core::validation::{validate_discount, validate_required};
//!
//! validate_required("brand_name", "Trek", 255).unwrap();
//! assert!(validate_required("brand_name", "  ", 255).is_err());
//! assert!(validate_discount(1.5).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{Brand, Category, NewCustomer, NewStore, OrderItem, Product, Staff, Stock};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Earliest model year accepted for a product.
pub const MIN_MODEL_YEAR: i64 = 1900;

/// Latest model year accepted for a product.
pub const MAX_MODEL_YEAR: i64 = 2100;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a NOT NULL text column.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must fit in `max` characters
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    validate_length(field, value, max)
}

/// Validates a nullable text column. `None` is always accepted.
pub fn validate_optional(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(value) => validate_length(field, value, max),
        None => Ok(()),
    }
}

fn validate_length(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates a count (stock or ordered quantity).
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a price. Must be finite and not negative.
pub fn validate_price(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a line discount, a fraction in `[0, 1]`.
///
/// ## Example
/// ```rust
/// use bikeshop_core::validation::validate_discount;
///
/// assert!(validate_discount(0.0).is_ok());
/// assert!(validate_discount(0.2).is_ok());
/// assert!(validate_discount(-0.1).is_err());
/// ```
pub fn validate_discount(discount: f64) -> ValidationResult<()> {
    if !(0.0..=1.0).contains(&discount) {
        return Err(ValidationError::FractionOutOfRange {
            field: "discount".to_string(),
            min: 0.0,
            max: 1.0,
            value: discount,
        });
    }
    Ok(())
}

/// Validates a product model year.
pub fn validate_model_year(year: i64) -> ValidationResult<()> {
    if !(MIN_MODEL_YEAR..=MAX_MODEL_YEAR).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field: "model_year".to_string(),
            min: MIN_MODEL_YEAR,
            max: MAX_MODEL_YEAR,
        });
    }
    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================
// Column limits mirror the VARCHAR sizes in 001_initial_schema.sql.

pub fn validate_category(category: &Category) -> ValidationResult<()> {
    validate_required("category_name", &category.category_name, 255)
}

pub fn validate_brand(brand: &Brand) -> ValidationResult<()> {
    validate_required("brand_name", &brand.brand_name, 255)
}

pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_required("product_name", &product.product_name, 255)?;
    validate_model_year(product.model_year)?;
    validate_price("list_price", product.list_price)
}

pub fn validate_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_required("first_name", &customer.first_name, 255)?;
    validate_required("last_name", &customer.last_name, 255)?;
    validate_required("email", &customer.email, 255)?;
    validate_optional("phone", customer.phone.as_deref(), 25)?;
    validate_optional("street", customer.street.as_deref(), 255)?;
    validate_optional("city", customer.city.as_deref(), 50)?;
    validate_optional("state", customer.state.as_deref(), 25)?;
    validate_optional("zip_code", customer.zip_code.as_deref(), 5)
}

pub fn validate_store(store: &NewStore) -> ValidationResult<()> {
    validate_required("store_name", &store.store_name, 255)?;
    validate_optional("phone", store.phone.as_deref(), 25)?;
    validate_optional("email", store.email.as_deref(), 255)?;
    validate_optional("street", store.street.as_deref(), 255)?;
    validate_optional("city", store.city.as_deref(), 255)?;
    validate_optional("state", store.state.as_deref(), 10)?;
    validate_optional("zip_code", store.zip_code.as_deref(), 5)
}

pub fn validate_staff(staff: &Staff) -> ValidationResult<()> {
    validate_required("first_name", &staff.first_name, 50)?;
    validate_required("last_name", &staff.last_name, 50)?;
    validate_required("email", &staff.email, 255)?;
    validate_optional("phone", staff.phone.as_deref(), 25)
}

pub fn validate_order_item(item: &OrderItem) -> ValidationResult<()> {
    validate_non_negative("quantity", item.quantity)?;
    validate_price("list_price", item.list_price)?;
    validate_discount(item.discount)
}

pub fn validate_stock(stock: &Stock) -> ValidationResult<()> {
    match stock.quantity {
        Some(quantity) => validate_non_negative("quantity", quantity),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, year: i64, price: f64) -> Product {
        Product {
            product_id: 1,
            product_name: name.to_string(),
            brand_id: 9,
            category_id: 6,
            model_year: year,
            list_price: price,
        }
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("first_name", "Debra", 255).is_ok());
        assert_eq!(
            validate_required("first_name", "", 255),
            Err(ValidationError::Required {
                field: "first_name".to_string()
            })
        );
        assert!(validate_required("first_name", &"x".repeat(51), 50).is_err());
    }

    #[test]
    fn test_validate_optional_accepts_none() {
        assert!(validate_optional("phone", None, 25).is_ok());
        assert!(validate_optional("zip_code", Some("95060"), 5).is_ok());
        assert!(validate_optional("zip_code", Some("950601"), 5).is_err());
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&product("Trek 820 - 2016", 2016, 379.99)).is_ok());
        assert!(validate_product(&product("", 2016, 379.99)).is_err());
        assert!(validate_product(&product("Trek 820 - 2016", 16, 379.99)).is_err());
        assert!(validate_product(&product("Trek 820 - 2016", 2016, -1.0)).is_err());
        assert!(validate_product(&product("Trek 820 - 2016", 2016, f64::NAN)).is_err());
    }

    #[test]
    fn test_validate_order_item() {
        let mut item = OrderItem {
            order_id: 1,
            item_id: 1,
            product_id: 20,
            quantity: 1,
            list_price: 599.99,
            discount: 0.2,
        };
        assert!(validate_order_item(&item).is_ok());

        item.discount = 1.2;
        assert!(matches!(
            validate_order_item(&item),
            Err(ValidationError::FractionOutOfRange { .. })
        ));

        item.discount = 0.0;
        item.quantity = -1;
        assert!(matches!(
            validate_order_item(&item),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_stock_allows_unknown_quantity() {
        let stock = Stock {
            store_id: 1,
            product_id: 1,
            quantity: None,
        };
        assert!(validate_stock(&stock).is_ok());
    }
}
