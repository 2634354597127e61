//! # Error Types
//!
//! Domain-specific error types for bikeshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bikeshop-core errors (this file)                                      │
//! │  ├── CoreError        - Fixture record could not become an entity      │
//! │  └── ValidationError  - A single field failed a rule                   │
//! │                                                                         │
//! │  bikeshop-db errors (separate crate)                                   │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── LoadError        - Fixture loading failures                       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LoadError → CLI exit              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while turning fixture data into entities.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A fixture record failed validation.
    ///
    /// ## When This Occurs
    /// - Required text column is empty
    /// - Text longer than the column allows
    /// - Unknown order status code
    /// - Discount outside `[0, 1]`
    #[error("Invalid {entity} record: {source}")]
    InvalidRecord {
        entity: &'static str,
        #[source]
        source: ValidationError,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Wraps a validation failure with the entity it belongs to.
    pub fn invalid(entity: &'static str, source: ValidationError) -> Self {
        CoreError::InvalidRecord { entity, source }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long for its column.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Fractional value is out of range (discounts).
    #[error("{field} must be between {min} and {max}, got {value}")]
    FractionOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "product_name".to_string(),
        };
        assert_eq!(err.to_string(), "product_name is required");

        let err = ValidationError::TooLong {
            field: "zip_code".to_string(),
            max: 5,
        };
        assert_eq!(err.to_string(), "zip_code must be at most 5 characters");
    }

    #[test]
    fn test_invalid_record_names_entity() {
        let err = CoreError::invalid(
            "order",
            ValidationError::OutOfRange {
                field: "order_status".to_string(),
                min: 1,
                max: 4,
            },
        );
        assert_eq!(
            err.to_string(),
            "Invalid order record: order_status must be between 1 and 4"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Negative {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
