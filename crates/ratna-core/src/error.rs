//! # Error Types
//!
//! Domain-specific error types for ratna-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ratna-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ratna-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  ratna-cli errors (in app)                                             │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → caller                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field path, SKU, ID)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Catalog item cannot be found in the caller's shop.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Sale cannot be found in the caller's shop.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Insufficient stock to add the item to a sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Sale (qty: 3)
    ///      │
    ///      ▼
    /// Check stock: available=1
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "RING-22K-001", available: 1, requested: 3 }
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Sale is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Adding items to a completed or voided sale
    /// - Finalizing a sale that has no items
    /// - Voiding an already voided sale
    #[error("Sale {sale_id} is {current_status}, cannot perform operation")]
    InvalidSaleStatus {
        sale_id: String,
        current_status: String,
    },

    /// A catalog material has no stored rate and the shop has no current
    /// metal rate for it.
    #[error("No current rate for {metal} {purity}")]
    MissingMetalRate { metal: String, purity: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a pricing request doesn't meet requirements.
/// `field` is the full path of the offending value, e.g.
/// `materialBreakdown[1].weight`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// A collection that must hold at least one element is empty.
    #[error("{field} must contain at least one entry")]
    Empty { field: String },

    /// A policy tag (making charge type, discount type) is not recognized.
    #[error("{field} '{value}' is not recognized, expected one of: {allowed:?}")]
    UnknownPolicy {
        field: String,
        value: String,
        allowed: Vec<String>,
    },
}

impl ValidationError {
    /// Returns the path of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Empty { field }
            | ValidationError::UnknownPolicy { field, .. } => field,
        }
    }
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
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "RING-22K-001".to_string(),
            available: 1,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for RING-22K-001: available 1, requested 3"
        );

        let err = CoreError::MissingMetalRate {
            metal: "GOLD".to_string(),
            purity: "22K".to_string(),
        };
        assert_eq!(err.to_string(), "No current rate for GOLD 22K");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "materialBreakdown[0].weight".to_string(),
        };
        assert_eq!(err.to_string(), "materialBreakdown[0].weight must be positive");

        let err = ValidationError::Empty {
            field: "materialBreakdown".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "materialBreakdown must contain at least one entry"
        );
    }

    #[test]
    fn test_validation_error_field() {
        let err = ValidationError::OutOfRange {
            field: "discountValue".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(err.field(), "discountValue");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
