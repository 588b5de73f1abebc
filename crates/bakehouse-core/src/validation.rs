//! # Validation Module
//!
//! Input validation utilities for Bakehouse.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (apps/api)                                       │
//! │  ├── Type validation (JSON deserialization)                             │
//! │  └── THIS MODULE: Business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Billing engine (bakehouse-core::billing)                      │
//! │  └── Rejects negative prices, out-of-range discounts, empty bills       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bakehouse_core::validation::{validate_name, validate_positive_quantity};
//!
//! assert!(validate_name("name", "Sourdough").is_ok());
//! assert!(validate_positive_quantity("totalQuantity", 0.0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Percentage;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted display name for inventory items and products.
pub const MAX_NAME_LENGTH: usize = 200;

/// Most units of one product a single bill line may carry.
pub const MAX_LINE_QUANTITY: i64 = 10_000;

/// Highest accepted markup or discount, in percent.
pub const MAX_PERCENTAGE: u32 = 10_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (inventory item, product).
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_NAME_LENGTH`] characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a fractional quantity (stock amount, recipe amount, weight).
///
/// ## Rules
/// - Must be a finite number greater than zero
pub fn validate_positive_quantity(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a bill line quantity.
///
/// ## Rules
/// - Between 1 and [`MAX_LINE_QUANTITY`]
///
/// Quantities of zero or below mean "remove the line" and are handled by
/// the billing engine before this check.
pub fn validate_line_quantity(field: &str, quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an amount that must be strictly positive (inventory cost).
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an amount that may be zero but not negative (prices, flat costs).
///
/// ## Example
/// ```rust
/// use bakehouse_core::money::Money;
/// use bakehouse_core::validation::validate_non_negative_amount;
///
/// assert!(validate_non_negative_amount("price", Money::from_cents(0)).is_ok());
/// assert!(validate_non_negative_amount("price", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_non_negative_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Converts a client-supplied percent value into a [`Percentage`].
///
/// ## Rules
/// - Must be finite and not negative
/// - At most [`MAX_PERCENTAGE`]
/// - Precision beyond 0.01% is rounded away
pub fn parse_percentage(field: &str, value: f64) -> ValidationResult<Percentage> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a number".to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if value > MAX_PERCENTAGE as f64 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PERCENTAGE as i64,
        });
    }

    Ok(Percentage::from_percentage(value))
}

/// Validates a discount.
///
/// ## Rules
/// - Must be between 0% and 100% (0-10000 bps)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Billing: Set Discount                                                  │
/// │                                                                         │
/// │  User enters discount: 110                                              │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_discount(11000 bps) ← THIS FUNCTION                           │
/// │       │                                                                 │
/// │       ├── > 100%? → Error: "discount must be between 0 and 100"         │
/// │       │                                                                 │
/// │       └── OK → Draft discount updated, totals recomputed                │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_discount(discount: Percentage) -> ValidationResult<()> {
    if discount.bps() > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that a list has at least one entry.
pub fn validate_not_empty<T>(field: &str, items: &[T]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use bakehouse_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
