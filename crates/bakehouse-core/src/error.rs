//! # Error Types
//!
//! Domain-specific error types for bakehouse-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bakehouse-core errors (this file)                                      │
//! │  ├── CoreError        - Billing and recipe rule violations              │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  bakehouse-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  HTTP errors (apps/api)                                                 │
//! │  └── ApiError         - What clients see ({code, message} JSON)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Client                  │
//! │        sqlx::Error     → DbError   → ApiError → Client                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A bill was committed with no line items.
    ///
    /// ## User Workflow
    /// ```text
    /// Draft (items: [])
    ///      │
    ///      ▼
    /// finalize() ──► EmptyBill
    ///      │
    ///      ▼
    /// Nothing is persisted, the draft stays as it was
    /// ```
    #[error("Cannot create a bill without items")]
    EmptyBill,

    /// Recipe references an inventory item the tenant does not have.
    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    /// Additional cost referenced by id is not on the draft.
    #[error("Additional cost not found: {0}")]
    AdditionalCostNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be below zero.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A collection that needs at least one entry is empty.
    #[error("{field} must have at least one entry")]
    Empty { field: String },

    /// A collection lists the same key twice.
    #[error("{field} lists {value} more than once")]
    Duplicate { field: String, value: String },

    /// A derived amount does not fit in the money representation.
    #[error("{field} is too large")]
    TooLarge { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
