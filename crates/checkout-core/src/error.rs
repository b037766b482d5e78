//! # Error Types
//!
//! Domain-specific error types for checkout-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  checkout-core errors (this file)                                      │
//! │  ├── CoreError        - Scan / totaling failures                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  checkout-store errors (separate crate)                                │
//! │  └── StoreError       - Config, terminal task failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → Log output           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Severity
//! | Variant                 | Caller reaction                        |
//! |-------------------------|----------------------------------------|
//! | `ProductNotFound`       | Log it, keep scanning the basket       |
//! | `CatalogInconsistency`  | Abort the checkout, internal bug       |
//! | `Validation`            | Programming error at the call site     |

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product has no pricing rule in the catalog.
    ///
    /// ## When This Occurs
    /// - Cashier scans an item the manager never registered
    /// - Item was deregistered (e.g. sold out) before it was scanned
    ///
    /// ## User Workflow
    /// ```text
    /// scan("X-99")
    ///      │
    ///      ▼
    /// catalog.lookup → None
    ///      │
    ///      ▼
    /// ProductNotFound("X-99")
    ///      │
    ///      ▼
    /// Terminal logs "get manager to help", continues with next item
    /// ```
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A product sitting in the cart lost its pricing rule before totaling.
    ///
    /// Scanned products are expected to stay registered until checkout
    /// completes, so this means the catalog and the cart disagree.
    #[error("Catalog inconsistency: scanned product {0} has no pricing rule")]
    CatalogInconsistency(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true if the caller can log the error and carry on with the
    /// rest of the basket.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CoreError::ProductNotFound(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when a value is constructed, never later. A `Product` or
/// `PricingRule` that exists is always valid.
#[derive(Debug, Error, PartialEq, Eq)]
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

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. bad characters, bad decimal amount).
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
