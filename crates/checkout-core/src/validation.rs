//! # Validation Module
//!
//! Input validation for product codes and pricing rules.
//!
//! Validation runs once, when a `Product` or `PricingRule` is constructed.
//! Everything downstream (catalog, session, pricing) takes the validated
//! types, so there is no "null product" or "zero price" path past this point.
//!
//! ## Usage
//! ```rust
//! use checkout_core::money::Money;
//! use checkout_core::validation::{validate_price, validate_product_code};
//!
//! validate_product_code("COKE-330").unwrap();
//! validate_price("unit price", Money::from_cents(125)).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_PRICE_CENTS, MAX_PRODUCT_CODE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use checkout_core::validation::validate_product_code;
///
/// assert!(validate_product_code("A").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "product code".to_string(),
        });
    }

    if code.len() > MAX_PRODUCT_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "product code".to_string(),
            max: MAX_PRODUCT_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "product code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit or bundle price.
///
/// ## Rules
/// - Must be strictly positive (a zero price is a data-entry mistake)
/// - Must not exceed `MAX_PRICE_CENTS`
pub fn validate_price(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if amount.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a bundle size. One means "no volume discount".
pub fn validate_volume_size(size: u32) -> ValidationResult<()> {
    if size == 0 {
        return Err(ValidationError::MustBePositive {
            field: "volume size".to_string(),
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
    fn test_validate_product_code() {
        assert!(validate_product_code("A").is_ok());
        assert!(validate_product_code("COKE-330").is_ok());
        assert!(validate_product_code("product_1").is_ok());

        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"A".repeat(51)).is_err());
        assert!(validate_product_code(&"A".repeat(50)).is_ok());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("unit price", Money::from_cents(1)).is_ok());
        assert_eq!(
            validate_price("unit price", Money::zero()),
            Err(ValidationError::MustBePositive {
                field: "unit price".to_string()
            })
        );
        assert!(validate_price("volume price", Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_price_upper_bound() {
        assert!(validate_price("unit price", Money::from_cents(MAX_PRICE_CENTS)).is_ok());
        assert_eq!(
            validate_price("volume price", Money::from_cents(i64::MAX / 2)),
            Err(ValidationError::OutOfRange {
                field: "volume price".to_string(),
                min: 1,
                max: MAX_PRICE_CENTS,
            })
        );
    }

    #[test]
    fn test_validate_volume_size() {
        assert!(validate_volume_size(1).is_ok());
        assert!(validate_volume_size(6).is_ok());
        assert!(validate_volume_size(0).is_err());
    }
}
