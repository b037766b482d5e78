//! # Domain Types
//!
//! Core domain types used throughout the checkout terminal.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │    Product      │   │    PricingRule      │   │    Receipt      │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  code           │──►│  unit_price         │──►│  lines[]        │   │
//! │  │  (identity)     │   │  volume_size        │   │  total          │   │
//! │  │                 │   │  volume_price       │   │                 │   │
//! │  └─────────────────┘   └─────────────────────┘   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both `Product` and `PricingRule` are immutable once built and validated
//! at construction, so they can be cloned across threads freely.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_price, validate_product_code, validate_volume_size, ValidationResult,
};

// =============================================================================
// Product
// =============================================================================

/// A product identity: the code printed on the shelf label / barcode.
///
/// Equality and hashing are by code alone. Serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Product {
    code: String,
}

impl Product {
    /// Creates a product from its code.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::Product;
    ///
    /// let a = Product::new("A").unwrap();
    /// assert_eq!(a.code(), "A");
    /// assert!(Product::new("").is_err());
    /// ```
    pub fn new(code: impl AsRef<str>) -> ValidationResult<Self> {
        let code = code.as_ref().trim();
        validate_product_code(code)?;
        Ok(Product {
            code: code.to_string(),
        })
    }

    /// Returns the product code.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl TryFrom<String> for Product {
    type Error = ValidationError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Product::new(code)
    }
}

impl From<Product> for String {
    fn from(product: Product) -> Self {
        product.code
    }
}

// =============================================================================
// Pricing Rule
// =============================================================================

/// Unit and volume pricing for one product.
///
/// ## Volume Pricing
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Rule C: $1.00 each, or 6 for $5.00                                     │
/// │                                                                         │
/// │  7 units scanned                                                        │
/// │    bundles   = 7 / 6 = 1   → 1 × $5.00 = $5.00                          │
/// │    leftover  = 7 % 6 = 1   → 1 × $1.00 = $1.00                          │
/// │                                        ─────────                        │
/// │                                 line total $6.00                        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// A `volume_size` of 1 means plain per-unit pricing.
///
/// ## Invariants
/// All three fields are strictly positive. The type is `Copy`, so readers
/// of the catalog always get the whole rule or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRule {
    unit_price: Money,
    volume_size: u32,
    volume_price: Money,
}

impl PricingRule {
    /// Creates a pricing rule, rejecting any non-positive field and any
    /// price above `MAX_PRICE_CENTS`.
    ///
    /// ## Example
    /// ```rust
    /// use checkout_core::{Money, PricingRule};
    ///
    /// // $1.25 each, or 3 for $3.00
    /// let rule = PricingRule::new(Money::from_cents(125), 3, Money::from_cents(300)).unwrap();
    /// assert_eq!(rule.price_for(4).cents(), 425);
    ///
    /// assert!(PricingRule::new(Money::zero(), 1, Money::from_cents(100)).is_err());
    /// ```
    pub fn new(unit_price: Money, volume_size: u32, volume_price: Money) -> ValidationResult<Self> {
        validate_price("unit price", unit_price)?;
        validate_volume_size(volume_size)?;
        validate_price("volume price", volume_price)?;

        Ok(PricingRule {
            unit_price,
            volume_size,
            volume_price,
        })
    }

    /// Creates a rule without a volume discount.
    pub fn unit(unit_price: Money) -> ValidationResult<Self> {
        Self::new(unit_price, 1, unit_price)
    }

    /// Price of a single unit.
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Number of units in one discounted bundle.
    pub fn volume_size(&self) -> u32 {
        self.volume_size
    }

    /// Price of one full bundle.
    pub fn volume_price(&self) -> Money {
        self.volume_price
    }

    /// Returns true if this rule offers a bundle price.
    pub fn has_volume_discount(&self) -> bool {
        self.volume_size > 1
    }

    /// Price of `units` units of the product.
    ///
    /// `floor(units / volume_size) * volume_price + (units % volume_size) * unit_price`.
    /// Zero or negative counts price at zero. Absurd counts saturate at
    /// `i64::MAX` cents instead of wrapping.
    pub fn price_for(&self, units: i64) -> Money {
        if units <= 0 {
            return Money::zero();
        }

        let size = i64::from(self.volume_size);
        let bundles = units / size;
        let leftover = units % size;

        self.volume_price
            .saturating_mul(bundles)
            .saturating_add(self.unit_price.saturating_mul(leftover))
    }
}

impl fmt::Display for PricingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_volume_discount() {
            write!(
                f,
                "{} each or {} for {}",
                self.unit_price, self.volume_size, self.volume_price
            )
        } else {
            write!(f, "{} each", self.unit_price)
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// One priced line of a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    /// Product on this line.
    pub product: Product,

    /// Units scanned.
    pub units: i64,

    /// Rule in effect when the receipt was produced.
    pub rule: PricingRule,

    /// `rule.price_for(units)`.
    pub line_total: Money,
}

/// Itemized result of totaling a terminal session.
///
/// Lines are sorted by product code. `total` is the sum of the line totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub lines: Vec<ReceiptLine>,
    pub total: Money,
}

impl Receipt {
    /// Builds a receipt from priced lines, sorting them and summing the total.
    pub fn from_lines(mut lines: Vec<ReceiptLine>) -> Self {
        lines.sort_by(|a, b| a.product.cmp(&b.product));
        let total = lines.iter().map(|line| line.line_total).sum();
        Receipt { lines, total }
    }

    /// Total number of units on the receipt.
    pub fn total_units(&self) -> i64 {
        self.lines.iter().map(|line| line.units).sum()
    }

    /// Returns true if nothing was scanned.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
