//! # checkout-core: Pure Business Logic for the Checkout Terminal
//!
//! This crate is the **heart** of the checkout system. It prices carts
//! against a shared catalog and has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               checkout-store (harness)                          │   │
//! │  │    Store ──► TerminalWorker × N ──► BasketGenerator             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ checkout-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  catalog  │  │  session  │  │   │
//! │  │   │  Product  │  │   Money   │  │  Catalog  │  │ Terminal- │  │   │
//! │  │   │  Pricing- │  │           │  │  (RwLock) │  │  Session  │  │   │
//! │  │   │   Rule    │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO TIMERS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, PricingRule, Receipt
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Shared, internally synchronized product registry
//! - [`session`] - Per-customer cart and total calculation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: All monetary values are in cents (i64)
//! 2. **Valid by Construction**: A `Product` or `PricingRule` that exists is valid
//! 3. **Explicit Errors**: "not found" is a typed, recoverable error, not a panic
//! 4. **Live Pricing**: Totals read the catalog at calculation time
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use checkout_core::{Catalog, Money, PricingRule, Product, TerminalSession};
//!
//! let catalog = Arc::new(Catalog::new());
//! let c = Product::new("C").unwrap();
//!
//! // $1.00 each, or 6 for $5.00
//! let rule = PricingRule::new(Money::from_cents(100), 6, Money::from_cents(500)).unwrap();
//! catalog.register(c.clone(), rule);
//!
//! let mut session = TerminalSession::new(Arc::clone(&catalog));
//! for _ in 0..7 {
//!     session.scan(&c).unwrap();
//! }
//!
//! assert_eq!(session.calculate_total().unwrap().to_string(), "$6.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::TerminalSession;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product code.
pub const MAX_PRODUCT_CODE_LEN: usize = 50;

/// Highest unit or bundle price accepted, in cents ($1,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
