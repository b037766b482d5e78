//! # Catalog
//!
//! The store-wide product registry: `Product → PricingRule`.
//!
//! ## Sharing Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Arc<Catalog>                                   │
//! │                                                                         │
//! │   Manager ──register/deregister──►  RwLock<HashMap<Product, Rule>>      │
//! │                                        ▲        ▲        ▲              │
//! │                                 lookup │ lookup │ lookup │              │
//! │                                   Terminal 1  Terminal 2  Terminal 3    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! - One `RwLock` guards the whole map: many lookups in parallel, writes
//!   exclusive.
//! - `PricingRule` is `Copy` and replaced whole, so a reader racing a
//!   re-price sees the old rule or the new one, never a mix.
//! - Every critical section is a single map operation. A panic elsewhere
//!   cannot leave the map half-updated, so a poisoned lock is recovered.
//! - No ordering is promised across different products.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{PricingRule, Product};

/// Shared product registry.
///
/// Create one per store and hand an `Arc<Catalog>` to every terminal.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: RwLock<HashMap<Product, PricingRule>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Product, PricingRule>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Product, PricingRule>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a product, replacing any existing rule (last write wins).
    ///
    /// Once this returns, every subsequent lookup from any thread sees `rule`.
    pub fn register(&self, product: Product, rule: PricingRule) {
        let code = product.code().to_string();
        let previous = self.write().insert(product, rule);

        match previous {
            Some(old) if old != rule => {
                debug!(product = %code, old = %old, new = %rule, "Re-priced product");
            }
            Some(_) => {}
            None => debug!(product = %code, rule = %rule, "Registered product"),
        }
    }

    /// Registers a product at a flat unit price (no volume discount).
    ///
    /// Fails if `unit_price` is not positive.
    pub fn register_unit_price(&self, product: Product, unit_price: Money) -> CoreResult<()> {
        let rule = PricingRule::unit(unit_price)?;
        self.register(product, rule);
        Ok(())
    }

    /// Removes a product (e.g. sold out), returning its last rule.
    pub fn deregister(&self, product: &Product) -> Option<PricingRule> {
        let removed = self.write().remove(product);
        if removed.is_some() {
            debug!(product = %product, "Deregistered product");
        }
        removed
    }

    /// Returns the current rule for a product, or `None` if unregistered.
    pub fn lookup(&self, product: &Product) -> Option<PricingRule> {
        self.read().get(product).copied()
    }

    /// Returns true if the product currently has a rule.
    pub fn contains(&self, product: &Product) -> bool {
        self.read().contains_key(product)
    }

    /// Snapshot of registered products, sorted by code.
    ///
    /// The snapshot may already be stale when it is returned.
    pub fn products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.read().keys().cloned().collect();
        products.sort();
        products
    }

    /// Number of registered products.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no product is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Removes every product in one step.
    pub fn reset(&self) {
        let mut entries = self.write();
        let cleared = entries.len();
        entries.clear();
        info!(cleared, "Catalog reset");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
