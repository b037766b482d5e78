//! # Terminal Session
//!
//! One customer's cart at one register.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   new() ──► empty ──scan()──► accumulating ──calculate_total()──┐       │
//! │               ▲                   │  ▲                          │       │
//! │               │                   └──┘ scan()                   │       │
//! │               │                                                 │       │
//! │               └──────────────────── clear() ◄───────────────────┘       │
//! │                                                                         │
//! │  There is no closed state: the owner drops the session or clears it   │
//! │  for the next customer.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pricing Is Live
//! The cart stores only unit counts. Rules are looked up from the catalog at
//! scan time (to reject unknown products) and again at total time, so a
//! manager re-pricing a product mid-checkout is reflected in the total.
//!
//! ## Ownership
//! A session is owned by a single flow and needs no locking. Only the
//! `Arc<Catalog>` it points at is shared.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::trace;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, Receipt, ReceiptLine};

/// A checkout session for one customer.
#[derive(Debug)]
pub struct TerminalSession {
    id: Uuid,
    catalog: Arc<Catalog>,
    scanned: HashMap<Product, i64>,
    started_at: DateTime<Utc>,
}

impl TerminalSession {
    /// Creates an empty session priced from `catalog`.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        TerminalSession {
            id: Uuid::new_v4(),
            catalog,
            scanned: HashMap::new(),
            started_at: Utc::now(),
        }
    }

    /// Session identifier, for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the current customer's checkout started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Scans one unit of `product`, returning how many have been scanned.
    ///
    /// ## Errors
    /// `CoreError::ProductNotFound` if the product has no pricing rule. The
    /// cart is left untouched, so the caller can carry on with the rest of
    /// the basket.
    ///
    /// ## Example
    /// ```rust
    /// use std::sync::Arc;
    /// use checkout_core::{Catalog, Money, Product, TerminalSession};
    ///
    /// let catalog = Arc::new(Catalog::new());
    /// let a = Product::new("A").unwrap();
    /// catalog.register_unit_price(a.clone(), Money::from_cents(125)).unwrap();
    ///
    /// let mut session = TerminalSession::new(catalog);
    /// assert_eq!(session.scan(&a).unwrap(), 1);
    /// assert_eq!(session.scan(&a).unwrap(), 2);
    /// assert!(session.scan(&Product::new("Z").unwrap()).is_err());
    /// ```
    pub fn scan(&mut self, product: &Product) -> CoreResult<i64> {
        if !self.catalog.contains(product) {
            return Err(CoreError::ProductNotFound(product.code().to_string()));
        }

        let units = self.scanned.entry(product.clone()).or_insert(0);
        *units += 1;

        trace!(session = %self.id, product = %product, units = *units, "Scanned");
        Ok(*units)
    }

    /// Units of `product` scanned so far (0 if none).
    pub fn count(&self, product: &Product) -> i64 {
        self.scanned.get(product).copied().unwrap_or(0)
    }

    /// Number of distinct products in the cart.
    pub fn item_count(&self) -> usize {
        self.scanned.len()
    }

    /// Total units across all products.
    pub fn total_units(&self) -> i64 {
        self.scanned.values().sum()
    }

    /// Returns true if nothing has been scanned.
    pub fn is_empty(&self) -> bool {
        self.scanned.is_empty()
    }

    /// Prices every line against the current catalog.
    ///
    /// ## Errors
    /// `CoreError::CatalogInconsistency` if a scanned product was
    /// deregistered before totaling. It is never priced as zero.
    pub fn itemize(&self) -> CoreResult<Receipt> {
        let lines = self
            .scanned
            .iter()
            .map(|(product, &units)| {
                let rule = self
                    .catalog
                    .lookup(product)
                    .ok_or_else(|| CoreError::CatalogInconsistency(product.code().to_string()))?;

                Ok(ReceiptLine {
                    product: product.clone(),
                    units,
                    rule,
                    line_total: rule.price_for(units),
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Receipt::from_lines(lines))
    }

    /// Total price of the cart, applying volume discounts per product.
    ///
    /// Same semantics and errors as [`TerminalSession::itemize`].
    pub fn calculate_total(&self) -> CoreResult<Money> {
        Ok(self.itemize()?.total)
    }

    /// Empties the cart for the next customer.
    pub fn clear(&mut self) {
        self.scanned.clear();
        self.started_at = Utc::now();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PricingRule;

    struct Shelf {
        catalog: Arc<Catalog>,
        a: Product,
        b: Product,
        c: Product,
        d: Product,
    }

    /// A: $1.25 or 3 for $3, B: $4.25, C: $1 or 6 for $5, D: $0.75
    fn sample_shelf() -> Shelf {
        let catalog = Arc::new(Catalog::new());
        let a = Product::new("A").unwrap();
        let b = Product::new("B").unwrap();
        let c = Product::new("C").unwrap();
        let d = Product::new("D").unwrap();

        catalog.register(
            a.clone(),
            PricingRule::new(Money::from_cents(125), 3, Money::from_cents(300)).unwrap(),
        );
        catalog.register(b.clone(), PricingRule::unit(Money::from_cents(425)).unwrap());
        catalog.register(
            c.clone(),
            PricingRule::new(Money::from_cents(100), 6, Money::from_cents(500)).unwrap(),
        );
        catalog.register(d.clone(), PricingRule::unit(Money::from_cents(75)).unwrap());

        Shelf { catalog, a, b, c, d }
    }

    fn scan_all(session: &mut TerminalSession, products: &[&Product]) {
        for product in products {
            session.scan(product).unwrap();
        }
    }

    #[test]
    fn test_scan_counts_up() {
        let shelf = sample_shelf();
        let mut session = TerminalSession::new(Arc::clone(&shelf.catalog));

        assert_eq!(session.scan(&shelf.a).unwrap(), 1);
        assert_eq!(session.scan(&shelf.a).unwrap(), 2);
        assert_eq!(session.scan(&shelf.b).unwrap(), 1);
        assert_eq!(session.count(&shelf.a), 2);
        assert_eq!(session.count(&shelf.c), 0);
        assert_eq!(session.item_count(), 2);
        assert_eq!(session.total_units(), 3);
    }

    #[test]
    fn test_scan_unregistered_product() {
        let shelf = sample_shelf();
        let mut session = TerminalSession::new(Arc::clone(&shelf.catalog));
        let unknown = Product::new("unregisteredProduct").unwrap();

        let err = session.scan(&unknown).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ProductNotFound(ref code) if code == "unregisteredProduct"
        ));
        assert!(err.is_recoverable());
        assert!(session.is_empty());

        // The rest of the basket still scans
        assert_eq!(session.scan(&shelf.a).unwrap(), 1);
    }

    #[test]
    fn test_total_abcdaba() {
        let shelf = sample_shelf();
        let mut session = TerminalSession::new(Arc::clone(&shelf.catalog));
        let (a, b, c, d) = (&shelf.a, &shelf.b, &shelf.c, &shelf.d);

        scan_all(&mut session, &[a, b, c, d, a, b, a]);

        assert_eq!(session.calculate_total().unwrap(), Money::from_cents(1325));
    }

    #[test]
    fn test_total_ccccccc() {
        let shelf = sample_shelf();
        let mut session = TerminalSession::new(Arc::clone(&shelf.catalog));
        let c = &shelf.c;

        scan_all(&mut session, &[c, c, c, c, c, c, c]);

        assert_eq!(session.calculate_total().unwrap(), Money::from_cents(600));
    }

    #[test]
    fn test_total_abcd() {
        let shelf = sample_shelf();
        let mut session = TerminalSession::new(Arc::clone(&shelf.catalog));

        scan_all(&mut session, &[&shelf.a, &shelf.b, &shelf.c, &shelf.d]);

        assert_eq!(session.calculate_total().unwrap(), Money::from_cents(725));
    }

    #[test]
    fn test_total_progression_and_full_bundle() {
        let shelf = sample_shelf();
        let mut session = TerminalSession::new(Arc::clone(&shelf.catalog));
        let rule_a = shelf.catalog.lookup(&shelf.a).unwrap();
        let rule_b = shelf.catalog.lookup(&shelf.b).unwrap();

        assert_eq!(session.calculate_total().unwrap(), Money::zero());

        session.scan(&shelf.a).unwrap();
        assert_eq!(session.calculate_total().unwrap(), rule_a.unit_price());

        session.scan(&shelf.a).unwrap();
        assert_eq!(session.calculate_total().unwrap(), rule_a.unit_price() * 2);

        session.scan(&shelf.b).unwrap();
        assert_eq!(
            session.calculate_total().unwrap(),
            rule_a.unit_price() * 2 + rule_b.unit_price()
        );

        session.clear();
        for _ in 0..rule_a.volume_size() {
            session.scan(&shelf.a).unwrap();
        }
        assert_eq!(session.calculate_total().unwrap(), rule_a.volume_price());
    }

    #[test]
    fn test_clear_restarts_counts() {
        let shelf = sample_shelf();
        let mut session = TerminalSession::new(Arc::clone(&shelf.catalog));
        scan_all(&mut session, &[&shelf.a, &shelf.a, &shelf.c]);
        let id = session.id();
        let first_started = session.started_at();

        session.clear();

        assert!(session.is_empty());
        assert_eq!(session.id(), id);
        assert!(session.started_at() >= first_started);
        assert_eq!(session.scan(&shelf.a).unwrap(), 1);
        assert_eq!(session.scan(&shelf.c).unwrap(), 1);
    }

    #[test]
    fn test_reprice_mid_session_is_reflected() {
        let shelf = sample_shelf();
        let mut session = TerminalSession::new(Arc::clone(&shelf.catalog));
        scan_all(&mut session, &[&shelf.b, &shelf.b]);
        assert_eq!(session.calculate_total().unwrap(), Money::from_cents(850));

        shelf
            .catalog
            .register_unit_price(shelf.b.clone(), Money::from_cents(400))
            .unwrap();

        assert_eq!(session.calculate_total().unwrap(), Money::from_cents(800));
    }

    #[test]
    fn test_deregistered_before_total_is_inconsistency() {
        let shelf = sample_shelf();
        let mut session = TerminalSession::new(Arc::clone(&shelf.catalog));
        scan_all(&mut session, &[&shelf.a, &shelf.d]);

        shelf.catalog.deregister(&shelf.d);

        let err = session.calculate_total().unwrap_err();
        assert!(matches!(err, CoreError::CatalogInconsistency(ref code) if code == "D"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_itemize_lines() {
        let shelf = sample_shelf();
        let mut session = TerminalSession::new(Arc::clone(&shelf.catalog));
        let (a, c) = (&shelf.a, &shelf.c);
        scan_all(&mut session, &[c, a, c, a, a, a]);

        let receipt = session.itemize().unwrap();

        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.lines[0].product, shelf.a);
        assert_eq!(receipt.lines[0].units, 4);
        assert_eq!(receipt.lines[0].line_total, Money::from_cents(425));
        assert_eq!(receipt.lines[1].product, shelf.c);
        assert_eq!(receipt.lines[1].line_total, Money::from_cents(200));
        assert_eq!(receipt.total, session.calculate_total().unwrap());
        assert_eq!(receipt.total_units(), session.total_units());
    }

    /// Several sessions share one catalog across threads while a manager
    /// keeps re-registering the same rules.
    #[test]
    fn test_parallel_sessions_share_catalog() {
        let shelf = sample_shelf();
        let rule_b = shelf.catalog.lookup(&shelf.b).unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..1_000 {
                    shelf.catalog.register(shelf.b.clone(), rule_b);
                }
            });

            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..200 {
                        let mut session = TerminalSession::new(Arc::clone(&shelf.catalog));
                        let (a, b, c, d) = (&shelf.a, &shelf.b, &shelf.c, &shelf.d);
                        scan_all(&mut session, &[a, b, c, d, a, b, a]);
                        assert_eq!(session.calculate_total().unwrap(), Money::from_cents(1325));
                    }
                });
            }
        });
    }
}
