//! # Terminal Worker
//!
//! One simulated register: serves customers back to back until told to stop.
//!
//! ## Worker Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      TerminalWorker::run                                │
//! │                                                                         │
//! │   ┌──► shutdown requested? ──yes──► return TerminalReport               │
//! │   │          │ no                                                       │
//! │   │          ▼                                                          │
//! │   │    session.clear()                                                  │
//! │   │    basket = BasketGenerator::basket(catalog.products())             │
//! │   │    scan each item ── ProductNotFound ──► warn, count, next item     │
//! │   │    session.itemize() ── CatalogInconsistency ──► return Err         │
//! │   │    takings += total                                                 │
//! │   │          │                                                          │
//! │   │          ▼                                                          │
//! │   │    select! { sleep(random pause), shutdown_rx.recv() }              │
//! │   │          │ slept                         │ shutdown                 │
//! │   └──────────┘                               └──► return TerminalReport │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shutdown is only honored between customers: a basket that has started
//! scanning is always totaled.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, error, info, warn};

use checkout_core::{Catalog, Money, Product, Receipt, TerminalSession};

use crate::basket::BasketGenerator;
use crate::config::TerminalSettings;
use crate::error::StoreResult;

// =============================================================================
// Terminal Report
// =============================================================================

/// What a terminal did between start and shutdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalReport {
    /// Terminal name, e.g. "Terminal 3".
    pub terminal: String,

    /// Customers checked out.
    pub customers_served: u64,

    /// Scans rejected with "product not found".
    pub failed_scans: u64,

    /// Sum of all customer totals.
    pub takings: Money,
}

// =============================================================================
// Terminal Worker
// =============================================================================

/// A register that owns one `TerminalSession` and reuses it per customer.
pub struct TerminalWorker {
    /// Terminal name for logs and the report.
    name: String,

    /// Shared price list.
    catalog: Arc<Catalog>,

    /// The cart, cleared for each customer.
    session: TerminalSession,

    /// Basket and pause source.
    baskets: BasketGenerator,

    /// Upper bound of the pause between customers.
    max_pause: Duration,

    /// Running totals.
    report: TerminalReport,

    /// Shutdown receiver.
    shutdown_rx: mpsc::Receiver<()>,
}

/// Handle for stopping a terminal worker.
#[derive(Clone)]
pub struct TerminalHandle {
    name: String,

    /// Shutdown sender.
    shutdown_tx: mpsc::Sender<()>,
}

impl TerminalHandle {
    /// Terminal name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Asks the terminal to stop after the current customer.
    ///
    /// Returns false if the terminal had already stopped.
    pub async fn shutdown(&self) -> bool {
        self.shutdown_tx.send(()).await.is_ok()
    }
}

impl TerminalWorker {
    /// Creates a terminal worker and returns its handle.
    pub fn new(
        name: impl Into<String>,
        catalog: Arc<Catalog>,
        settings: &TerminalSettings,
    ) -> (Self, TerminalHandle) {
        Self::with_baskets(
            name,
            catalog,
            BasketGenerator::new(settings.max_scans_per_product),
            settings.max_pause(),
        )
    }

    /// Creates a terminal worker with an explicit basket source.
    pub fn with_baskets(
        name: impl Into<String>,
        catalog: Arc<Catalog>,
        baskets: BasketGenerator,
        max_pause: Duration,
    ) -> (Self, TerminalHandle) {
        let name = name.into();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let worker = TerminalWorker {
            session: TerminalSession::new(Arc::clone(&catalog)),
            report: TerminalReport {
                terminal: name.clone(),
                ..TerminalReport::default()
            },
            name: name.clone(),
            catalog,
            baskets,
            max_pause,
            shutdown_rx,
        };

        let handle = TerminalHandle { name, shutdown_tx };

        (worker, handle)
    }

    /// Runs the terminal loop.
    ///
    /// This should be spawned as a background task. It returns the report
    /// on shutdown (or when every handle is dropped), and an error only if
    /// checkout logic hits a catalog inconsistency.
    pub async fn run(mut self) -> StoreResult<TerminalReport> {
        info!(terminal = %self.name, "Terminal starting");

        loop {
            match self.shutdown_rx.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }

            if let Err(e) = self.serve_customer() {
                error!(terminal = %self.name, error = %e, "Checkout failed, closing terminal");
                return Err(e);
            }

            let pause = self.baskets.pause(self.max_pause);
            tokio::select! {
                _ = tokio::time::sleep(pause) => {}

                // A message or a dropped handle both mean stop
                _ = self.shutdown_rx.recv() => {
                    debug!(terminal = %self.name, "Shutdown during pause");
                    break;
                }
            }
        }

        info!(
            terminal = %self.name,
            customers = self.report.customers_served,
            failed_scans = self.report.failed_scans,
            takings = %self.report.takings,
            "Terminal done"
        );

        Ok(self.report)
    }

    /// Serves one random customer.
    fn serve_customer(&mut self) -> StoreResult<Receipt> {
        let basket = self.baskets.basket(&self.catalog.products());
        self.checkout(&basket)
    }

    /// Clears the session, scans `basket` and totals it.
    fn checkout(&mut self, basket: &[Product]) -> StoreResult<Receipt> {
        self.scan_basket(basket)?;
        self.finish()
    }

    /// Starts a fresh cart and scans every product in `basket`.
    ///
    /// Unknown products are counted and skipped.
    fn scan_basket(&mut self, basket: &[Product]) -> StoreResult<()> {
        self.session.clear();

        for product in basket {
            if let Err(e) = self.session.scan(product) {
                if !e.is_recoverable() {
                    return Err(e.into());
                }
                self.report.failed_scans += 1;
                warn!(
                    terminal = %self.name,
                    product = %product,
                    "Cannot scan product, get manager to help"
                );
            }
        }

        Ok(())
    }

    /// Totals the cart and books the sale.
    fn finish(&mut self) -> StoreResult<Receipt> {
        let receipt = self.session.itemize()?;

        self.report.customers_served += 1;
        self.report.takings += receipt.total;

        info!(
            terminal = %self.name,
            session = %self.session.id(),
            units = receipt.total_units(),
            total = %receipt.total,
            "Customer checked out"
        );

        Ok(receipt)
    }
}
