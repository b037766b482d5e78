//! # Store
//!
//! Opens a store from its configuration and runs its terminals.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Store Lifecycle                               │
//! │                                                                         │
//! │   open(config) ──► Catalog loaded from [[pricing]]                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   start() ──► tokio::spawn(TerminalWorker::run) × terminals.count       │
//! │        │                                                                │
//! │        │      (manager may re-price via catalog() meanwhile)            │
//! │        ▼                                                                │
//! │   stop() ──► TerminalHandle::shutdown() on every terminal               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   join() ──► Vec<TerminalReport>  or  first StoreError                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use checkout_core::{Catalog, Money};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::terminal::{TerminalHandle, TerminalReport, TerminalWorker};

/// A terminal task and the handle that stops it.
struct RunningTerminal {
    handle: TerminalHandle,
    task: JoinHandle<StoreResult<TerminalReport>>,
}

/// A store: one shared catalog and a set of terminals.
pub struct Store {
    config: StoreConfig,
    catalog: Arc<Catalog>,
    terminals: Vec<RunningTerminal>,
}

impl Store {
    /// Validates the config and loads its price list into a fresh catalog.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;

        let catalog = Arc::new(Catalog::new());
        for (product, rule) in config.price_list()? {
            catalog.register(product, rule);
        }

        info!(
            store_id = %config.store_id(),
            products = catalog.len(),
            terminals = config.terminals.count,
            "Store opened"
        );

        Ok(Store {
            config,
            catalog,
            terminals: Vec::new(),
        })
    }

    /// Shared catalog. A manager may register, re-price or deregister
    /// products through it while terminals are running.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns true while terminals have been started and not yet joined.
    pub fn is_running(&self) -> bool {
        !self.terminals.is_empty()
    }

    /// Spawns one task per configured terminal.
    ///
    /// Must be called from within a tokio runtime. Calling it again while
    /// terminals are running does nothing.
    pub fn start(&mut self) {
        if self.is_running() {
            warn!("Terminals already running");
            return;
        }

        for number in 1..=self.config.terminals.count {
            let (worker, handle) = TerminalWorker::new(
                format!("Terminal {}", number),
                Arc::clone(&self.catalog),
                &self.config.terminals,
            );
            let task = tokio::spawn(worker.run());
            self.terminals.push(RunningTerminal { handle, task });
        }

        info!(terminals = self.terminals.len(), "Store open for business");
    }

    /// Asks every terminal to stop after its current customer.
    pub async fn stop(&self) {
        info!("Closing store");
        for terminal in &self.terminals {
            if !terminal.handle.shutdown().await {
                warn!(terminal = %terminal.handle.name(), "Terminal had already stopped");
            }
        }
    }

    /// Waits for every terminal and collects their reports.
    ///
    /// All tasks are awaited even when one fails; the first failure is
    /// returned.
    pub async fn join(&mut self) -> StoreResult<Vec<TerminalReport>> {
        let mut reports = Vec::with_capacity(self.terminals.len());
        let mut first_error = None;

        for terminal in self.terminals.drain(..) {
            let name = terminal.handle.name().to_string();
            let result = match terminal.task.await {
                Ok(result) => result,
                Err(e) => {
                    error!(terminal = %name, error = %e, "Terminal task died");
                    Err(StoreError::TerminalFailed {
                        terminal: name,
                        reason: e.to_string(),
                    })
                }
            };

            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    }

    /// Starts the terminals, keeps the store open for `duration`, then stops
    /// and joins them.
    pub async fn run_for(&mut self, duration: Duration) -> StoreResult<Vec<TerminalReport>> {
        self.start();
        tokio::time::sleep(duration).await;
        self.stop().await;
        self.join().await
    }
}

/// Sum of the takings in `reports`.
pub fn total_takings(reports: &[TerminalReport]) -> Money {
    reports.iter().map(|report| report.takings).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::BasketGenerator;
    use crate::config::PricingEntry;
    use checkout_core::{CoreError, PricingRule, Product, TerminalSession};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn quick_config(terminals: usize) -> StoreConfig {
        let mut config = StoreConfig::default();
        config.terminals.count = terminals;
        config.terminals.max_pause_ms = 5;
        config
    }

    /// Puts a hand-built task on the store's terminal list.
    fn push_task(store: &mut Store, name: &str, task: JoinHandle<StoreResult<TerminalReport>>) {
        let (_worker, handle) = TerminalWorker::with_baskets(
            name,
            Arc::clone(&store.catalog),
            BasketGenerator::with_seed(3, 1),
            Duration::ZERO,
        );
        store.terminals.push(RunningTerminal { handle, task });
    }

    async fn jammed_scanner() -> StoreResult<TerminalReport> {
        panic!("scanner jammed")
    }

    #[test]
    fn test_open_loads_price_list() {
        let store = Store::open(StoreConfig::default()).unwrap();
        let catalog = store.catalog();

        assert_eq!(catalog.len(), 4);
        let rule = catalog.lookup(&Product::new("C").unwrap()).unwrap();
        assert_eq!(rule.volume_size(), 6);
        assert_eq!(rule.volume_price(), Money::from_cents(500));
        assert!(!store.is_running());
    }

    #[test]
    fn test_open_sample_basket_total() {
        let store = Store::open(StoreConfig::default()).unwrap();
        let mut session = TerminalSession::new(Arc::clone(store.catalog()));

        for code in ["A", "B", "C", "D", "A", "B", "A"] {
            session.scan(&Product::new(code).unwrap()).unwrap();
        }
        assert_eq!(session.calculate_total().unwrap(), Money::from_cents(1325));
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let mut config = StoreConfig::default();
        config.pricing.push(PricingEntry::unit("B", "1.00"));
        assert!(matches!(
            Store::open(config),
            Err(StoreError::InvalidConfig(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_run_for_collects_every_terminal() {
        let mut store = Store::open(quick_config(3)).unwrap();
        let reports = store.run_for(Duration::from_millis(100)).await.unwrap();

        assert_eq!(reports.len(), 3);
        let mut names: Vec<_> = reports.iter().map(|r| r.terminal.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Terminal 1", "Terminal 2", "Terminal 3"]);

        for report in &reports {
            assert!(report.customers_served >= 1);
            assert_eq!(report.failed_scans, 0);
            assert!(!report.takings.is_negative());
        }
        assert!(!store.is_running());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_repricing_while_open() {
        let mut store = Store::open(quick_config(4)).unwrap();
        let catalog = Arc::clone(store.catalog());
        store.start();
        assert!(store.is_running());

        let d = Product::new("D").unwrap();
        for cents in 50..80 {
            let price = Money::from_cents(cents);
            catalog.register(d.clone(), PricingRule::unit(price).unwrap());
            catalog
                .register_unit_price(Product::new("E").unwrap(), price)
                .unwrap();
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        store.stop().await;
        let reports = store.join().await.unwrap();

        assert_eq!(reports.len(), 4);
        assert_eq!(
            catalog.lookup(&d).unwrap().unit_price(),
            Money::from_cents(79)
        );
    }

    #[tokio::test]
    async fn test_start_twice_is_ignored() {
        let mut store = Store::open(quick_config(2)).unwrap();
        store.start();
        store.start();
        store.stop().await;

        let reports = store.join().await.unwrap();
        assert_eq!(reports.len(), 2);
    }

    #[tokio::test]
    async fn test_join_returns_first_error_after_every_terminal() {
        let mut store = Store::open(quick_config(3)).unwrap();
        let finished = Arc::new(AtomicBool::new(false));

        push_task(
            &mut store,
            "Terminal 1",
            tokio::spawn(async {
                Err::<TerminalReport, _>(StoreError::Core(CoreError::CatalogInconsistency(
                    "B".into(),
                )))
            }),
        );
        push_task(&mut store, "Terminal 2", tokio::spawn(jammed_scanner()));

        let flag = Arc::clone(&finished);
        push_task(
            &mut store,
            "Terminal 3",
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, StoreError>(TerminalReport {
                    terminal: "Terminal 3".into(),
                    ..TerminalReport::default()
                })
            }),
        );

        let err = store.join().await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Core(CoreError::CatalogInconsistency(ref code)) if code == "B"
        ));
        assert!(finished.load(Ordering::SeqCst));
        assert!(!store.is_running());
    }

    #[tokio::test]
    async fn test_panicked_terminal_maps_to_terminal_failed() {
        let mut store = Store::open(quick_config(2)).unwrap();

        push_task(
            &mut store,
            "Terminal 1",
            tokio::spawn(async {
                Ok::<_, StoreError>(TerminalReport {
                    terminal: "Terminal 1".into(),
                    ..TerminalReport::default()
                })
            }),
        );
        push_task(&mut store, "Terminal 2", tokio::spawn(jammed_scanner()));

        match store.join().await {
            Err(StoreError::TerminalFailed { terminal, reason }) => {
                assert_eq!(terminal, "Terminal 2");
                assert!(reason.contains("panicked"));
            }
            other => panic!("expected TerminalFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_join_without_start() {
        let mut store = Store::open(StoreConfig::default()).unwrap();
        assert!(store.join().await.unwrap().is_empty());
    }

    #[test]
    fn test_total_takings() {
        let reports = vec![
            TerminalReport {
                terminal: "Terminal 1".into(),
                customers_served: 2,
                failed_scans: 0,
                takings: Money::from_cents(1325),
            },
            TerminalReport {
                terminal: "Terminal 2".into(),
                customers_served: 1,
                failed_scans: 1,
                takings: Money::from_cents(725),
            },
        ];
        assert_eq!(total_takings(&reports), Money::from_cents(2050));
        assert_eq!(total_takings(&[]), Money::zero());
    }
}
