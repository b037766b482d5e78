//! # checkout-store: Store Harness for the Checkout Terminal
//!
//! Runs a configurable number of simulated terminals in parallel against
//! one shared [`Catalog`](checkout_core::Catalog), while a manager is free
//! to re-price products through the same catalog.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Store Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                       Store (orchestrator)                       │  │
//! │  │                                                                  │  │
//! │  │  open(StoreConfig) ─► Arc<Catalog>     start / stop / join       │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ tokio::spawn × N                        │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐            │
//! │  │ TerminalWorker │  │ TerminalWorker │  │ TerminalWorker │   ...      │
//! │  │ session + RNG  │  │ session + RNG  │  │ session + RNG  │            │
//! │  └───────┬────────┘  └───────┬────────┘  └───────┬────────┘            │
//! │          └───────────────────┼───────────────────┘                      │
//! │                              ▼                                          │
//! │                  Arc<Catalog> (RwLock, shared)  ◄── manager re-pricing  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Store configuration (terminals, pauses, price list)
//! - [`error`] - Store error types
//! - [`basket`] - Random basket and pause generator
//! - [`terminal`] - Terminal worker loop and its handle
//! - [`store`] - Store lifecycle
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use checkout_store::{Store, StoreConfig};
//!
//! # async fn demo() -> checkout_store::StoreResult<()> {
//! let config = StoreConfig::load_or_default(None);
//! let mut store = Store::open(config)?;
//!
//! let reports = store.run_for(Duration::from_millis(500)).await?;
//! for report in &reports {
//!     println!("{}: {}", report.terminal, report.takings);
//! }
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod config;
pub mod error;
pub mod store;
pub mod terminal;

// =============================================================================
// Re-exports
// =============================================================================

pub use basket::BasketGenerator;
pub use config::{DemoSettings, PricingEntry, StoreConfig, StoreInfo, TerminalSettings};
pub use error::{StoreError, StoreResult};
pub use store::{total_takings, Store};
pub use terminal::{TerminalHandle, TerminalReport, TerminalWorker};
