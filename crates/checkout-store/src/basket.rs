//! # Basket Generator
//!
//! Produces random shopping baskets and idle pauses for simulated terminals.
//!
//! ## Basket Shape
//! ```text
//! catalog snapshot:  [A, B, C, D]        max_scans_per_product = 3
//!
//!   A × uniform(0..3) = 2   → A A
//!   B × uniform(0..3) = 0   →
//!   C × uniform(0..3) = 1   → C
//!   D × uniform(0..3) = 2   → D D
//!                              ─────────────
//!   shuffled basket:           D A C D A
//! ```
//!
//! Randomness comes from a `StdRng`. Seed it explicitly for reproducible
//! runs; it only decides what a pretend customer buys.

use std::time::Duration;

use checkout_core::Product;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Random basket and pause source, one per terminal.
#[derive(Debug, Clone)]
pub struct BasketGenerator {
    rng: StdRng,
    max_scans_per_product: u32,
}

impl BasketGenerator {
    /// Creates a generator seeded from OS entropy.
    pub fn new(max_scans_per_product: u32) -> Self {
        BasketGenerator {
            rng: StdRng::from_entropy(),
            max_scans_per_product,
        }
    }

    /// Creates a generator with a fixed seed, for reproducible runs.
    pub fn with_seed(max_scans_per_product: u32, seed: u64) -> Self {
        BasketGenerator {
            rng: StdRng::seed_from_u64(seed),
            max_scans_per_product,
        }
    }

    /// Builds a shuffled basket from a catalog snapshot.
    ///
    /// Each product appears `0..max_scans_per_product` times, so the basket
    /// may be empty.
    pub fn basket(&mut self, products: &[Product]) -> Vec<Product> {
        let max = self.max_scans_per_product as usize;
        let mut basket = Vec::new();

        if max == 0 {
            return basket;
        }

        for product in products {
            let copies = self.rng.gen_range(0..max);
            basket.extend(std::iter::repeat(product.clone()).take(copies));
        }

        basket.shuffle(&mut self.rng);
        basket
    }

    /// Random idle time in `0..max`.
    pub fn pause(&mut self, max: Duration) -> Duration {
        let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.rng.gen_range(0..max_ms))
    }
}
