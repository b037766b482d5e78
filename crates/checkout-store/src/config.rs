//! # Store Configuration
//!
//! Configuration for the store harness: how many terminals run, how busy
//! they are, and the opening price list.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CHECKOUT_TERMINALS=8                                               │
//! │     CHECKOUT_RUN_MILLIS=2000                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/checkout-pos/store.toml (Linux)                          │
//! │     ~/Library/Application Support/com.checkout.pos/store.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     5 terminals, 100ms demo, sample price list A/B/C/D                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # store.toml
//! [store]
//! id = "store-001"
//! name = "Downtown Branch"
//!
//! [terminals]
//! count = 5
//! max_pause_ms = 80
//! max_scans_per_product = 3
//!
//! [demo]
//! run_millis = 100
//!
//! [[pricing]]
//! code = "A"
//! unit_price = "1.25"
//! volume_size = 3
//! volume_price = "3.00"
//!
//! [[pricing]]
//! code = "B"
//! unit_price = "4.25"   # no volume_* → flat unit price
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use checkout_core::{Money, PricingRule, Product};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Store Identity
// =============================================================================

/// Identity of the store the terminals belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreInfo {
    /// Unique store identifier.
    pub id: String,

    /// Human-readable store name.
    #[serde(default)]
    pub name: String,
}

impl Default for StoreInfo {
    fn default() -> Self {
        StoreInfo {
            id: "default-store".to_string(),
            name: "Default Store".to_string(),
        }
    }
}

// =============================================================================
// Terminal Settings
// =============================================================================

/// How the simulated registers behave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalSettings {
    /// Number of registers running in parallel.
    #[serde(default = "default_terminal_count")]
    pub count: usize,

    /// Upper bound (exclusive) of the idle pause between customers.
    #[serde(default = "default_max_pause")]
    pub max_pause_ms: u64,

    /// Each product lands in a basket `0..max_scans_per_product` times.
    #[serde(default = "default_max_scans")]
    pub max_scans_per_product: u32,
}

fn default_terminal_count() -> usize {
    5
}

fn default_max_pause() -> u64 {
    80
}

fn default_max_scans() -> u32 {
    3
}

impl TerminalSettings {
    /// Upper bound of the pause between customers.
    pub fn max_pause(&self) -> Duration {
        Duration::from_millis(self.max_pause_ms)
    }
}

impl Default for TerminalSettings {
    fn default() -> Self {
        TerminalSettings {
            count: default_terminal_count(),
            max_pause_ms: default_max_pause(),
            max_scans_per_product: default_max_scans(),
        }
    }
}

// =============================================================================
// Demo Settings
// =============================================================================

/// Settings for the `store-demo` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoSettings {
    /// How long the store stays open before terminals are told to stop.
    #[serde(default = "default_run_millis")]
    pub run_millis: u64,
}

fn default_run_millis() -> u64 {
    100
}

impl Default for DemoSettings {
    fn default() -> Self {
        DemoSettings {
            run_millis: default_run_millis(),
        }
    }
}

// =============================================================================
// Pricing Entries
// =============================================================================

/// One row of the opening price list.
///
/// Prices are decimal strings (`"1.25"`) so the file reads like a shelf
/// label; they are parsed into integer cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingEntry {
    /// Product code.
    pub code: String,

    /// Price of one unit.
    pub unit_price: String,

    /// Units per bundle. Omitted means 1 (no discount).
    #[serde(default = "default_volume_size")]
    pub volume_size: u32,

    /// Price of a full bundle. Omitted means `unit_price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_price: Option<String>,
}

fn default_volume_size() -> u32 {
    1
}

impl PricingEntry {
    /// Creates an entry with a bundle price.
    pub fn volume(code: &str, unit_price: &str, volume_size: u32, volume_price: &str) -> Self {
        PricingEntry {
            code: code.to_string(),
            unit_price: unit_price.to_string(),
            volume_size,
            volume_price: Some(volume_price.to_string()),
        }
    }

    /// Creates a flat-priced entry.
    pub fn unit(code: &str, unit_price: &str) -> Self {
        PricingEntry {
            code: code.to_string(),
            unit_price: unit_price.to_string(),
            volume_size: default_volume_size(),
            volume_price: None,
        }
    }

    /// Parses the entry into a validated product and rule.
    pub fn to_rule(&self) -> StoreResult<(Product, PricingRule)> {
        let product = Product::new(&self.code)?;
        let unit_price: Money = self.unit_price.parse()?;
        let volume_price: Money = match &self.volume_price {
            Some(price) => price.parse()?,
            None => unit_price,
        };
        let rule = PricingRule::new(unit_price, self.volume_size, volume_price)?;
        Ok((product, rule))
    }
}

/// The sample price list: A, B, C and D.
fn default_pricing() -> Vec<PricingEntry> {
    vec![
        PricingEntry::volume("A", "1.25", 3, "3.00"),
        PricingEntry::unit("B", "4.25"),
        PricingEntry::volume("C", "1.00", 6, "5.00"),
        PricingEntry::unit("D", "0.75"),
    ]
}

// =============================================================================
// Main Store Configuration
// =============================================================================

/// Complete store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store identity.
    #[serde(default)]
    pub store: StoreInfo,

    /// Terminal behavior.
    #[serde(default)]
    pub terminals: TerminalSettings,

    /// Demo binary settings.
    #[serde(default)]
    pub demo: DemoSettings,

    /// Opening price list, loaded into the catalog by `Store::open`.
    #[serde(default = "default_pricing")]
    pub pricing: Vec<PricingEntry>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            store: StoreInfo::default(),
            terminals: TerminalSettings::default(),
            demo: DemoSettings::default(),
            pricing: default_pricing(),
        }
    }
}

impl StoreConfig {
    /// Creates a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (store.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Store config saved");
        Ok(())
    }

    /// Validates the configuration, including every price list entry.
    pub fn validate(&self) -> StoreResult<()> {
        if self.terminals.count == 0 {
            return Err(StoreError::InvalidConfig(
                "terminals.count must be greater than 0".into(),
            ));
        }

        if self.terminals.max_scans_per_product == 0 {
            return Err(StoreError::InvalidConfig(
                "terminals.max_scans_per_product must be greater than 0".into(),
            ));
        }

        if self.pricing.is_empty() {
            return Err(StoreError::InvalidConfig(
                "pricing must list at least one product".into(),
            ));
        }

        self.price_list().map(|_| ())
    }

    /// Parses the price list into validated products and rules.
    ///
    /// Fails on the first bad entry or on a duplicated product code.
    pub fn price_list(&self) -> StoreResult<Vec<(Product, PricingRule)>> {
        let mut seen = HashSet::new();
        let mut list = Vec::with_capacity(self.pricing.len());

        for entry in &self.pricing {
            let (product, rule) = entry.to_rule().map_err(|e| {
                StoreError::InvalidConfig(format!("pricing entry '{}': {}", entry.code, e))
            })?;

            if !seen.insert(product.clone()) {
                return Err(StoreError::InvalidConfig(format!(
                    "product '{}' is priced more than once",
                    product
                )));
            }

            list.push((product, rule));
        }

        Ok(list)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("CHECKOUT_STORE_ID") {
            debug!(store_id = %id, "Overriding store ID from environment");
            self.store.id = id;
        }

        if let Ok(count) = std::env::var("CHECKOUT_TERMINALS") {
            match count.parse::<usize>() {
                Ok(n) => {
                    debug!(terminals = n, "Overriding terminal count from environment");
                    self.terminals.count = n;
                }
                Err(_) => warn!(value = %count, "Ignoring invalid CHECKOUT_TERMINALS"),
            }
        }

        if let Ok(pause) = std::env::var("CHECKOUT_MAX_PAUSE_MS") {
            match pause.parse::<u64>() {
                Ok(ms) => self.terminals.max_pause_ms = ms,
                Err(_) => warn!(value = %pause, "Ignoring invalid CHECKOUT_MAX_PAUSE_MS"),
            }
        }

        if let Ok(millis) = std::env::var("CHECKOUT_RUN_MILLIS") {
            match millis.parse::<u64>() {
                Ok(ms) => self.demo.run_millis = ms,
                Err(_) => warn!(value = %millis, "Ignoring invalid CHECKOUT_RUN_MILLIS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "checkout", "pos")
            .map(|dirs| dirs.config_dir().join("store.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the store ID.
    pub fn store_id(&self) -> &str {
        &self.store.id
    }

    /// How long the demo keeps the store open.
    pub fn run_duration(&self) -> Duration {
        Duration::from_millis(self.demo.run_millis)
    }
}
