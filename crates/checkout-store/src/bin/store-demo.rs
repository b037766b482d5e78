//! # Store Demo
//!
//! Opens a store, lets its terminals serve random customers for a while,
//! then closes and prints what each terminal took.
//!
//! ## Usage
//! ```bash
//! # Defaults: 5 terminals, 100ms, sample price list
//! cargo run -p checkout-store --bin store-demo
//!
//! # Busier store, open for two seconds
//! cargo run -p checkout-store --bin store-demo -- --terminals 12 --millis 2000
//!
//! # Custom price list
//! cargo run -p checkout-store --bin store-demo -- --config ./store.toml
//!
//! # Quieter logs
//! RUST_LOG=warn cargo run -p checkout-store --bin store-demo
//! ```

use std::env;
use std::path::PathBuf;

use checkout_store::{total_takings, Store, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,checkout=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_usage() {
    println!("Checkout Store Demo");
    println!();
    println!("Usage: store-demo [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>    Store config file (default: platform config dir)");
    println!("  -t, --terminals <N>    Number of terminals (overrides config)");
    println!("  -m, --millis <MS>      How long the store stays open (overrides config)");
    println!("      --json             Print terminal reports as JSON");
    println!("  -h, --help             Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut terminals: Option<usize> = None;
    let mut millis: Option<u64> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--terminals" | "-t" => {
                if i + 1 < args.len() {
                    terminals = Some(args[i + 1].parse()?);
                    i += 1;
                }
            }
            "--millis" | "-m" => {
                if i + 1 < args.len() {
                    millis = Some(args[i + 1].parse()?);
                    i += 1;
                }
            }
            "--json" => json = true,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                return Ok(());
            }
        }
        i += 1;
    }

    init_tracing();

    let mut config = StoreConfig::load(config_path)?;
    if let Some(n) = terminals {
        config.terminals.count = n;
    }
    if let Some(ms) = millis {
        config.demo.run_millis = ms;
    }

    let run_for = config.run_duration();
    let mut store = Store::open(config)?;

    info!(
        store_id = %store.config().store_id(),
        millis = run_for.as_millis() as u64,
        "Opening store"
    );

    // Reports come back in terminal order
    let reports = store.run_for(run_for).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!();
    println!("{:<14} {:>10} {:>8} {:>12}", "Terminal", "Customers", "Failed", "Takings");
    println!("{}", "-".repeat(47));
    for report in &reports {
        println!(
            "{:<14} {:>10} {:>8} {:>12}",
            report.terminal,
            report.customers_served,
            report.failed_scans,
            report.takings.to_string()
        );
    }
    println!("{}", "-".repeat(47));

    let customers: u64 = reports.iter().map(|r| r.customers_served).sum();
    println!(
        "{:<14} {:>10} {:>8} {:>12}",
        "Total",
        customers,
        "",
        total_takings(&reports).to_string()
    );

    Ok(())
}
