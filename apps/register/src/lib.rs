//! # Bazaar Register Library
//!
//! The register layer of Bazaar POS: it loads configuration, the catalog and
//! the offer settings, keeps the live state, and exposes the commands the UI
//! calls. Every price it hands out comes from `bazaar-core`.
//!
//! ## Module Organization
//! ```text
//! bazaar_register/
//! ├── lib.rs          ◄─── You are here (startup, logging, price board)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── TOML config + env overrides
//! │   ├── catalog.rs  ◄─── Read-only product catalog
//! │   ├── pricing.rs  ◄─── Offer settings snapshots + clock
//! │   └── cart.rs     ◄─── Cart state management
//! ├── commands/
//! │   ├── product.rs  ◄─── Product search/lookup
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── offers.rs   ◄─── Offer editor
//! │   └── quotation.rs◄─── PC-builder quotations
//! └── error.rs        ◄─── ConfigError + ApiError
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::Path;
use std::sync::Arc;

use bazaar_core::{Settings, SystemClock};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use error::ConfigResult;
use state::{CartState, CatalogState, ConfigState, PricingState};

/// All register state, built once at startup.
#[derive(Debug)]
pub struct Register {
    pub config: ConfigState,
    pub catalog: CatalogState,
    pub pricing: PricingState,
    pub cart: CartState,
}

impl Register {
    /// Loads the catalog and offer settings named by `config`.
    ///
    /// A missing catalog or settings file is not an error: the register
    /// starts with an empty catalog or with offers switched off.
    pub fn open(config: ConfigState) -> ConfigResult<Self> {
        let catalog = match config.catalog_file() {
            Some(path) if path.exists() => CatalogState::load(&path)?,
            other => {
                debug!(path = ?other, "No catalog file, starting empty");
                CatalogState::default()
            }
        };

        let settings = match config.settings_file() {
            Some(path) if path.exists() => PricingState::load_settings(&path)?,
            other => {
                debug!(path = ?other, "No settings file, offers disabled");
                Settings::default()
            }
        };

        Ok(Register {
            config,
            catalog,
            pricing: PricingState::new(settings, Arc::new(SystemClock)),
            cart: CartState::new(),
        })
    }

    /// Writes the live offer settings to the configured settings file.
    pub fn save_settings(&self) -> ConfigResult<()> {
        match self.config.settings_file() {
            Some(path) => self.pricing.save_settings(&path),
            None => Err(error::ConfigError::Invalid(
                "no settings file location available".to_string(),
            )),
        }
    }

    /// Renders every catalog product with its current price.
    pub fn price_board(&self) -> String {
        let config = &self.config;
        let products = self.catalog.products();
        let prices = self.pricing.price_all(products);

        let mut board = format!("{}\n", config.store_name);
        board.push_str(&board_row("Product", "Price", "Final", "You save", "Offer"));

        for (product, details) in products.iter().zip(&prices) {
            let offer = details
                .best_offer
                .as_ref()
                .map(|offer| if offer.name.is_empty() { offer.id.as_str() } else { offer.name.as_str() })
                .unwrap_or("-");
            board.push_str(&board_row(
                &truncate(&product.name, 32),
                &config.format_currency(details.original_price),
                &config.format_currency(details.final_price),
                &config.format_currency(details.save_amount),
                offer,
            ));
        }

        board
    }
}

fn board_row(name: &str, price: &str, final_price: &str, save: &str, offer: &str) -> String {
    format!("{:<32} {:>14} {:>14} {:>12}  {}\n", name, price, final_price, save, offer)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(max - 1).collect();
        short.push('…');
        short
    }
}

/// Starts the register and prints the price board.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging ─── tracing-subscriber, RUST_LOG overrides       │
/// │  2. Load Config ────────── defaults → register.toml → BAZAAR_* env      │
/// │  3. Load Catalog ───────── catalog.json (JSON array of products)        │
/// │  4. Load Offer Settings ── settings.json (malformed entries skipped)    │
/// │  5. Price Board ────────── every product through the pricing engine     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run(config_path: Option<&Path>) -> ConfigResult<()> {
    init_tracing();

    info!("Starting Bazaar POS register");

    let config = ConfigState::load(config_path.map(Path::to_path_buf))?;
    let register = Register::open(config)?;

    info!(
        store = %register.config.store_name,
        products = register.catalog.len(),
        offers = register.pricing.snapshot().offers().count(),
        "Register ready"
    );

    print!("{}", register.price_board());
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bazaar=trace` - Show trace for bazaar crates only
/// - Default: INFO, DEBUG for bazaar crates
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,bazaar=debug"));

    // Logs go to stderr so the price board on stdout stays clean.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
