//! # bazaar-core: Pure Business Logic for Bazaar POS
//!
//! This crate holds the pricing engine and the types around it as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI (product grid, cart, PC builder)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              bazaar-register (commands + state)                 │   │
//! │  │    search_products, add_to_cart, save_offer, create_quotation  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  money  │ │  offer  │ │ pricing │ │  clock  │  │   │
//! │  │   │ Product │ │  Money  │ │ Offers  │ │ best    │ │ injected│  │   │
//! │  │   │ Details │ │  rates  │ │Settings │ │ offer   │ │  "now"  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product and PriceDetails
//! - [`money`] - Money with integer arithmetic
//! - [`offer`] - Discount offers and the settings snapshot
//! - [`pricing`] - The offer resolver / price calculator
//! - [`clock`] - Time source abstraction for expiry
//! - [`validation`] - Edit-time business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::{calculate_product_price, DiscountOffer, FixedClock, Product, Settings};
//! use chrono::Utc;
//!
//! let gpu = Product::new("gpu-1", "RTX 4070", 18_500_000).in_category("gpu");
//! let settings = Settings::with_offers([
//!     DiscountOffer::fixed("gpu-week", 10_000.0).for_categories(["gpu"]),
//! ]);
//!
//! let details = calculate_product_price(&gpu, &settings, &FixedClock(Utc::now()));
//! assert_eq!(details.final_price.cents(), 17_500_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod money;
pub mod offer;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use offer::{DiscountKind, DiscountOffer, OfferEntry, OfferScope, Settings};
pub use pricing::{calculate_product_price, calculate_product_price_at, resolve_best_offer};
pub use types::{PriceDetails, Product};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
