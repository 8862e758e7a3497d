//! # Domain Types
//!
//! Core domain types used throughout Bazaar POS.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Settings     │   │  PriceDetails   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │ + │  offers switch  │ → │  originalPrice  │       │
//! │  │  categoryId     │   │  specialOffers  │   │  finalPrice     │       │
//! │  │  priceCents     │   │  (offer.rs)     │   │  bestOffer      │       │
//! │  │  mrpCents       │   │                 │   │  mrp, save      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Product is owned by the catalog, Settings by the settings store.      │
//! │  PriceDetails is recomputed on every lookup and never stored.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::offer::DiscountOffer;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Read-only here; inventory mutation lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identifier.
    pub id: String,

    /// Display name shown to cashier and on receipts.
    pub name: String,

    /// Stock Keeping Unit.
    #[serde(default)]
    pub sku: Option<String>,

    /// Barcode (EAN-13, UPC-A, QR payload).
    #[serde(default)]
    pub barcode: Option<String>,

    /// Category reference. Uncategorised products never match a
    /// category-scoped offer.
    #[serde(default)]
    pub category_id: Option<String>,

    /// Selling price in cents. The baseline for every discount.
    pub price_cents: i64,

    /// List price in cents, shown struck through when above the price.
    #[serde(default)]
    pub mrp_cents: Option<i64>,

    /// Units on hand, when the catalog tracks it.
    #[serde(default)]
    pub stock: Option<i64>,

    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// Creates a product with only the fields pricing needs.
    ///
    /// ```rust
    /// use bazaar_core::Product;
    ///
    /// let ram = Product::new("ram-16", "16GB DDR5", 1_250_000)
    ///     .in_category("memory")
    ///     .with_mrp(1_400_000);
    /// assert_eq!(ram.category_id.as_deref(), Some("memory"));
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            sku: None,
            barcode: None,
            category_id: None,
            price_cents,
            mrp_cents: None,
            stock: None,
            image_url: None,
        }
    }

    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_mrp(mut self, mrp_cents: i64) -> Self {
        self.mrp_cents = Some(mrp_cents);
        self
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the MRP as a Money type.
    #[inline]
    pub fn mrp(&self) -> Option<Money> {
        self.mrp_cents.map(Money::from_cents)
    }

    /// The reference price savings are measured against: the MRP when it is
    /// above the selling price, the selling price otherwise.
    pub fn display_price(&self) -> Money {
        let price = self.price();
        match self.mrp() {
            Some(mrp) if mrp > price => mrp,
            _ => price,
        }
    }

    /// Checks whether `quantity` units are on hand.
    ///
    /// Products without a stock figure are always sellable.
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock.map_or(true, |stock| stock >= quantity)
    }
}

// =============================================================================
// Price Details
// =============================================================================

/// The outcome of pricing one product against one settings snapshot.
///
/// ## Invariants
/// - `0 <= final_price <= original_price` for non-negative prices
/// - `save_amount >= 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceDetails {
    /// The product's selling price, untouched by discounting.
    pub original_price: Money,

    /// Price after the single best offer.
    pub final_price: Money,

    /// The winning offer, if any applied.
    pub best_offer: Option<DiscountOffer>,

    /// The product's MRP, passed through for display.
    pub mrp: Option<Money>,

    /// What the customer saves against the display price. Never negative.
    pub save_amount: Money,
}

impl PriceDetails {
    /// Amount taken off by the winning offer.
    #[inline]
    pub fn discount(&self) -> Money {
        self.original_price - self.final_price
    }

    /// Line total for `quantity` units at the final price.
    #[inline]
    pub fn line_total(&self, quantity: i64) -> Money {
        self.final_price.multiply_quantity(quantity)
    }
}
