//! # Pricing Engine
//!
//! Resolves the single best discount offer for a product and computes the
//! price every screen and document shows.
//!
//! ## Who Calls This
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Product card ─────┐                                                    │
//! │                    │                                                    │
//! │  Cart line ────────┼──► calculate_product_price(product, settings, clock)│
//! │                    │                  │                                 │
//! │  Quotation line ───┘                  ▼                                 │
//! │                               PriceDetails { original, final,           │
//! │                                              bestOffer, mrp, save }     │
//! │                                                                         │
//! │  One function, so a badge, a cart total and a printed quotation can    │
//! │  never disagree about a price.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Resolution Rules
//! 1. Master switch off → no offer.
//! 2. Walk offers in list order, keep the eligible ones (enabled, not
//!    expired, in scope).
//! 3. Each eligible offer yields a discount clamped into `[0, price]`.
//! 4. The strictly largest discount wins. On a tie the earlier offer stays,
//!    and a zero discount never beats "no offer".
//! 5. Savings are measured from the MRP when it is above the price.
//!
//! Results are cheap to compute and must not be cached across calls: an
//! offer can expire, or be edited, between two renders.

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::money::Money;
use crate::offer::{DiscountOffer, Settings};
use crate::types::{PriceDetails, Product};

/// Prices `product` against `settings`, sampling `clock` once.
///
/// ## Example
/// ```rust
/// use bazaar_core::{calculate_product_price, DiscountOffer, Product, Settings, SystemClock};
///
/// let product = Product::new("kb-1", "Mechanical Keyboard", 100_000);
/// let settings = Settings::with_offers([DiscountOffer::percentage("launch", 20.0)]);
///
/// let details = calculate_product_price(&product, &settings, &SystemClock);
/// assert_eq!(details.final_price.cents(), 80_000);
/// assert_eq!(details.best_offer.unwrap().id, "launch");
/// ```
pub fn calculate_product_price<C>(product: &Product, settings: &Settings, clock: &C) -> PriceDetails
where
    C: Clock + ?Sized,
{
    calculate_product_price_at(product, settings, clock.now())
}

/// Prices `product` against `settings` as of `now`.
pub fn calculate_product_price_at(
    product: &Product,
    settings: &Settings,
    now: DateTime<Utc>,
) -> PriceDetails {
    let original_price = product.price();

    let (best_offer, discount) = match resolve_best_offer(product, settings, now) {
        Some((offer, discount)) => (Some(offer.clone()), discount),
        None => (None, Money::zero()),
    };

    let final_price = original_price - discount;
    let save_amount = (product.display_price() - final_price).non_negative();

    PriceDetails {
        original_price,
        final_price,
        best_offer,
        mrp: product.mrp(),
        save_amount,
    }
}

/// Finds the winning offer and its discount without building `PriceDetails`.
///
/// Returns `None` when the master switch is off, no offer is eligible, or
/// every eligible offer discounts nothing.
pub fn resolve_best_offer<'a>(
    product: &Product,
    settings: &'a Settings,
    now: DateTime<Utc>,
) -> Option<(&'a DiscountOffer, Money)> {
    if !settings.special_offers_enabled {
        return None;
    }

    let price = product.price();
    let mut best: Option<(&DiscountOffer, Money)> = None;
    let mut best_discount = Money::zero();

    for offer in settings.offers().filter(|offer| offer.is_eligible(product, now)) {
        let discount = offer.discount_for(price);
        // strictly greater: the first offer in list order keeps a tie
        if discount > best_discount {
            best_discount = discount;
            best = Some((offer, discount));
        }
    }

    best
}

// =============================================================================
// Unit Tests
// =============================================================================
