//! # Product Commands
//!
//! Product lookup for the product grid and the scanner.
//!
//! Every product leaves the register as a [`ProductCard`]: the product plus
//! its price details from the engine, so the UI never prices anything itself.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User types "8801643628"                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  Is query a barcode? (8-13 digits)        │                         │
//! │  │  YES: Try exact barcode lookup first      │──► Found? Return [1]    │
//! │  │  NO:  Term search over name/SKU/barcode   │                         │
//! │  └───────────────────────────────────────────┘                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Price every hit against one settings snapshot                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::{PriceDetails, Product};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CatalogState, PricingState};

const DEFAULT_SEARCH_LIMIT: usize = 20;
const MAX_SEARCH_LIMIT: usize = 100;

/// A product together with its current price.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub product: Product,
    pub pricing: PriceDetails,
}

/// EAN-8, UPC-A and EAN-13 all fit in 8-13 digits.
fn is_barcode_query(query: &str) -> bool {
    let len = query.len();
    (8..=13).contains(&len) && query.chars().all(|c| c.is_ascii_digit())
}

/// Searches the catalog and prices the hits.
///
/// ## Arguments
/// * `query` - Search terms (empty lists the first page)
/// * `limit` - Maximum results (default: 20, max: 100)
pub fn search_products(
    catalog: &CatalogState,
    pricing: &PricingState,
    query: &str,
    limit: Option<usize>,
) -> Result<Vec<ProductCard>, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(MAX_SEARCH_LIMIT);
    debug!(query = %query, limit, "search_products command");

    let trimmed = query.trim();
    if is_barcode_query(trimmed) {
        if let Some(product) = catalog.find_by_barcode(trimmed) {
            return Ok(price_cards([product], pricing));
        }
    }

    let hits = catalog.search(query, limit)?;
    Ok(price_cards(hits, pricing))
}

/// Gets one product by id.
pub fn get_product_by_id(
    catalog: &CatalogState,
    pricing: &PricingState,
    id: &str,
) -> Result<ProductCard, ApiError> {
    debug!(id = %id, "get_product_by_id command");

    let product = catalog
        .find(id)
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    Ok(card(product, pricing))
}

/// Gets one product by scanned barcode.
pub fn get_product_by_barcode(
    catalog: &CatalogState,
    pricing: &PricingState,
    barcode: &str,
) -> Result<ProductCard, ApiError> {
    debug!(barcode = %barcode, "get_product_by_barcode command");

    let product = catalog
        .find_by_barcode(barcode)
        .ok_or_else(|| ApiError::not_found("Product", barcode))?;
    Ok(card(product, pricing))
}

fn card(product: &Product, pricing: &PricingState) -> ProductCard {
    ProductCard {
        product: product.clone(),
        pricing: pricing.price(product),
    }
}

fn price_cards<'a, I>(products: I, pricing: &PricingState) -> Vec<ProductCard>
where
    I: IntoIterator<Item = &'a Product>,
{
    let products: Vec<&Product> = products.into_iter().collect();
    let prices = pricing.price_all(products.iter().copied());

    products
        .into_iter()
        .zip(prices)
        .map(|(product, pricing)| ProductCard {
            product: product.clone(),
            pricing,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use bazaar_core::{DiscountOffer, FixedClock, Settings};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn fixtures() -> (CatalogState, PricingState) {
        let mut monitor = Product::new("mon-27", "Dell 27 Monitor", 4_500_000).in_category("display");
        monitor.barcode = Some("5397184246".into());

        let catalog = CatalogState::new(vec![
            monitor,
            Product::new("mon-24", "LG 24 Monitor", 2_800_000).in_category("display"),
            Product::new("hdmi", "HDMI Cable 2m", 80_000).in_category("cables"),
        ]);
        let pricing = PricingState::new(
            Settings::with_offers([
                DiscountOffer::percentage("displays", 10.0)
                    .named("Display Days")
                    .for_categories(["display"]),
            ]),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())),
        );
        (catalog, pricing)
    }

    #[test]
    fn test_is_barcode_query() {
        assert!(is_barcode_query("12345678"));
        assert!(is_barcode_query("1234567890123"));
        assert!(!is_barcode_query("1234567"));
        assert!(!is_barcode_query("monitor"));
    }

    #[test]
    fn test_search_prices_every_hit() {
        let (catalog, pricing) = fixtures();

        let cards = search_products(&catalog, &pricing, "monitor", None).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].pricing.final_price.cents(), 4_050_000);
        assert_eq!(cards[1].pricing.final_price.cents(), 2_520_000);

        let cards = search_products(&catalog, &pricing, "hdmi", None).unwrap();
        assert!(cards[0].pricing.best_offer.is_none());
    }

    #[test]
    fn test_search_by_barcode_and_limit() {
        let (catalog, pricing) = fixtures();

        let cards = search_products(&catalog, &pricing, "5397184246", None).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].product.id, "mon-27");

        let cards = search_products(&catalog, &pricing, "", Some(1)).unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_lookup_errors() {
        let (catalog, pricing) = fixtures();

        let card = get_product_by_id(&catalog, &pricing, "hdmi").unwrap();
        assert_eq!(card.pricing.final_price.cents(), 80_000);

        let card = get_product_by_barcode(&catalog, &pricing, "5397184246").unwrap();
        assert_eq!(card.pricing.best_offer.unwrap().name, "Display Days");

        let err = get_product_by_id(&catalog, &pricing, "nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = search_products(&catalog, &pricing, &"q".repeat(101), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
