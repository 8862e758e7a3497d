//! # Cart Commands
//!
//! Cart manipulation. Every command answers with the whole priced cart so the
//! UI can redraw from one response.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌───────────┐                       │
//! │  │  Empty   │────►│ In Cart  │────►│ Quotation │                       │
//! │  │  Cart    │     │          │     │ / Checkout│                       │
//! │  └──────────┘     └──────────┘     └───────────┘                       │
//! │                        │                                                │
//! │                   add_to_cart                                           │
//! │                   update_cart_item                                      │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►  (back to empty)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::Product;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{Cart, CartLine, CartState, CartTotals, CatalogState, PricingState};

/// Cart response with priced lines and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl CartResponse {
    /// Prices the cart against the current settings snapshot.
    fn build(cart: &Cart, pricing: &PricingState) -> Self {
        let settings = pricing.snapshot();
        let lines = cart.lines(&settings, pricing.now());
        let totals = CartTotals::from_lines(&lines);
        CartResponse { lines, totals }
    }
}

/// Rejects a line quantity above the product's tracked stock.
fn check_stock(product: &Product, line_quantity: i64) -> Result<(), ApiError> {
    if product.has_stock_for(line_quantity) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Only {} of {} in stock",
            product.stock.unwrap_or_default(),
            product.name
        )))
    }
}

/// Gets the current cart, priced as of now.
pub fn get_cart(cart: &CartState, pricing: &PricingState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::build(c, pricing))
}

/// Adds a product to the cart.
///
/// ## Arguments
/// * `product_id` - Catalog id to add
/// * `quantity` - Quantity to add (default: 1)
pub fn add_to_cart(
    catalog: &CatalogState,
    cart: &CartState,
    pricing: &PricingState,
    product_id: &str,
    quantity: Option<i64>,
) -> Result<CartResponse, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product_id, quantity, "add_to_cart command");

    let product = catalog
        .find(product_id)
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    cart.with_cart_mut(|c| {
        check_stock(product, c.quantity_of(product_id).saturating_add(quantity))?;
        c.add_item(product, quantity, pricing.now())?;
        Ok::<_, ApiError>(CartResponse::build(c, pricing))
    })
}

/// Sets the quantity of a cart line. Quantity 0 removes the line.
pub fn update_cart_item(
    catalog: &CatalogState,
    cart: &CartState,
    pricing: &PricingState,
    product_id: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, quantity, "update_cart_item command");

    cart.with_cart_mut(|c| {
        if quantity > 0 {
            if let Some(product) = catalog.find(product_id) {
                check_stock(product, quantity)?;
            }
        }
        c.update_quantity(product_id, quantity)?;
        Ok::<_, ApiError>(CartResponse::build(c, pricing))
    })
}

pub fn remove_from_cart(
    cart: &CartState,
    pricing: &PricingState,
    product_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, "remove_from_cart command");

    cart.with_cart_mut(|c| {
        c.remove_item(product_id)?;
        Ok::<_, ApiError>(CartResponse::build(c, pricing))
    })
}

pub fn clear_cart(cart: &CartState, pricing: &PricingState) -> CartResponse {
    debug!("clear_cart command");

    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::build(c, pricing)
    })
}
