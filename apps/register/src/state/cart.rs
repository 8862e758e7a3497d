//! # Cart State
//!
//! The register's working cart.
//!
//! ## Pricing Model
//! A cart line keeps a snapshot of the product and a quantity, nothing else.
//! Prices are never stored: every read runs the pricing engine against the
//! settings snapshot it is handed, so an offer that expires or is edited
//! while the cart is open shows up on the next read.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Click Product ──────────► add_to_cart() ───────► line merged / pushed  │
//! │  Change Quantity ────────► update_cart_item() ──► quantity set (0 = rm) │
//! │  Click Remove ───────────► remove_from_cart() ──► line removed          │
//! │  Click Clear ────────────► clear_cart() ────────► lines cleared         │
//! │                                                                         │
//! │  View Cart ──────────────► get_cart() ──► lines(settings, now)          │
//! │                                           totals(settings, now)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use bazaar_core::validation::{validate_cart_size, validate_quantity};
use bazaar_core::{
    calculate_product_price_at, CoreError, CoreResult, Money, PriceDetails, Product, Settings,
    MAX_CART_ITEMS, MAX_ITEM_QUANTITY,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A product in the cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product as it was when scanned
    pub product: Product,

    pub quantity: i64,

    pub added_at: DateTime<Utc>,
}

/// A cart item priced for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    pub quantity: i64,
    pub pricing: PriceDetails,

    /// Final unit price times quantity
    pub line_total: Money,
}

/// The shopping cart.
///
/// ## Invariants
/// - One line per product id (adding the same product raises the quantity)
/// - Quantity is always in `1..=MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_ITEMS` lines
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Adds a product or raises the quantity of its existing line.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            let requested = item.quantity + quantity;
            if requested > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = requested;
            return Ok(());
        }

        validate_cart_size(self.items.len()).map_err(|_| CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        })?;

        self.items.push(CartItem {
            product: product.clone(),
            quantity,
            added_at: now,
        });
        Ok(())
    }

    /// Sets the quantity of a line. Zero removes it.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product.id == product_id)
            .ok_or_else(|| CoreError::NotInCart(product_id.to_string()))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let before = self.items.len();
        self.items.retain(|i| i.product.id != product_id);

        if self.items.len() == before {
            Err(CoreError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Quantity already on the line for `product_id` (0 when absent).
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.items
            .iter()
            .find(|i| i.product.id == product_id)
            .map_or(0, |i| i.quantity)
    }

    /// Prices every line against one settings snapshot and one instant.
    pub fn lines(&self, settings: &Settings, now: DateTime<Utc>) -> Vec<CartLine> {
        self.items
            .iter()
            .map(|item| {
                let pricing = calculate_product_price_at(&item.product, settings, now);
                CartLine {
                    line_total: pricing.line_total(item.quantity),
                    product: item.product.clone(),
                    quantity: item.quantity,
                    pricing,
                }
            })
            .collect()
    }

    pub fn totals(&self, settings: &Settings, now: DateTime<Utc>) -> CartTotals {
        CartTotals::from_lines(&self.lines(settings, now))
    }
}

/// Cart totals summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,

    /// Sum of original prices
    pub subtotal: Money,

    /// Sum of offer discounts
    pub discount_total: Money,

    /// Amount payable
    pub total: Money,

    /// Savings against MRP (or list price when there is no MRP)
    pub savings: Money,
}

impl CartTotals {
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a CartLine>,
    {
        lines.into_iter().fold(CartTotals::default(), |mut totals, line| {
            let qty = line.quantity;
            totals.item_count += 1;
            totals.total_quantity += qty;
            totals.subtotal += line.pricing.original_price * qty;
            totals.discount_total += line.pricing.discount() * qty;
            totals.total += line.line_total;
            totals.savings += line.pricing.save_amount * qty;
            totals
        })
    }
}

/// Shared cart handle.
///
/// A panic while the lock is held leaves the cart in whatever state the
/// edit reached; the lock is recovered rather than failing every later
/// command.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    pub fn new() -> Self {
        CartState::default()
    }

    /// Runs `f` with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Runs `f` with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}
