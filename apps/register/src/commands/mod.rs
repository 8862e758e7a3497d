//! # Commands Module
//!
//! Everything the UI can ask the register to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── product.rs    ◄─── Product search and lookup, priced
//! ├── cart.rs       ◄─── Cart manipulation
//! ├── offers.rs     ◄─── Offer editor
//! └── quotation.rs  ◄─── PC-builder quotations
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs pricing
//! fn list_offers(pricing: &PricingState)
//!
//! // Needs catalog, cart and pricing
//! fn add_to_cart(catalog: &CatalogState, cart: &CartState, pricing: &PricingState, ...)
//! ```
//!
//! Failures come back as [`ApiError`](crate::error::ApiError).

pub mod cart;
pub mod offers;
pub mod product;
pub mod quotation;
