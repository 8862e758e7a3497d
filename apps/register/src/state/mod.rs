//! # State Module
//!
//! Register state, one type per concern. Commands take exactly the states
//! they need.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌─────────────┐ │
//! │  │ CatalogState │  │ PricingState │  │  CartState   │  │ ConfigState │ │
//! │  │              │  │              │  │              │  │             │ │
//! │  │  products    │  │ watch::Sender│  │  Arc<Mutex<  │  │ store name  │ │
//! │  │  (read-only) │  │ <Arc<Setting │  │    Cart      │  │ currency    │ │
//! │  │              │  │  s>> + Clock │  │  >>          │  │ paths       │ │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └─────────────┘ │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CatalogState / ConfigState: read-only after startup                 │
//! │  • PricingState: whole snapshots published through a watch channel     │
//! │  • CartState: short critical sections behind a Mutex                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
pub(crate) mod config;
mod pricing;

pub use cart::{Cart, CartItem, CartLine, CartState, CartTotals};
pub use catalog::CatalogState;
pub use config::ConfigState;
pub use pricing::PricingState;
