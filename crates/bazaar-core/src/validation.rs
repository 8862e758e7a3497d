//! # Validation Module
//!
//! Edit-time validation for Bazaar POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI                                                           │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate feedback in the offer editor / quantity field           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register commands                                            │
//! │  └── THIS MODULE: rejects bad offers before they reach the store       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing engine                                               │
//! │  └── Never rejects. Clamps what slipped through, skips what can't      │
//! │      be read.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::validation::{validate_offer, validate_quantity};
//! use bazaar_core::DiscountOffer;
//!
//! validate_offer(&DiscountOffer::percentage("eid", 15.0)).unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::offer::{DiscountKind, DiscountOffer, OfferScope};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Offer Validators
// =============================================================================

/// Validates a discount offer as submitted by the offer editor.
///
/// ## Rules
/// - `id` must not be blank (edits and removals address offers by id)
/// - `discount_value` must be a finite, non-negative number
/// - percentage offers cannot exceed 100%
/// - category / product offers must list at least one non-blank target
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::validate_offer;
/// use bazaar_core::DiscountOffer;
///
/// assert!(validate_offer(&DiscountOffer::percentage("x", 120.0)).is_err());
/// assert!(validate_offer(&DiscountOffer::fixed("x", 50.0).for_categories(Vec::<String>::new())).is_err());
/// ```
pub fn validate_offer(offer: &DiscountOffer) -> ValidationResult<()> {
    if offer.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "offer id".to_string(),
        });
    }

    if !offer.discount_value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "discountValue".to_string(),
            reason: "must be a number".to_string(),
        });
    }

    match offer.discount_type {
        DiscountKind::Percentage => {
            if !(0.0..=100.0).contains(&offer.discount_value) {
                return Err(ValidationError::OutOfRange {
                    field: "discountValue".to_string(),
                    min: 0,
                    max: 100,
                });
            }
        }
        DiscountKind::Fixed => {
            if offer.discount_value < 0.0 {
                return Err(ValidationError::OutOfRange {
                    field: "discountValue".to_string(),
                    min: 0,
                    max: i64::MAX,
                });
            }
        }
    }

    match offer.applies_to {
        OfferScope::All => {}
        OfferScope::Categories | OfferScope::Products => {
            if offer.target_ids.is_empty() || offer.target_ids.iter().any(|t| t.trim().is_empty()) {
                return Err(ValidationError::NoTargets {
                    field: "targetIds".to_string(),
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns the first page of the catalog)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, bundled accessories)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size before adding another line.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
