//! # Quotation Commands
//!
//! PC-builder quotations: a list of chosen components (one per build slot)
//! priced the same way the cart prices them, stamped with a number and a
//! validity window.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PC Builder ──► create_quotation({ components: [{slot, productId}] })   │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  1. Reject an empty build                                               │
//! │  2. Resolve every component in the catalog                              │
//! │  3. Price all lines against ONE snapshot at ONE instant                 │
//! │  4. Number it (Q-XXXXXXXX), stamp issued / valid-until                  │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  Quotation { number, lines, totals, ... } ──► print template            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::validation::validate_quantity;
use bazaar_core::{calculate_product_price_at, CoreError, ValidationError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{CartLine, CartTotals, CatalogState, ConfigState, PricingState};

/// One chosen component.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteComponent {
    /// Build slot ("cpu", "motherboard", "psu", ...)
    pub slot: String,
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    pub components: Vec<QuoteComponent>,
}

/// A priced quotation line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationLine {
    pub slot: String,
    #[serde(flatten)]
    pub line: CartLine,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub number: String,
    pub store_name: String,
    pub store_address: Vec<String>,
    pub customer_name: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,

    /// Issue time in shop-local time, ready to print
    pub issued_local: String,

    /// ISO 4217 code every amount is quoted in
    pub currency_code: String,

    pub lines: Vec<QuotationLine>,
    pub totals: CartTotals,
}

/// `Q-` followed by the first 8 hex digits of a v4 UUID.
fn quotation_number() -> String {
    let id = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("Q-{}", &id[..8])
}

/// Prices a PC build into a quotation.
pub fn create_quotation(
    config: &ConfigState,
    catalog: &CatalogState,
    pricing: &PricingState,
    request: QuotationRequest,
) -> Result<Quotation, ApiError> {
    debug!(components = request.components.len(), "create_quotation command");

    if request.components.is_empty() {
        return Err(ValidationError::Required {
            field: "components".to_string(),
        }
        .into());
    }

    let settings = pricing.snapshot();
    let issued_at = pricing.now();

    let lines = request
        .components
        .into_iter()
        .map(|component| -> Result<QuotationLine, ApiError> {
            validate_quantity(component.quantity)?;
            let product = catalog
                .find(&component.product_id)
                .ok_or_else(|| CoreError::ProductNotFound(component.product_id.clone()))?;

            let details = calculate_product_price_at(product, &settings, issued_at);
            Ok(QuotationLine {
                slot: component.slot,
                line: CartLine {
                    line_total: details.line_total(component.quantity),
                    product: product.clone(),
                    quantity: component.quantity,
                    pricing: details,
                },
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let totals = CartTotals::from_lines(lines.iter().map(|l| &l.line));
    let quotation = Quotation {
        number: quotation_number(),
        store_name: config.store_name.clone(),
        store_address: config.store_address.clone(),
        customer_name: request.customer_name,
        issued_at,
        valid_until: issued_at + Duration::days(i64::from(config.quotation_validity_days)),
        issued_local: config
            .local_time(issued_at)
            .format("%d %b %Y %H:%M")
            .to_string(),
        currency_code: config.currency_code.clone(),
        lines,
        totals,
    };

    info!(
        number = %quotation.number,
        lines = quotation.lines.len(),
        total = %config.format_currency(quotation.totals.total),
        "Quotation created"
    );
    Ok(quotation)
}
