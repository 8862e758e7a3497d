//! # Offer Commands
//!
//! The offer editor. Edits are validated here and published as a new
//! settings snapshot; every later price call sees them.

use bazaar_core::validation::validate_offer;
use bazaar_core::{CoreError, DiscountOffer, Settings};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::PricingState;

/// What the offer editor shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffersResponse {
    pub special_offers_enabled: bool,

    /// Well-formed offers in list order
    pub offers: Vec<DiscountOffer>,

    /// Stored entries that could not be read and are never applied
    pub malformed_count: usize,
}

impl From<&Settings> for OffersResponse {
    fn from(settings: &Settings) -> Self {
        OffersResponse {
            special_offers_enabled: settings.special_offers_enabled,
            offers: settings.offers().cloned().collect(),
            malformed_count: settings.malformed_count(),
        }
    }
}

pub fn list_offers(pricing: &PricingState) -> OffersResponse {
    debug!("list_offers command");
    OffersResponse::from(&*pricing.snapshot())
}

/// Creates an offer, or replaces the one with the same id in place.
pub fn save_offer(pricing: &PricingState, offer: DiscountOffer) -> Result<OffersResponse, ApiError> {
    debug!(offer_id = %offer.id, "save_offer command");

    validate_offer(&offer)?;

    let id = offer.id.clone();
    pricing.update(|settings| settings.upsert_offer(offer));
    info!(offer_id = %id, "Offer saved");

    Ok(list_offers(pricing))
}

pub fn remove_offer(pricing: &PricingState, offer_id: &str) -> Result<OffersResponse, ApiError> {
    debug!(offer_id = %offer_id, "remove_offer command");

    let removed = pricing.update_if(
        |settings| settings.find_offer(offer_id).is_some(),
        |settings| {
            settings.remove_offer(offer_id);
        },
    );

    if !removed {
        return Err(CoreError::OfferNotFound(offer_id.to_string()).into());
    }
    info!(offer_id = %offer_id, "Offer removed");

    Ok(list_offers(pricing))
}

/// Flips the master switch.
pub fn set_offers_enabled(pricing: &PricingState, enabled: bool) -> OffersResponse {
    debug!(enabled, "set_offers_enabled command");

    pricing.update(|settings| settings.special_offers_enabled = enabled);
    info!(enabled, "Special offers switched");

    list_offers(pricing)
}
