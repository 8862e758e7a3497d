//! # Pricing State
//!
//! Holds the live offer settings and the clock every price is computed with.
//!
//! ## Snapshot Publishing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  save_offer / remove_offer / set_offers_enabled                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  update(|settings| ...) ──► watch::Sender<Arc<Settings>>                │
//! │                                   │                                     │
//! │              ┌────────────────────┼────────────────────┐                │
//! │              ▼                    ▼                    ▼                │
//! │        price(product)       cart totals          subscribers            │
//! │        (snapshot())         (snapshot())         (changed().await)      │
//! │                                                                         │
//! │  Readers clone the Arc and price against a whole snapshot; an edit      │
//! │  in flight is never half-visible.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use bazaar_core::{calculate_product_price_at, Clock, PriceDetails, Product, Settings, SystemClock};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::state::config::read_file;

/// Live offer settings plus the injected clock.
pub struct PricingState {
    settings: watch::Sender<Arc<Settings>>,
    clock: Arc<dyn Clock>,
}

impl PricingState {
    pub fn new(settings: Settings, clock: Arc<dyn Clock>) -> Self {
        let (sender, _) = watch::channel(Arc::new(settings));
        PricingState {
            settings: sender,
            clock,
        }
    }

    /// Reads a settings document from disk.
    ///
    /// Malformed offer entries do not fail the load; they are counted and
    /// skipped at pricing time.
    pub fn load_settings(path: &Path) -> ConfigResult<Settings> {
        let contents = read_file(path)?;
        let settings = Settings::from_json(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let malformed = settings.malformed_count();
        if malformed > 0 {
            warn!(?path, malformed, "Skipping malformed offer entries");
        }
        info!(
            ?path,
            enabled = settings.special_offers_enabled,
            offers = settings.offers().count(),
            "Offer settings loaded"
        );

        Ok(settings)
    }

    /// Writes the current snapshot back as pretty JSON.
    ///
    /// Malformed entries are written back untouched.
    pub fn save_settings(&self, path: &Path) -> ConfigResult<()> {
        let snapshot = self.snapshot();
        let json = serde_json::to_string_pretty(&*snapshot).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!(?path, "Offer settings saved");
        Ok(())
    }

    /// Current settings snapshot.
    pub fn snapshot(&self) -> Arc<Settings> {
        self.settings.borrow().clone()
    }

    /// Receiver that wakes on every published edit.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Settings>> {
        self.settings.subscribe()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Prices one product against the current snapshot.
    pub fn price(&self, product: &Product) -> PriceDetails {
        let snapshot = self.snapshot();
        calculate_product_price_at(product, &snapshot, self.now())
    }

    /// Prices many products against one snapshot and one instant.
    pub fn price_all<'a, I>(&self, products: I) -> Vec<PriceDetails>
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let snapshot = self.snapshot();
        let now = self.now();
        products
            .into_iter()
            .map(|product| calculate_product_price_at(product, &snapshot, now))
            .collect()
    }

    /// Publishes a whole new settings document.
    pub fn replace(&self, settings: Settings) {
        self.settings.send_replace(Arc::new(settings));
        info!("Offer settings replaced");
    }

    /// Edits the settings under the channel lock and publishes the result.
    ///
    /// Snapshots handed out earlier keep their contents: the document is
    /// copied on write when a reader still holds it.
    pub fn update<F>(&self, edit: F)
    where
        F: FnOnce(&mut Settings),
    {
        self.settings
            .send_modify(|settings| edit(Arc::make_mut(settings)));
    }

    /// Like [`update`](Self::update), but only when `applies` holds for the
    /// current settings. Subscribers are not woken otherwise.
    ///
    /// Returns whether the edit ran.
    pub fn update_if<P, F>(&self, applies: P, edit: F) -> bool
    where
        P: FnOnce(&Settings) -> bool,
        F: FnOnce(&mut Settings),
    {
        self.settings.send_if_modified(|settings| {
            if !applies(settings) {
                return false;
            }
            edit(Arc::make_mut(settings));
            true
        })
    }
}

impl Default for PricingState {
    fn default() -> Self {
        Self::new(Settings::default(), Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for PricingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingState")
            .field("settings", &*self.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::{DiscountOffer, FixedClock};
    use chrono::TimeZone;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()))
    }

    fn keyboard() -> Product {
        Product::new("kb-1", "Keychron K2", 850_000).in_category("peripherals")
    }

    #[test]
    fn test_price_uses_current_snapshot() {
        let pricing = PricingState::new(Settings::default(), clock());
        assert_eq!(pricing.price(&keyboard()).final_price.cents(), 850_000);

        pricing.replace(Settings::with_offers([
            DiscountOffer::percentage("peri-10", 10.0).for_categories(["peripherals"]),
        ]));
        assert_eq!(pricing.price(&keyboard()).final_price.cents(), 765_000);
    }

    #[test]
    fn test_update_edits_in_place() {
        let pricing = PricingState::new(
            Settings::with_offers([DiscountOffer::fixed("flat", 500.0)]),
            clock(),
        );

        let mut removed = None;
        pricing.update(|settings| removed = settings.remove_offer("flat"));
        assert!(removed.is_some());
        assert!(pricing.snapshot().find_offer("flat").is_none());
        assert_eq!(pricing.price(&keyboard()).final_price.cents(), 850_000);
    }

    #[test]
    fn test_old_snapshot_is_unchanged_by_edit() {
        let pricing = PricingState::new(
            Settings::with_offers([DiscountOffer::fixed("flat", 500.0)]),
            clock(),
        );
        let before = pricing.snapshot();

        pricing.update(|settings| settings.special_offers_enabled = false);

        assert!(before.special_offers_enabled);
        assert!(!pricing.snapshot().special_offers_enabled);
    }

    #[test]
    fn test_update_if_skips_when_not_applicable() {
        let pricing = PricingState::new(
            Settings::with_offers([DiscountOffer::fixed("flat", 500.0)]),
            clock(),
        );
        let mut rx = pricing.subscribe();
        rx.borrow_and_update();

        let ran = pricing.update_if(
            |settings| settings.find_offer("missing").is_some(),
            |settings| settings.special_offers_enabled = false,
        );
        assert!(!ran);
        assert!(!rx.has_changed().unwrap());
        assert!(pricing.snapshot().special_offers_enabled);

        let ran = pricing.update_if(
            |settings| settings.find_offer("flat").is_some(),
            |settings| settings.special_offers_enabled = false,
        );
        assert!(ran);
        assert!(rx.has_changed().unwrap());
        assert!(!pricing.snapshot().special_offers_enabled);
    }

    #[test]
    fn test_price_all_shares_one_instant() {
        let expiry = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let pricing = PricingState::new(
            Settings::with_offers([DiscountOffer::fixed("ends-now", 100.0).expiring_at(expiry)]),
            clock(),
        );

        let products = [keyboard(), Product::new("mouse", "MX Master 3", 900_000)];
        let details = pricing.price_all(products.iter());
        assert_eq!(details.len(), 2);
        assert!(details.iter().all(|d| d.best_offer.is_none()));
    }

    #[tokio::test]
    async fn test_subscribers_see_edits() {
        let pricing = PricingState::new(Settings::default(), clock());
        let mut rx = pricing.subscribe();

        pricing.update(|settings| {
            settings.upsert_offer(DiscountOffer::percentage("sale", 5.0));
            settings.special_offers_enabled = true;
        });

        rx.changed().await.unwrap();
        assert!(rx.borrow().find_offer("sale").is_some());
    }

    #[test]
    fn test_settings_file_round_trip_keeps_malformed_entries() {
        let path = std::env::temp_dir().join(format!("bazaar-settings-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"{
                "specialOffersEnabled": true,
                "specialOffers": [
                    { "id": "p10", "name": "Ten", "enabled": true, "appliesTo": "all",
                      "discountType": "percentage", "discountValue": 10 },
                    { "id": "junk", "discountType": "bogus" }
                ]
            }"#,
        )
        .unwrap();

        let settings = PricingState::load_settings(&path).unwrap();
        assert_eq!(settings.malformed_count(), 1);

        let pricing = PricingState::new(settings, clock());
        assert_eq!(pricing.price(&keyboard()).final_price.cents(), 765_000);

        pricing.save_settings(&path).unwrap();
        let reloaded = PricingState::load_settings(&path).unwrap();
        assert_eq!(reloaded.malformed_count(), 1);
        assert_eq!(reloaded.offers().count(), 1);

        std::fs::remove_file(&path).unwrap();
    }
}
