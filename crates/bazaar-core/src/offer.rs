//! # Discount Offers
//!
//! Shop-wide promotional offers and the settings snapshot that carries them.
//!
//! ## Offer Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DiscountOffer                                                          │
//! │                                                                         │
//! │  enabled ─────────── false → never applies                              │
//! │  expiryDate ──────── live only while now < expiry                       │
//! │  appliesTo ───────┬─ all         → every product                        │
//! │                   ├─ categories  → product.categoryId ∈ targetIds       │
//! │                   └─ products    → product.id ∈ targetIds               │
//! │  discountType ────┬─ percentage  → price × value / 100                  │
//! │                   └─ fixed       → value (major units)                  │
//! │                                                                         │
//! │  Every candidate discount is clamped into [0, price].                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tolerant Parsing
//! Offers are edited by shop admins and stored as JSON. A settings file must
//! still load when one entry is broken, so `Settings::special_offers` holds
//! [`OfferEntry`] values: entries that do not parse as a `DiscountOffer` are
//! kept verbatim as [`OfferEntry::Malformed`] and are never priced.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Offer Scope & Discount Kind
// =============================================================================

/// Which products an offer applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OfferScope {
    /// Every product in the shop.
    All,
    /// Products whose category is listed in `target_ids`.
    Categories,
    /// Products whose id is listed in `target_ids`.
    Products,
}

/// How `discount_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// Percent of the product price (20.0 = 20% off).
    Percentage,
    /// Absolute amount in major currency units (600.0 = 600 off).
    Fixed,
}

// =============================================================================
// Discount Offer
// =============================================================================

/// A promotional offer configured in the shop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountOffer {
    /// Identifier used by the offer editor. May be empty in legacy data.
    #[serde(default)]
    pub id: String,

    /// Label shown on product cards and receipts ("Eid Sale").
    #[serde(default)]
    pub name: String,

    /// Disabled offers never apply.
    #[serde(default)]
    pub enabled: bool,

    /// The offer stops applying once this instant has been reached.
    #[serde(
        default,
        deserialize_with = "deserialize_expiry",
        serialize_with = "serialize_expiry",
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<DateTime<Utc>>,

    pub applies_to: OfferScope,

    /// Category or product ids, depending on `applies_to`.
    #[serde(default, deserialize_with = "deserialize_target_ids")]
    pub target_ids: Vec<String>,

    pub discount_type: DiscountKind,

    /// Percent (for `Percentage`) or major-unit amount (for `Fixed`).
    pub discount_value: f64,
}

impl DiscountOffer {
    /// Creates an enabled, shop-wide percentage offer.
    ///
    /// ```rust
    /// use bazaar_core::offer::{DiscountOffer, OfferScope};
    ///
    /// let offer = DiscountOffer::percentage("summer", 20.0);
    /// assert!(offer.enabled);
    /// assert_eq!(offer.applies_to, OfferScope::All);
    /// ```
    pub fn percentage(id: impl Into<String>, percent: f64) -> Self {
        Self::new(id, DiscountKind::Percentage, percent)
    }

    /// Creates an enabled, shop-wide fixed-amount offer (major units).
    pub fn fixed(id: impl Into<String>, amount: f64) -> Self {
        Self::new(id, DiscountKind::Fixed, amount)
    }

    fn new(id: impl Into<String>, kind: DiscountKind, value: f64) -> Self {
        DiscountOffer {
            id: id.into(),
            name: String::new(),
            enabled: true,
            expiry_date: None,
            applies_to: OfferScope::All,
            target_ids: Vec::new(),
            discount_type: kind,
            discount_value: value,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restricts the offer to the given category ids.
    pub fn for_categories<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applies_to = OfferScope::Categories;
        self.target_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts the offer to the given product ids.
    pub fn for_products<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applies_to = OfferScope::Products;
        self.target_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn expiring_at(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry_date = Some(expiry);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// True once `now` has reached the expiry date.
    ///
    /// An offer is live only while `now` is strictly before its expiry, so
    /// an offer expiring exactly at `now` is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry <= now)
    }

    /// Whether the product falls inside this offer's scope.
    pub fn targets(&self, product: &Product) -> bool {
        match self.applies_to {
            OfferScope::All => true,
            OfferScope::Categories => product
                .category_id
                .as_deref()
                .is_some_and(|category| self.lists(category)),
            OfferScope::Products => self.lists(&product.id),
        }
    }

    fn lists(&self, id: &str) -> bool {
        self.target_ids.iter().any(|target| target == id)
    }

    /// Enabled, not expired at `now`, and in scope for `product`.
    pub fn is_eligible(&self, product: &Product, now: DateTime<Utc>) -> bool {
        self.enabled && !self.is_expired_at(now) && self.targets(product)
    }

    /// The amount this offer takes off `price`, clamped into `[0, price]`.
    ///
    /// ```rust
    /// use bazaar_core::money::Money;
    /// use bazaar_core::offer::DiscountOffer;
    ///
    /// let price = Money::from_cents(50_000);
    /// assert_eq!(DiscountOffer::percentage("p", 20.0).discount_for(price).cents(), 10_000);
    /// // 600 off a 500 product takes off 500, never more
    /// assert_eq!(DiscountOffer::fixed("f", 600.0).discount_for(price), price);
    /// ```
    pub fn discount_for(&self, price: Money) -> Money {
        let ceiling = price.non_negative();
        let raw = match self.discount_type {
            DiscountKind::Percentage => ceiling.percent_of(self.discount_value),
            DiscountKind::Fixed => Money::from_major_units(self.discount_value),
        };
        raw.clamp(Money::zero(), ceiling)
    }
}

// =============================================================================
// Settings Snapshot
// =============================================================================

/// One element of the stored offer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OfferEntry {
    Offer(DiscountOffer),
    /// Kept as-is so saving settings back does not lose admin data.
    Malformed(serde_json::Value),
}

impl From<DiscountOffer> for OfferEntry {
    fn from(offer: DiscountOffer) -> Self {
        OfferEntry::Offer(offer)
    }
}

/// The part of the shop settings the pricing engine reads.
///
/// Always handed to the engine as a value; the engine never reaches into a
/// global settings store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Master switch. When off the offer list is not consulted at all.
    #[serde(default, deserialize_with = "null_as_default")]
    pub special_offers_enabled: bool,

    /// Offers in admin-defined order. Order decides ties.
    #[serde(default, deserialize_with = "null_as_default")]
    pub special_offers: Vec<OfferEntry>,
}

impl Settings {
    /// Creates settings with the master switch on and the given offers.
    pub fn with_offers(offers: impl IntoIterator<Item = DiscountOffer>) -> Self {
        Settings {
            special_offers_enabled: true,
            special_offers: offers.into_iter().map(OfferEntry::from).collect(),
        }
    }

    /// Parses a settings document, tolerating malformed offer entries.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Well-formed offers in list order.
    pub fn offers(&self) -> impl Iterator<Item = &DiscountOffer> {
        self.special_offers.iter().filter_map(|entry| match entry {
            OfferEntry::Offer(offer) => Some(offer),
            OfferEntry::Malformed(_) => None,
        })
    }

    /// Number of entries that will never be priced because they are malformed.
    pub fn malformed_count(&self) -> usize {
        self.special_offers
            .iter()
            .filter(|entry| matches!(entry, OfferEntry::Malformed(_)))
            .count()
    }

    pub fn find_offer(&self, id: &str) -> Option<&DiscountOffer> {
        self.offers().find(|offer| offer.id == id)
    }

    /// Replaces the offer with the same id in place, or appends it.
    ///
    /// Replacing keeps the list position, so tie-breaks do not change when an
    /// admin edits an existing offer.
    pub fn upsert_offer(&mut self, offer: DiscountOffer) {
        let existing = self.special_offers.iter_mut().find(
            |entry| matches!(entry, OfferEntry::Offer(current) if current.id == offer.id),
        );
        match existing {
            Some(entry) => *entry = OfferEntry::Offer(offer),
            None => self.special_offers.push(OfferEntry::Offer(offer)),
        }
    }

    /// Removes the offer with the given id and returns it.
    pub fn remove_offer(&mut self, id: &str) -> Option<DiscountOffer> {
        let index = self
            .special_offers
            .iter()
            .position(|entry| matches!(entry, OfferEntry::Offer(offer) if offer.id == id))?;
        match self.special_offers.remove(index) {
            OfferEntry::Offer(offer) => Some(offer),
            OfferEntry::Malformed(_) => None,
        }
    }
}

// =============================================================================
// Serde Helpers
// =============================================================================

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ids arrive as strings from the editor but as numbers from older exports.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

fn deserialize_target_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<RawId>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(String::from)
        .collect())
}

fn deserialize_expiry<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_expiry(text)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid expiry date: {text}"))),
    }
}

fn serialize_expiry<S>(expiry: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match expiry {
        Some(instant) => serializer.serialize_str(&instant.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

/// Parses the expiry formats the offer editor produces.
///
/// - RFC 3339 (`2025-03-31T18:00:00Z`, `2025-03-31T23:00:00+05:00`)
/// - date only (`2025-03-31`), meaning midnight UTC at the start of that day
/// - date and time without offset (`2025-03-31T18:00`), read as UTC
pub fn parse_expiry(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(id: &str, category: &str, price_cents: i64) -> Product {
        Product::new(id, format!("Product {id}"), price_cents).in_category(category)
    }

    #[test]
    fn test_scope_all_targets_everything() {
        let offer = DiscountOffer::percentage("all", 10.0);
        assert!(offer.targets(&product("p1", "catA", 100)));
        assert!(offer.targets(&Product::new("p2", "No category", 100)));
    }

    #[test]
    fn test_scope_categories() {
        let offer = DiscountOffer::percentage("cat", 10.0).for_categories(["catA"]);
        assert!(offer.targets(&product("p1", "catA", 100)));
        assert!(!offer.targets(&product("p1", "catB", 100)));
        assert!(!offer.targets(&Product::new("p2", "No category", 100)));
    }

    #[test]
    fn test_scope_products() {
        let offer = DiscountOffer::fixed("prod", 5.0).for_products(["p1", "p9"]);
        assert!(offer.targets(&product("p9", "catA", 100)));
        assert!(!offer.targets(&product("p2", "catA", 100)));
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let offer = DiscountOffer::percentage("x", 10.0);

        assert!(!offer.is_expired_at(now));
        assert!(offer.clone().expiring_at(now).is_expired_at(now));
        assert!(!offer
            .clone()
            .expiring_at(now + chrono::Duration::seconds(1))
            .is_expired_at(now));
    }

    #[test]
    fn test_discount_clamping() {
        let price = Money::from_cents(50_000);
        assert_eq!(DiscountOffer::fixed("f", 600.0).discount_for(price), price);
        assert_eq!(DiscountOffer::fixed("f", -10.0).discount_for(price), Money::zero());
        assert_eq!(DiscountOffer::percentage("p", 150.0).discount_for(price), price);
        assert_eq!(DiscountOffer::percentage("p", -20.0).discount_for(price), Money::zero());
        assert_eq!(
            DiscountOffer::percentage("p", f64::NAN).discount_for(price),
            Money::zero()
        );
    }

    #[test]
    fn test_settings_json_tolerates_malformed_entries() {
        let json = r#"{
            "specialOffersEnabled": true,
            "specialOffers": [
                {"id": "a", "enabled": true, "appliesTo": "all", "discountType": "percentage", "discountValue": 20},
                {"id": "b", "appliesTo": "everything", "discountType": "fixed", "discountValue": 5},
                "not even an object",
                {"id": "c", "enabled": true, "appliesTo": "products", "targetIds": [17, "p2"], "discountType": "fixed", "discountValue": 50.5}
            ]
        }"#;

        let settings = Settings::from_json(json).unwrap();
        assert!(settings.special_offers_enabled);
        assert_eq!(settings.special_offers.len(), 4);
        assert_eq!(settings.malformed_count(), 2);

        let ids: Vec<&str> = settings.offers().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(settings.find_offer("c").unwrap().target_ids, vec!["17", "p2"]);
    }

    #[test]
    fn test_settings_json_missing_fields() {
        let settings = Settings::from_json("{}").unwrap();
        assert!(!settings.special_offers_enabled);
        assert!(settings.special_offers.is_empty());

        let settings =
            Settings::from_json(r#"{"specialOffersEnabled": true, "specialOffers": null}"#).unwrap();
        assert_eq!(settings.offers().count(), 0);

        let json = r#"{"specialOffers": [
            {"appliesTo": "categories", "targetIds": null, "discountType": "percentage", "discountValue": 5}
        ]}"#;
        let settings = Settings::from_json(json).unwrap();
        let offer = settings.offers().next().unwrap();
        assert!(!offer.enabled);
        assert!(offer.target_ids.is_empty());
        assert!(offer.expiry_date.is_none());
    }

    #[test]
    fn test_expiry_formats() {
        assert_eq!(
            parse_expiry("2025-03-31"),
            Some(Utc.with_ymd_and_hms(2025, 3, 31, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_expiry("2025-03-31T23:00:00+05:00"),
            Some(Utc.with_ymd_and_hms(2025, 3, 31, 18, 0, 0).unwrap())
        );
        assert_eq!(
            parse_expiry("2025-03-31T18:30"),
            Some(Utc.with_ymd_and_hms(2025, 3, 31, 18, 30, 0).unwrap())
        );
        assert_eq!(parse_expiry("next tuesday"), None);
    }

    #[test]
    fn test_unparseable_expiry_makes_entry_malformed() {
        let json = r#"{"specialOffersEnabled": true, "specialOffers": [
            {"id": "bad", "enabled": true, "expiryDate": "soon", "appliesTo": "all", "discountType": "fixed", "discountValue": 5},
            {"id": "blank", "enabled": true, "expiryDate": "", "appliesTo": "all", "discountType": "fixed", "discountValue": 5}
        ]}"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.malformed_count(), 1);
        assert!(settings.find_offer("blank").unwrap().expiry_date.is_none());
    }

    #[test]
    fn test_upsert_keeps_position() {
        let mut settings = Settings::with_offers([
            DiscountOffer::percentage("a", 10.0),
            DiscountOffer::percentage("b", 10.0),
        ]);

        settings.upsert_offer(DiscountOffer::percentage("a", 30.0));
        settings.upsert_offer(DiscountOffer::fixed("c", 1.0));

        let ids: Vec<&str> = settings.offers().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(settings.find_offer("a").unwrap().discount_value, 30.0);

        let removed = settings.remove_offer("b").unwrap();
        assert_eq!(removed.id, "b");
        assert!(settings.remove_offer("b").is_none());
        assert_eq!(settings.offers().count(), 2);
    }

    #[test]
    fn test_serialization_round_trip_preserves_malformed() {
        let json = r#"{"specialOffersEnabled":true,"specialOffers":[{"legacy":true}]}"#;
        let settings = Settings::from_json(json).unwrap();
        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["specialOffers"][0]["legacy"], serde_json::json!(true));
    }
}
