//! # Catalog State
//!
//! The product list the register sells from.
//!
//! The catalog is owned by an upstream inventory system; the register loads
//! a JSON export of it at startup and never mutates it.
//!
//! ## Catalog File
//! ```json
//! [
//!   { "id": "cpu-5600", "name": "Ryzen 5 5600", "categoryId": "cpu",
//!     "priceCents": 3850000, "mrpCents": 4200000, "barcode": "730143312745" }
//! ]
//! ```

use std::path::Path;

use bazaar_core::validation::{
    validate_price_cents, validate_product_name, validate_search_query, ValidationResult,
};
use bazaar_core::Product;
use tracing::{info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::state::config::read_file;

/// Read-only product catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    products: Vec<Product>,
}

impl CatalogState {
    /// Creates a catalog from already-loaded products.
    ///
    /// Products with a blank name or a negative price are dropped with a
    /// warning and never reach the pricing engine.
    pub fn new(products: Vec<Product>) -> Self {
        let products = products
            .into_iter()
            .filter(|product| match validate_entry(product) {
                Ok(()) => true,
                Err(e) => {
                    warn!(product_id = %product.id, error = %e, "Skipping catalog entry");
                    false
                }
            })
            .collect();
        CatalogState { products }
    }

    /// Loads the catalog from a JSON array of products.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = read_file(path)?;
        let products: Vec<Product> =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let catalog = Self::new(products);
        info!(?path, products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Finds a product by id.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Finds a product by scanned barcode.
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&Product> {
        let barcode = barcode.trim();
        self.products
            .iter()
            .find(|product| product.barcode.as_deref() == Some(barcode))
    }

    /// Case-insensitive search over name, SKU and barcode.
    ///
    /// ## Behavior
    /// - Empty query: first `limit` products in catalog order
    /// - Otherwise: every whitespace-separated term must match somewhere
    pub fn search(&self, query: &str, limit: usize) -> ValidationResult<Vec<&Product>> {
        let query = validate_search_query(query)?.to_lowercase();
        let terms: Vec<&str> = query.split_whitespace().collect();

        Ok(self
            .products
            .iter()
            .filter(|product| terms.iter().all(|term| matches_term(product, term)))
            .take(limit)
            .collect())
    }
}

fn validate_entry(product: &Product) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_price_cents(product.price_cents)
}

fn matches_term(product: &Product, term: &str) -> bool {
    let contains = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(term));

    contains(Some(&product.name)) || contains(product.sku.as_deref()) || contains(product.barcode.as_deref())
}
