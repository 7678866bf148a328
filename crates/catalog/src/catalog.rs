//! The loaded catalog and its identity.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use storefront_core::Sku;

use crate::normalize::normalize_name;
use crate::product::Product;

/// Identity of one loaded catalog.
///
/// A fresh version is minted every time a catalog is constructed, so two
/// catalogs with the same length (or even the same contents) loaded at
/// different times are still distinguishable. Search indexes key their
/// invalidation on this value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogVersion(Uuid);

impl CatalogVersion {
    /// Uses UUIDv7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for CatalogVersion {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CatalogVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Read-only product catalog. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: CatalogVersion,
    loaded_at: DateTime<Utc>,
    products: Arc<[Product]>,
}

impl Catalog {
    /// Build a catalog from already-validated products.
    ///
    /// Duplicate SKUs keep their first occurrence; catalog order is otherwise
    /// preserved.
    pub fn new(products: Vec<Product>) -> Self {
        let mut seen: HashSet<Sku> = HashSet::with_capacity(products.len());
        let products: Vec<Product> = products
            .into_iter()
            .filter(|p| seen.insert(p.sku().clone()))
            .collect();

        Self {
            version: CatalogVersion::new(),
            loaded_at: Utc::now(),
            products: products.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Build a catalog from raw JSON records.
    ///
    /// Records are kept only when `name` and `sku` are non-empty strings and
    /// `price` is a number. Names are normalized; records whose name is empty
    /// after normalization, or whose price is negative, are dropped.
    /// Extra fields are ignored.
    pub fn from_records(records: &[Value]) -> Self {
        Self::new(records.iter().filter_map(product_from_record).collect())
    }

    pub fn version(&self) -> CatalogVersion {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.sku() == sku)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}

fn product_from_record(record: &Value) -> Option<Product> {
    let obj = record.as_object()?;

    let name = obj.get("name")?.as_str().filter(|s| !s.is_empty())?;
    let sku = obj.get("sku")?.as_str().filter(|s| !s.is_empty())?;
    let price = obj.get("price")?.as_f64()?;

    let name = normalize_name(name);
    let sku = Sku::new(sku).ok()?;
    Product::new(name, sku, price).ok()
}
