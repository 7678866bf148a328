//! Product catalog: the read-only set of purchasable products.
//!
//! The catalog is fetched once from a static JSON resource, malformed records
//! are dropped and display names are normalized. Loading fails soft: a
//! transport or parse failure is logged and yields an empty catalog.

pub mod catalog;
pub mod loader;
pub mod normalize;
pub mod product;

pub use catalog::{Catalog, CatalogVersion};
pub use loader::{
    CatalogError, CatalogLoader, CatalogSource, FileCatalogSource, HttpCatalogSource,
    DEFAULT_CATALOG_PATH,
};
pub use normalize::normalize_name;
pub use product::Product;
