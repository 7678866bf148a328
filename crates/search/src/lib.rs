//! Fuzzy product search.
//!
//! A [`FuzzyIndex`] is built over the `name` and `sku` fields of a
//! [`Catalog`](storefront_catalog::Catalog). Scores are in `[0, 1]` where
//! **lower is better**. Queries shorter than two characters return nothing,
//! at most 30 raw candidates are taken from the index, candidates scoring
//! `>= 0.3` are discarded and the result is capped at 20 products.
//!
//! [`CatalogSearch`] owns the index and rebuilds it whenever the catalog's
//! version changes.

pub mod bitap;
pub mod config;
pub mod index;
pub mod norm;
pub mod service;

pub use bitap::{BitapMatch, BitapOptions, BitapSearcher};
pub use config::{ProductField, SearchConfig, SearchKey};
pub use index::{FuzzyIndex, SearchHit};
pub use service::CatalogSearch;
