//! Search over a catalog that may be replaced at runtime.

use storefront_catalog::{Catalog, Product};

use crate::config::SearchConfig;
use crate::index::FuzzyIndex;

/// Owns a [`FuzzyIndex`] and keeps it in step with the catalog.
///
/// The index is rebuilt whenever the catalog's version differs from the one
/// it was built for, so a replacement catalog of the same size is never
/// served from a stale index.
#[derive(Debug, Clone, Default)]
pub struct CatalogSearch {
    config: SearchConfig,
    index: Option<FuzzyIndex>,
}

impl CatalogSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            index: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The index for `catalog`, building it if needed.
    pub fn index_for(&mut self, catalog: &Catalog) -> &FuzzyIndex {
        if self
            .index
            .as_ref()
            .is_some_and(|index| index.version() != catalog.version())
        {
            self.index = None;
        }

        self.index.get_or_insert_with(|| {
            tracing::debug!(
                version = %catalog.version(),
                products = catalog.len(),
                "building search index"
            );
            FuzzyIndex::build(catalog, self.config.clone())
        })
    }

    /// Ranked products for `query`, best first.
    pub fn search(&mut self, catalog: &Catalog, query: &str) -> Vec<Product> {
        self.index_for(catalog)
            .query(query)
            .into_iter()
            .map(|hit| hit.product.clone())
            .collect()
    }
}
