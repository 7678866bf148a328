//! Searchable index over a catalog.

use storefront_catalog::{Catalog, CatalogVersion, Product};

use crate::bitap::BitapSearcher;
use crate::config::{ProductField, SearchConfig, SearchKey};
use crate::norm::field_norm;

/// One scored candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub product: &'a Product,
    /// Position in the catalog.
    pub index: usize,
    /// Combined score; lower is better.
    pub score: f64,
}

#[derive(Debug, Clone)]
struct IndexedField {
    key: SearchKey,
    norm: f64,
}

/// Fuzzy index over the configured fields of every catalog product.
///
/// Bound to one catalog version; build a new index when the catalog changes.
#[derive(Debug, Clone)]
pub struct FuzzyIndex {
    catalog: Catalog,
    config: SearchConfig,
    /// Per product, per configured key; `None` for blank fields.
    fields: Vec<Vec<Option<IndexedField>>>,
}

fn field_value(product: &Product, field: ProductField) -> &str {
    match field {
        ProductField::Name => product.name(),
        ProductField::Sku => product.sku().as_str(),
    }
}

impl FuzzyIndex {
    pub fn build(catalog: &Catalog, config: SearchConfig) -> Self {
        let keys = config.normalized_keys();
        let fields = catalog
            .iter()
            .map(|product| {
                keys.iter()
                    .map(|key| {
                        let value = field_value(product, key.field);
                        if value.trim().is_empty() {
                            return None;
                        }
                        field_norm(value, config.field_norm_weight)
                            .map(|norm| IndexedField { key: *key, norm })
                    })
                    .collect()
            })
            .collect();

        Self {
            catalog: catalog.clone(),
            config,
            fields,
        }
    }

    pub fn version(&self) -> CatalogVersion {
        self.catalog.version()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Raw ranked candidates for `pattern`, best first, at most `limit`.
    ///
    /// Ties keep catalog order. No query-length policy or score post-filter is
    /// applied here; see [`FuzzyIndex::query`].
    pub fn candidates(&self, pattern: &str, limit: usize) -> Vec<SearchHit<'_>> {
        let searcher = BitapSearcher::new(pattern, self.config.bitap_options());

        let mut hits: Vec<SearchHit<'_>> = self
            .catalog
            .iter()
            .zip(&self.fields)
            .enumerate()
            .filter_map(|(index, (product, fields))| {
                self.score_product(&searcher, product, fields)
                    .map(|score| SearchHit { product, index, score })
            })
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.index.cmp(&b.index)));
        hits.truncate(limit);
        hits
    }

    /// Products matching a user query.
    ///
    /// The query is trimmed; fewer than `min_query_length` characters yields
    /// nothing. Otherwise `candidate_limit` candidates are taken, those
    /// scoring `>= max_score` are dropped and at most `result_limit` remain.
    pub fn query(&self, query: &str) -> Vec<SearchHit<'_>> {
        let query = query.trim();
        if query.chars().count() < self.config.min_query_length {
            return Vec::new();
        }

        self.candidates(query, self.config.candidate_limit)
            .into_iter()
            .filter(|hit| hit.score < self.config.max_score)
            .take(self.config.result_limit)
            .collect()
    }

    /// Product-level score: the product of `score^(weight * norm)` over
    /// every key that matched. `None` when no key matched.
    fn score_product(
        &self,
        searcher: &BitapSearcher,
        product: &Product,
        fields: &[Option<IndexedField>],
    ) -> Option<f64> {
        let mut matched = false;
        let mut total = 1.0;

        for field in fields.iter().flatten() {
            let m = searcher.search_in(field_value(product, field.key.field));
            if !m.is_match {
                continue;
            }
            matched = true;

            let base = if m.score == 0.0 && field.key.weight != 0.0 {
                f64::EPSILON
            } else {
                m.score
            };
            total *= base.powf(field.key.weight * field.norm);
        }

        matched.then_some(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::from_records(&[
            json!({ "name": "Beyond Tangy Tangerine", "sku": "BTT-100", "price": 49.95 }),
            json!({ "name": "Pure Fiber", "sku": "PF-200", "price": 24.50 }),
            json!({ "name": "Tangy Tangerine Bars", "sku": "TTB-300", "price": 19.00 }),
            json!({ "name": "Osteo FX", "sku": "OFX-400", "price": 32.00 }),
            json!({ "name": "Ultimate Daily Classic Multi Vitamin Mineral Complex Formula For Adults", "sku": "UDC-500", "price": 29.95 }),
        ])
    }

    fn skus(hits: &[SearchHit<'_>]) -> Vec<String> {
        hits.iter().map(|h| h.product.sku().to_string()).collect()
    }

    #[test]
    fn short_queries_return_nothing() {
        let index = FuzzyIndex::build(&catalog(), SearchConfig::default());
        assert!(index.query("").is_empty());
        assert!(index.query("t").is_empty());
        assert!(index.query("  t  ").is_empty());
    }

    #[test]
    fn name_substring_matches_anywhere() {
        let index = FuzzyIndex::build(&catalog(), SearchConfig::default());
        let hits = index.query("fiber");
        assert_eq!(skus(&hits), vec!["PF-200"]);
        assert!(hits[0].score < 0.3);
    }

    #[test]
    fn exact_sku_ranks_first() {
        let index = FuzzyIndex::build(&catalog(), SearchConfig::default());
        let hits = index.query("ofx-400");
        assert_eq!(skus(&hits)[0], "OFX-400");
        assert!(hits[0].score < 1e-6);
    }

    #[test]
    fn equal_scores_keep_catalog_order() {
        let index = FuzzyIndex::build(&catalog(), SearchConfig::default());
        let hits = index.query("tangerine");
        assert_eq!(skus(&hits), vec!["BTT-100", "TTB-300"]);
        assert_eq!(hits[0].score, hits[1].score);
    }

    #[test]
    fn shorter_names_rank_above_longer_ones() {
        let catalog = Catalog::from_records(&[
            json!({ "name": "Pure Fiber Blend Plus", "sku": "PFB-1", "price": 1.0 }),
            json!({ "name": "Fiber", "sku": "F-2", "price": 1.0 }),
        ]);
        let index = FuzzyIndex::build(&catalog, SearchConfig::default());
        let hits = index.query("fiber");
        assert_eq!(skus(&hits), vec!["F-2", "PFB-1"]);
        assert!(hits[0].score < hits[1].score);
    }

    #[test]
    fn long_names_fall_out_of_post_filter() {
        let index = FuzzyIndex::build(&catalog(), SearchConfig::default());
        let raw = index.candidates("vitamin", 30);
        assert_eq!(skus(&raw), vec!["UDC-500"]);
        assert!(raw[0].score >= 0.3);

        assert!(index.query("vitamin").is_empty());
    }

    #[test]
    fn typo_candidates_are_filtered() {
        let index = FuzzyIndex::build(&catalog(), SearchConfig::default());
        let raw = index.candidates("fibor", 30);
        assert_eq!(skus(&raw), vec!["PF-200"]);
        assert!(index.query("fibor").is_empty());
    }

    #[test]
    fn limits_are_applied() {
        let records: Vec<_> = (0..50)
            .map(|i| json!({ "name": format!("Widget {i}"), "sku": format!("W-{i}"), "price": 1.0 }))
            .collect();
        let catalog = Catalog::from_records(&records);
        let index = FuzzyIndex::build(&catalog, SearchConfig::default());

        assert_eq!(index.candidates("widget", 30).len(), 30);

        let hits = index.query("widget");
        assert_eq!(hits.len(), 20);
        // Equal scores keep catalog order.
        let indices: Vec<usize> = hits.iter().map(|h| h.index).collect();
        assert_eq!(indices, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn empty_catalog_returns_nothing() {
        let index = FuzzyIndex::build(&Catalog::empty(), SearchConfig::default());
        assert!(index.is_empty());
        assert!(index.query("widget").is_empty());
    }
}
