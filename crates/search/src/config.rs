use serde::{Deserialize, Serialize};

use crate::bitap::BitapOptions;

/// Product field that participates in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductField {
    Name,
    Sku,
}

/// A searchable key and its relative weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchKey {
    pub field: ProductField,
    pub weight: f64,
}

impl SearchKey {
    pub fn new(field: ProductField) -> Self {
        Self { field, weight: 1.0 }
    }
}

/// Search tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub keys: Vec<SearchKey>,
    /// Acceptance cutoff of the matcher itself.
    pub threshold: f64,
    /// Post-filter: candidates scoring at or above this are dropped.
    pub max_score: f64,
    /// Shortest run of matching characters that counts as a match.
    pub min_match_char_length: usize,
    /// Trimmed queries shorter than this return nothing.
    pub min_query_length: usize,
    /// Raw candidates requested from the index per query.
    pub candidate_limit: usize,
    /// Products returned after post-filtering.
    pub result_limit: usize,
    /// Match anywhere in a field instead of near `location`.
    pub ignore_location: bool,
    pub location: usize,
    pub distance: usize,
    /// Exponent weight of the field-length norm.
    pub field_norm_weight: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keys: vec![
                SearchKey::new(ProductField::Name),
                SearchKey::new(ProductField::Sku),
            ],
            threshold: 0.2,
            max_score: 0.3,
            min_match_char_length: 3,
            min_query_length: 2,
            candidate_limit: 30,
            result_limit: 20,
            ignore_location: true,
            location: 0,
            distance: 100,
            field_norm_weight: 1.0,
        }
    }
}

impl SearchConfig {
    pub fn bitap_options(&self) -> BitapOptions {
        BitapOptions {
            threshold: self.threshold,
            location: self.location,
            distance: self.distance,
            ignore_location: self.ignore_location,
            min_match_char_length: self.min_match_char_length,
            find_all_matches: false,
        }
    }

    /// Key weights scaled to sum to 1. Falls back to equal weights when the
    /// configured weights do not sum to a positive number.
    pub fn normalized_keys(&self) -> Vec<SearchKey> {
        let total: f64 = self.keys.iter().map(|k| k.weight).sum();
        if total > 0.0 && total.is_finite() {
            self.keys
                .iter()
                .map(|k| SearchKey {
                    field: k.field,
                    weight: k.weight / total,
                })
                .collect()
        } else {
            let equal = 1.0 / self.keys.len().max(1) as f64;
            self.keys
                .iter()
                .map(|k| SearchKey {
                    field: k.field,
                    weight: equal,
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keys_share_weight() {
        let keys = SearchConfig::default().normalized_keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().all(|k| (k.weight - 0.5).abs() < f64::EPSILON));
    }

    #[test]
    fn degenerate_weights_fall_back_to_equal() {
        let config = SearchConfig {
            keys: vec![
                SearchKey { field: ProductField::Name, weight: 0.0 },
                SearchKey { field: ProductField::Sku, weight: 0.0 },
            ],
            ..SearchConfig::default()
        };
        let keys = config.normalized_keys();
        assert_eq!(keys[0].weight, 0.5);
        assert_eq!(keys[1].weight, 0.5);
    }

    #[test]
    fn custom_weights_are_scaled() {
        let config = SearchConfig {
            keys: vec![
                SearchKey { field: ProductField::Name, weight: 3.0 },
                SearchKey { field: ProductField::Sku, weight: 1.0 },
            ],
            ..SearchConfig::default()
        };
        let keys = config.normalized_keys();
        assert_eq!(keys[0].weight, 0.75);
        assert_eq!(keys[1].weight, 0.25);
    }
}
