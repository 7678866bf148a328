//! The facade the presentation layer talks to.

use storefront_cart::{CartState, CartStorage, CartStore};
use storefront_catalog::{Catalog, Product};
use storefront_search::CatalogSearch;

/// Catalog, search and cart wired together.
///
/// Generic over the storage backend so tests can use `MemoryStorage`; the
/// binary uses a boxed backend picked from configuration.
#[derive(Debug)]
pub struct Storefront<S: CartStorage = Box<dyn CartStorage>> {
    catalog: Catalog,
    search: CatalogSearch,
    cart: CartStore<S>,
}

impl<S: CartStorage> Storefront<S> {
    pub fn new(catalog: Catalog, search: CatalogSearch, cart: CartStore<S>) -> Self {
        Self {
            catalog,
            search,
            cart,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Swap in a freshly loaded catalog. The search index follows on the
    /// next query; cart lines keep the name and price they were added with.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        tracing::info!(
            version = %catalog.version(),
            loaded_at = %catalog.loaded_at().to_rfc3339(),
            products = catalog.len(),
            "catalog replaced"
        );
        self.catalog = catalog;
    }

    /// Ranked results for `query`; empty for queries shorter than two
    /// characters.
    pub fn search(&mut self, query: &str) -> Vec<Product> {
        self.search.search(&self.catalog, query)
    }

    pub fn cart(&self) -> &CartState {
        self.cart.state()
    }

    /// Add one unit of the catalog product `sku`. Returns `false` if the
    /// catalog has no such product.
    pub fn add_to_cart(&mut self, sku: &str) -> bool {
        match self.catalog.get(sku) {
            Some(product) => {
                self.cart.add_item(product);
                true
            }
            None => false,
        }
    }

    pub fn add_product(&mut self, product: &Product) {
        self.cart.add_item(product);
    }

    pub fn remove_from_cart(&mut self, sku: &str) {
        self.cart.remove_item(sku);
    }

    pub fn update_quantity(&mut self, sku: &str, quantity: i64) {
        self.cart.update_quantity(sku, quantity);
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear_cart();
    }

    /// Settings save: trims `input` and stores it; blank input is ignored.
    /// Returns whether the id changed hands.
    pub fn save_distributor_id(&mut self, input: &str) -> bool {
        let id = input.trim();
        if id.is_empty() {
            return false;
        }
        self.cart.set_distributor_id(id);
        true
    }

    pub fn checkout_url(&self) -> String {
        self.cart.checkout_url()
    }
}
