use std::io;

use anyhow::Context;
use storefront_app::{Storefront, StorefrontConfig, run};
use storefront_cart::{CartStore, DEFAULT_STORAGE_KEY};
use storefront_search::CatalogSearch;

fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = StorefrontConfig::from_env();
    tracing::info!(catalog = ?config.catalog, backend = ?config.cart_backend, "starting storefront");

    // Only the catalog fetch is async; storage runs its own runtime.
    let catalog = {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;
        runtime.block_on(config.catalog.loader().load())
    };

    let storage = config.open_storage()?;
    let cart = CartStore::open_with(storage, DEFAULT_STORAGE_KEY, config.checkout_builder());
    let mut shop = Storefront::new(catalog, CatalogSearch::default(), cart);

    let stdin = io::stdin();
    run(&mut shop, stdin.lock(), io::stdout().lock())
}
