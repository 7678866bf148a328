//! The cart controller.

use storefront_catalog::Product;

use crate::checkout::CheckoutUrlBuilder;
use crate::line::CartLine;
use crate::snapshot::PersistedCart;
use crate::state::CartState;
use crate::storage::CartStorage;

/// Storage slot the cart snapshot lives under.
pub const DEFAULT_STORAGE_KEY: &str = "dwd-cart-storage";

/// Owns the [`CartState`] and keeps its persisted copy current.
///
/// Reads the snapshot once on open and writes it back after every mutation.
/// Single-writer: wrap it in your own synchronization if it must be shared.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    state: CartState,
    storage: S,
    key: String,
    checkout: CheckoutUrlBuilder,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart stored under [`DEFAULT_STORAGE_KEY`].
    pub fn open(storage: S) -> Self {
        Self::open_with(storage, DEFAULT_STORAGE_KEY, CheckoutUrlBuilder::default())
    }

    pub fn open_with(storage: S, key: impl Into<String>, checkout: CheckoutUrlBuilder) -> Self {
        let key = key.into();
        let state = hydrate(&storage, &key);
        Self {
            state,
            storage,
            key,
            checkout,
        }
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn lines(&self) -> &[CartLine] {
        self.state.lines()
    }

    pub fn distributor_id(&self) -> &str {
        self.state.distributor_id()
    }

    /// Add one of `product`: increments an existing line or appends a new one.
    pub fn add_item(&mut self, product: &Product) {
        self.state.add(product);
        self.persist();
    }

    /// Remove the line for `sku`; no-op if absent.
    pub fn remove_item(&mut self, sku: &str) {
        self.state.remove(sku);
        self.persist();
    }

    /// Set the quantity for `sku` exactly; `<= 0` removes the line, absent
    /// SKUs are ignored.
    pub fn update_quantity(&mut self, sku: &str, quantity: i64) {
        self.state.set_quantity(sku, quantity);
        self.persist();
    }

    /// Empty the cart. The distributor id is kept.
    pub fn clear_cart(&mut self) {
        self.state.clear();
        self.persist();
    }

    /// Replace the distributor id verbatim.
    pub fn set_distributor_id(&mut self, id: impl Into<String>) {
        self.state.set_distributor_id(id);
        self.persist();
    }

    pub fn total_items(&self) -> u64 {
        self.state.total_items()
    }

    pub fn total_price(&self) -> f64 {
        self.state.total_price()
    }

    /// Redirect URL for the current cart, or `""` when it is empty.
    pub fn checkout_url(&self) -> String {
        self.checkout.build(&self.state)
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&PersistedCart::from(&self.state)) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(key = %self.key, "failed to serialize cart: {err}");
                return;
            }
        };

        if let Err(err) = self.storage.save(&self.key, &payload) {
            tracing::error!(key = %self.key, "failed to persist cart: {err}");
        }
    }
}

/// Read the persisted cart, falling back to an empty cart when the slot is
/// missing or unreadable.
fn hydrate<S: CartStorage>(storage: &S, key: &str) -> CartState {
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return CartState::default(),
        Err(err) => {
            tracing::warn!(key, "failed to read persisted cart: {err}");
            return CartState::default();
        }
    };

    match serde_json::from_str::<PersistedCart>(&raw) {
        Ok(persisted) => {
            let state = CartState::from(persisted);
            tracing::debug!(key, lines = state.lines().len(), "hydrated cart");
            state
        }
        Err(err) => {
            tracing::warn!(key, "discarding unreadable persisted cart: {err}");
            CartState::default()
        }
    }
}
