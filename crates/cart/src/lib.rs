//! Shopping cart: line items, derived totals, persistence and checkout URL.
//!
//! [`CartState`] is a plain value with pure derived getters. [`CartStore`] is
//! the single controller that owns it: it hydrates from a [`CartStorage`]
//! backend on open and writes the snapshot back after every mutation.
//! Mutations never fail; storage errors are logged and the in-memory state
//! stays authoritative.

pub mod checkout;
pub mod line;
pub mod snapshot;
pub mod state;
pub mod storage;
pub mod store;

pub use checkout::{CheckoutUrlBuilder, SponsorIdEncoding, CHECKOUT_BASE_URL};
pub use line::CartLine;
pub use snapshot::{CartSnapshot, PersistedCart, SnapshotItem};
pub use state::{CartState, DEFAULT_DISTRIBUTOR_ID};
pub use storage::{CartStorage, JsonFileStorage, MemoryStorage, SqliteStorage, StorageError};
pub use store::{CartStore, DEFAULT_STORAGE_KEY};
