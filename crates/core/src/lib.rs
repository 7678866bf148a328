//! Shared building blocks for the storefront crates.
//!
//! This crate contains **pure** primitives (no IO, no storage, no HTTP).

pub mod entity;
pub mod error;
pub mod money;
pub mod sku;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use money::format_price;
pub use sku::Sku;
