//! Storefront wiring: configuration, the facade the UI talks to, and the
//! terminal driver.

pub mod commands;
pub mod config;
pub mod storefront;

pub use commands::{Command, CommandError, run};
pub use config::{CartBackend, CatalogLocation, StorefrontConfig};
pub use storefront::Storefront;
