//! Process-wide tracing setup shared by the storefront binaries.

/// Subscriber configuration (filter, format, writer).
pub mod tracing;

pub use crate::tracing::DEFAULT_FILTER;

/// Install the global subscriber.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}
