//! Persisted cart format.
//!
//! The snapshot is stored as
//! `{"state":{"items":[{name,sku,price,quantity}…],"distributorId":"…"},"version":0}`,
//! the same envelope the browser storefront writes to local storage.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use storefront_core::Sku;

use crate::line::CartLine;
use crate::state::{CartState, DEFAULT_DISTRIBUTOR_ID};

/// Version of the persisted envelope.
pub const SNAPSHOT_VERSION: u32 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedCart {
    pub state: CartSnapshot,
    #[serde(default)]
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(default, deserialize_with = "items_lenient")]
    pub items: Vec<SnapshotItem>,
    #[serde(default = "default_distributor_id")]
    pub distributor_id: String,
}

/// A stored line. Plain strings and a signed quantity; validation happens
/// when the line is rebuilt, not while parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub quantity: i64,
}

/// Parse each entry on its own so one malformed item is dropped instead of
/// failing the whole snapshot.
fn items_lenient<'de, D>(deserializer: D) -> Result<Vec<SnapshotItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<SnapshotItem>(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!("dropping unreadable cart item: {err}");
                None
            }
        })
        .collect())
}

fn default_distributor_id() -> String {
    DEFAULT_DISTRIBUTOR_ID.to_string()
}

impl From<&CartLine> for SnapshotItem {
    fn from(line: &CartLine) -> Self {
        Self {
            name: line.name.clone(),
            sku: line.sku.to_string(),
            price: line.price,
            quantity: i64::from(line.quantity),
        }
    }
}

impl SnapshotItem {
    fn into_line(self) -> Option<CartLine> {
        if self.quantity < 1 || !self.price.is_finite() || self.price < 0.0 {
            return None;
        }
        Some(CartLine {
            name: self.name,
            sku: Sku::new(self.sku).ok()?,
            price: self.price,
            quantity: u32::try_from(self.quantity).unwrap_or(u32::MAX),
        })
    }
}

impl From<&CartState> for PersistedCart {
    fn from(state: &CartState) -> Self {
        Self {
            state: CartSnapshot {
                items: state.lines().iter().map(SnapshotItem::from).collect(),
                distributor_id: state.distributor_id().to_string(),
            },
            version: SNAPSHOT_VERSION,
        }
    }
}

impl From<PersistedCart> for CartState {
    fn from(persisted: PersistedCart) -> Self {
        let snapshot = persisted.state;
        CartState::from_lines(
            snapshot.items.into_iter().filter_map(SnapshotItem::into_line),
            snapshot.distributor_id,
        )
    }
}
