use serde::{Deserialize, Serialize};

use storefront_catalog::Product;
use storefront_core::{Entity, Sku};

/// Cart line: a product and how many of it. Identity is the SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub name: String,
    pub sku: Sku,
    pub price: f64,
    /// Always `>= 1` while the line is in a cart.
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            name: product.name().to_string(),
            sku: product.sku().clone(),
            price: product.price(),
            quantity,
        }
    }

    /// `price × quantity`, unrounded.
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

impl Entity for CartLine {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.sku
    }
}
