use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, Sku};

/// A purchasable product. Immutable once loaded; identity is the SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    name: String,
    sku: Sku,
    price: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, sku: Sku, price: f64) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(DomainError::validation(format!(
                "price must be a finite, non-negative number (got {price})"
            )));
        }
        Ok(Self { name, sku, price })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

impl Entity for Product {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.sku
    }
}
