//! Stock-keeping unit: the identity of a product and of a cart line.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Product identifier, unique within a catalog.
///
/// The value is opaque: it is compared byte-for-byte and forwarded verbatim
/// to the checkout system. Only emptiness is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::invalid_id("Sku: empty"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Sku {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Sku {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Sku {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<String> for Sku {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sku> for String {
    fn from(value: Sku) -> Self {
        value.0
    }
}

impl FromStr for Sku {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_sku() {
        let err = Sku::new("").unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn keeps_value_verbatim() {
        let sku = Sku::new(" A1 ").unwrap();
        assert_eq!(sku.as_str(), " A1 ");
        assert_eq!(sku.to_string(), " A1 ");
    }

    #[test]
    fn serializes_as_plain_string() {
        let sku: Sku = "X9".parse().unwrap();
        assert_eq!(serde_json::to_string(&sku).unwrap(), "\"X9\"");

        let back: Sku = serde_json::from_str("\"X9\"").unwrap();
        assert_eq!(back, sku);
        assert!(serde_json::from_str::<Sku>("\"\"").is_err());
    }
}
