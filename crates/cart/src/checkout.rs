//! Checkout redirect URL for the external storefront.
//!
//! ```text
//! https://ygy1.com/customer-checkout/v1.3/?sponsorid=<id>&item-1=<sku>%7C<qty>&…&destroy=1
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::state::CartState;

pub const CHECKOUT_BASE_URL: &str = "https://ygy1.com/customer-checkout/v1.3/";

/// Characters left unescaped in a URI component: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// How the sponsor id is embedded in the URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SponsorIdEncoding {
    /// Percent-encode like every other parameter value.
    #[default]
    Encoded,
    /// Interpolate the id as-is, byte-for-byte compatible with the browser
    /// storefront. An id containing `&` or `#` will corrupt the query string.
    Verbatim,
}

impl core::str::FromStr for SponsorIdEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "encoded" => Ok(Self::Encoded),
            "verbatim" => Ok(Self::Verbatim),
            other => Err(format!("unknown sponsor id encoding: {other} (expected encoded|verbatim)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrlBuilder {
    sponsor_encoding: SponsorIdEncoding,
}

impl Default for CheckoutUrlBuilder {
    fn default() -> Self {
        Self::new(SponsorIdEncoding::default())
    }
}

impl CheckoutUrlBuilder {
    pub fn new(sponsor_encoding: SponsorIdEncoding) -> Self {
        Self { sponsor_encoding }
    }

    /// Build the redirect URL, or `""` when the cart has no lines.
    ///
    /// Items are numbered from 1 in cart order; each `sku|quantity` pair is
    /// percent-encoded as one value.
    pub fn build(&self, state: &CartState) -> String {
        if state.is_empty() {
            return String::new();
        }

        let sponsor = match self.sponsor_encoding {
            SponsorIdEncoding::Encoded => encode_component(state.distributor_id()),
            SponsorIdEncoding::Verbatim => state.distributor_id().to_string(),
        };

        let items = state
            .lines()
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let value = format!("{}|{}", line.sku, line.quantity);
                format!("item-{}={}", i + 1, encode_component(&value))
            })
            .collect::<Vec<_>>()
            .join("&");

        format!("{CHECKOUT_BASE_URL}?sponsorid={sponsor}&{items}&destroy=1")
    }
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}
