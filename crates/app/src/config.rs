//! Environment-driven configuration.

use std::path::PathBuf;

use anyhow::Context;
use storefront_cart::{
    CartStorage, CheckoutUrlBuilder, JsonFileStorage, MemoryStorage, SponsorIdEncoding,
    SqliteStorage,
};
use storefront_catalog::{CatalogLoader, FileCatalogSource, HttpCatalogSource};

pub const CATALOG_VAR: &str = "STOREFRONT_CATALOG";
pub const CART_BACKEND_VAR: &str = "STOREFRONT_CART_BACKEND";
pub const CART_PATH_VAR: &str = "STOREFRONT_CART_PATH";
pub const SPONSOR_ENCODING_VAR: &str = "STOREFRONT_SPONSOR_ENCODING";

const DEFAULT_CATALOG: &str = "products.json";
const APP_DIR: &str = "storefront";

/// Where the product list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    /// Local JSON file.
    File(PathBuf),
    /// Base URL; `/products.json` is fetched relative to it.
    Http(String),
}

impl CatalogLocation {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Http(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    pub fn loader(&self) -> CatalogLoader {
        match self {
            Self::File(path) => CatalogLoader::new(FileCatalogSource::new(path.clone())),
            Self::Http(base) => CatalogLoader::new(HttpCatalogSource::new(base.clone())),
        }
    }
}

/// Which [`CartStorage`] backend persists the cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CartBackend {
    #[default]
    Sqlite,
    File,
    Memory,
}

impl core::str::FromStr for CartBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "file" | "json" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown cart backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub catalog: CatalogLocation,
    pub cart_backend: CartBackend,
    /// Explicit cart location; `None` means the OS data directory.
    pub cart_path: Option<PathBuf>,
    pub sponsor_encoding: SponsorIdEncoding,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogLocation::File(PathBuf::from(DEFAULT_CATALOG)),
            cart_backend: CartBackend::default(),
            cart_path: None,
            sponsor_encoding: SponsorIdEncoding::default(),
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables take
    /// their defaults; unparsable ones are logged and also defaulted.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let catalog = var(CATALOG_VAR)
            .map(|v| CatalogLocation::parse(&v))
            .unwrap_or(defaults.catalog);

        let cart_backend = var(CART_BACKEND_VAR)
            .map(|v| {
                v.parse::<CartBackend>().unwrap_or_else(|err| {
                    tracing::warn!("{CART_BACKEND_VAR}: {err}; using sqlite");
                    CartBackend::default()
                })
            })
            .unwrap_or_default();

        let sponsor_encoding = var(SPONSOR_ENCODING_VAR)
            .map(|v| {
                v.parse::<SponsorIdEncoding>().unwrap_or_else(|err| {
                    tracing::warn!("{SPONSOR_ENCODING_VAR}: {err}; using encoded");
                    SponsorIdEncoding::default()
                })
            })
            .unwrap_or_default();

        Self {
            catalog,
            cart_backend,
            cart_path: var(CART_PATH_VAR).map(PathBuf::from),
            sponsor_encoding,
        }
    }

    pub fn checkout_builder(&self) -> CheckoutUrlBuilder {
        CheckoutUrlBuilder::new(self.sponsor_encoding)
    }

    /// Resolved cart location for the configured backend: a database file
    /// for sqlite, a directory for file storage, `None` for memory.
    pub fn cart_location(&self) -> anyhow::Result<Option<PathBuf>> {
        let default_name = match self.cart_backend {
            CartBackend::Sqlite => "cart.db",
            CartBackend::File => "cart",
            CartBackend::Memory => return Ok(None),
        };
        if let Some(path) = &self.cart_path {
            return Ok(Some(path.clone()));
        }
        Ok(Some(app_data_dir()?.join(default_name)))
    }

    pub fn open_storage(&self) -> anyhow::Result<Box<dyn CartStorage>> {
        let location = self.cart_location()?;
        let storage: Box<dyn CartStorage> = match (self.cart_backend, location) {
            (CartBackend::Sqlite, Some(path)) => Box::new(
                SqliteStorage::open(&path)
                    .with_context(|| format!("failed to open cart database at {}", path.display()))?,
            ),
            (CartBackend::File, Some(dir)) => Box::new(
                JsonFileStorage::open(&dir)
                    .with_context(|| format!("failed to open cart directory at {}", dir.display()))?,
            ),
            _ => Box::new(MemoryStorage::new()),
        };
        tracing::info!(backend = ?self.cart_backend, "cart storage ready");
        Ok(storage)
    }
}

/// `{data_dir}/storefront`, falling back to `~/.local/share/storefront`.
fn app_data_dir() -> anyhow::Result<PathBuf> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut home| {
                home.push(".local");
                home.push("share");
                home
            })
        })
        .context("failed to resolve OS data directory")?;
    dir.push(APP_DIR);
    Ok(dir)
}
