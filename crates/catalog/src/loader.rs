//! Fetching the catalog from its static JSON resource.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::Catalog;

/// Relative path of the catalog document on the storefront host.
pub const DEFAULT_CATALOG_PATH: &str = "/products.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(String),
    #[error("catalog request failed ({0}): {1}")]
    Status(u16, String),
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Where the raw catalog document comes from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable location (for logs).
    fn location(&self) -> String;

    /// Fetch the raw document bytes.
    async fn fetch(&self) -> Result<Vec<u8>, CatalogError>;
}

/// Catalog document on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, CatalogError> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// Catalog document served over HTTP at a fixed path below a base URL.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    base_url: String,
    path: String,
    client: reqwest::Client,
}

impl HttpCatalogSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_path(base_url, DEFAULT_CATALOG_PATH)
    }

    pub fn with_path(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.path.starts_with('/') {
            format!("{base}{}", self.path)
        } else {
            format!("{base}/{}", self.path)
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn location(&self) -> String {
        self.url()
    }

    async fn fetch(&self) -> Result<Vec<u8>, CatalogError> {
        let resp = self
            .client
            .get(self.url())
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(CatalogError::Status(
                resp.status().as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        Ok(body.to_vec())
    }
}

/// Loads a [`Catalog`] from a [`CatalogSource`].
///
/// There is no retry and no timeout beyond what the source itself applies.
pub struct CatalogLoader {
    source: Box<dyn CatalogSource>,
}

impl CatalogLoader {
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn CatalogSource>) -> Self {
        Self { source }
    }

    pub fn location(&self) -> String {
        self.source.location()
    }

    /// Load the catalog, failing soft.
    ///
    /// Any transport or parse failure is logged and an empty catalog is
    /// returned; callers treat "zero products" as a valid outcome.
    pub async fn load(&self) -> Catalog {
        match self.try_load().await {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::error!(
                    location = %self.source.location(),
                    "failed to load products: {err}"
                );
                Catalog::empty()
            }
        }
    }

    /// Load the catalog, surfacing transport and parse failures.
    pub async fn try_load(&self) -> Result<Catalog, CatalogError> {
        let bytes = self.source.fetch().await?;
        let records: Vec<Value> =
            serde_json::from_slice(&bytes).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let catalog = Catalog::from_records(&records);
        tracing::info!(
            location = %self.source.location(),
            version = %catalog.version(),
            loaded_at = %catalog.loaded_at().to_rfc3339(),
            "Loaded {} products",
            catalog.len()
        );
        Ok(catalog)
    }
}

impl core::fmt::Debug for CatalogLoader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogLoader")
            .field("location", &self.source.location())
            .finish()
    }
}
