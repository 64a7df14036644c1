//! Product/stock service client.
//!
//! The catalog service is a plain REST API:
//!
//! - `GET /products/{id}` -> product record (id, title, price, image)
//! - `GET /stock/{id}` -> stock record (id, amount)
//!
//! Product records are cached via `moka` (5-minute TTL). Stock is never
//! cached: quantity validation must always see the current value.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use rocket_shoes_core::{Product, ProductId, Stock};

use crate::config::CartConfig;

/// Errors that can occur when calling the catalog service.
///
/// The cart treats them uniformly as "service call failed"; the variants
/// exist for logs and tests.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("catalog returned HTTP {0}")]
    Status(StatusCode),

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No record for the requested product id.
    #[error("not found: {0}")]
    NotFound(ProductId),
}

/// Read access to the product/stock service.
///
/// The cart service depends on this trait rather than on [`CatalogClient`]
/// directly so tests can substitute a stub catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch the catalog record for a product and shape it as a cart entry
    /// with the given quantity.
    async fn product(&self, id: ProductId, amount: u32) -> Result<Product, CatalogError>;

    /// Fetch the current stock record for a product.
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError>;
}

/// Product record as served by `GET /products/{id}` (no cart quantity).
#[derive(Debug, Clone, Deserialize)]
struct ProductRecord {
    id: ProductId,
    title: String,
    price: Decimal,
    image: String,
}

impl ProductRecord {
    fn into_cart_entry(self, amount: u32) -> Product {
        Product {
            id: self.id,
            title: self.title,
            price: self.price,
            image: self.image,
            amount,
        }
    }
}

// =============================================================================
// CatalogClient
// =============================================================================

/// HTTP client for the catalog service.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    /// Base URL without a trailing slash.
    base_url: String,
    api_token: Option<String>,
    product_cache: Cache<ProductId, ProductRecord>,
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &CartConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.catalog_timeout)
            .build()?;

        let product_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.catalog_base_url.as_str().trim_end_matches('/').to_string(),
                api_token: config
                    .catalog_api_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_string()),
                product_cache,
            }),
        })
    }

    /// Execute a GET against `{base_url}/{segment}/{id}` and decode the body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        segment: &str,
        id: ProductId,
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{segment}/{id}", self.inner.base_url);

        let mut request = self.inner.client.get(&url);
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "catalog returned non-success status"
            );
            return Err(CatalogError::Status(status));
        }

        // Decode from text so a malformed body can be logged.
        let body = response.text().await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(200).collect::<String>(),
                    "failed to parse catalog response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }
}

#[async_trait]
impl ProductCatalog for CatalogClient {
    #[instrument(skip(self), fields(id = %id))]
    async fn product(&self, id: ProductId, amount: u32) -> Result<Product, CatalogError> {
        if let Some(record) = self.inner.product_cache.get(&id).await {
            debug!("cache hit for product");
            return Ok(record.into_cart_entry(amount));
        }

        let record: ProductRecord = self.get_json("products", id).await?;
        self.inner.product_cache.insert(id, record.clone()).await;

        Ok(record.into_cart_entry(amount))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.get_json("stock", id).await
    }
}
