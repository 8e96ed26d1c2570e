use crate::core::{CatalogService, ConfigProvider, Product, Result, StockRecord};
use crate::utils::error::CartError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// reqwest-backed client for the storefront catalog API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut catalog = Self::new(config.api_base_url());
        catalog.timeout = config.request_timeout();

        for (key, value) in config.api_headers() {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                CartError::InvalidConfigValueError {
                    field: "api.headers".to_string(),
                    value: key.clone(),
                    reason: format!("Invalid header name: {}", e),
                }
            })?;
            let value = HeaderValue::from_str(&value).map_err(|e| {
                CartError::InvalidConfigValueError {
                    field: format!("api.headers.{}", key),
                    value: value.clone(),
                    reason: format!("Invalid header value: {}", e),
                }
            })?;
            catalog.headers.insert(name, value);
        }

        Ok(catalog)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Making API request to: {}", url);

        let mut request = self.client.get(&url).headers(self.headers.clone());

        // 設定超時
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        tracing::debug!("API response status: {}", response.status());

        let body = response.error_for_status()?.json::<T>().await?;
        Ok(body)
    }
}

#[async_trait::async_trait]
impl CatalogService for HttpCatalog {
    async fn product(&self, product_id: u64) -> Result<Product> {
        self.get_json(&format!("/products/{}", product_id)).await
    }

    async fn stock(&self, product_id: u64) -> Result<StockRecord> {
        self.get_json(&format!("/stock/{}", product_id)).await
    }
}
