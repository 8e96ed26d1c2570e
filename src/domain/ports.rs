use crate::domain::model::{AddStockCheck, Notice, Product, StockRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Remote catalog: product records and stock levels.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn product(&self, product_id: u64) -> Result<Product>;
    async fn stock(&self, product_id: u64) -> Result<StockRecord>;
}

/// Durable string key-value store, the local-storage equivalent.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set(&self, key: &str, value: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Sink for transient user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn storage_key(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn add_stock_check(&self) -> AddStockCheck;

    /// Extra headers sent with every catalog request.
    fn api_headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}
