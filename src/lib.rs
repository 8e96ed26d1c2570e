pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileKeyValueStore, HttpCatalog, MemoryKeyValueStore, Toast, ToastQueue};
pub use config::toml_config::TomlConfig;
pub use crate::core::cart_store::{CartSettings, CartStore, DEFAULT_STORAGE_KEY};
pub use domain::model::{
    AddStockCheck, Cart, CartLineItem, Notice, Product, StockRecord, UpdateProductAmount,
};
pub use utils::error::{CartError, Result};
