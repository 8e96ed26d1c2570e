pub mod cart_store;

pub use crate::domain::model::{
    AddStockCheck, Cart, CartLineItem, Notice, Product, StockRecord, UpdateProductAmount,
};
pub use crate::domain::ports::{CatalogService, ConfigProvider, KeyValueStore, Notifier};
pub use crate::utils::error::Result;
