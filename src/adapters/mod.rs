// Adapters layer: concrete implementations for external systems (catalog http, storage, toasts).

pub mod http;
pub mod notifier;
pub mod storage;

pub use http::HttpCatalog;
pub use notifier::{Toast, ToastQueue};
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
