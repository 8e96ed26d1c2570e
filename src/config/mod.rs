#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::cart_store::DEFAULT_STORAGE_KEY;
#[cfg(feature = "cli")]
use toml_config::{CartConfig, TomlConfig};
#[cfg(feature = "cli")]
use crate::core::{AddStockCheck, ConfigProvider};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "rocketshoes-cart")]
#[command(about = "Manage the RocketShoes shopping cart from the command line")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Catalog base URL [default: http://localhost:3333]")]
    pub api_url: Option<String>,

    #[arg(long, global = true, help = "Storage directory [default: ./.rocketshoes]")]
    pub storage_path: Option<String>,

    #[arg(long, global = true, help = "Storage key [default: @RocketShoes:cart]")]
    pub storage_key: Option<String>,

    #[arg(long, global = true, help = "Catalog request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(
        long,
        global = true,
        help = "Check the stock endpoint instead of the product amount when adding"
    )]
    pub stock_endpoint_on_add: bool,

    #[arg(long, short, global = true, help = "Load settings from a TOML file")]
    pub config: Option<String>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: cli::CartCommand,
}

#[cfg(feature = "cli")]
pub const DEFAULT_API_URL: &str = "http://localhost:3333";
#[cfg(feature = "cli")]
pub const DEFAULT_STORAGE_PATH: &str = "./.rocketshoes";

#[cfg(feature = "cli")]
impl CliConfig {
    /// Applies the flags given on the command line on top of a file config.
    ///
    /// Returns the names of the overridden settings.
    pub fn merge_into(&self, file: &mut TomlConfig) -> Vec<&'static str> {
        let mut overridden = Vec::new();

        if let Some(api_url) = &self.api_url {
            file.api.base_url = api_url.clone();
            overridden.push("api_url");
        }
        if let Some(timeout) = self.timeout {
            file.api.timeout_seconds = Some(timeout);
            overridden.push("timeout");
        }
        if let Some(storage_path) = &self.storage_path {
            file.storage.path = storage_path.clone();
            overridden.push("storage_path");
        }
        if let Some(storage_key) = &self.storage_key {
            file.storage.key = Some(storage_key.clone());
            overridden.push("storage_key");
        }
        if self.stock_endpoint_on_add {
            file.cart
                .get_or_insert(CartConfig {
                    add_stock_check: None,
                })
                .add_stock_check = Some(AddStockCheck::StockEndpoint);
            overridden.push("stock_endpoint_on_add");
        }

        overridden
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    fn storage_path(&self) -> &str {
        self.storage_path.as_deref().unwrap_or(DEFAULT_STORAGE_PATH)
    }

    fn storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    fn add_stock_check(&self) -> AddStockCheck {
        if self.stock_endpoint_on_add {
            AddStockCheck::StockEndpoint
        } else {
            AddStockCheck::ProductField
        }
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        use crate::utils::validation::*;

        validate_url("api_url", self.api_base_url())?;
        validate_path("storage_path", self.storage_path())?;
        validate_non_empty_string("storage_key", self.storage_key())?;
        if let Some(timeout) = self.timeout {
            validate_range("timeout", timeout, 1, 300)?;
        }

        Ok(())
    }
}
