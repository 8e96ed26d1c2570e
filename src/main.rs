use anyhow::Context;
use clap::Parser;
use rocketshoes_cart::config::cli::{execute, render_cart};
use rocketshoes_cart::core::ConfigProvider;
use rocketshoes_cart::utils::error::{CartError, ErrorSeverity};
use rocketshoes_cart::utils::{logger, validation::Validate};
use rocketshoes_cart::{
    CartSettings, CartStore, CliConfig, FileKeyValueStore, HttpCatalog, ToastQueue, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (若有指定)，命令列旗標優先
    let mut overridden = Vec::new();
    let file_config = match &cli.config {
        Some(path) => {
            let mut config = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))?;
            overridden = cli.merge_into(&mut config);
            Some(config)
        }
        None => None,
    };

    // 初始化日誌
    let verbose = cli.verbose || file_config.as_ref().is_some_and(|c| c.verbose());
    let json_logs = cli.json_logs || file_config.as_ref().is_some_and(|c| c.json_logs());
    if json_logs {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);
    if !overridden.is_empty() {
        tracing::info!(
            "🔧 Command line overrides config file for: {}",
            overridden.join(", ")
        );
    }

    let outcome = match &file_config {
        Some(config) => run(config, &cli).await,
        None => run(&cli, &cli).await,
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Cart command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run<P: ConfigProvider + Validate>(config: &P, cli: &CliConfig) -> Result<(), CartError> {
    // 驗證配置
    config.validate()?;

    let catalog = HttpCatalog::from_config(config)?;
    let storage = FileKeyValueStore::new(config.storage_path());
    let toasts = ToastQueue::new();

    tracing::info!(
        "🚀 Cart store using catalog {} and storage {}",
        catalog.base_url(),
        storage.file_path().display()
    );

    let mut store = CartStore::load(
        catalog,
        storage,
        toasts.clone(),
        CartSettings::from_config(config),
    )
    .await?;

    execute(&mut store, &cli.command).await;

    for toast in toasts.drain() {
        eprintln!("⚠️ {}", toast.message);
    }
    println!("{}", render_cart(store.cart()));

    Ok(())
}
