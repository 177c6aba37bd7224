use clap::Parser;
use mobikom_crawler::core::ConfigProvider;
use mobikom_crawler::utils::{logger, validation::Validate};
use mobikom_crawler::{CliConfig, CrawlEngine, CrawlError, TomlConfig};

async fn run<C: ConfigProvider + Validate>(config: C) -> Result<(), CrawlError> {
    // 驗證配置
    config.validate()?;

    let engine = CrawlEngine::from_config(&config).await?;
    let summary = engine.run().await?;

    println!("✅ Crawl completed: {} products exported", summary.stats.exported);
    println!("📁 Output saved to: {}", summary.output_path);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting mobikom-crawler");

    let toml_path = config.config.clone();
    let result = match toml_path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            match TomlConfig::from_file(&path) {
                Ok(toml_config) => run(toml_config).await,
                Err(e) => Err(e),
            }
        }
        None => run(config).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ Crawl failed: {} (Category: {:?})", e, e.category());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}
