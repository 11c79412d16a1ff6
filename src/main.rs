use anyhow::Context;
use clap::Parser;
use osm_gateway::domain::ports::ConfigProvider;
use osm_gateway::utils::{logger, validation::Validate};
use osm_gateway::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_server_logger(cli.verbose);
    }

    tracing::info!("Starting osm-gateway");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        "Upstreams: wikipedia={} justdial={} overpass={} (timeout {:?}, retries {})",
        config.wikipedia_base_url(),
        config.justdial_base_url(),
        config.overpass_endpoint(),
        config.request_timeout(),
        config.retry_attempts()
    );

    osm_gateway::server::serve(&config)
        .await
        .with_context(|| format!("Server on {} failed", config.bind_address()))?;

    Ok(())
}
