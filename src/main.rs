use clap::Parser;
use scrape_proxy::{run_server, ApiKeys, Chromium, Cli, Config, ProxyService, setup_logging};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    setup_logging(args.verbose)?;

    info!("Starting scrape-proxy v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args).await?;
    let keys = load_keys(&args).await?;

    let engine = Chromium::new(config.chromium_path.clone());
    let service = Arc::new(ProxyService::new(engine, &config, keys));

    if let Err(e) = run_server(service, config.port).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("scrape-proxy stopped");
    Ok(())
}

async fn load_config(args: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if let Some(config_path) = &args.config {
        Config::load(config_path).await?
    } else {
        Config::default()
    };

    // Override with CLI arguments
    if let Some(port) = args.port {
        config.port = port;
    }

    if let Some(pool_size) = args.pool_size {
        config.pool_size = pool_size;
    }

    if let Some(chromium_path) = &args.chromium_path {
        config.chromium_path = chromium_path.clone();
    }

    config.validate()?;

    info!("Configuration loaded successfully");
    info!("Browser pool size: {}", config.pool_size);
    info!("Cache: {} entries, ttl {:?}", config.cache_max_size, config.cache_ttl);
    info!("Chromium path: {}", config.chromium_path);

    Ok(config)
}

async fn load_keys(args: &Cli) -> Result<ApiKeys, Box<dyn std::error::Error>> {
    let keys = ApiKeys::load(&args.keys).await?;

    if keys.is_empty() {
        warn!("API key file {:?} contains no keys, all requests will be rejected", args.keys);
    } else {
        info!("Loaded {} API keys", keys.len());
    }

    Ok(keys)
}
