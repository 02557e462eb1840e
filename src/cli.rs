use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scrape-proxy")]
#[command(about = "Caching HTTP gateway in front of a headless browser pool")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[arg(long, help = "Configuration file path (key=value lines)")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "api_keys.txt", help = "API key file, one key per line")]
    pub keys: PathBuf,

    #[arg(long, help = "Server port")]
    pub port: Option<u16>,

    #[arg(long, help = "Browser pool size")]
    pub pool_size: Option<usize>,

    #[arg(long, help = "Chromium executable path")]
    pub chromium_path: Option<String>,

    #[arg(long, help = "Enable verbose logging")]
    pub verbose: bool,
}

pub fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    Ok(())
}
