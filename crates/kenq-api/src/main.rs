use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kenq_api::ApiServer;
use kenq_config::ConfigManager;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// KenQ customer portal
#[derive(Debug, Parser)]
#[command(name = "kenq-portal", version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kenq=debug"));
    fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let mut manager = match args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let mut config = manager.load().context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    info!(
        "Starting KenQ portal {} ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.portal.environment
    );
    let server = ApiServer::new(config).context("Failed to initialize portal")?;
    server.run().await.context("Portal server failed")?;
    Ok(())
}
