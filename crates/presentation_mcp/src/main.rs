//! Open-Meteo MCP server
//!
//! Serves the weather tools over stdin/stdout until the client disconnects.

use integration_weather::WeatherService;
use presentation_mcp::{McpConfig, WeatherServer, config::DEFAULT_LOG_LEVEL};
use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = McpConfig::load();

    // stdout carries the protocol, so logs go to stderr
    let log_level = loaded
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |config| config.log_level.as_str())
        .to_string();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = loaded.unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        McpConfig::default()
    });

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.weather.base_url,
        timeout_secs = config.weather.timeout_secs,
        "Starting Open-Meteo MCP server"
    );

    let weather = WeatherService::open_meteo(config.weather)
        .map_err(|e| anyhow::anyhow!("Failed to initialize weather client: {e}"))?;

    let service = WeatherServer::new(weather).serve(stdio()).await?;
    let reason = service.waiting().await?;

    info!(?reason, "Open-Meteo MCP server stopped");
    Ok(())
}
