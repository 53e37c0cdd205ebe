//! Server configuration
//!
//! Layered from built-in defaults, an optional `open-meteo-mcp.toml` in the
//! working directory, and `OPEN_METEO_MCP__*` environment variables
//! (e.g. `OPEN_METEO_MCP__WEATHER__TIMEOUT_SECS=5`).

use std::path::Path;

use integration_weather::WeatherConfig;
use serde::{Deserialize, Serialize};

/// Config file looked up in the working directory (any supported extension)
pub const CONFIG_FILE: &str = "open-meteo-mcp";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "OPEN_METEO_MCP";

/// Log filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Top-level configuration for the MCP server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpConfig {
    /// Open-Meteo client settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl McpConfig {
    /// Load configuration from the working directory and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name(CONFIG_FILE).required(false))
    }

    /// Load configuration from an explicit file, still honouring the environment
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path).required(false))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
