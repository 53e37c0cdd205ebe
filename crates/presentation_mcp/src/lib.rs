//! Open-Meteo MCP presentation layer
//!
//! Registers the weather lookups as MCP tools and serves them over stdio.

pub mod config;
pub mod server;

pub use config::McpConfig;
pub use server::{CurrentWeatherRequest, ForecastRequest, WeatherServer};
