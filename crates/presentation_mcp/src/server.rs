//! MCP tool server
//!
//! Exposes `get_current_weather` and `get_weather_forecast`. Provider
//! failures come back as an `{"error": ...}` text result, never as a
//! protocol error.

use integration_weather::{DEFAULT_FORECAST_DAYS, WeatherService};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;
use tracing::info;

/// Name advertised to MCP clients
pub const SERVER_NAME: &str = "open-meteo";

const INSTRUCTIONS: &str = "Weather lookups backed by the Open-Meteo API. Coordinates are \
                            decimal degrees. Every tool returns a JSON document; failures \
                            return a document with a single `error` field.";

/// Arguments for `get_current_weather`
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct CurrentWeatherRequest {
    /// The latitude coordinate (e.g., 40.7128 for New York)
    pub latitude: f64,
    /// The longitude coordinate (e.g., -74.0060 for New York)
    pub longitude: f64,
}

/// Arguments for `get_weather_forecast`
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct ForecastRequest {
    /// The latitude coordinate
    pub latitude: f64,
    /// The longitude coordinate
    pub longitude: f64,
    /// Number of forecast days (1-16, default 3)
    #[serde(default = "default_days")]
    pub days: i64,
}

const fn default_days() -> i64 {
    DEFAULT_FORECAST_DAYS
}

/// MCP server handler for the weather tools
#[derive(Clone)]
pub struct WeatherServer {
    weather: WeatherService,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for WeatherServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherServer")
            .field("weather", &self.weather)
            .field("tool_router", &"ToolRouter")
            .finish()
    }
}

#[tool_router]
impl WeatherServer {
    /// Create a server answering from the given weather service
    pub fn new(weather: WeatherService) -> Self {
        Self {
            weather,
            tool_router: Self::tool_router(),
        }
    }

    /// Names of the registered tools
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }

    #[tool(
        description = "Fetch current weather conditions (temperature, feels-like, humidity, \
                       precipitation, cloud cover, wind and a description of the sky) for a \
                       coordinate from Open-Meteo."
    )]
    async fn get_current_weather(
        &self,
        Parameters(CurrentWeatherRequest {
            latitude,
            longitude,
        }): Parameters<CurrentWeatherRequest>,
    ) -> String {
        info!(latitude, longitude, "get_current_weather");
        self.weather.current_weather(latitude, longitude).await
    }

    #[tool(
        description = "Fetch a daily weather forecast (weather code, max/min temperature, \
                       precipitation sum, max wind speed) for a coordinate from Open-Meteo. \
                       `days` is clamped to 1-16 and defaults to 3."
    )]
    async fn get_weather_forecast(
        &self,
        Parameters(ForecastRequest {
            latitude,
            longitude,
            days,
        }): Parameters<ForecastRequest>,
    ) -> String {
        info!(latitude, longitude, days, "get_weather_forecast");
        self.weather
            .weather_forecast(latitude, longitude, days)
            .await
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: Some("Open-Meteo Weather".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                website_url: Some("https://open-meteo.com".to_string()),
                icons: None,
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}
