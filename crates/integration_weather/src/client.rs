//! Open-Meteo weather client
//!
//! HTTP client for the Open-Meteo Weather API. Responses are handed back as
//! decoded JSON documents; shaping them is left to [`crate::WeatherService`].

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::ForecastDays;

/// Decoded top-level JSON object returned by the `/forecast` endpoint
pub type ApiResponse = Map<String, Value>;

/// Fields requested for current conditions
pub const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
                                  precipitation,rain,weather_code,cloud_cover,wind_speed_10m,\
                                  wind_direction_10m";

/// Daily aggregates requested for forecasts
pub const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum,wind_speed_10m_max";

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// No complete response within the configured timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout that elapsed
        timeout_secs: u64,
    },

    /// The provider answered with a non-success status
    #[error("Provider returned HTTP {status}: {reason}")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Reason reported by the provider, or the canonical status text
        reason: String,
    },

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Weather service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Weather client trait for fetching raw provider documents
#[allow(clippy::struct_field_names)] // automock generates struct with `fetch_*` prefixes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Fetch current conditions for a coordinate
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ApiResponse, WeatherError>;

    /// Fetch daily aggregates for the next `days` days
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: ForecastDays,
    ) -> Result<ApiResponse, WeatherError>;
}

/// Open-Meteo HTTP client implementation
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(WeatherConfig::default())
    }

    /// Configuration this client was built with
    pub const fn config(&self) -> &WeatherConfig {
        &self.config
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.config.base_url.trim_end_matches('/'))
    }

    /// Query parameters for a current-conditions request
    fn current_query(latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ]
    }

    /// Query parameters for a daily forecast request
    fn forecast_query(
        latitude: f64,
        longitude: f64,
        days: ForecastDays,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", days.to_string()),
        ]
    }

    async fn get_document(
        &self,
        query: &[(&'static str, String)],
    ) -> Result<ApiResponse, WeatherError> {
        let url = self.forecast_url();
        debug!(url = %url, ?query, "Querying Open-Meteo");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        if !status.is_success() {
            return Err(WeatherError::Provider {
                status: status.as_u16(),
                reason: provider_reason(status, &body),
            });
        }

        parse_document(&body)
    }

    fn map_transport_error(&self, err: &reqwest::Error) -> WeatherError {
        if err.is_timeout() {
            WeatherError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else if err.is_connect() {
            WeatherError::ConnectionFailed(err.to_string())
        } else {
            WeatherError::RequestFailed(err.to_string())
        }
    }
}

/// Open-Meteo reports failures as `{"error": true, "reason": "..."}`
fn provider_reason(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("reason").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        })
}

fn parse_document(body: &str) -> Result<ApiResponse, WeatherError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(WeatherError::ParseError(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(WeatherError::ParseError(e.to_string())),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ApiResponse, WeatherError> {
        self.get_document(&Self::current_query(latitude, longitude))
            .await
    }

    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude, days = %days))]
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: ForecastDays,
    ) -> Result<ApiResponse, WeatherError> {
        self.get_document(&Self::forecast_query(latitude, longitude, days))
            .await
    }
}
