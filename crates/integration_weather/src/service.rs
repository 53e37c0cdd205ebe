//! Weather lookups returning ready-to-send JSON documents
//!
//! Both operations always produce a string: the shaped (or passed-through)
//! provider document on success, an `{"error": ...}` document on any failure.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::client::{OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError};
use crate::models::{CurrentReport, ErrorReport, ForecastDays, Location, to_pretty_json};

/// Weather lookups backed by a [`WeatherClient`]
#[derive(Clone)]
pub struct WeatherService {
    client: Arc<dyn WeatherClient>,
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("client", &"dyn WeatherClient")
            .finish()
    }
}

impl WeatherService {
    /// Create a service over any client
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    /// Create a service backed by Open-Meteo
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn open_meteo(config: WeatherConfig) -> Result<Self, WeatherError> {
        Ok(Self::new(Arc::new(OpenMeteoClient::new(config)?)))
    }

    /// Current conditions for a coordinate, shaped into a [`CurrentReport`]
    #[instrument(skip(self))]
    pub async fn current_weather(&self, latitude: f64, longitude: f64) -> String {
        let location = Location {
            latitude,
            longitude,
        };

        let report = self
            .client
            .fetch_current(latitude, longitude)
            .await
            .and_then(|response| CurrentReport::from_response(location, &response));

        match report {
            Ok(report) => {
                debug!(
                    condition = %report.current.weather_description,
                    "Retrieved current weather"
                );
                to_pretty_json(&report)
            },
            Err(e) => Self::failure("current weather", &e),
        }
    }

    /// Daily forecast for a coordinate, passed through unmodified
    ///
    /// `days` is clamped into `1..=16` before the request is made.
    #[instrument(skip(self))]
    pub async fn weather_forecast(&self, latitude: f64, longitude: f64, days: i64) -> String {
        let days = ForecastDays::clamped(days);

        match self.client.fetch_forecast(latitude, longitude, days).await {
            Ok(response) => {
                debug!(days = %days, "Retrieved weather forecast");
                to_pretty_json(&response)
            },
            Err(e) => Self::failure("weather forecast", &e),
        }
    }

    fn failure(operation: &str, err: &WeatherError) -> String {
        warn!(error = %err, "Failed to get {operation}");
        to_pretty_json(&ErrorReport::from_error(err))
    }
}
