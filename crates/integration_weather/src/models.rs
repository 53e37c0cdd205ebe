//! Weather data models
//!
//! Weather-code decoding, forecast day bounds and the documents returned to
//! tool callers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{ApiResponse, WeatherError};

/// Fewest forecast days Open-Meteo accepts
pub const MIN_FORECAST_DAYS: u8 = 1;

/// Most forecast days Open-Meteo accepts
pub const MAX_FORECAST_DAYS: u8 = 16;

/// Forecast length used when the caller does not ask for one
pub const DEFAULT_FORECAST_DAYS: i64 = 3;

/// Description for codes outside the lookup table
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Number of forecast days, always within `1..=16`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForecastDays(u8);

impl ForecastDays {
    /// Clamp a requested day count into the supported range
    ///
    /// Out-of-range requests are never an error: anything below the minimum
    /// becomes 1 and anything above the maximum becomes 16.
    #[must_use]
    pub fn clamped(requested: i64) -> Self {
        let days = requested.clamp(
            i64::from(MIN_FORECAST_DAYS),
            i64::from(MAX_FORECAST_DAYS),
        );
        Self(u8::try_from(days).unwrap_or(MAX_FORECAST_DAYS))
    }

    /// Day count as sent to the provider
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for ForecastDays {
    fn default() -> Self {
        Self::clamped(DEFAULT_FORECAST_DAYS)
    }
}

impl fmt::Display for ForecastDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// WMO weather code as reported by Open-Meteo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeatherCode(i64);

impl WeatherCode {
    /// Wrap a raw code
    #[must_use]
    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    /// The raw code
    #[must_use]
    pub const fn code(self) -> i64 {
        self.0
    }

    /// Human-readable description, [`UNKNOWN_CONDITION`] for unlisted codes
    ///
    /// See: <https://open-meteo.com/en/docs> for WMO code reference
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self.0 {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Foggy",
            48 => "Depositing rime fog",
            51 => "Light drizzle",
            53 => "Moderate drizzle",
            55 => "Dense drizzle",
            61 => "Slight rain",
            63 => "Moderate rain",
            65 => "Heavy rain",
            71 => "Slight snow",
            73 => "Moderate snow",
            75 => "Heavy snow",
            80 => "Slight rain showers",
            81 => "Moderate rain showers",
            82 => "Violent rain showers",
            95 => "Thunderstorm",
            96 => "Thunderstorm with slight hail",
            99 => "Thunderstorm with heavy hail",
            _ => UNKNOWN_CONDITION,
        }
    }

    /// Read a code from a JSON value
    ///
    /// Integral floats such as `3.0` are accepted; anything else is not a code.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn from_json(value: &Value) -> Option<Self> {
        if let Some(code) = value.as_i64() {
            return Some(Self(code));
        }
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.trunc() == *f)
            .map(|f| Self(f as i64))
    }

    /// Decode the `weather_code` field of a `current` record
    ///
    /// An absent field reads as code 0 ("Clear sky"). A field that is present
    /// but `null` or non-integral has no entry in the table.
    #[must_use]
    pub fn describe_field(field: Option<&Value>) -> &'static str {
        match field {
            None => Self::new(0).description(),
            Some(value) => Self::from_json(value).map_or(UNKNOWN_CONDITION, Self::description),
        }
    }
}

impl fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A current-conditions field and the unit used when the provider omits one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Measurement {
    field: &'static str,
    fallback_unit: &'static str,
}

const TEMPERATURE: Measurement = Measurement {
    field: "temperature_2m",
    fallback_unit: "°C",
};
const FEELS_LIKE: Measurement = Measurement {
    field: "apparent_temperature",
    fallback_unit: "°C",
};
const HUMIDITY: Measurement = Measurement {
    field: "relative_humidity_2m",
    fallback_unit: "%",
};
const PRECIPITATION: Measurement = Measurement {
    field: "precipitation",
    fallback_unit: "mm",
};
const CLOUD_COVER: Measurement = Measurement {
    field: "cloud_cover",
    fallback_unit: "%",
};
const WIND_SPEED: Measurement = Measurement {
    field: "wind_speed_10m",
    fallback_unit: "km/h",
};
const WIND_DIRECTION: Measurement = Measurement {
    field: "wind_direction_10m",
    fallback_unit: "°",
};

impl Measurement {
    /// Render as `"<value> <unit>"`
    fn format(self, current: &Map<String, Value>, units: &Map<String, Value>) -> String {
        let value = current
            .get(self.field)
            .map_or_else(|| Value::Null.to_string(), scalar_text);
        let unit = units
            .get(self.field)
            .map_or_else(|| self.fallback_unit.to_string(), scalar_text);
        format!("{value} {unit}")
    }
}

/// Strings render bare, everything else as compact JSON
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Borrow a nested object, treating a missing or `null` section as empty
fn section<'a>(
    response: &'a ApiResponse,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, WeatherError> {
    match response.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(WeatherError::ParseError(format!(
            "`{key}` is not a JSON object"
        ))),
    }
}

/// Coordinates echoed back exactly as requested
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Formatted current conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub precipitation: String,
    pub cloud_cover: String,
    pub wind_speed: String,
    pub wind_direction: String,
    /// Raw code as reported, `null` when absent
    pub weather_code: Value,
    pub weather_description: String,
}

/// Document returned for a current-conditions lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReport {
    pub location: Location,
    /// Timezone resolved by the provider, `null` when absent
    pub timezone: Value,
    pub current: CurrentConditions,
}

impl CurrentReport {
    /// Reshape a provider response into a report
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::ParseError`] if `current` or `current_units`
    /// is present but not an object.
    pub fn from_response(location: Location, response: &ApiResponse) -> Result<Self, WeatherError> {
        let empty = Map::new();
        let current = section(response, "current")?.unwrap_or(&empty);
        let units = section(response, "current_units")?.unwrap_or(&empty);

        let code = current.get("weather_code");

        Ok(Self {
            location,
            timezone: response.get("timezone").cloned().unwrap_or(Value::Null),
            current: CurrentConditions {
                temperature: TEMPERATURE.format(current, units),
                feels_like: FEELS_LIKE.format(current, units),
                humidity: HUMIDITY.format(current, units),
                precipitation: PRECIPITATION.format(current, units),
                cloud_cover: CLOUD_COVER.format(current, units),
                wind_speed: WIND_SPEED.format(current, units),
                wind_direction: WIND_DIRECTION.format(current, units),
                weather_code: code.cloned().unwrap_or(Value::Null),
                weather_description: WeatherCode::describe_field(code).to_string(),
            },
        })
    }
}

/// Document returned when a lookup fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}

impl ErrorReport {
    /// Capture the message of any failure
    pub fn from_error(err: &impl fmt::Display) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Serialize a document with two-space indentation
pub fn to_pretty_json<T: Serialize>(document: &T) -> String {
    serde_json::to_string_pretty(document).unwrap_or_else(|e| {
        let fallback = ErrorReport::from_error(&e);
        format!("{{\n  \"error\": {}\n}}", Value::String(fallback.error))
    })
}
