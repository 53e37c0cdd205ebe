//! Integration tests for weather lookups using wiremock
//!
//! These tests run the Open-Meteo client and the weather service against a
//! mock HTTP server, checking the outgoing query and the returned documents.

use std::time::Duration;

use integration_weather::{
    CURRENT_FIELDS, DAILY_FIELDS, ForecastDays, OpenMeteoClient, WeatherClient, WeatherConfig,
    WeatherError, WeatherService,
};
use serde_json::Value;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

/// Sample current-conditions response
fn sample_current_response() -> Value {
    serde_json::json!({
        "latitude": 52.52,
        "longitude": 13.419998,
        "generationtime_ms": 0.0231,
        "utc_offset_seconds": 3600,
        "timezone": "Europe/Berlin",
        "timezone_abbreviation": "CET",
        "elevation": 38.0,
        "current_units": {
            "time": "iso8601",
            "interval": "seconds",
            "temperature_2m": "°C",
            "relative_humidity_2m": "%",
            "apparent_temperature": "°C",
            "precipitation": "mm",
            "rain": "mm",
            "weather_code": "wmo code",
            "cloud_cover": "%",
            "wind_speed_10m": "km/h",
            "wind_direction_10m": "°"
        },
        "current": {
            "time": "2024-01-15T12:00",
            "interval": 900,
            "temperature_2m": 5.5,
            "relative_humidity_2m": 75,
            "apparent_temperature": 2.0,
            "precipitation": 0.0,
            "rain": 0.0,
            "weather_code": 3,
            "cloud_cover": 80,
            "wind_speed_10m": 12.5,
            "wind_direction_10m": 225
        }
    })
}

/// Sample daily forecast response
fn sample_forecast_response() -> Value {
    serde_json::json!({
        "latitude": 52.52,
        "longitude": 13.419998,
        "generationtime_ms": 0.0519,
        "utc_offset_seconds": 3600,
        "timezone": "Europe/Berlin",
        "timezone_abbreviation": "CET",
        "elevation": 38.0,
        "daily_units": {
            "time": "iso8601",
            "weather_code": "wmo code",
            "temperature_2m_max": "°C",
            "temperature_2m_min": "°C",
            "precipitation_sum": "mm",
            "wind_speed_10m_max": "km/h"
        },
        "daily": {
            "time": ["2024-01-15", "2024-01-16", "2024-01-17"],
            "weather_code": [3, 61, 2],
            "temperature_2m_max": [8.0, 6.0, 10.0],
            "temperature_2m_min": [2.0, 1.0, 3.0],
            "precipitation_sum": [0.0, 5.5, 0.0],
            "wind_speed_10m_max": [15.0, 20.0, 12.0]
        }
    })
}

fn test_config(mock_server: &MockServer, timeout_secs: u64) -> WeatherConfig {
    WeatherConfig {
        base_url: mock_server.uri(),
        timeout_secs,
    }
}

/// Create a service configured to use the mock server
///
/// # Panics
///
/// Panics if the client cannot be created (should not happen in tests).
fn create_test_service(mock_server: &MockServer) -> WeatherService {
    #[allow(clippy::expect_used)]
    WeatherService::open_meteo(test_config(mock_server, 5)).expect("Failed to create service")
}

/// Setup a mock for the /forecast endpoint with the given response
async fn setup_forecast_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

fn parse(output: &str) -> Value {
    serde_json::from_str(output).expect("output should be valid JSON")
}

fn assert_error_only(output: &str) -> String {
    let value = parse(output);
    let object = value.as_object().expect("error document should be an object");
    assert_eq!(object.len(), 1, "unexpected keys in {output}");
    object["error"]
        .as_str()
        .expect("error should be a string")
        .to_string()
}

// ============================================================================
// Current conditions
// ============================================================================

#[tokio::test]
async fn test_current_weather_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "52.52"))
        .and(query_param("longitude", "13.41"))
        .and(query_param("current", CURRENT_FIELDS))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let output = service.current_weather(52.52, 13.41).await;

    assert!(parse(&output).get("error").is_none(), "got error: {output}");
}

#[tokio::test]
async fn test_current_weather_document() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_current_response()),
    )
    .await;

    let service = create_test_service(&mock_server);
    let value = parse(&service.current_weather(52.52, 13.41).await);

    assert_eq!(
        value,
        serde_json::json!({
            "location": { "latitude": 52.52, "longitude": 13.41 },
            "timezone": "Europe/Berlin",
            "current": {
                "temperature": "5.5 °C",
                "feels_like": "2.0 °C",
                "humidity": "75 %",
                "precipitation": "0.0 mm",
                "cloud_cover": "80 %",
                "wind_speed": "12.5 km/h",
                "wind_direction": "225 °",
                "weather_code": 3,
                "weather_description": "Overcast"
            }
        })
    );
}

#[tokio::test]
async fn test_current_weather_is_pretty_printed() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_current_response()),
    )
    .await;

    let service = create_test_service(&mock_server);
    let output = service.current_weather(52.52, 13.41).await;

    assert!(output.starts_with("{\n  \"location\": {\n    \"latitude\": 52.52"));
}

#[tokio::test]
async fn test_current_weather_missing_units_and_code() {
    let mock_server = MockServer::start().await;

    let mut response = sample_current_response();
    response["current_units"]
        .as_object_mut()
        .expect("units object")
        .remove("wind_speed_10m");
    response["current"]
        .as_object_mut()
        .expect("current object")
        .remove("weather_code");

    setup_forecast_mock(&mock_server, ResponseTemplate::new(200).set_body_json(response)).await;

    let service = create_test_service(&mock_server);
    let value = parse(&service.current_weather(52.52, 13.41).await);

    assert_eq!(value["current"]["wind_speed"], "12.5 km/h");
    assert_eq!(value["current"]["weather_code"], Value::Null);
    assert_eq!(value["current"]["weather_description"], "Clear sky");
}

#[tokio::test]
async fn test_current_weather_thunderstorm() {
    let mock_server = MockServer::start().await;

    let mut response = sample_current_response();
    response["current"]["weather_code"] = serde_json::json!(95);
    setup_forecast_mock(&mock_server, ResponseTemplate::new(200).set_body_json(response)).await;

    let service = create_test_service(&mock_server);
    let value = parse(&service.current_weather(52.52, 13.41).await);

    assert_eq!(value["current"]["weather_description"], "Thunderstorm");
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn test_forecast_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "52.52"))
        .and(query_param("longitude", "13.41"))
        .and(query_param("daily", DAILY_FIELDS))
        .and(query_param("timezone", "auto"))
        .and(query_param("forecast_days", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server);
    let output = service.weather_forecast(52.52, 13.41, 3).await;

    assert!(parse(&output).get("error").is_none(), "got error: {output}");
}

#[tokio::test]
async fn test_forecast_clamps_days_in_query() {
    for (requested, sent) in [(0, "1"), (-7, "1"), (17, "16"), (365, "16"), (10, "10")] {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("forecast_days", sent))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let service = create_test_service(&mock_server);
        let output = service.weather_forecast(52.52, 13.41, requested).await;

        assert!(
            parse(&output).get("error").is_none(),
            "days={requested} got error: {output}"
        );
    }
}

#[tokio::test]
async fn test_forecast_passthrough_is_exact() {
    let mock_server = MockServer::start().await;
    let payload = sample_forecast_response();

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(payload.clone()),
    )
    .await;

    let service = create_test_service(&mock_server);
    let output = service.weather_forecast(52.52, 13.41, 3).await;

    let expected = serde_json::to_string_pretty(&payload).expect("serialize");
    assert_eq!(output, expected);
}

// ============================================================================
// Failure scenarios
// ============================================================================

#[tokio::test]
async fn test_timeout_becomes_error_document() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(sample_current_response())
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let service = WeatherService::open_meteo(test_config(&mock_server, 1))
        .expect("Failed to create service");

    let current = assert_error_only(&service.current_weather(52.52, 13.41).await);
    assert!(current.contains("timed out"), "unexpected message: {current}");

    let forecast = assert_error_only(&service.weather_forecast(52.52, 13.41, 3).await);
    assert!(forecast.contains("timed out"), "unexpected message: {forecast}");
}

#[tokio::test]
async fn test_client_reports_timeout_variant() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(sample_forecast_response())
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let client = OpenMeteoClient::new(test_config(&mock_server, 1)).expect("client");
    let result = client
        .fetch_forecast(52.52, 13.41, ForecastDays::default())
        .await;

    assert!(
        matches!(result, Err(WeatherError::Timeout { timeout_secs: 1 })),
        "Expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn test_provider_error_reason_is_reported() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Latitude must be in range of -90 to 90°. Given: 100.0."
        })),
    )
    .await;

    let service = create_test_service(&mock_server);
    let message = assert_error_only(&service.current_weather(100.0, 13.41).await);

    assert_eq!(
        message,
        "Provider returned HTTP 400: Latitude must be in range of -90 to 90°. Given: 100.0."
    );
}

#[tokio::test]
async fn test_server_error_is_error_document() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(&mock_server, ResponseTemplate::new(503)).await;

    let service = create_test_service(&mock_server);
    let message = assert_error_only(&service.weather_forecast(52.52, 13.41, 3).await);

    assert!(message.contains("503"), "unexpected message: {message}");
}

#[tokio::test]
async fn test_non_json_body_is_error_document() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
    )
    .await;

    let service = create_test_service(&mock_server);

    let message = assert_error_only(&service.current_weather(52.52, 13.41).await);
    assert!(message.starts_with("Parse error"), "unexpected message: {message}");

    let message = assert_error_only(&service.weather_forecast(52.52, 13.41, 3).await);
    assert!(message.starts_with("Parse error"), "unexpected message: {message}");
}

#[tokio::test]
async fn test_unreachable_provider_is_error_document() {
    let config = WeatherConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 2,
    };
    let service = WeatherService::open_meteo(config).expect("Failed to create service");

    assert_error_only(&service.current_weather(52.52, 13.41).await);
    assert_error_only(&service.weather_forecast(52.52, 13.41, 3).await);
}
