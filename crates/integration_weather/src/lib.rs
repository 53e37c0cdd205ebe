//! Open-Meteo weather integration
//!
//! Client for the Open-Meteo Weather API (<https://open-meteo.com>).
//! Provides current conditions and daily forecasts as JSON documents
//! without requiring an API key.

pub mod client;
mod models;
mod service;

pub use client::{
    ApiResponse, CURRENT_FIELDS, DAILY_FIELDS, OpenMeteoClient, WeatherClient, WeatherConfig,
    WeatherError,
};
pub use models::{
    CurrentConditions, CurrentReport, DEFAULT_FORECAST_DAYS, ErrorReport, ForecastDays, Location,
    MAX_FORECAST_DAYS, MIN_FORECAST_DAYS, UNKNOWN_CONDITION, WeatherCode, to_pretty_json,
};
pub use service::WeatherService;
