use std::path::Path;

use serde::{Deserialize, Serialize};

use super::fields::{validate_non_empty, validate_service_url, validate_timeout};
use crate::lib::errors::ConfigError;

pub const DEFAULT_NWS_API_BASE: &str = "https://api.weather.gov";
pub const DEFAULT_USER_AGENT: &str = "weather-app/1.0";
pub const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FORECAST_PERIODS: usize = 5;

/// NWS API settings.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherConfig {
    pub api_base: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub forecast_periods: usize,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawWeatherConfig {
    pub api_base: Option<String>,
    pub user_agent: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub forecast_periods: Option<usize>,
}

pub fn parse_weather_section(
    raw: Option<RawWeatherConfig>,
    path: &Path,
) -> Result<WeatherConfig, ConfigError> {
    let raw = raw.unwrap_or_default();

    let api_base = raw
        .api_base
        .unwrap_or_else(|| DEFAULT_NWS_API_BASE.to_string());
    validate_service_url(path, "weather.api_base", &api_base)?;

    // NWS rejects requests without an identifying User-Agent.
    let user_agent = raw
        .user_agent
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
    validate_non_empty(path, "weather.user_agent", &user_agent)?;

    let request_timeout_secs = raw
        .request_timeout_secs
        .unwrap_or(DEFAULT_WEATHER_TIMEOUT_SECS);
    validate_timeout(path, "weather.request_timeout_secs", request_timeout_secs, 120)?;

    let forecast_periods = raw.forecast_periods.unwrap_or(DEFAULT_FORECAST_PERIODS);
    if !(1..=14).contains(&forecast_periods) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "weather.forecast_periods",
            message: "Specify a value between 1 and 14".into(),
        });
    }

    Ok(WeatherConfig {
        api_base,
        user_agent,
        request_timeout_secs,
        forecast_periods,
    })
}
