use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input for `get_alerts`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AlertsRequest {
    /// Two letter US state code (eg. CA, NY).
    pub state: String,
}

impl AlertsRequest {
    /// Upper-cased state code, or an error if it is not two ASCII letters.
    pub fn normalized_state(&self) -> Result<String, WeatherRequestError> {
        let trimmed = self.state.trim();
        if trimmed.is_empty() {
            return Err(WeatherRequestError::MissingState);
        }
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(WeatherRequestError::InvalidState {
                value: self.state.clone(),
            });
        }
        Ok(trimmed.to_ascii_uppercase())
    }
}

/// Input for `get_forecast`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ForecastRequest {
    /// Latitude of the location.
    pub latitude: String,
    /// Longitude of the location.
    pub longitude: String,
}

/// Parsed and range-checked coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// `lat,lon` path segment with at most four decimals, as NWS expects.
    pub fn points_path(&self) -> String {
        format!(
            "points/{},{}",
            format_coordinate(self.latitude),
            format_coordinate(self.longitude)
        )
    }
}

impl ForecastRequest {
    pub fn coordinates(&self) -> Result<Coordinates, WeatherRequestError> {
        let latitude = parse_coordinate("latitude", &self.latitude, 90.0)?;
        let longitude = parse_coordinate("longitude", &self.longitude, 180.0)?;
        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}

fn parse_coordinate(field: &'static str, raw: &str, limit: f64) -> Result<f64, WeatherRequestError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| WeatherRequestError::NotANumber {
            field,
            value: raw.to_string(),
        })?;
    if !value.is_finite() || value.abs() > limit {
        return Err(WeatherRequestError::OutOfRange {
            field,
            value: raw.to_string(),
            limit,
        });
    }
    Ok(value)
}

fn format_coordinate(value: f64) -> String {
    let fixed = format!("{value:.4}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Input validation errors for weather tools.
#[derive(Debug, Error, PartialEq)]
pub enum WeatherRequestError {
    #[error("state is required")]
    MissingState,
    #[error("state `{value}` must be a two letter US state code (eg. CA, NY)")]
    InvalidState { value: String },
    #[error("{field} `{value}` is not a number")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} `{value}` must be between -{limit} and {limit}")]
    OutOfRange {
        field: &'static str,
        value: String,
        limit: f64,
    },
}
