//! Weather tool bodies and their error mapping.
use chrono::Utc;
use rmcp::model::ErrorData;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{json, Value};

use crate::lib::errors::{
    build_error_data, upstream_error_to_error_data, ErrorOrigin, ToolErrorDescriptor,
    UpstreamError,
};

use super::{
    client::{ForecastPeriod, NwsClient, NWS_SERVICE},
    format::{format_alerts, format_periods},
    request::{AlertsRequest, ForecastRequest, WeatherRequestError},
};

const INVALID_STATE_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "invalid_state",
    "The state code is invalid",
    "Pass a two letter US state code such as CA or NY.",
);
const INVALID_COORDINATES_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "invalid_coordinates",
    "The coordinates are invalid",
    "Pass decimal degrees: latitude between -90 and 90, longitude between -180 and 180.",
);

/// Response from `get_alerts`.
#[derive(Debug, Serialize, JsonSchema)]
pub struct AlertsResponse {
    pub state: String,
    pub alert_count: usize,
    /// Markdown rendering of the alerts.
    pub summary: String,
    /// Upstream GeoJSON, unchanged.
    pub payload: Value,
    pub fetched_at: String,
}

/// Response from `get_forecast`.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub forecast_url: String,
    pub periods: Vec<ForecastPeriod>,
    /// Markdown rendering of the periods.
    pub summary: String,
    pub fetched_at: String,
}

pub async fn get_alerts(client: &NwsClient, request: AlertsRequest) -> Result<AlertsResponse, ErrorData> {
    let state = request
        .normalized_state()
        .map_err(request_error_to_error_data)?;

    let payload = client
        .active_alerts(&state)
        .await
        .map_err(|err| upstream_error_to_error_data(&err))?;

    let features = payload
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            upstream_error_to_error_data(&UpstreamError::Decode {
                service: NWS_SERVICE,
                message: "alerts response has no `features` array".into(),
            })
        })?;
    let alert_count = features.len();
    let summary = format_alerts(features);

    Ok(AlertsResponse {
        state,
        alert_count,
        summary,
        payload,
        fetched_at: Utc::now().to_rfc3339(),
    })
}

pub async fn get_forecast(
    client: &NwsClient,
    max_periods: usize,
    request: ForecastRequest,
) -> Result<ForecastResponse, ErrorData> {
    let coordinates = request.coordinates().map_err(request_error_to_error_data)?;

    let (forecast_url, mut periods) = client
        .forecast(coordinates)
        .await
        .map_err(|err| upstream_error_to_error_data(&err))?;
    periods.truncate(max_periods);

    Ok(ForecastResponse {
        latitude: coordinates.latitude,
        longitude: coordinates.longitude,
        forecast_url,
        summary: format_periods(&periods),
        periods,
        fetched_at: Utc::now().to_rfc3339(),
    })
}

pub fn request_error_to_error_data(err: WeatherRequestError) -> ErrorData {
    let descriptor = match err {
        WeatherRequestError::MissingState | WeatherRequestError::InvalidState { .. } => {
            &INVALID_STATE_ERROR
        }
        WeatherRequestError::NotANumber { .. } | WeatherRequestError::OutOfRange { .. } => {
            &INVALID_COORDINATES_ERROR
        }
    };
    let details = match &err {
        WeatherRequestError::NotANumber { field, value }
        | WeatherRequestError::OutOfRange { field, value, .. } => {
            json!({ "field": field, "value": value })
        }
        WeatherRequestError::InvalidState { value } => json!({ "field": "state", "value": value }),
        WeatherRequestError::MissingState => json!({ "field": "state" }),
    };
    build_error_data(
        descriptor
            .builder()
            .retryable(false)
            .origin(ErrorOrigin::Input)
            .cause(err.to_string())
            .details(details),
    )
}
