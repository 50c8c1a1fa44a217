//! NWS API client.
use std::time::Duration;

use reqwest::{header::ACCEPT, Client};
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    lib::{errors::UpstreamError, http},
    server::config::WeatherConfig,
};

use super::request::Coordinates;

pub const NWS_SERVICE: &str = "nws";
const GEO_JSON: &str = "application/geo+json";

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
struct PointsProperties {
    #[serde(default)]
    forecast: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastEnvelope {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<ForecastPeriod>,
}

/// One forecast period, field names as NWS reports them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub name: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub is_daytime: Option<bool>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub temperature_unit: Option<String>,
    #[serde(default)]
    pub wind_speed: Option<String>,
    #[serde(default)]
    pub wind_direction: Option<String>,
    #[serde(default)]
    pub short_forecast: Option<String>,
    #[serde(default)]
    pub detailed_forecast: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NwsClient {
    client: Client,
    api_base: String,
}

impl NwsClient {
    pub fn new(config: &WeatherConfig) -> reqwest::Result<Self> {
        let client = http::build_client(
            Duration::from_secs(config.request_timeout_secs),
            Some(&config.user_agent),
        )?;
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
        })
    }

    /// Raw active-alerts GeoJSON for a state or marine area code.
    pub async fn active_alerts(&self, state: &str) -> Result<Value, UpstreamError> {
        let url = http::join_url(&self.api_base, &format!("alerts/active/area/{state}"));
        self.get_json(&url).await
    }

    /// Resolve the grid forecast URL for a point, then fetch its periods.
    pub async fn forecast(
        &self,
        coordinates: Coordinates,
    ) -> Result<(String, Vec<ForecastPeriod>), UpstreamError> {
        let points_url = http::join_url(&self.api_base, &coordinates.points_path());
        let points: PointsResponse = self.get_json(&points_url).await?;
        let forecast_url = points
            .properties
            .forecast
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| UpstreamError::Decode {
                service: NWS_SERVICE,
                message: "points response has no forecast URL for this location".into(),
            })?;

        let envelope: ForecastEnvelope = self.get_json(&forecast_url).await?;
        Ok((forecast_url, envelope.properties.periods))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        debug!(target: "docweather_mcp::weather", url, "Requesting NWS API");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, GEO_JSON)
            .send()
            .await
            .map_err(|err| http::transport_error(NWS_SERVICE, err))?;
        http::read_json(NWS_SERVICE, response).await
    }
}
