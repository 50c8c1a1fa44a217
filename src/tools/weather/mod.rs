//! MCP tools for NWS weather alerts and forecasts.

pub mod client;
pub mod format;
pub mod handlers;
pub mod request;

pub use client::{ForecastPeriod, NwsClient};
pub use handlers::{get_alerts, get_forecast, AlertsResponse, ForecastResponse};
pub use request::{AlertsRequest, Coordinates, ForecastRequest, WeatherRequestError};

pub const ALERTS_TOOL_ID: &str = "get_alerts";
pub const FORECAST_TOOL_ID: &str = "get_forecast";
