//! Markdown rendering for alerts and forecast periods.
use serde_json::Value;

use super::client::ForecastPeriod;

pub const SECTION_SEPARATOR: &str = "\n---\n";
pub const NO_ALERTS_MESSAGE: &str = "No active alerts found for this state.";

/// Render one alert feature's `properties`.
pub fn format_alert(feature: &Value) -> String {
    let properties = feature.get("properties").unwrap_or(&Value::Null);
    format!(
        "\nEvent: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}\n",
        property(properties, "event"),
        property(properties, "areaDesc"),
        property(properties, "severity"),
        property(properties, "description"),
        property(properties, "instruction"),
    )
}

pub fn format_alerts(features: &[Value]) -> String {
    if features.is_empty() {
        return NO_ALERTS_MESSAGE.to_string();
    }
    features
        .iter()
        .map(format_alert)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

pub fn format_period(period: &ForecastPeriod) -> String {
    let temperature = period
        .temperature
        .map(|t| t.to_string())
        .unwrap_or_else(|| "N/A".into());
    format!(
        "\n{}:\nTemperature: {}°{}\nWind: {} {}\nForecast: {}\n",
        period.name,
        temperature,
        period.temperature_unit.as_deref().unwrap_or(""),
        period.wind_speed.as_deref().unwrap_or("N/A"),
        period.wind_direction.as_deref().unwrap_or(""),
        period
            .detailed_forecast
            .as_deref()
            .or(period.short_forecast.as_deref())
            .unwrap_or("N/A"),
    )
}

pub fn format_periods(periods: &[ForecastPeriod]) -> String {
    periods
        .iter()
        .map(format_period)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

fn property(properties: &Value, key: &str) -> String {
    match properties.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => "None".to_string(),
        Some(other) => other.to_string(),
    }
}
