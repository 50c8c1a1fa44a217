use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{
        header::{ACCEPT, USER_AGENT},
        HeaderMap, StatusCode,
    },
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::common::{
    base_url, call, closed_port_url, connect, error_value, serve_on, shutdown, structured_of,
    test_config, HitCounter,
};

const TEST_USER_AGENT: &str = "docweather-tests/1.0";

#[derive(Clone)]
struct NwsState {
    base: String,
    hits: HitCounter,
}

fn alerts_payload(state: &str) -> Value {
    json!({
        "type": "FeatureCollection",
        "title": format!("Current watches, warnings, and advisories for {state}"),
        "features": [
            {
                "id": "urn:oid:2.49.0.1.840.0.1",
                "type": "Feature",
                "properties": {
                    "event": "Flood Warning",
                    "areaDesc": "Sacramento; Yolo",
                    "severity": "Severe",
                    "description": "River levels rising.",
                    "instruction": null,
                    "parameters": { "VTEC": ["/O.NEW.KSTO.FL.W.0001/"] }
                }
            },
            {
                "id": "urn:oid:2.49.0.1.840.0.2",
                "type": "Feature",
                "properties": {
                    "event": "Heat Advisory",
                    "areaDesc": "Fresno",
                    "severity": "Moderate",
                    "description": "Highs near 105.",
                    "instruction": "Drink water."
                }
            }
        ]
    })
}

fn period(number: u32, name: &str, temperature: i64) -> Value {
    json!({
        "number": number,
        "name": name,
        "startTime": "2026-10-19T06:00:00-05:00",
        "isDaytime": number % 2 == 1,
        "temperature": temperature,
        "temperatureUnit": "F",
        "windSpeed": "10 mph",
        "windDirection": "S",
        "shortForecast": "Sunny",
        "detailedForecast": format!("{name}: sunny, high near {temperature}.")
    })
}

fn checked_headers(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    let accept = headers.get(ACCEPT).and_then(|v| v.to_str().ok());
    if agent != Some(TEST_USER_AGENT) || accept != Some("application/geo+json") {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "title": "missing user agent" })),
        ));
    }
    Ok(())
}

async fn alerts(
    State(state): State<NwsState>,
    Path(area): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.hits.hit();
    if let Err(rejected) = checked_headers(&headers) {
        return rejected;
    }
    if area == "ZZ" {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "title": "Service Unavailable" })),
        );
    }
    (StatusCode::OK, Json(alerts_payload(&area)))
}

async fn points(
    State(state): State<NwsState>,
    Path(coordinates): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.hits.hit();
    if let Err(rejected) = checked_headers(&headers) {
        return rejected;
    }
    if coordinates != "39.7456,-97.0892" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "title": "Data Unavailable For Requested Point" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "properties": {
                "forecast": format!("{}/gridpoints/TOP/31,80/forecast", state.base),
                "gridId": "TOP"
            }
        })),
    )
}

async fn forecast(State(state): State<NwsState>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    state.hits.hit();
    if let Err(rejected) = checked_headers(&headers) {
        return rejected;
    }
    let periods: Vec<Value> = [
        ("Today", 72),
        ("Tonight", 55),
        ("Monday", 75),
        ("Monday Night", 57),
        ("Tuesday", 70),
        ("Tuesday Night", 52),
    ]
    .iter()
    .enumerate()
    .map(|(index, (name, temperature))| period(index as u32 + 1, name, *temperature))
    .collect();
    (
        StatusCode::OK,
        Json(json!({ "properties": { "periods": periods } })),
    )
}

async fn nws_backend() -> Result<(String, HitCounter)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base = base_url(listener.local_addr()?);
    let hits = HitCounter::default();
    let router = Router::new()
        .route("/alerts/active/area/{area}", get(alerts))
        .route("/points/{coordinates}", get(points))
        .route("/gridpoints/{office}/{grid}/forecast", get(forecast))
        .with_state(NwsState {
            base: base.clone(),
            hits: hits.clone(),
        });
    serve_on(listener, router);
    Ok((base, hits))
}

#[tokio::test]
async fn alerts_return_upstream_payload_unchanged() -> Result<()> {
    let (nws, _hits) = nws_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.weather.api_base = nws;
    let (client, server_task) = connect(config).await?;

    let result = call(&client, "get_alerts", json!({ "state": "ca" })).await?;
    shutdown(client, server_task).await;

    let payload = structured_of(result)?;
    assert_eq!(payload["state"], json!("CA"));
    assert_eq!(payload["alert_count"], json!(2));
    assert_eq!(payload["payload"], alerts_payload("CA"));

    let summary = payload["summary"].as_str().unwrap_or_default();
    assert!(summary.contains("Event: Flood Warning"), "{summary}");
    assert!(summary.contains("Instructions: None"), "{summary}");
    assert!(summary.contains("\n---\n"), "{summary}");
    Ok(())
}

#[tokio::test]
async fn invalid_state_is_rejected_without_calling_nws() -> Result<()> {
    let (nws, hits) = nws_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.weather.api_base = nws;
    let (client, server_task) = connect(config).await?;

    let error = error_value(call(&client, "get_alerts", json!({ "state": "CAL" })).await)?;
    shutdown(client, server_task).await;

    assert_eq!(error["code"], json!(-32602));
    assert_eq!(error["data"]["code"], json!("invalid_state"));
    assert_eq!(hits.count(), 0);
    Ok(())
}

#[tokio::test]
async fn nws_outage_maps_to_retryable_upstream_error() -> Result<()> {
    let (nws, _hits) = nws_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.weather.api_base = nws;
    let (client, server_task) = connect(config).await?;

    let error = error_value(call(&client, "get_alerts", json!({ "state": "ZZ" })).await)?;
    shutdown(client, server_task).await;

    assert_eq!(error["data"]["code"], json!("upstream_failed"));
    assert_eq!(error["data"]["retryable"], json!(true));
    assert_eq!(error["data"]["details"]["service"], json!("nws"));
    assert_eq!(error["data"]["details"]["http_status"], json!(503));
    Ok(())
}

#[tokio::test]
async fn forecast_follows_points_link_and_truncates_periods() -> Result<()> {
    let (nws, hits) = nws_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.weather.api_base = nws.clone();
    config.weather.forecast_periods = 3;
    let (client, server_task) = connect(config).await?;

    let result = call(
        &client,
        "get_forecast",
        json!({ "latitude": "39.7456", "longitude": "-97.0892" }),
    )
    .await?;
    shutdown(client, server_task).await;

    let payload = structured_of(result)?;
    assert_eq!(
        payload["forecast_url"],
        json!(format!("{nws}/gridpoints/TOP/31,80/forecast"))
    );
    let names: Vec<&str> = payload["periods"]
        .as_array()
        .map(|periods| {
            periods
                .iter()
                .map(|p| p["name"].as_str().unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(names, ["Today", "Tonight", "Monday"]);
    assert_eq!(payload["periods"][0]["temperatureUnit"], json!("F"));

    let summary = payload["summary"].as_str().unwrap_or_default();
    assert!(summary.contains("Temperature: 72°F"), "{summary}");
    assert!(summary.contains("Wind: 10 mph S"), "{summary}");
    assert!(!summary.contains("Monday Night"), "{summary}");
    assert_eq!(hits.count(), 2);
    Ok(())
}

#[tokio::test]
async fn out_of_range_coordinates_are_rejected_without_calling_nws() -> Result<()> {
    let (nws, hits) = nws_backend().await?;
    let mut config = test_config(&closed_port_url().await?)?;
    config.weather.api_base = nws;
    let (client, server_task) = connect(config).await?;

    let latitude = error_value(
        call(
            &client,
            "get_forecast",
            json!({ "latitude": "91", "longitude": "0" }),
        )
        .await,
    )?;
    let longitude = error_value(
        call(
            &client,
            "get_forecast",
            json!({ "latitude": "10", "longitude": "east" }),
        )
        .await,
    )?;
    shutdown(client, server_task).await;

    assert_eq!(latitude["data"]["code"], json!("invalid_coordinates"));
    assert_eq!(latitude["data"]["details"]["field"], json!("latitude"));
    assert_eq!(longitude["data"]["details"]["field"], json!("longitude"));
    assert_eq!(hits.count(), 0);
    Ok(())
}
