//! Outbound HTTP helpers shared by every tool client.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::errors::UpstreamError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const BODY_EXCERPT_LIMIT: usize = 512;

/// Build a pooled client with a per-request timeout.
pub fn build_client(timeout: Duration, user_agent: Option<&str>) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent.unwrap_or(USER_AGENT))
        .build()
}

/// Turn a transport-level `reqwest` failure into an `UpstreamError`.
pub fn transport_error(service: &'static str, err: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport {
        service,
        message: friendly_network_error(&err),
        timed_out: err.is_timeout(),
    }
}

/// Reject non-2xx responses, keeping a short excerpt of the body.
pub async fn ensure_success(
    service: &'static str,
    response: Response,
) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        service,
        status: status.as_u16(),
        body: excerpt(&body),
    })
}

/// Check status and decode a JSON body.
pub async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T, UpstreamError> {
    let response = ensure_success(service, response).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|err| transport_error(service, err))?;
    serde_json::from_slice(&bytes).map_err(|err| UpstreamError::Decode {
        service,
        message: err.to_string(),
    })
}

/// Join a base URL and a path without doubling or dropping the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_LIMIT {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(BODY_EXCERPT_LIMIT).collect();
    cut.push('…');
    cut
}

fn friendly_network_error(e: &reqwest::Error) -> String {
    if e.is_builder() {
        if let Some(url) = e.url() {
            return format!("Invalid URL: {url}");
        }
        return "Invalid URL".to_string();
    }
    if e.is_connect() {
        if let Some(url) = e.url() {
            return format!(
                "Could not connect to {}. Is it running?",
                url.host_str().unwrap_or("server")
            );
        }
        return "Could not connect to server. Is it running?".to_string();
    }
    if e.is_timeout() {
        return "Request timed out".to_string();
    }
    if e.is_decode() {
        return "Invalid response from server".to_string();
    }
    format!("Network error: {e}")
}
