//! `analyze_complex_document` against a PaddleHub-style serving endpoint.
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    lib::{errors::UpstreamError, files::LocalDocument, http},
    server::config::PaddleServingConfig,
};

pub const PADDLE_SERVICE: &str = "paddle_serving";

#[derive(Debug, Clone)]
pub struct PaddleServingClient {
    client: Client,
    url: String,
}

impl PaddleServingClient {
    pub fn new(config: &PaddleServingConfig) -> reqwest::Result<Self> {
        let client = http::build_client(Duration::from_secs(config.request_timeout_secs), None)?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Send the base64 image and render whatever text the service returns.
    pub async fn analyze(&self, document: &LocalDocument) -> Result<String, UpstreamError> {
        info!(
            target: "docweather_mcp::ocr",
            endpoint = %self.url,
            file_name = %document.file_name,
            size_kb = document.size_kb(),
            "Sending document to Paddle serving"
        );
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "images": [document.to_base64()] }))
            .send()
            .await
            .map_err(|err| http::transport_error(PADDLE_SERVICE, err))?;
        let body: Value = http::read_json(PADDLE_SERVICE, response).await?;
        Ok(render_result(&body))
    }
}

/// Collected `text` values under `results`, or the raw JSON when there are none.
pub fn render_result(body: &Value) -> String {
    if let Some(results) = body.get("results") {
        let mut texts = Vec::new();
        collect_text(results, &mut texts);
        if !texts.is_empty() {
            return texts.join("\n");
        }
    }
    body.to_string()
}

fn collect_text<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                match inner {
                    Value::String(text) if key == "text" => out.push(text),
                    _ => collect_text(inner, out),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text(item, out);
            }
        }
        _ => {}
    }
}
