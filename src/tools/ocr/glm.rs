//! OCR through an Ollama-hosted vision model (GLM-OCR by default).
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    lib::{errors::UpstreamError, files::LocalDocument, http},
    server::config::OllamaConfig,
};

pub const OLLAMA_SERVICE: &str = "ollama";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: [String; 1],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Clone)]
pub struct OllamaOcrClient {
    client: Client,
    base_url: String,
    model: String,
    prompt: String,
}

impl OllamaOcrClient {
    pub fn new(config: &OllamaConfig) -> reqwest::Result<Self> {
        let client = http::build_client(Duration::from_secs(config.request_timeout_secs), None)?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            prompt: config.prompt.clone(),
        })
    }

    /// Run the model on one document and return its trimmed Markdown output.
    pub async fn recognize(&self, document: &LocalDocument) -> Result<String, UpstreamError> {
        let endpoint = http::join_url(&self.base_url, "api/generate");
        info!(
            target: "docweather_mcp::ocr",
            %endpoint,
            model = %self.model,
            file_name = %document.file_name,
            size_kb = document.size_kb(),
            "Sending document to Ollama"
        );

        let body = GenerateRequest {
            model: &self.model,
            prompt: &self.prompt,
            images: [document.to_base64()],
            stream: false,
        };
        let response = self
            .client
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| http::transport_error(OLLAMA_SERVICE, err))?;
        let generated: GenerateResponse = http::read_json(OLLAMA_SERVICE, response).await?;
        Ok(generated.response.trim().to_string())
    }
}
