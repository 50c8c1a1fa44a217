//! Client for the local OCR microservice (`POST /ocr`, `POST /ocr_upload`).
use std::time::Duration;

use reqwest::{
    multipart::{Form, Part},
    Client,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::{
    lib::{errors::UpstreamError, files::LocalDocument, http},
    server::config::OcrConfig,
};

pub const OCR_SERVICE: &str = "ocr_service";

/// Per-document outcome reported by the OCR service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OcrStatus {
    Success,
    Error,
}

/// One OCR result, as returned by the service and by `ocr_batch_documents`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OcrResult {
    pub url: String,
    pub status: OcrStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
}

impl OcrResult {
    pub fn failed(url: String, error: String, error_type: &str) -> Self {
        Self {
            url,
            status: OcrStatus::Error,
            text: None,
            error: Some(error),
            error_type: Some(error_type.to_string()),
            pages: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OcrStatus::Success
    }
}

/// Body of `POST /ocr`.
#[derive(Debug, Deserialize)]
pub struct OcrServiceResponse {
    pub results: Vec<OcrResult>,
}

/// Body of `POST /ocr_upload`.
#[derive(Debug, Deserialize)]
pub struct UploadOcrResult {
    pub status: OcrStatus,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub pages: Option<u32>,
    pub filename: String,
}

#[derive(Debug, Clone)]
pub struct OcrServiceClient {
    client: Client,
    base_url: String,
}

impl OcrServiceClient {
    pub fn new(config: &OcrConfig) -> reqwest::Result<Self> {
        let client = http::build_client(Duration::from_secs(config.request_timeout_secs), None)?;
        Ok(Self {
            client,
            base_url: config.service_url.clone(),
        })
    }

    /// OCR a single URL and return the service's result for it.
    pub async fn ocr_url(&self, url: &str) -> Result<OcrResult, UpstreamError> {
        let endpoint = http::join_url(&self.base_url, "ocr");
        debug!(target: "docweather_mcp::ocr", %endpoint, url, "Forwarding URL to OCR service");

        let response = self
            .client
            .post(&endpoint)
            .json(&json!({ "urls": [url] }))
            .send()
            .await
            .map_err(|err| http::transport_error(OCR_SERVICE, err))?;
        let body: OcrServiceResponse = http::read_json(OCR_SERVICE, response).await?;

        let mut result = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::Decode {
                service: OCR_SERVICE,
                message: "response contained no results".into(),
            })?;
        result.url = url.to_string();
        Ok(result)
    }

    /// Upload a local document as multipart form data.
    pub async fn upload(&self, document: LocalDocument) -> Result<UploadOcrResult, UpstreamError> {
        let endpoint = http::join_url(&self.base_url, "ocr_upload");
        info!(
            target: "docweather_mcp::ocr",
            %endpoint,
            file_name = %document.file_name,
            size_kb = document.size_kb(),
            "Uploading document to OCR service"
        );

        let part = Part::bytes(document.bytes)
            .file_name(document.file_name)
            .mime_str(document.mime_type)
            .map_err(|err| http::transport_error(OCR_SERVICE, err))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|err| http::transport_error(OCR_SERVICE, err))?;
        http::read_json(OCR_SERVICE, response).await
    }
}
