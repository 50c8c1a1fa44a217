use std::path::Path;

use serde::{Deserialize, Serialize};

use super::fields::{validate_non_empty, validate_service_url, validate_timeout};
use crate::lib::errors::ConfigError;

pub const DEFAULT_OCR_SERVICE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 300;
/// Upper bound accepted by the OCR service for a single `/ocr` request.
pub const MAX_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "glm-ocr";
pub const DEFAULT_OLLAMA_PROMPT: &str = "Text Recognition:";
pub const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 180;

pub const DEFAULT_PADDLE_SERVING_URL: &str = "http://127.0.0.1:8866/predict/ocr_system";
pub const DEFAULT_PADDLE_TIMEOUT_SECS: u64 = 60;

const MAX_OCR_TIMEOUT_SECS: u64 = 1800;

/// Local OCR microservice settings.
#[derive(Debug, Clone, Serialize)]
pub struct OcrConfig {
    pub service_url: String,
    pub request_timeout_secs: u64,
    pub max_batch_size: usize,
    pub max_file_bytes: u64,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawOcrConfig {
    pub service_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_batch_size: Option<usize>,
    pub max_file_bytes: Option<u64>,
}

/// Ollama-hosted OCR model settings.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub prompt: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawOllamaConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// PaddleHub serving endpoint used by `analyze_complex_document`.
#[derive(Debug, Clone, Serialize)]
pub struct PaddleServingConfig {
    pub url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawPaddleServingConfig {
    pub url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

pub fn parse_ocr_section(raw: Option<RawOcrConfig>, path: &Path) -> Result<OcrConfig, ConfigError> {
    let raw = raw.unwrap_or_default();

    let service_url = raw
        .service_url
        .unwrap_or_else(|| DEFAULT_OCR_SERVICE_URL.to_string());
    validate_service_url(path, "ocr.service_url", &service_url)?;

    let request_timeout_secs = raw.request_timeout_secs.unwrap_or(DEFAULT_OCR_TIMEOUT_SECS);
    validate_timeout(
        path,
        "ocr.request_timeout_secs",
        request_timeout_secs,
        MAX_OCR_TIMEOUT_SECS,
    )?;

    let max_batch_size = raw.max_batch_size.unwrap_or(MAX_BATCH_SIZE);
    if !(1..=MAX_BATCH_SIZE).contains(&max_batch_size) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "ocr.max_batch_size",
            message: format!("Specify a value between 1 and {MAX_BATCH_SIZE}"),
        });
    }

    let max_file_bytes = raw.max_file_bytes.unwrap_or(DEFAULT_MAX_FILE_BYTES);
    if max_file_bytes == 0 {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "ocr.max_file_bytes",
            message: "Specify a positive byte limit".into(),
        });
    }

    Ok(OcrConfig {
        service_url,
        request_timeout_secs,
        max_batch_size,
        max_file_bytes,
    })
}

pub fn parse_ollama_section(
    raw: Option<RawOllamaConfig>,
    path: &Path,
) -> Result<OllamaConfig, ConfigError> {
    let raw = raw.unwrap_or_default();

    let base_url = raw
        .base_url
        .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
    validate_service_url(path, "ollama.base_url", &base_url)?;

    let model = raw
        .model
        .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
    validate_non_empty(path, "ollama.model", &model)?;

    let prompt = raw
        .prompt
        .unwrap_or_else(|| DEFAULT_OLLAMA_PROMPT.to_string());
    validate_non_empty(path, "ollama.prompt", &prompt)?;

    let request_timeout_secs = raw
        .request_timeout_secs
        .unwrap_or(DEFAULT_OLLAMA_TIMEOUT_SECS);
    validate_timeout(
        path,
        "ollama.request_timeout_secs",
        request_timeout_secs,
        MAX_OCR_TIMEOUT_SECS,
    )?;

    Ok(OllamaConfig {
        base_url,
        model,
        prompt,
        request_timeout_secs,
    })
}

pub fn parse_paddle_serving_section(
    raw: Option<RawPaddleServingConfig>,
    path: &Path,
) -> Result<PaddleServingConfig, ConfigError> {
    let raw = raw.unwrap_or_default();

    let url = raw
        .url
        .unwrap_or_else(|| DEFAULT_PADDLE_SERVING_URL.to_string());
    validate_service_url(path, "paddle_serving.url", &url)?;

    let request_timeout_secs = raw
        .request_timeout_secs
        .unwrap_or(DEFAULT_PADDLE_TIMEOUT_SECS);
    validate_timeout(
        path,
        "paddle_serving.request_timeout_secs",
        request_timeout_secs,
        MAX_OCR_TIMEOUT_SECS,
    )?;

    Ok(PaddleServingConfig {
        url,
        request_timeout_secs,
    })
}
