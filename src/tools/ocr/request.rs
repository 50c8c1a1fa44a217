use reqwest::Url;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_URL_LEN: usize = 2048;

/// Input for `ocr_document`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OcrDocumentRequest {
    /// Public http(s) URL of an image (PNG, JPEG, TIFF) or PDF.
    pub url: String,
}

/// Input for `ocr_batch_documents`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OcrBatchRequest {
    /// Between 1 and 10 http(s) URLs; results come back in the same order.
    pub urls: Vec<String>,
}

impl OcrBatchRequest {
    /// Reject batches the OCR service would refuse, before any request is made.
    pub fn validate(&self, max_batch_size: usize) -> Result<(), BatchValidationError> {
        if self.urls.is_empty() {
            return Err(BatchValidationError::Empty);
        }
        if self.urls.len() > max_batch_size {
            return Err(BatchValidationError::TooMany {
                count: self.urls.len(),
                max: max_batch_size,
            });
        }
        Ok(())
    }
}

/// Input for tools that read a document from the local filesystem.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocalDocumentRequest {
    /// Path to a local PNG, JPEG, TIFF, or PDF file.
    pub file_path: String,
}

/// Input for `analyze_complex_document`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ComplexDocumentRequest {
    /// Local path to the image file.
    pub image_path: String,
}

/// Check that `raw` is an absolute http(s) URL. The string itself is forwarded untouched.
pub fn validate_document_url(raw: &str) -> Result<(), DocumentUrlError> {
    if raw.trim().is_empty() {
        return Err(DocumentUrlError::Empty);
    }
    if raw.len() > MAX_URL_LEN {
        return Err(DocumentUrlError::TooLong { length: raw.len() });
    }
    let parsed = Url::parse(raw).map_err(|err| DocumentUrlError::Malformed {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DocumentUrlError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: other.to_string(),
        }),
    }
}

/// URL validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentUrlError {
    #[error("url is required")]
    Empty,
    #[error("url is too long ({length} characters, max {MAX_URL_LEN})")]
    TooLong { length: usize },
    #[error("url `{url}` is malformed: {reason}")]
    Malformed { url: String, reason: String },
    #[error("URL must start with http:// or https://: {url}")]
    UnsupportedScheme { url: String, scheme: String },
}

/// Batch-level validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchValidationError {
    #[error("urls must contain at least one URL")]
    Empty,
    #[error("urls contains {count} entries (max {max})")]
    TooMany { count: usize, max: usize },
}
