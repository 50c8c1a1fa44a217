//! Bounded fan-out for `ocr_batch_documents`.
use futures::{stream, StreamExt};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::warn;

use super::{
    request::validate_document_url,
    service::{OcrResult, OcrServiceClient},
};

/// Response from `ocr_batch_documents`.
#[derive(Debug, Serialize, JsonSchema)]
pub struct BatchOcrResponse {
    /// One entry per input URL, in input order.
    pub results: Vec<OcrResult>,
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchOcrResponse {
    pub fn from_results(results: Vec<OcrResult>) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count();
        Self {
            total_processed: results.len(),
            failed: results.len() - successful,
            successful,
            results,
        }
    }
}

/// OCR every URL with at most `concurrency` requests in flight.
///
/// `buffered` yields in submission order, so output order matches `urls`
/// regardless of completion order. Failures stay per item.
pub async fn run_batch(
    client: &OcrServiceClient,
    urls: Vec<String>,
    concurrency: usize,
) -> BatchOcrResponse {
    let results = stream::iter(urls)
        .map(|url| process_url(client, url))
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;
    BatchOcrResponse::from_results(results)
}

async fn process_url(client: &OcrServiceClient, url: String) -> OcrResult {
    if let Err(err) = validate_document_url(&url) {
        return OcrResult::failed(url, err.to_string(), "invalid_url");
    }
    match client.ocr_url(&url).await {
        Ok(result) => result,
        Err(err) => {
            warn!(
                target: "docweather_mcp::ocr",
                url = %url,
                error = %err,
                "Batch item failed"
            );
            OcrResult::failed(url, err.to_string(), "upstream_error")
        }
    }
}
