//! Error-to-ErrorData mapping for OCR tools.
use rmcp::model::ErrorData;
use serde_json::json;

use crate::lib::errors::{build_error_data, ErrorOrigin, ToolErrorDescriptor};

use super::request::{BatchValidationError, DocumentUrlError};

const INVALID_URL_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "invalid_url",
    "The document URL is invalid",
    "Pass an absolute http:// or https:// URL to an image or PDF.",
);
const INVALID_BATCH_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "invalid_batch",
    "The batch request is invalid",
    "Pass between 1 and 10 URLs per call; split larger sets into several calls.",
);
const OCR_FAILED_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "ocr_failed",
    "The OCR service could not process the document",
    "Check that the document is reachable and is a PNG, JPEG, TIFF, or PDF under 10MB.",
);
const EMPTY_RESULT_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "empty_result",
    "No text was extracted from the document",
    "Verify the document contains legible text or try another OCR tool.",
);

pub fn url_error_to_error_data(err: DocumentUrlError) -> ErrorData {
    build_error_data(
        INVALID_URL_ERROR
            .builder()
            .retryable(false)
            .origin(ErrorOrigin::Input)
            .cause(err.to_string()),
    )
}

pub fn batch_error_to_error_data(err: BatchValidationError) -> ErrorData {
    let details = match &err {
        BatchValidationError::Empty => json!({ "count": 0 }),
        BatchValidationError::TooMany { count, max } => json!({ "count": count, "max": max }),
    };
    build_error_data(
        INVALID_BATCH_ERROR
            .builder()
            .retryable(false)
            .origin(ErrorOrigin::Input)
            .cause(err.to_string())
            .details(details),
    )
}

/// The service accepted the request but reported a per-document failure.
pub fn ocr_failure_to_error_data(
    error: Option<&str>,
    error_type: Option<&str>,
    source: &str,
) -> ErrorData {
    let cause = error.unwrap_or("unknown error");
    let descriptor = if error_type == Some("empty_result") {
        &EMPTY_RESULT_ERROR
    } else {
        &OCR_FAILED_ERROR
    };
    build_error_data(
        descriptor
            .builder()
            .retryable(error_type == Some("processing_error"))
            .origin(ErrorOrigin::Upstream)
            .cause(cause)
            .details(json!({ "error_type": error_type, "source": source })),
    )
}

pub fn empty_result_to_error_data(source: &str) -> ErrorData {
    build_error_data(
        EMPTY_RESULT_ERROR
            .builder()
            .retryable(false)
            .origin(ErrorOrigin::Upstream)
            .details(json!({ "error_type": "empty_result", "source": source })),
    )
}
