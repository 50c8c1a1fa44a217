//! OCR tool bodies: validate, call the backend, shape the response.
use rmcp::model::ErrorData;
use schemars::JsonSchema;
use serde::Serialize;

use crate::lib::{
    errors::{local_document_error_to_error_data, upstream_error_to_error_data},
    files::{AcceptedTypes, LocalDocument},
};

use super::{
    batch::{run_batch, BatchOcrResponse},
    errors::{
        batch_error_to_error_data, empty_result_to_error_data, ocr_failure_to_error_data,
        url_error_to_error_data,
    },
    glm::OllamaOcrClient,
    paddle::PaddleServingClient,
    request::{
        validate_document_url, ComplexDocumentRequest, LocalDocumentRequest, OcrBatchRequest,
        OcrDocumentRequest,
    },
    service::{OcrServiceClient, OcrStatus},
};

/// Response from `ocr_uploaded_document`.
#[derive(Debug, Serialize, JsonSchema)]
pub struct UploadedDocumentResponse {
    pub filename: String,
    pub file_path: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
}

/// `ocr_document`: Markdown for a single URL, verbatim from the service.
pub async fn ocr_document(
    client: &OcrServiceClient,
    request: OcrDocumentRequest,
) -> Result<String, ErrorData> {
    validate_document_url(&request.url).map_err(url_error_to_error_data)?;

    let result = client
        .ocr_url(&request.url)
        .await
        .map_err(|err| upstream_error_to_error_data(&err))?;

    match (result.status, result.text) {
        (OcrStatus::Success, Some(text)) => Ok(text),
        (OcrStatus::Success, None) => Err(empty_result_to_error_data(&request.url)),
        (OcrStatus::Error, _) => Err(ocr_failure_to_error_data(
            result.error.as_deref(),
            result.error_type.as_deref(),
            &request.url,
        )),
    }
}

/// `ocr_batch_documents`: bounded concurrent OCR with per-item outcomes.
pub async fn ocr_batch_documents(
    client: &OcrServiceClient,
    max_batch_size: usize,
    request: OcrBatchRequest,
) -> Result<BatchOcrResponse, ErrorData> {
    request
        .validate(max_batch_size)
        .map_err(batch_error_to_error_data)?;
    Ok(run_batch(client, request.urls, max_batch_size).await)
}

/// `ocr_uploaded_document`: multipart upload of a local file.
pub async fn ocr_uploaded_document(
    client: &OcrServiceClient,
    max_file_bytes: u64,
    request: LocalDocumentRequest,
) -> Result<UploadedDocumentResponse, ErrorData> {
    let document =
        LocalDocument::load(&request.file_path, max_file_bytes, AcceptedTypes::Documents)
            .await
            .map_err(|err| local_document_error_to_error_data(&err))?;
    let file_path = document.path.to_string_lossy().into_owned();

    let result = client
        .upload(document)
        .await
        .map_err(|err| upstream_error_to_error_data(&err))?;

    match (result.status, result.text) {
        (OcrStatus::Success, Some(text)) if !text.trim().is_empty() => {
            Ok(UploadedDocumentResponse {
                filename: result.filename,
                file_path,
                text,
                pages: result.pages,
            })
        }
        (OcrStatus::Success, _) => Err(empty_result_to_error_data(&file_path)),
        (OcrStatus::Error, _) => Err(ocr_failure_to_error_data(
            result.error.as_deref(),
            None,
            &file_path,
        )),
    }
}

/// `ocr_local_glm`: OCR a local file with the Ollama model.
pub async fn ocr_local_glm(
    client: &OllamaOcrClient,
    max_file_bytes: u64,
    request: LocalDocumentRequest,
) -> Result<String, ErrorData> {
    let document =
        LocalDocument::load(&request.file_path, max_file_bytes, AcceptedTypes::Images)
            .await
            .map_err(|err| local_document_error_to_error_data(&err))?;

    let text = client
        .recognize(&document)
        .await
        .map_err(|err| upstream_error_to_error_data(&err))?;
    if text.is_empty() {
        return Err(empty_result_to_error_data(&request.file_path));
    }
    Ok(text)
}

/// `analyze_complex_document`: layout-heavy documents via Paddle serving.
pub async fn analyze_complex_document(
    client: &PaddleServingClient,
    max_file_bytes: u64,
    request: ComplexDocumentRequest,
) -> Result<String, ErrorData> {
    let document =
        LocalDocument::load(&request.image_path, max_file_bytes, AcceptedTypes::Documents)
            .await
            .map_err(|err| local_document_error_to_error_data(&err))?;

    client
        .analyze(&document)
        .await
        .map_err(|err| upstream_error_to_error_data(&err))
}
