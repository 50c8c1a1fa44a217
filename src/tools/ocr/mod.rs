//! MCP tools for OCR: the local OCR service, an Ollama model, and Paddle serving.

pub mod batch;
pub mod errors;
pub mod glm;
pub mod handlers;
pub mod paddle;
pub mod request;
pub mod service;

pub use batch::{run_batch, BatchOcrResponse};
pub use glm::OllamaOcrClient;
pub use handlers::{
    analyze_complex_document, ocr_batch_documents, ocr_document, ocr_local_glm,
    ocr_uploaded_document, UploadedDocumentResponse,
};
pub use paddle::PaddleServingClient;
pub use request::{
    validate_document_url, BatchValidationError, ComplexDocumentRequest, DocumentUrlError,
    LocalDocumentRequest, OcrBatchRequest, OcrDocumentRequest,
};
pub use service::{OcrResult, OcrServiceClient, OcrStatus};

pub const OCR_DOCUMENT_TOOL_ID: &str = "ocr_document";
pub const OCR_BATCH_TOOL_ID: &str = "ocr_batch_documents";
pub const OCR_UPLOAD_TOOL_ID: &str = "ocr_uploaded_document";
pub const OCR_GLM_TOOL_ID: &str = "ocr_local_glm";
pub const COMPLEX_DOCUMENT_TOOL_ID: &str = "analyze_complex_document";
