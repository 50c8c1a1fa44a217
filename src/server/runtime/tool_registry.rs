use std::sync::Arc;

use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler},
    model::{CallToolResult, Content, ErrorData, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, Json,
};

use crate::{
    lib::telemetry::traced_call,
    server::config::ServerConfig,
    tools::{
        self,
        ocr::{
            self, BatchOcrResponse, ComplexDocumentRequest, LocalDocumentRequest, OcrBatchRequest,
            OcrDocumentRequest, OcrServiceClient, OllamaOcrClient, PaddleServingClient,
            UploadedDocumentResponse, COMPLEX_DOCUMENT_TOOL_ID, OCR_BATCH_TOOL_ID,
            OCR_DOCUMENT_TOOL_ID, OCR_GLM_TOOL_ID, OCR_UPLOAD_TOOL_ID,
        },
        weather::{
            self, AlertsRequest, AlertsResponse, ForecastRequest, ForecastResponse, NwsClient,
            ALERTS_TOOL_ID, FORECAST_TOOL_ID,
        },
        ServerToolRouter,
    },
};

#[derive(Clone)]
pub struct DocWeatherServer {
    config: Arc<ServerConfig>,
    instructions: Arc<String>,
    tool_router: ServerToolRouter<Self>,
    ocr_service: OcrServiceClient,
    ollama: OllamaOcrClient,
    paddle: PaddleServingClient,
    nws: NwsClient,
}

impl DocWeatherServer {
    pub fn new(config: ServerConfig, instructions: String) -> reqwest::Result<Self> {
        let router = tools::build_router(Self::tool_router);
        Ok(Self {
            ocr_service: OcrServiceClient::new(&config.ocr)?,
            ollama: OllamaOcrClient::new(&config.ollama)?,
            paddle: PaddleServingClient::new(&config.paddle_serving)?,
            nws: NwsClient::new(&config.weather)?,
            config: Arc::new(config),
            instructions: Arc::new(instructions),
            tool_router: router,
        })
    }

    /// Names of every registered tool, in registration order.
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }
}

fn markdown(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

#[tool_router(router = tool_router)]
impl DocWeatherServer {
    #[tool(
        name = "ocr_document",
        description = "OCR a single image or PDF by URL and return its content as Markdown"
    )]
    async fn ocr_document(
        &self,
        Parameters(request): Parameters<OcrDocumentRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        traced_call(
            OCR_DOCUMENT_TOOL_ID,
            ocr::ocr_document(&self.ocr_service, request),
        )
        .await
        .map(markdown)
    }

    #[tool(
        name = "ocr_batch_documents",
        description = "OCR up to 10 image or PDF URLs concurrently; returns one result per URL in input order"
    )]
    async fn ocr_batch_documents(
        &self,
        Parameters(request): Parameters<OcrBatchRequest>,
    ) -> Result<Json<BatchOcrResponse>, ErrorData> {
        traced_call(
            OCR_BATCH_TOOL_ID,
            ocr::ocr_batch_documents(&self.ocr_service, self.config.ocr.max_batch_size, request),
        )
        .await
        .map(Json)
    }

    #[tool(
        name = "ocr_uploaded_document",
        description = "Upload a local image or PDF to the OCR service and return the extracted Markdown"
    )]
    async fn ocr_uploaded_document(
        &self,
        Parameters(request): Parameters<LocalDocumentRequest>,
    ) -> Result<Json<UploadedDocumentResponse>, ErrorData> {
        traced_call(
            OCR_UPLOAD_TOOL_ID,
            ocr::ocr_uploaded_document(&self.ocr_service, self.config.ocr.max_file_bytes, request),
        )
        .await
        .map(Json)
    }

    #[tool(
        name = "ocr_local_glm",
        description = "OCR a local PNG or JPEG image with the GLM-OCR model served by Ollama (no PDF or TIFF)"
    )]
    async fn ocr_local_glm(
        &self,
        Parameters(request): Parameters<LocalDocumentRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        traced_call(
            OCR_GLM_TOOL_ID,
            ocr::ocr_local_glm(&self.ollama, self.config.ocr.max_file_bytes, request),
        )
        .await
        .map(markdown)
    }

    #[tool(
        name = "analyze_complex_document",
        description = "Analyze complex documents (tables, charts, multiple columns)."
    )]
    async fn analyze_complex_document(
        &self,
        Parameters(request): Parameters<ComplexDocumentRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        traced_call(
            COMPLEX_DOCUMENT_TOOL_ID,
            ocr::analyze_complex_document(&self.paddle, self.config.ocr.max_file_bytes, request),
        )
        .await
        .map(markdown)
    }

    #[tool(name = "get_alerts", description = "Get weather alerts for a US state.")]
    async fn get_alerts(
        &self,
        Parameters(request): Parameters<AlertsRequest>,
    ) -> Result<Json<AlertsResponse>, ErrorData> {
        traced_call(ALERTS_TOOL_ID, weather::get_alerts(&self.nws, request))
            .await
            .map(Json)
    }

    #[tool(
        name = "get_forecast",
        description = "Get weather forecast for a specific location."
    )]
    async fn get_forecast(
        &self,
        Parameters(request): Parameters<ForecastRequest>,
    ) -> Result<Json<ForecastResponse>, ErrorData> {
        traced_call(
            FORECAST_TOOL_ID,
            weather::get_forecast(&self.nws, self.config.weather.forecast_periods, request),
        )
        .await
        .map(Json)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for DocWeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some((*self.instructions).clone()),
            ..ServerInfo::default()
        }
    }
}
