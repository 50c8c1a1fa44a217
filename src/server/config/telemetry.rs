use tracing::info;

use super::{ServerConfig, ENV_OVERRIDE_PREFIX};

pub fn log_loaded(config: &ServerConfig) {
    info!(
        target: "docweather_mcp::config",
        path = %config.source_path.display(),
        host = %config.server.host,
        port = config.server.port,
        ocr_service_url = %config.ocr.service_url,
        max_batch_size = config.ocr.max_batch_size,
        ollama_url = %config.ollama.base_url,
        ollama_model = %config.ollama.model,
        paddle_serving_url = %config.paddle_serving.url,
        nws_api_base = %config.weather.api_base,
        env_overrides = ENV_OVERRIDE_PREFIX,
        "Configuration loaded successfully"
    );
}
