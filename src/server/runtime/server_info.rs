use crate::{cli::LaunchProfile, server::config::ServerConfig};

/// Build the `ServerInfo.instructions` string shown to MCP clients.
pub fn build_instructions(profile: &LaunchProfile, config: &ServerConfig) -> String {
    format!(
        "OCR and weather tools over {transport}. OCR service: {ocr}; Ollama model `{model}` at {ollama}; NWS API: {nws}. \
ocr_batch_documents accepts at most {batch} URLs; local files must be PNG, JPEG, TIFF, or PDF (ocr_local_glm: PNG or JPEG only).",
        transport = profile.transport.as_str(),
        ocr = config.ocr.service_url,
        model = config.ollama.model,
        ollama = config.ollama.base_url,
        nws = config.weather.api_base,
        batch = config.ocr.max_batch_size,
    )
}
