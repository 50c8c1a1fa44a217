//! Load and validate server configuration.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::lib::errors::ConfigError;

mod fields;
pub mod ocr;
pub mod server;
pub mod telemetry;
pub mod weather;

pub use ocr::{
    parse_ocr_section, parse_ollama_section, parse_paddle_serving_section, OcrConfig,
    OllamaConfig, PaddleServingConfig, RawOcrConfig, RawOllamaConfig, RawPaddleServingConfig,
    DEFAULT_MAX_FILE_BYTES, DEFAULT_OCR_SERVICE_URL, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL,
    DEFAULT_PADDLE_SERVING_URL, MAX_BATCH_SIZE,
};
pub use server::{
    parse_server_section, RawServerSection, ServerSection, DEFAULT_HOST, DEFAULT_HTTP_PATH,
    DEFAULT_PORT,
};
pub use weather::{
    parse_weather_section, RawWeatherConfig, WeatherConfig, DEFAULT_FORECAST_PERIODS,
    DEFAULT_NWS_API_BASE, DEFAULT_USER_AGENT,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Prefix for environment overrides, e.g. `DOCWEATHER_OCR__SERVICE_URL`.
pub const ENV_OVERRIDE_PREFIX: &str = "DOCWEATHER";

/// Top-level configuration container.
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub ocr: OcrConfig,
    pub ollama: OllamaConfig,
    pub paddle_serving: PaddleServingConfig,
    pub weather: WeatherConfig,
    #[serde(skip)]
    pub source_path: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
struct RawServerConfig {
    server: Option<RawServerSection>,
    ocr: Option<RawOcrConfig>,
    ollama: Option<RawOllamaConfig>,
    paddle_serving: Option<RawPaddleServingConfig>,
    weather: Option<RawWeatherConfig>,
}

impl ServerConfig {
    /// Built-in defaults with environment overrides and no file.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_raw(RawServerConfig::default(), PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Merge the TOML file (optional unless `required`) with `DOCWEATHER_*` overrides.
    pub fn load(path: PathBuf, required: bool) -> Result<Self, ConfigError> {
        info!(
            target: "docweather_mcp::config",
            path = %path.display(),
            required,
            "Starting configuration load"
        );

        let builder = config::Config::builder()
            .add_source(config::File::from(path.clone()).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_OVERRIDE_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "docweather_mcp::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawServerConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "docweather_mcp::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let config = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "docweather_mcp::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    fn from_raw(raw: RawServerConfig, path: PathBuf) -> Result<Self, ConfigError> {
        let server = parse_server_section(raw.server, &path)?;
        let ocr = parse_ocr_section(raw.ocr, &path)?;
        let ollama = parse_ollama_section(raw.ollama, &path)?;
        let paddle_serving = parse_paddle_serving_section(raw.paddle_serving, &path)?;
        let weather = parse_weather_section(raw.weather, &path)?;

        Ok(Self {
            server,
            ocr,
            ollama,
            paddle_serving,
            weather,
            source_path: path,
        })
    }
}
