use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::lib::errors::ConfigError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_HTTP_PATH: &str = "/mcp";

/// Server socket settings used by the tcp and http transports.
#[derive(Debug, Clone, Serialize)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub http_path: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub http_path: Option<String>,
}

pub fn parse_server_section(
    raw: Option<RawServerSection>,
    path: &Path,
) -> Result<ServerSection, ConfigError> {
    let server_raw = raw.unwrap_or_default();
    let host = server_raw.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    if host.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "server.host",
            message: "Host cannot be empty".into(),
        });
    }
    let port = server_raw.port.unwrap_or(DEFAULT_PORT);
    validate_port(port, path)?;
    let http_path = server_raw
        .http_path
        .unwrap_or_else(|| DEFAULT_HTTP_PATH.to_string());
    validate_http_path(&http_path, path)?;
    Ok(ServerSection {
        host,
        port,
        http_path,
    })
}

fn validate_port(port: u16, path: &Path) -> Result<(), ConfigError> {
    if (1024..=65535).contains(&port) {
        return Ok(());
    }

    Err(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: "server.port",
        message: "Use a port in the range 1024-65535".into(),
    })
}

fn validate_http_path(http_path: &str, path: &Path) -> Result<(), ConfigError> {
    if http_path.len() > 1 && http_path.starts_with('/') && !http_path.ends_with('/') {
        return Ok(());
    }

    Err(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: "server.http_path",
        message: format!("Use a path such as /mcp (got `{http_path}`)"),
    })
}
