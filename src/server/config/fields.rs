//! Field validators shared by the upstream service sections.
use std::path::Path;

use reqwest::Url;

use crate::lib::errors::ConfigError;

pub fn validate_service_url(
    path: &Path,
    field: &'static str,
    value: &str,
) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidField {
        path: path.to_path_buf(),
        field,
        message,
    };
    let url = Url::parse(value.trim()).map_err(|err| invalid(format!("{err}: {value}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "Only http:// and https:// URLs are allowed: {value}"
        )));
    }
    if url.host_str().is_none() {
        return Err(invalid(format!("URL has no host: {value}")));
    }
    Ok(())
}

pub fn validate_timeout(
    path: &Path,
    field: &'static str,
    secs: u64,
    max_secs: u64,
) -> Result<(), ConfigError> {
    if (1..=max_secs).contains(&secs) {
        return Ok(());
    }
    Err(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field,
        message: format!("Specify a value between 1 and {max_secs} seconds"),
    })
}

pub fn validate_non_empty(
    path: &Path,
    field: &'static str,
    value: &str,
) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field,
            message: "Value cannot be empty".into(),
        });
    }
    Ok(())
}
