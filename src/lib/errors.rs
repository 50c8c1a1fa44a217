use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use rmcp::model::ErrorData;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration sources.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize the merged sources into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Required field is missing.
    #[error("Configuration file {path} is missing `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Failures talking to an external HTTP service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service}: {message}")]
    Transport {
        service: &'static str,
        message: String,
        timed_out: bool,
    },
    #[error("{service} responded with HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("{service} returned an unexpected payload: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

impl UpstreamError {
    /// Transport failures and 5xx/429 responses are worth retrying by the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Transport { .. } => true,
            UpstreamError::Status { status, .. } => *status == 429 || *status >= 500,
            UpstreamError::Decode { .. } => false,
        }
    }

    pub fn service(&self) -> &'static str {
        match self {
            UpstreamError::Transport { service, .. }
            | UpstreamError::Status { service, .. }
            | UpstreamError::Decode { service, .. } => service,
        }
    }
}

/// Reasons a local document cannot be sent to an OCR backend.
#[derive(Debug, Error)]
pub enum LocalDocumentError {
    #[error("file_path is required")]
    MissingPath,
    #[error("File not found at {path}")]
    NotFound { path: PathBuf },
    #[error("{path} is not a regular file")]
    NotAFile { path: PathBuf },
    #[error("{path} is empty")]
    Empty { path: PathBuf },
    #[error("File too large: {size_mb:.1}MB (max: {limit_mb:.1}MB)")]
    TooLarge { size_mb: f64, limit_mb: f64 },
    #[error("Unsupported file type `{extension}` (expected {expected})")]
    UnsupportedType {
        extension: String,
        expected: &'static str,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Structured error metadata returned by MCP tools.
#[derive(Debug, Clone, Serialize)]
pub struct ToolErrorDescriptor {
    /// Error code.
    pub code: &'static str,
    /// User-facing message.
    pub message: &'static str,
    /// Recommended remediation.
    pub remediation: &'static str,
}

impl ToolErrorDescriptor {
    /// Simple constructor.
    pub const fn new(code: &'static str, message: &'static str, remediation: &'static str) -> Self {
        Self {
            code,
            message,
            remediation,
        }
    }

    /// Create a builder.
    pub fn builder(&self) -> ToolErrorDescriptorBuilder<'_> {
        ToolErrorDescriptorBuilder::new(self)
    }
}

/// Where a tool failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorOrigin {
    Input,
    Upstream,
    Configuration,
}

impl ErrorOrigin {
    fn as_str(&self) -> &'static str {
        match self {
            ErrorOrigin::Input => "input",
            ErrorOrigin::Upstream => "upstream",
            ErrorOrigin::Configuration => "configuration",
        }
    }
}

/// Builder for error data that fails if required fields are missing.
pub struct ToolErrorDescriptorBuilder<'a> {
    descriptor: &'a ToolErrorDescriptor,
    retryable: Option<bool>,
    origin: Option<ErrorOrigin>,
    cause: Option<String>,
    details: Option<Value>,
    extra_fields: Map<String, Value>,
}

impl<'a> ToolErrorDescriptorBuilder<'a> {
    pub fn new(descriptor: &'a ToolErrorDescriptor) -> Self {
        Self {
            descriptor,
            retryable: None,
            origin: None,
            cause: None,
            details: None,
            extra_fields: Map::new(),
        }
    }

    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    pub fn origin(mut self, origin: ErrorOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Underlying error text appended to the descriptor message.
    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_context_field(mut self, key: &str, value: Value) -> Self {
        self.extra_fields.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Result<ErrorData, ToolErrorBuilderError> {
        if self.descriptor.remediation.trim().is_empty() {
            return Err(ToolErrorBuilderError::MissingRemediation {
                code: self.descriptor.code,
            });
        }
        let retryable = self
            .retryable
            .ok_or(ToolErrorBuilderError::MissingRetryable {
                code: self.descriptor.code,
            })?;
        let origin = self.origin.ok_or(ToolErrorBuilderError::MissingOrigin {
            code: self.descriptor.code,
        })?;

        let mut data = Map::new();
        data.insert("code".into(), Value::String(self.descriptor.code.into()));
        data.insert(
            "remediation".into(),
            Value::String(self.descriptor.remediation.into()),
        );
        data.insert("retryable".into(), Value::Bool(retryable));
        data.insert("origin".into(), Value::String(origin.as_str().into()));
        if let Some(details) = self.details {
            data.insert("details".into(), details);
        }
        for (key, value) in self.extra_fields {
            data.insert(key, value);
        }

        let message = match self.cause {
            Some(cause) if !cause.trim().is_empty() => {
                format!("{}: {}", self.descriptor.message, cause)
            }
            _ => self.descriptor.message.to_string(),
        };
        let data = Some(Value::Object(data));
        Ok(match origin {
            ErrorOrigin::Input => ErrorData::invalid_params(message, data),
            ErrorOrigin::Upstream | ErrorOrigin::Configuration => {
                ErrorData::internal_error(message, data)
            }
        })
    }
}

/// Errors when required builder fields are missing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolErrorBuilderError {
    #[error("retryable is missing (code={code})")]
    MissingRetryable { code: &'static str },
    #[error("origin is missing (code={code})")]
    MissingOrigin { code: &'static str },
    #[error("remediation is empty (code={code})")]
    MissingRemediation { code: &'static str },
}

/// Builds `ErrorData`, degrading to a bare internal error if the descriptor is malformed.
pub fn build_error_data(builder: ToolErrorDescriptorBuilder<'_>) -> ErrorData {
    let code = builder.descriptor.code;
    builder.build().unwrap_or_else(|err| {
        tracing::error!(
            target: "docweather_mcp::tools",
            code,
            error = %err,
            "Tool error descriptor is incomplete"
        );
        ErrorData::internal_error(err.to_string(), None)
    })
}

/// Standard error when executed without an MCP client.
pub const MCP_CLIENT_REQUIRED_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "MCP_CLIENT_REQUIRED",
    "This binary can only be executed via an MCP client",
    "Launch through an MCP client such as `npx @modelcontextprotocol/inspector target/release/docweather-mcp`.",
);

/// Shared descriptor for unreachable or failing upstream services.
pub const UPSTREAM_FAILED_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "upstream_failed",
    "The external service request failed",
    "Check that the service is running and reachable at the configured URL.",
);

/// Shared descriptor for local documents that fail validation.
pub const INVALID_DOCUMENT_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "invalid_document",
    "The local document cannot be processed",
    "Pass an existing PNG, JPEG, TIFF, or PDF file within the size limit.",
);

/// Map an upstream failure to tool error data.
pub fn upstream_error_to_error_data(err: &UpstreamError) -> ErrorData {
    let mut details = Map::new();
    details.insert("service".into(), Value::String(err.service().into()));
    if let UpstreamError::Status { status, .. } = err {
        details.insert("http_status".into(), Value::from(*status));
    }
    build_error_data(
        UPSTREAM_FAILED_ERROR
            .builder()
            .retryable(err.is_retryable())
            .origin(ErrorOrigin::Upstream)
            .cause(err.to_string())
            .details(Value::Object(details)),
    )
}

/// Map a local document validation failure to tool error data.
pub fn local_document_error_to_error_data(err: &LocalDocumentError) -> ErrorData {
    let reason = match err {
        LocalDocumentError::MissingPath => "missing_path",
        LocalDocumentError::NotFound { .. } => "not_found",
        LocalDocumentError::NotAFile { .. } => "not_a_file",
        LocalDocumentError::Empty { .. } => "empty",
        LocalDocumentError::TooLarge { .. } => "too_large",
        LocalDocumentError::UnsupportedType { .. } => "unsupported_type",
        LocalDocumentError::Read { .. } => "read_failed",
    };
    build_error_data(
        INVALID_DOCUMENT_ERROR
            .builder()
            .retryable(matches!(err, LocalDocumentError::Read { .. }))
            .origin(ErrorOrigin::Input)
            .cause(err.to_string())
            .details(serde_json::json!({ "reason": reason })),
    )
}
