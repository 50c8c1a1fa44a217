//! Telemetry initialization and per-tool-call span helpers.

use std::{future::Future, time::Instant};

use anyhow::Result;
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs on stderr.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper recording start and finish of a single tool call.
pub struct ToolSpan {
    span: Span,
    started_at: Instant,
    call_id: Uuid,
    tool: &'static str,
}

impl ToolSpan {
    /// Start a tool-call span with a fresh call id.
    pub fn start(tool: &'static str) -> Self {
        let call_id = Uuid::new_v4();
        let span = info_span!(
            target: "docweather_mcp::tools",
            "tool_call",
            %call_id,
            tool
        );
        Self {
            span,
            started_at: Instant::now(),
            call_id,
            tool,
        }
    }

    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Close the span while recording the outcome.
    pub fn finish(self, status: &'static str) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        if status == "succeeded" {
            info!(
                target: "docweather_mcp::tools",
                call_id = %self.call_id,
                tool = self.tool,
                status,
                elapsed_ms,
                "Completed tool call"
            );
        } else {
            warn!(
                target: "docweather_mcp::tools",
                call_id = %self.call_id,
                tool = self.tool,
                status,
                elapsed_ms,
                "Tool call failed"
            );
        }
    }

    /// Finish with a status derived from the handler result.
    pub fn finish_with<T, E>(self, result: &std::result::Result<T, E>) {
        self.finish(if result.is_ok() {
            "succeeded"
        } else {
            "failed"
        });
    }
}

/// Run a tool body inside a `ToolSpan`, logging the outcome.
pub async fn traced_call<T, E, F>(tool: &'static str, body: F) -> std::result::Result<T, E>
where
    F: Future<Output = std::result::Result<T, E>>,
{
    let span = ToolSpan::start(tool);
    let result = body.instrument(span.span().clone()).await;
    span.finish_with(&result);
    result
}

/// Payload for logging MCP runtime state as structured telemetry.
#[derive(Debug, Serialize)]
pub struct RuntimeModeTelemetry<'a> {
    pub transport: &'a str,
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    pub config_path: &'a str,
    pub tools: &'a [String],
    pub launch_args: &'a [String],
}

/// Emit runtime mode to `tracing`.
pub fn emit_runtime_mode(telemetry: &RuntimeModeTelemetry<'_>) {
    info!(
        target: "docweather_mcp::runtime",
        transport = telemetry.transport,
        host = telemetry.host.unwrap_or(""),
        port = telemetry.port.unwrap_or_default(),
        config_path = telemetry.config_path,
        tools = ?telemetry.tools,
        launch_args = ?telemetry.launch_args,
        "Started MCP server"
    );
}
