//! TTY check performed before serving MCP over stdio.
use std::process::ExitCode;

use serde_json::json;

use super::runtime::RuntimeExit;
use crate::{
    cli::{LaunchProfile, TransportMode},
    lib::errors::{ErrorOrigin, ToolErrorDescriptorBuilder, MCP_CLIENT_REQUIRED_ERROR},
};

const MCP_CLIENT_REQUIRED_EXIT: u8 = 44;

/// Refuse to speak MCP over stdio when a human terminal is attached.
pub fn ensure_invoked_via_mcp_client(profile: &LaunchProfile) -> Result<(), RuntimeExit> {
    use std::io::IsTerminal;
    if profile.transport != TransportMode::Stdio {
        return Ok(());
    }
    let stdin_tty = std::io::stdin().is_terminal();
    let stdout_tty = std::io::stdout().is_terminal();
    check_stdio(profile, stdin_tty, stdout_tty)
}

fn check_stdio(
    profile: &LaunchProfile,
    stdin_tty: bool,
    stdout_tty: bool,
) -> Result<(), RuntimeExit> {
    if !(stdin_tty || stdout_tty) {
        return Ok(());
    }
    Err(build_guard_exit(
        MCP_CLIENT_REQUIRED_ERROR.builder(),
        json!({
            "transport": profile.transport.as_str(),
            "stdin_is_tty": stdin_tty,
            "stdout_is_tty": stdout_tty
        }),
    ))
}

fn build_guard_exit(
    builder: ToolErrorDescriptorBuilder<'static>,
    details: serde_json::Value,
) -> RuntimeExit {
    let exit_code = ExitCode::from(MCP_CLIENT_REQUIRED_EXIT);
    match builder
        .retryable(true)
        .origin(ErrorOrigin::Configuration)
        .details(details)
        .with_context_field("exit_code", json!(MCP_CLIENT_REQUIRED_EXIT))
        .build()
    {
        Ok(data) => RuntimeExit::structured(data, exit_code),
        Err(err) => RuntimeExit::from_error(err).with_exit_code(exit_code),
    }
}
