//! CLI entrypoint module structure.
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::server::config::ServerConfig;

pub mod args;
pub mod profile;

pub use args::{CliCommand, ConfigArgs, ConfigCommand, LaunchProfileArgs, ParsedCommand};
pub use profile::{build_launch_args, resolve_config_path, LaunchProfile, TransportMode};

/// Execute CLI command mode and return a user-facing result payload.
pub fn execute_cli_command(
    command: CliCommand,
    config_path: PathBuf,
    config_required: bool,
) -> Result<String> {
    match command {
        CliCommand::Config(config) => match config.command {
            ConfigCommand::Show => {
                let loaded = ServerConfig::load(config_path, config_required)
                    .context("failed to load configuration")?;
                render_config(&loaded)
            }
        },
    }
}

fn render_config(config: &ServerConfig) -> Result<String> {
    let body = toml::to_string_pretty(config).context("failed to render configuration")?;
    Ok(format!(
        "# source: {}\n{body}",
        config.source_path.display()
    ))
}
