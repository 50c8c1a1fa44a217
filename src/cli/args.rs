//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use super::{build_launch_args, resolve_config_path, LaunchProfile, TransportMode};

/// Parsed command intent from CLI.
#[derive(Debug, Clone)]
pub enum ParsedCommand {
    RunServer(LaunchProfile),
    Cli {
        command: CliCommand,
        config_path: PathBuf,
        config_required: bool,
    },
}

/// Top-level optional CLI commands.
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Inspect the effective configuration.
    #[command(about = "Inspect the effective configuration")]
    Config(ConfigArgs),
}

/// `config` command container.
#[derive(Debug, Clone, Args)]
#[command(
    about = "Inspect the effective configuration",
    after_help = "Hint: DOCWEATHER_* environment variables (e.g. DOCWEATHER_OCR__SERVICE_URL) override file values."
)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Print the merged, validated configuration as TOML.
    Show,
}

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "DocWeather MCP: document OCR and NWS weather tools",
    long_about = None
)]
pub struct LaunchProfileArgs {
    /// Select stdio (default), tcp or http.
    #[arg(long, value_enum, default_value_t = TransportMode::Stdio)]
    pub transport: TransportMode,
    /// Path to config.toml (overrides MCP_CONFIG_PATH).
    #[arg(long = "config")]
    pub config_override: Option<PathBuf>,
    /// Optional CLI command mode.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

impl LaunchProfileArgs {
    /// Build a `LaunchProfile` from CLI args and environment variables.
    pub fn build(self) -> Result<LaunchProfile> {
        let (config_path, config_required) = resolve_config_path(self.config_override)?;
        let launch_args = build_launch_args(self.transport, &config_path);

        Ok(LaunchProfile {
            config_path,
            config_required,
            transport: self.transport,
            launch_args,
        })
    }

    /// Parse CLI args into either server launch mode or utility command mode.
    pub fn into_command(self) -> Result<ParsedCommand> {
        match self.command {
            Some(command) => {
                let (config_path, config_required) = resolve_config_path(self.config_override)?;
                Ok(ParsedCommand::Cli {
                    command,
                    config_path,
                    config_required,
                })
            }
            None => Ok(ParsedCommand::RunServer(self.build()?)),
        }
    }
}
