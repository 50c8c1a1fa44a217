//! Entry point for DocWeather MCP.
use std::{path::PathBuf, process::ExitCode};

use anyhow::Error;
use clap::Parser;
use docweather_mcp::{
    cli::{execute_cli_command, CliCommand, LaunchProfile, LaunchProfileArgs, ParsedCommand},
    lib::telemetry,
    server::{
        config::ServerConfig,
        runtime::{self, RuntimeExit},
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<(), RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let args = LaunchProfileArgs::parse();
    let command = args.into_command().map_err(RuntimeExit::from_error)?;

    match command {
        ParsedCommand::RunServer(profile) => run_server(profile).await,
        ParsedCommand::Cli {
            command,
            config_path,
            config_required,
        } => handle_cli_command(command, config_path, config_required),
    }
}

async fn run_server(profile: LaunchProfile) -> Result<(), RuntimeExit> {
    let config = ServerConfig::load(profile.config_path.clone(), profile.config_required)
        .map_err(|err| RuntimeExit::from_error(Error::new(err)))?;
    runtime::run_server(profile, config).await
}

fn handle_cli_command(
    command: CliCommand,
    config_path: PathBuf,
    config_required: bool,
) -> Result<(), RuntimeExit> {
    let message = execute_cli_command(command, config_path, config_required)
        .map_err(RuntimeExit::from_error)?;
    println!("{message}");
    Ok(())
}
