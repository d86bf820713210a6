// crates/command-gate-cli/src/main.rs
// ============================================================================
// Module: Command Gate CLI Entry Point
// Description: Command dispatcher for the Command Gate HTTP service.
// Purpose: Provide a safe, localized CLI for serving and config validation.
// Dependencies: clap, command-gate-config, command-gate-core, command-gate-http, tokio.
// ============================================================================

//! ## Overview
//! The Command Gate CLI starts the HTTP authorization-and-dispatch service
//! and offers offline configuration validation. Inputs are untrusted and
//! validated by the configuration layer before any socket is opened.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use command_gate_config::CommandGateConfig;
use command_gate_core::FixedAccessLevelProvider;
use command_gate_core::InMemoryDirectory;
use command_gate_http::HttpServer;
use command_gate_http::StderrAuditSink;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "command-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Command Gate HTTP service.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a Command Gate configuration file.
    Validate(ConfigValidateCommand),
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to command-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the configured bind address.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to command-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            let _ = write_stderr_line(&format!("error: {err}"));
            ExitCode::FAILURE
        }
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("command-gate {version}"))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        write_stdout_line("no subcommand given; see --help")?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = CommandGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load configuration: {err}")))?;
    if let Some(bind) = command.bind {
        config.server.bind = bind;
    }

    let directory = Arc::new(InMemoryDirectory::new(&config.service.name));
    let provider =
        Arc::new(FixedAccessLevelProvider::new(config.security.anonymous_caller_level));
    let bind = config.server.bind.clone();

    let server = HttpServer::from_config(
        config,
        directory.clone(),
        directory,
        provider,
        Arc::new(StderrAuditSink),
    )
    .map_err(|err| CliError::new(format!("failed to initialize server: {err}")))?;

    write_stderr_line(&format!("command-gate listening on {bind}"))?;
    server
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|err| CliError::new(format!("server failed: {err}")))?;
    write_stderr_line("command-gate stopped")?;

    Ok(ExitCode::SUCCESS)
}

/// Resolves when the process receives an interrupt signal.
async fn shutdown_signal() {
    // A failed signal registration leaves the server running until killed.
    let _ = tokio::signal::ctrl_c().await;
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Executes `config` subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(validate) => {
            match CommandGateConfig::load(validate.config.as_deref()) {
                Ok(_) => {
                    write_stdout_line("configuration OK")?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    write_stderr_line(&format!("configuration invalid: {err}"))?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout without panicking on broken pipes.
fn write_stdout_line(line: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(line.as_bytes())
        .and_then(|()| stdout.write_all(b"\n"))
        .map_err(|err| CliError::new(format!("stdout write failed: {err}")))
}

/// Writes a line to stderr without panicking on broken pipes.
fn write_stderr_line(line: &str) -> CliResult<()> {
    let mut stderr = std::io::stderr().lock();
    stderr
        .write_all(line.as_bytes())
        .and_then(|()| stderr.write_all(b"\n"))
        .map_err(|err| CliError::new(format!("stderr write failed: {err}")))
}
