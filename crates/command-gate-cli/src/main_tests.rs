// crates/command-gate-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Tests
// Description: Unit tests for CLI argument parsing and config validation.
// Purpose: Ensure the command surface parses as documented.
// Dependencies: command-gate-cli main helpers
// ============================================================================

//! ## Overview
//! Validates the clap command definitions and the config validation path.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tempfile::tempdir;

use super::Cli;
use super::Commands;
use super::ConfigCommand;
use super::command_config;

// ============================================================================
// SECTION: Parsing
// ============================================================================

#[test]
fn serve_accepts_optional_config_path() {
    let cli = Cli::try_parse_from(["command-gate", "serve", "--config", "gate.toml"])
        .expect("serve parses");
    match cli.command {
        Some(Commands::Serve(serve)) => {
            assert_eq!(serve.config, Some(PathBuf::from("gate.toml")));
        }
        other => panic!("expected serve command, got {other:?}"),
    }
}

#[test]
fn serve_config_path_defaults_to_none() {
    let cli = Cli::try_parse_from(["command-gate", "serve"]).expect("serve parses");
    match cli.command {
        Some(Commands::Serve(serve)) => {
            assert!(serve.config.is_none());
            assert!(serve.bind.is_none());
        }
        other => panic!("expected serve command, got {other:?}"),
    }
}

#[test]
fn serve_accepts_bind_override() {
    let cli = Cli::try_parse_from(["command-gate", "serve", "--bind", "127.0.0.1:9999"])
        .expect("serve parses");
    match cli.command {
        Some(Commands::Serve(serve)) => {
            assert_eq!(serve.bind.as_deref(), Some("127.0.0.1:9999"));
        }
        other => panic!("expected serve command, got {other:?}"),
    }
}

#[test]
fn version_flag_parses_without_subcommand() {
    let cli = Cli::try_parse_from(["command-gate", "--version"]).expect("version parses");
    assert!(cli.show_version);
    assert!(cli.command.is_none());
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["command-gate", "reboot"]).is_err());
}

// ============================================================================
// SECTION: Config Validation
// ============================================================================

#[test]
fn config_validate_accepts_a_valid_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("command-gate.toml");
    fs::write(&path, "[server]\nbind = \"127.0.0.1:9090\"\n").expect("write config");

    let command = ConfigCommand::Validate(super::ConfigValidateCommand {
        config: Some(path),
    });
    assert!(command_config(&command).is_ok());
}
