//! CLI entry point and dispatch logic
//!
//! Owns `run()`, which parses arguments, discovers configuration, sets up
//! logging and the tokio runtime, and dispatches the subcommand. All error
//! output happens here; `main` only maps the returned code to the process
//! exit status.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

use gdbridge_utils::error::ConfigError;
use gdbridge_utils::logging::init_tracing;
use gdbridge_utils::{BridgeError, ExitCode, UserFriendlyError};

use super::args::{Cli, Commands};
use crate::doctor::{DoctorCommand, print_doctor_report};
use crate::server::{Bridge, serve_stdio};
use crate::{CliArgs, Config};

/// Main CLI execution function.
///
/// Returns `Err(ExitCode)` after printing the error; prints nothing else on
/// failure paths.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();
    let cli_args = cli_args_from(&cli);

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            match err.downcast::<ConfigError>() {
                Ok(config_err) => {
                    eprintln!("{}", BridgeError::from(config_err).display_for_user());
                }
                Err(other) => eprintln!("✗ {other:#}"),
            }
            return Err(ExitCode::CLI_ARGS);
        }
    };

    if let Err(e) = init_tracing(config.verbose()) {
        eprintln!("✗ Failed to initialize logging: {e}");
        return Err(ExitCode::INTERNAL);
    }
    for warning in config.warnings() {
        warn!("{warning}");
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let command = cli.command.unwrap_or(Commands::Serve);
    let result = rt.block_on(async {
        match command {
            Commands::Serve => execute_serve_command(&config).await,
            Commands::Doctor { json, strict_exit } => {
                execute_doctor_command(&config, json, strict_exit).await
            }
            Commands::Config => {
                execute_config_command(&config);
                Ok(ExitCode::SUCCESS)
            }
        }
    });

    match result {
        Ok(code) if code == ExitCode::SUCCESS => Ok(()),
        Ok(code) => Err(code),
        Err(err) => match err.downcast::<BridgeError>() {
            Ok(bridge_err) => {
                eprintln!("{}", bridge_err.display_for_user());
                Err(bridge_err.to_exit_code())
            }
            Err(other) => {
                eprintln!("✗ {other:#}");
                Err(ExitCode::INTERNAL)
            }
        },
    }
}

/// Translate parsed flags into configuration overrides.
///
/// Boolean flags only override when set, so an absent flag leaves lower
/// layers in effect.
pub(crate) fn cli_args_from(cli: &Cli) -> CliArgs {
    CliArgs {
        config_path: cli.config.clone(),
        godot_path: cli.godot_path.clone(),
        strict_path_validation: cli.strict_path_validation.then_some(true),
        debug_flag: None,
        operations_script: cli.operations_script.clone(),
        default_project_path: cli.project.clone(),
        operation_timeout_secs: cli.operation_timeout,
        output_max_lines: None,
        verbose: cli.verbose.then_some(true),
    }
}

async fn execute_serve_command(config: &Config) -> Result<ExitCode> {
    let bridge = Arc::new(Bridge::from_config(config));

    match bridge.resolver().resolve().await {
        Ok(path) => info!(godot = %path, "using Godot executable"),
        Err(err) if bridge.resolver().is_strict() => {
            eprintln!("{}", BridgeError::from(err).display_for_user());
            return Ok(ExitCode::GODOT_NOT_FOUND);
        }
        Err(err) => warn!(error = %err.user_message(), "no valid Godot executable yet"),
    }

    serve_stdio(bridge).await?;
    Ok(ExitCode::SUCCESS)
}

async fn execute_doctor_command(
    config: &Config,
    json: bool,
    strict_exit: bool,
) -> Result<ExitCode> {
    let output = DoctorCommand::new(config.clone()).run(strict_exit).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_doctor_report(&output);
        if !output.ok {
            println!();
            if strict_exit {
                println!("Some checks failed or warned (strict mode). Please address the issues above.");
            } else {
                println!("Some checks failed. Please address the issues above before using gdbridge.");
            }
        }
    }

    Ok(if output.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::INTERNAL
    })
}

fn execute_config_command(config: &Config) {
    for (key, (value, source)) in config.effective_config() {
        println!("{key} = {value} ({source})");
    }
}
