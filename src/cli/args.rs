//! CLI argument definitions and parsing structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gdbridge - drive the Godot engine through a JSON-RPC tool server
#[derive(Parser, Debug)]
#[command(name = "gdbridge")]
#[command(about = "JSON-RPC tool server that drives the Godot engine")]
#[command(long_about = r#"
gdbridge exposes Godot editor, run, and scene-editing operations as tools over
newline-delimited JSON-RPC on stdin/stdout.

EXAMPLES:
  # Serve tools on stdio (the default command)
  gdbridge

  # Use a specific engine binary and operations script
  gdbridge --godot-path /opt/godot/godot --operations-script ./godot_operations.gd serve

  # Check the environment
  gdbridge doctor --json

  # Show where every configuration value came from
  gdbridge config

CONFIGURATION:
  Precedence: CLI flags > environment > config file > defaults
  The config file is discovered by searching upward from CWD for .gdbridge/config.toml,
  then $GDBRIDGE_HOME/config.toml. Use --config to name one explicitly.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Godot executable to try before any other candidate
    #[arg(long, global = true)]
    pub godot_path: Option<String>,

    /// Fail instead of falling back when no Godot executable validates
    #[arg(long, global = true)]
    pub strict_path_validation: bool,

    /// Default project for scene-builder tools
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Operations script passed to headless engine runs
    #[arg(long, global = true)]
    pub operations_script: Option<PathBuf>,

    /// Per-operation timeout in seconds
    #[arg(long, global = true)]
    pub operation_timeout: Option<u64>,

    /// Enable debug logging (stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Serve tools over JSON-RPC on stdin/stdout
    Serve,

    /// Run environment health checks
    Doctor {
        /// Output doctor results as JSON
        #[arg(long)]
        json: bool,

        /// Treat warnings as failures (exit non-zero on any warn or fail)
        #[arg(long)]
        strict_exit: bool,
    },

    /// Print the effective configuration and where each value came from
    Config,
}

/// Build the clap command (used by tests and completion generators).
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
