//! gdbridge - JSON-RPC tool server that drives the Godot engine
//!
//! gdbridge exposes Godot editor, run, and scene-editing operations as tools
//! over newline-delimited JSON-RPC 2.0 on stdin/stdout. Scene edits run as
//! headless engine invocations of an operations script; debug runs are
//! supervised so their output can be queried while they run.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Serve tools on stdio
//! gdbridge
//!
//! # Check the environment
//! gdbridge doctor --json
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use gdbridge::server::{Bridge, Tool};
//! use gdbridge::Config;
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .godot_path("/opt/godot/godot")
//!     .operations_script("scripts/godot_operations.gd")
//!     .build()?;
//! let bridge = Bridge::from_config(&config);
//!
//! let response = bridge
//!     .call_tool(Tool::CreateScene, &json!({
//!         "projectPath": "/games/demo",
//!         "scenePath": "scenes/level.tscn",
//!     }))
//!     .await;
//! println!("{}", response.texts()[0]);
//! # Ok(())
//! # }
//! ```
//!
//! # Crates
//!
//! - `gdbridge-runner`: one-shot and supervised process execution
//! - `gdbridge-godot`: executable resolution, parameter naming, operation commands
//! - `gdbridge-config`: layered configuration with source attribution
//! - `gdbridge-utils`: error taxonomy, exit codes, logging, request path checks

pub mod cli;
pub mod doctor;
pub mod server;

/// Configuration with discovery and source attribution.
pub use gdbridge_config::{CliArgs, Config, ConfigBuilder, ConfigSource};

/// Error types and exit codes.
pub use gdbridge_utils::error::{BridgeError, ErrorCategory, UserFriendlyError};
pub use gdbridge_utils::exit_codes::ExitCode;

pub use gdbridge_config as config;
pub use gdbridge_godot as godot;
pub use gdbridge_runner as runner;
