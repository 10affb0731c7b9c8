//! Configuration management for gdbridge
//!
//! Supports TOML configuration files with `[godot]`, `[server]`, and
//! `[logging]` sections:
//!
//! ```toml
//! [godot]
//! path = "/opt/godot/Godot_v4.4.1-stable_linux.x86_64"
//! strict_path_validation = true
//! debug_flag = true
//! operations_script = "/opt/gdbridge/scripts/godot_operations.gd"
//!
//! [server]
//! default_project_path = "/home/me/games/demo"
//! operation_timeout_secs = 120
//! version_timeout_secs = 10
//! output_max_lines = 10000
//!
//! [logging]
//! verbose = false
//! ```

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use discovery::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, HOME_ENV};
pub use model::*;
pub use gdbridge_utils::types::ConfigSource;
