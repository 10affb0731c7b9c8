//! Configuration management for gdbridge
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > environment > config file > defaults.

pub mod config;

pub use config::{
    CliArgs, Config, ConfigBuilder, ConfigSource, GodotConfig, LoggingConfig, ServerConfig,
};
