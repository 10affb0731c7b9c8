//! Command-line interface for gdbridge
//!
//! - `args`: clap definitions
//! - `run`: entry point and command dispatch

pub mod args;
mod run;


pub use args::{Cli, Commands, build_cli};
pub use run::run;
