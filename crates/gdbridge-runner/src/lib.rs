//! Process execution for the Godot bridge
//!
//! Provides the two ways the bridge talks to the engine binary:
//! one-shot invocations that run to completion ([`NativeRunner`]) and a single
//! long-running supervised process whose output is captured as it arrives
//! ([`ProcessSupervisor`]).
//!
//! # Security Model
//!
//! All process execution goes through [`CommandSpec`] to ensure argv-style invocation.
//! Shell quoting ([`ShellDialect`]) is only used to render a human-readable command
//! line for logs and diagnostics; it never reaches a shell.

pub mod command_spec;
pub mod error;
pub mod native;
pub mod process;
pub mod quote;
pub mod ring_buffer;
pub mod supervisor;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use native::NativeRunner;
pub use process::{ProcessOutput, ProcessRunner};
pub use quote::ShellDialect;
pub use ring_buffer::{LineRing, LineSplitter};
pub use supervisor::{ProcessLogs, ProcessSupervisor};
