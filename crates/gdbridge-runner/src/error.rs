//! Error types for the runner crate

use thiserror::Error;

/// Failures to run or supervise an engine process.
///
/// A process that starts and exits with a non-zero status is not an error at
/// this layer; its output comes back as a normal [`ProcessOutput`](crate::ProcessOutput).
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to spawn '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Failed to wait for process: {reason}")]
    WaitFailed { reason: String },

    #[error("Execution timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    #[error("No active process")]
    NoActiveProcess,

    #[error("Process {stream} pipe was not captured")]
    PipeUnavailable { stream: &'static str },
}

impl RunnerError {
    pub(crate) fn spawn(program: impl Into<String>, err: &std::io::Error) -> Self {
        Self::SpawnFailed {
            program: program.into(),
            reason: err.to_string(),
        }
    }
}
