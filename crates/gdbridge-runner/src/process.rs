use async_trait::async_trait;
use std::time::Duration;

use crate::error::RunnerError;

use super::CommandSpec;

/// Output from a process that ran to completion.
///
/// Produced for every exit status. Callers that need to know whether the
/// engine-side operation worked inspect the text, not [`exit_code`](Self::exit_code).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    #[must_use]
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>, exit_code: Option<i32>) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
        }
    }

    #[must_use]
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    #[must_use]
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Exit code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// How the bridge starts engine processes that it does not supervise.
///
/// The operation executor and the path resolver only see this trait, so
/// tests drive them with a scripted runner. Implementations spawn from the
/// argv in [`CommandSpec`] and never through a shell.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use gdbridge_runner::{CommandSpec, ProcessOutput, ProcessRunner, RunnerError};
/// use std::time::Duration;
///
/// struct Canned;
///
/// #[async_trait]
/// impl ProcessRunner for Canned {
///     async fn run(
///         &self,
///         _cmd: &CommandSpec,
///         _timeout: Duration,
///     ) -> Result<ProcessOutput, RunnerError> {
///         Ok(ProcessOutput::new(b"4.4.1.stable".to_vec(), Vec::new(), Some(0)))
///     }
///
///     async fn spawn_detached(&self, _cmd: &CommandSpec) -> Result<Option<u32>, RunnerError> {
///         Ok(None)
///     }
/// }
/// ```
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `cmd` to completion, killing it after `timeout`.
    ///
    /// Any exit status is `Ok`. Only a failed spawn or wait, or an expired
    /// deadline, is an error.
    async fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError>;

    /// Start a command without waiting for it or capturing its output.
    ///
    /// Returns the pid when the platform reports one.
    async fn spawn_detached(&self, cmd: &CommandSpec) -> Result<Option<u32>, RunnerError>;
}
