use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tracing::debug;

use crate::error::RunnerError;
use crate::quote::ShellDialect;

use super::{CommandSpec, ProcessOutput, ProcessRunner};

// ============================================================================
// NativeRunner - One-shot Native Process Execution
// ============================================================================

/// Runs a command to completion on the Tokio runtime.
///
/// stdin is closed, stdout and stderr are captured in full. If the deadline
/// passes, the pending child is dropped and `kill_on_drop` reaps it.
///
/// # Example
///
/// ```rust,no_run
/// use gdbridge_runner::{CommandSpec, NativeRunner, ProcessRunner};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), gdbridge_runner::RunnerError> {
/// let output = NativeRunner::new()
///     .run(&CommandSpec::new("godot").arg("--version"), Duration::from_secs(10))
///     .await?;
/// println!("{}", output.stdout_string().trim());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for NativeRunner {
    async fn run(
        &self,
        cmd: &CommandSpec,
        timeout: Duration,
    ) -> Result<ProcessOutput, RunnerError> {
        let mut command = cmd.to_tokio_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command
            .spawn()
            .map_err(|e| RunnerError::spawn(cmd.program_display(), &e))?;

        debug!(
            command = %cmd.display_line(ShellDialect::host()),
            pid = ?child.id(),
            "spawned one-shot process"
        );

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ProcessOutput::new(
                output.stdout,
                output.stderr,
                output.status.code(),
            )),
            Ok(Err(e)) => Err(RunnerError::WaitFailed {
                reason: e.to_string(),
            }),
            Err(_) => Err(RunnerError::Timeout {
                timeout_seconds: timeout.as_secs(),
            }),
        }
    }

    async fn spawn_detached(&self, cmd: &CommandSpec) -> Result<Option<u32>, RunnerError> {
        let mut command = cmd.to_tokio_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);

        let mut child = command
            .spawn()
            .map_err(|e| RunnerError::spawn(cmd.program_display(), &e))?;
        let pid = child.id();
        debug!(
            command = %cmd.display_line(ShellDialect::host()),
            pid = ?pid,
            "spawned detached process"
        );

        // Reap on exit so the child does not linger as a zombie.
        tokio::spawn(async move {
            let _ = child.wait().await;
        });

        Ok(pid)
    }
}
