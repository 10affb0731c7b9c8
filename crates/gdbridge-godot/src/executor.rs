//! Runs headless operations to completion

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use gdbridge_runner::{ProcessRunner, ShellDialect};
use gdbridge_utils::BridgeError;
use gdbridge_utils::error::GodotError;
use tracing::debug;

use crate::operation::OperationCommand;
use crate::params::ParameterCodec;

/// Marker core operations print to stderr on failure.
pub const FAILURE_MARKER: &str = "Failed to";

/// Marker scene-builder operations print to stderr on failure.
pub const ERROR_MARKER: &str = "[ERROR]";

/// Text output of a completed operation, whatever its exit status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl OperationOutput {
    /// Whether stderr contains `marker`.
    #[must_use]
    pub fn stderr_has(&self, marker: &str) -> bool {
        self.stderr.contains(marker)
    }
}

/// Builds and runs operations-script invocations.
///
/// A process that runs and exits non-zero is a normal result. Spawn failures
/// and timeouts are errors.
pub struct OperationExecutor {
    runner: Arc<dyn ProcessRunner>,
    script_path: PathBuf,
    debug_flag: bool,
    timeout: Duration,
}

impl OperationExecutor {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        script_path: impl Into<PathBuf>,
        debug_flag: bool,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            script_path: script_path.into(),
            debug_flag,
            timeout,
        }
    }

    #[must_use]
    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// Normalize `params` (camelCase) and build the command.
    ///
    /// The operations script reads its argument as a dictionary, so anything
    /// other than a JSON object is rejected here.
    pub fn command(
        &self,
        godot_path: &str,
        operation: &str,
        params: &Value,
        project_root: &Path,
    ) -> Result<OperationCommand, BridgeError> {
        if !params.is_object() {
            return Err(GodotError::ParamsNotObject.into());
        }
        let internal = ParameterCodec::to_internal(params);
        let command = OperationCommand::new(
            godot_path,
            project_root,
            &self.script_path,
            operation,
            &internal,
        )?
        .with_debug(self.debug_flag);
        Ok(command)
    }

    /// Run `operation` against `project_root` and collect its output.
    pub async fn execute(
        &self,
        godot_path: &str,
        operation: &str,
        params: &Value,
        project_root: &Path,
    ) -> Result<OperationOutput, BridgeError> {
        let command = self.command(godot_path, operation, params, project_root)?;
        debug!(
            operation,
            command = %command.command_line(ShellDialect::host()),
            "executing operation"
        );

        let output = self.runner.run(&command.to_spec(), self.timeout).await?;
        let output = OperationOutput {
            stdout: output.stdout_string(),
            stderr: output.stderr_string(),
            exit_code: output.exit_code,
        };

        debug!(
            operation,
            exit_code = ?output.exit_code,
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len(),
            "operation finished"
        );
        Ok(output)
    }
}

impl std::fmt::Debug for OperationExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationExecutor")
            .field("script_path", &self.script_path)
            .field("debug_flag", &self.debug_flag)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
