//! Headless operation commands
//!
//! An operation runs as
//! `<godot> --headless --path <project> --script <script> <operation> <json> [--debug-godot]`.
//! The process is always spawned from the argv vector; the rendered line is
//! for logs and diagnostics.

use serde_json::Value;
use std::path::{Path, PathBuf};

use gdbridge_runner::{CommandSpec, ShellDialect};
use gdbridge_utils::error::GodotError;

/// Flag that enables the operations script's own debug output.
pub const DEBUG_FLAG: &str = "--debug-godot";

/// One invocation of the operations script.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationCommand {
    godot_path: String,
    project_root: PathBuf,
    script_path: PathBuf,
    operation: String,
    params_json: String,
    debug: bool,
}

impl OperationCommand {
    /// Build a command from already-normalized (snake_case) parameters,
    /// serialized compactly into a single argument.
    ///
    /// Only serialization errors are returned.
    pub fn new(
        godot_path: impl Into<String>,
        project_root: impl Into<PathBuf>,
        script_path: impl Into<PathBuf>,
        operation: impl Into<String>,
        params: &Value,
    ) -> Result<Self, GodotError> {
        Ok(Self {
            godot_path: godot_path.into(),
            project_root: project_root.into(),
            script_path: script_path.into(),
            operation: operation.into(),
            params_json: serde_json::to_string(params)?,
            debug: false,
        })
    }

    /// Append `--debug-godot`.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    #[must_use]
    pub fn params_json(&self) -> &str {
        &self.params_json
    }

    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Argument vector, excluding the executable.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "--headless".to_string(),
            "--path".to_string(),
            self.project_root.display().to_string(),
            "--script".to_string(),
            self.script_path.display().to_string(),
            self.operation.clone(),
            self.params_json.clone(),
        ];
        if self.debug {
            args.push(DEBUG_FLAG.to_string());
        }
        args
    }

    #[must_use]
    pub fn to_spec(&self) -> CommandSpec {
        CommandSpec::new(&self.godot_path).args(self.args())
    }

    /// Render as one shell line.
    ///
    /// Paths are double-quoted on every platform. The JSON argument is quoted
    /// for `dialect`.
    #[must_use]
    pub fn command_line(&self, dialect: ShellDialect) -> String {
        let mut line = format!(
            "{} --headless --path {} --script {} {} {}",
            ShellDialect::quote_path(&self.godot_path),
            ShellDialect::quote_path(&self.project_root.display().to_string()),
            ShellDialect::quote_path(&self.script_path.display().to_string()),
            self.operation,
            dialect.quote(&self.params_json),
        );
        if self.debug {
            line.push(' ');
            line.push_str(DEBUG_FLAG);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(params: &Value) -> OperationCommand {
        OperationCommand::new(
            "/usr/bin/godot",
            "/home/me/my game",
            "/opt/gdbridge/scripts/godot_operations.gd",
            "create_scene",
            params,
        )
        .unwrap()
    }

    #[test]
    fn test_argv_order() {
        let cmd = sample(&json!({"scene_path": "a.tscn"}));
        assert_eq!(
            cmd.args(),
            vec![
                "--headless",
                "--path",
                "/home/me/my game",
                "--script",
                "/opt/gdbridge/scripts/godot_operations.gd",
                "create_scene",
                r#"{"scene_path":"a.tscn"}"#,
            ]
        );
        assert_eq!(cmd.to_spec().program_display(), "/usr/bin/godot");
    }

    #[test]
    fn test_debug_flag_is_last() {
        let cmd = sample(&json!({})).with_debug(true);
        assert_eq!(cmd.args().last().map(String::as_str), Some(DEBUG_FLAG));
        assert!(cmd.command_line(ShellDialect::Posix).ends_with(" --debug-godot"));
    }

    #[test]
    fn test_posix_command_line() {
        let cmd = sample(&json!({"node_name": "Bob's"}));
        assert_eq!(
            cmd.command_line(ShellDialect::Posix),
            r#""/usr/bin/godot" --headless --path "/home/me/my game" --script "/opt/gdbridge/scripts/godot_operations.gd" create_scene '{"node_name":"Bob'\''s"}'"#
        );
    }

    #[test]
    fn test_windows_command_line() {
        let cmd = OperationCommand::new(
            r"C:\Program Files\Godot\Godot.exe",
            r"C:\games\demo",
            r"C:\gdbridge\godot_operations.gd",
            "save_scene",
            &json!({"scene_path": "main.tscn"}),
        )
        .unwrap();
        assert_eq!(
            cmd.command_line(ShellDialect::Windows),
            r#""C:\Program Files\Godot\Godot.exe" --headless --path "C:\games\demo" --script "C:\gdbridge\godot_operations.gd" save_scene "{\"scene_path\":\"main.tscn\"}""#
        );
    }

    #[test]
    fn test_any_json_value_is_serialized() {
        let cmd = OperationCommand::new("godot", "/p", "/s.gd", "x", &json!([1, 2])).unwrap();
        assert_eq!(cmd.params_json(), "[1,2]");
    }
}
