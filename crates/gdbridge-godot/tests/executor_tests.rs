//! OperationExecutor against a recording runner

use async_trait::async_trait;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gdbridge_godot::OperationExecutor;
use gdbridge_runner::{CommandSpec, ProcessOutput, ProcessRunner, RunnerError};
use gdbridge_utils::BridgeError;
use gdbridge_utils::error::GodotError;

struct Recording {
    reply: Result<(Vec<u8>, Vec<u8>, Option<i32>), u64>,
    seen: Mutex<Option<CommandSpec>>,
}

#[async_trait]
impl ProcessRunner for Recording {
    async fn run(
        &self,
        cmd: &CommandSpec,
        _timeout: Duration,
    ) -> Result<ProcessOutput, RunnerError> {
        *self.seen.lock().unwrap() = Some(cmd.clone());
        match &self.reply {
            Ok((out, err, code)) => Ok(ProcessOutput::new(out.clone(), err.clone(), *code)),
            Err(secs) => Err(RunnerError::Timeout {
                timeout_seconds: *secs,
            }),
        }
    }

    async fn spawn_detached(&self, _cmd: &CommandSpec) -> Result<Option<u32>, RunnerError> {
        Ok(None)
    }
}

fn executor(runner: Arc<Recording>, debug: bool) -> OperationExecutor {
    OperationExecutor::new(runner, "/opt/ops.gd", debug, Duration::from_secs(5))
}

#[tokio::test]
async fn params_are_normalized_into_one_json_argument() {
    let runner = Arc::new(Recording {
        reply: Ok((b"done".to_vec(), Vec::new(), Some(0))),
        seen: Mutex::new(None),
    });
    let params = json!({
        "scenePath": "main.tscn",
        "rootNodeType": "Node3D",
        "properties": {"zIndex": 2},
    });

    let output = executor(runner.clone(), true)
        .execute("godot", "create_scene", &params, Path::new("/games/demo"))
        .await
        .unwrap();
    assert_eq!(output.stdout, "done");

    let spec = runner.seen.lock().unwrap().clone().unwrap();
    let args: Vec<String> = spec
        .args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        &args[..6],
        &[
            "--headless",
            "--path",
            "/games/demo",
            "--script",
            "/opt/ops.gd",
            "create_scene",
        ]
    );
    assert_eq!(args[7], "--debug-godot");

    let sent: Value = serde_json::from_str(&args[6]).unwrap();
    assert_eq!(
        sent,
        json!({"scene_path": "main.tscn", "root_node_type": "Node3D", "properties": {"z_index": 2}})
    );
}

#[tokio::test]
async fn nonzero_exit_is_returned_as_output() {
    let runner = Arc::new(Recording {
        reply: Ok((Vec::new(), b"Failed to load scene".to_vec(), Some(1))),
        seen: Mutex::new(None),
    });

    let output = executor(runner, false)
        .execute("godot", "save_scene", &json!({}), Path::new("/p"))
        .await
        .unwrap();
    assert!(output.stderr_has("Failed to"));
    assert_eq!(output.exit_code, Some(1));
}

#[tokio::test]
async fn timeout_is_an_error() {
    let runner = Arc::new(Recording {
        reply: Err(5),
        seen: Mutex::new(None),
    });

    let err = executor(runner, false)
        .execute("godot", "get_uid", &json!({}), Path::new("/p"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Runner(RunnerError::Timeout { timeout_seconds: 5 })
    ));
}

#[test]
fn non_object_params_are_rejected_before_running() {
    let runner = Arc::new(Recording {
        reply: Ok((Vec::new(), Vec::new(), Some(0))),
        seen: Mutex::new(None),
    });
    let err = executor(runner.clone(), false)
        .command("godot", "x", &json!("nope"), Path::new("/p"))
        .unwrap_err();
    assert!(matches!(err, BridgeError::Godot(GodotError::ParamsNotObject)));
    assert!(runner.seen.lock().unwrap().is_none());
}
