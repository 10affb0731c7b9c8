//! Shared fixtures: a scripted engine and throwaway projects

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use gdbridge::Config;
use gdbridge::godot::{Platform, ResolverOptions};
use gdbridge::runner::{CommandSpec, ProcessOutput, ProcessRunner, RunnerError};
use gdbridge::server::{Bridge, ToolResponse};

/// Stands in for the engine binary.
///
/// `--version` answers with the configured version; operations answer with
/// the output registered for their name, or empty success.
pub struct FakeGodot {
    version: String,
    outputs: Mutex<HashMap<String, ProcessOutput>>,
    runs: Mutex<Vec<CommandSpec>>,
    detached: Mutex<Vec<CommandSpec>>,
}

impl FakeGodot {
    pub fn new(version: &str) -> Arc<Self> {
        Arc::new(Self {
            version: version.to_string(),
            outputs: Mutex::new(HashMap::new()),
            runs: Mutex::new(Vec::new()),
            detached: Mutex::new(Vec::new()),
        })
    }

    pub fn respond(&self, operation: &str, stdout: &str, stderr: &str) {
        self.outputs.lock().unwrap().insert(
            operation.to_string(),
            ProcessOutput::new(stdout.as_bytes().to_vec(), stderr.as_bytes().to_vec(), Some(0)),
        );
    }

    /// Operation invocations, in order. Version probes are excluded.
    pub fn operations(&self) -> Vec<Vec<String>> {
        self.runs
            .lock()
            .unwrap()
            .iter()
            .map(args_of)
            .filter(|args| args.first().map(String::as_str) == Some("--headless"))
            .collect()
    }

    pub fn version_checks(&self) -> usize {
        self.runs
            .lock()
            .unwrap()
            .iter()
            .filter(|spec| args_of(spec) == ["--version"])
            .count()
    }

    pub fn detached(&self) -> Vec<Vec<String>> {
        self.detached.lock().unwrap().iter().map(args_of).collect()
    }
}

#[async_trait]
impl ProcessRunner for FakeGodot {
    async fn run(
        &self,
        cmd: &CommandSpec,
        _timeout: Duration,
    ) -> Result<ProcessOutput, RunnerError> {
        self.runs.lock().unwrap().push(cmd.clone());
        let args = args_of(cmd);

        if args == ["--version"] {
            return Ok(ProcessOutput::new(
                format!("{}\n", self.version).into_bytes(),
                Vec::new(),
                Some(0),
            ));
        }

        // --headless --path <p> --script <s> <operation> <json>
        let operation = args.get(5).cloned().unwrap_or_default();
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .get(&operation)
            .cloned()
            .unwrap_or_else(|| ProcessOutput::new(Vec::new(), Vec::new(), Some(0))))
    }

    async fn spawn_detached(&self, cmd: &CommandSpec) -> Result<Option<u32>, RunnerError> {
        self.detached.lock().unwrap().push(cmd.clone());
        Ok(Some(4242))
    }
}

fn args_of(spec: &CommandSpec) -> Vec<String> {
    spec.args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

/// The parameter object of an operation invocation.
pub fn operation_params(args: &[String]) -> Value {
    serde_json::from_str(&args[6]).unwrap()
}

/// Resolver options that only ever find the bare `godot` name.
pub fn isolated_options() -> ResolverOptions {
    ResolverOptions {
        env_path: None,
        platform: Platform::Linux,
        home: None,
        ..ResolverOptions::default()
    }
}

pub fn bridge_with(fake: &Arc<FakeGodot>, config: &Config) -> Bridge {
    Bridge::new(config, Arc::clone(fake) as Arc<dyn ProcessRunner>, isolated_options())
}

pub fn bridge(fake: &Arc<FakeGodot>) -> Bridge {
    let config = Config::builder()
        .operations_script("/opt/gdbridge/godot_operations.gd")
        .build()
        .unwrap();
    bridge_with(fake, &config)
}

/// A project directory with `project.godot`, one scene, and one texture.
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("project.godot"),
            "config_version=5\n\n[application]\nconfig/name=\"Demo Game\"\n",
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("scenes")).unwrap();
        std::fs::write(dir.path().join("scenes/main.tscn"), "[gd_scene format=3]\n").unwrap();
        std::fs::write(dir.path().join("icon.png"), [0x89, b'P', b'N', b'G']).unwrap();
        std::fs::write(dir.path().join("player.gd"), "extends Node2D\n").unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_string(&self) -> String {
        self.dir.path().display().to_string()
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }
}

pub fn first_text(response: &ToolResponse) -> &str {
    &response.texts()[0]
}

pub fn solutions(response: &ToolResponse) -> &str {
    response
        .texts()
        .get(1)
        .map(String::as_str)
        .unwrap_or_default()
}
