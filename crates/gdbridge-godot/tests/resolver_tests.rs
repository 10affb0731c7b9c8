//! PathResolver behavior against a scripted runner

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gdbridge_godot::detect::BARE_GODOT;
use gdbridge_godot::{PathResolver, Platform, ResolverOptions};
use gdbridge_runner::{CommandSpec, ProcessOutput, ProcessRunner, RunnerError};
use gdbridge_utils::error::GodotError;

/// Answers `--version` for the listed programs and records every call.
#[derive(Default)]
struct ScriptedRunner {
    working: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    fn accepting(paths: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            working: paths.iter().map(|p| p.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn call_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for call in self.calls() {
            *counts.entry(call).or_default() += 1;
        }
        counts
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(
        &self,
        cmd: &CommandSpec,
        _timeout: Duration,
    ) -> Result<ProcessOutput, RunnerError> {
        let program = cmd.program_display();
        self.calls.lock().unwrap().push(program.clone());
        if self.working.contains(&program) {
            Ok(ProcessOutput::new(b"4.4.1.stable\n".to_vec(), Vec::new(), Some(0)))
        } else if program == BARE_GODOT {
            Err(RunnerError::SpawnFailed {
                program,
                reason: "No such file or directory".to_string(),
            })
        } else {
            Ok(ProcessOutput::new(Vec::new(), b"bad".to_vec(), Some(1)))
        }
    }

    async fn spawn_detached(&self, _cmd: &CommandSpec) -> Result<Option<u32>, RunnerError> {
        Ok(None)
    }
}

fn options(strict: bool) -> ResolverOptions {
    ResolverOptions {
        configured_path: None,
        env_path: None,
        strict,
        probe_timeout: Duration::from_secs(1),
        platform: Platform::Linux,
        home: Some(PathBuf::from("/nonexistent-home")),
    }
}

#[tokio::test]
async fn bare_token_is_tried_first() {
    let runner = ScriptedRunner::accepting(&[BARE_GODOT]);
    let resolver = PathResolver::new(runner.clone(), options(true));

    assert_eq!(resolver.resolve().await.unwrap(), BARE_GODOT);
    assert_eq!(runner.calls(), vec![BARE_GODOT]);
}

#[tokio::test]
async fn cached_paths_are_never_probed_twice() {
    let runner = ScriptedRunner::accepting(&[BARE_GODOT]);
    let resolver = PathResolver::new(runner.clone(), options(true));

    for _ in 0..3 {
        resolver.resolve().await.unwrap();
    }
    assert!(resolver.is_valid(BARE_GODOT).await);
    assert_eq!(runner.call_counts().get(BARE_GODOT), Some(&1));
}

#[tokio::test]
async fn strict_mode_fails_with_searched_list() {
    let runner = ScriptedRunner::accepting(&[]);
    let resolver = PathResolver::new(runner.clone(), options(true));

    match resolver.resolve().await {
        Err(GodotError::ExecutableNotFound { searched }) => {
            assert_eq!(searched[0], BARE_GODOT);
            assert!(searched.contains(&"/usr/bin/godot".to_string()));
        }
        other => panic!("expected ExecutableNotFound, got {other:?}"),
    }

    // Nonexistent install locations are rejected without spawning anything.
    let calls = runner.calls();
    assert_eq!(calls[0], BARE_GODOT);
    assert!(calls.iter().all(|c| c == BARE_GODOT || Path::new(c).exists()));

    // A second attempt consults only the cache.
    assert!(resolver.resolve().await.is_err());
    assert_eq!(runner.calls().len(), calls.len());
}

#[tokio::test]
async fn permissive_mode_falls_back_to_platform_default() {
    let runner = ScriptedRunner::accepting(&[]);
    let resolver = PathResolver::new(runner, options(false));

    assert_eq!(resolver.resolve().await.unwrap(), "/usr/bin/godot");
    assert_eq!(resolver.current().as_deref(), Some("/usr/bin/godot"));
}

#[tokio::test]
async fn env_path_precedes_candidates() {
    let exe = tempfile::NamedTempFile::new().unwrap();
    let exe_path = exe.path().display().to_string();
    let runner = ScriptedRunner::accepting(&[&exe_path, BARE_GODOT]);
    let resolver = PathResolver::new(
        runner.clone(),
        ResolverOptions {
            env_path: Some(exe_path.clone()),
            ..options(true)
        },
    );

    assert_eq!(resolver.resolve().await.unwrap(), exe_path);
    assert_eq!(runner.calls(), vec![exe_path]);
}

#[tokio::test]
async fn configured_path_wins_and_missing_one_is_dropped() {
    let exe = tempfile::NamedTempFile::new().unwrap();
    let exe_path = exe.path().display().to_string();
    let runner = ScriptedRunner::accepting(&[&exe_path, BARE_GODOT]);

    let resolver = PathResolver::new(
        runner.clone(),
        ResolverOptions {
            configured_path: Some(exe_path.clone()),
            ..options(true)
        },
    );
    assert_eq!(resolver.current().as_deref(), Some(exe_path.as_str()));
    assert_eq!(resolver.resolve().await.unwrap(), exe_path);

    let resolver = PathResolver::new(
        runner,
        ResolverOptions {
            configured_path: Some("/no/such/godot".to_string()),
            ..options(true)
        },
    );
    assert_eq!(resolver.current(), None);
    assert_eq!(resolver.resolve().await.unwrap(), BARE_GODOT);
}

#[tokio::test]
async fn set_path_requires_validation() {
    let exe = tempfile::NamedTempFile::new().unwrap();
    let exe_path = exe.path().display().to_string();
    let runner = ScriptedRunner::accepting(&[BARE_GODOT]);
    let resolver = PathResolver::new(runner, options(true));

    assert!(!resolver.set_path(&exe_path).await);
    assert_eq!(resolver.current(), None);
    assert!(resolver.set_path(BARE_GODOT).await);
    assert_eq!(resolver.current().as_deref(), Some(BARE_GODOT));
}
