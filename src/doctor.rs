//! `gdbridge doctor`: is this machine ready to drive Godot?
//!
//! Checks that a Godot executable can be found and run, that it is new
//! enough for the UID tools, and that the operations script and default
//! project are usable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use gdbridge_godot::version::{GodotVersion, probe_version};
use gdbridge_godot::{PathResolver, ResolverOptions};
use gdbridge_runner::{NativeRunner, ProcessRunner};
use gdbridge_utils::UserFriendlyError;
use gdbridge_utils::paths::is_godot_project;

use crate::{Config, ConfigSource};

/// Report emitted by `gdbridge doctor --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorOutput {
    pub schema_version: String,
    /// When the checks ran.
    pub emitted_at: DateTime<Utc>,
    /// False if any check failed (or warned, in strict mode)
    pub ok: bool,
    /// Sorted by name
    pub checks: Vec<DoctorCheck>,
}

/// One named check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub status: CheckStatus,
    pub details: String,
}

impl DoctorCheck {
    fn new(name: &str, status: CheckStatus, details: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            details: details.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Runs the checks against one configuration.
pub struct DoctorCommand {
    config: Config,
    runner: Arc<dyn ProcessRunner>,
    resolver: PathResolver,
}

impl DoctorCommand {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_runner(config, Arc::new(NativeRunner::new()), ResolverOptions::from_env())
    }

    /// Build with a specific runner; `options` supplies what configuration does not.
    pub fn with_runner(
        config: Config,
        runner: Arc<dyn ProcessRunner>,
        options: ResolverOptions,
    ) -> Self {
        let options = ResolverOptions {
            configured_path: config.godot_path().map(str::to_string),
            strict: config.strict_path_validation(),
            probe_timeout: config.version_timeout(),
            ..options
        };
        let resolver = PathResolver::new(Arc::clone(&runner), options);
        Self {
            config,
            runner,
            resolver,
        }
    }

    /// Run all health checks.
    ///
    /// In strict mode, warnings are treated as failures for `ok`.
    pub async fn run(&self, strict_exit: bool) -> DoctorOutput {
        let mut checks = Vec::new();

        let (path_check, godot) = self.check_godot_path().await;
        checks.push(path_check);
        checks.push(self.check_godot_version(godot.as_deref()).await);
        checks.push(check_godot_on_path());
        checks.push(self.check_operations_script());
        checks.push(self.check_default_project());
        checks.push(self.check_config());

        checks.sort_by(|a, b| a.name.cmp(&b.name));

        let has_fail = checks.iter().any(|c| c.status == CheckStatus::Fail);
        let has_warn = checks.iter().any(|c| c.status == CheckStatus::Warn);

        DoctorOutput {
            schema_version: "1".to_string(),
            emitted_at: Utc::now(),
            ok: !has_fail && (!strict_exit || !has_warn),
            checks,
        }
    }

    /// Resolve the executable. Returns the path only when it validated.
    async fn check_godot_path(&self) -> (DoctorCheck, Option<String>) {
        const NAME: &str = "godot_path";
        match self.resolver.resolve().await {
            Ok(path) if self.resolver.is_valid(&path).await => (
                DoctorCheck::new(NAME, CheckStatus::Pass, format!("Using {path}")),
                Some(path),
            ),
            Ok(path) => (
                DoctorCheck::new(
                    NAME,
                    CheckStatus::Warn,
                    format!(
                        "No candidate validated; falling back to {path}. Set GODOT_PATH or enable strict_path_validation"
                    ),
                ),
                None,
            ),
            Err(e) => {
                let details = match e.context() {
                    Some(context) => format!("{} ({context})", e.user_message()),
                    None => e.user_message(),
                };
                (DoctorCheck::new(NAME, CheckStatus::Fail, details), None)
            }
        }
    }

    async fn check_godot_version(&self, godot: Option<&str>) -> DoctorCheck {
        const NAME: &str = "godot_version";
        let Some(godot) = godot else {
            return DoctorCheck::new(
                NAME,
                CheckStatus::Fail,
                "Skipped: no working Godot executable",
            );
        };

        match probe_version(self.runner.as_ref(), godot, self.config.version_timeout()).await {
            Ok(version) => match GodotVersion::parse(&version) {
                Some(parsed) if parsed.supports_uids() => {
                    DoctorCheck::new(NAME, CheckStatus::Pass, version)
                }
                Some(_) => DoctorCheck::new(
                    NAME,
                    CheckStatus::Warn,
                    format!(
                        "{version}: get_uid and update_project_uids need Godot {} or later",
                        GodotVersion::UID_SUPPORT
                    ),
                ),
                None => DoctorCheck::new(
                    NAME,
                    CheckStatus::Warn,
                    format!("Unrecognized version string: {version}"),
                ),
            },
            Err(e) => DoctorCheck::new(NAME, CheckStatus::Fail, e.user_message()),
        }
    }

    fn check_operations_script(&self) -> DoctorCheck {
        const NAME: &str = "operations_script";
        let script = self.config.operations_script();
        if script.is_file() {
            DoctorCheck::new(NAME, CheckStatus::Pass, format!("Found {}", script.display()))
        } else {
            DoctorCheck::new(
                NAME,
                CheckStatus::Fail,
                format!(
                    "{} not found; scene tools will fail. Set godot.operations_script or --operations-script",
                    script.display()
                ),
            )
        }
    }

    fn check_default_project(&self) -> DoctorCheck {
        const NAME: &str = "default_project";
        match self.config.default_project_path() {
            None => DoctorCheck::new(
                NAME,
                CheckStatus::Pass,
                "Not set; scene-builder tools need projectPath in each request",
            ),
            Some(project) if is_godot_project(project) => DoctorCheck::new(
                NAME,
                CheckStatus::Pass,
                format!("Using {}", project.display()),
            ),
            Some(project) => DoctorCheck::new(
                NAME,
                CheckStatus::Warn,
                format!("{} does not contain project.godot", project.display()),
            ),
        }
    }

    fn check_config(&self) -> DoctorCheck {
        let overridden: Vec<String> = self
            .config
            .effective_config()
            .into_iter()
            .filter(|(_, (_, source))| *source != ConfigSource::Default)
            .map(|(key, (_, source))| format!("{key} ({source})"))
            .collect();

        let details = if overridden.is_empty() {
            "Configuration parsed and validated; all values are defaults".to_string()
        } else {
            format!(
                "Configuration parsed and validated; overridden: {}",
                overridden.join(", ")
            )
        };
        DoctorCheck::new("config", CheckStatus::Pass, details)
    }
}

fn check_godot_on_path() -> DoctorCheck {
    const NAME: &str = "godot_on_path";
    match which::which("godot") {
        Ok(path) => DoctorCheck::new(
            NAME,
            CheckStatus::Pass,
            format!("Found godot at {}", path.display()),
        ),
        Err(_) => DoctorCheck::new(
            NAME,
            CheckStatus::Warn,
            "godot is not on PATH; relying on GODOT_PATH, configuration, or install locations",
        ),
    }
}

/// Human-readable report on stdout.
pub fn print_doctor_report(report: &DoctorOutput) {
    println!("gdbridge Environment Health Check");
    println!("---------------------------------");
    println!();

    let mut counts = [0usize; 3];
    for check in &report.checks {
        let (symbol, tag, slot) = match check.status {
            CheckStatus::Pass => ("✓", "", 0),
            CheckStatus::Warn => ("⚠", " [WARN]", 1),
            CheckStatus::Fail => ("✗", " [FAIL]", 2),
        };
        counts[slot] += 1;
        println!("{symbol} {}{tag}", to_title_case(&check.name));
        println!("  {}", check.details);
        println!();
    }

    println!("---------------------------------");
    let [pass, warn, fail] = counts;
    if fail == 0 && warn == 0 {
        println!("All {pass} checks passed");
    } else {
        println!("{pass} passed, {warn} warning, {fail} failed");
    }
}

/// `godot_path` -> `Godot Path`
fn to_title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gdbridge_godot::Platform;
    use gdbridge_runner::{CommandSpec, ProcessOutput, RunnerError};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Answers every `--version` probe with `version`, or fails to spawn.
    struct VersionRunner {
        version: Option<&'static str>,
    }

    #[async_trait]
    impl ProcessRunner for VersionRunner {
        async fn run(
            &self,
            cmd: &CommandSpec,
            _timeout: Duration,
        ) -> Result<ProcessOutput, RunnerError> {
            match self.version {
                Some(v) => Ok(ProcessOutput::new(
                    format!("{v}\n").into_bytes(),
                    Vec::new(),
                    Some(0),
                )),
                None => Err(RunnerError::SpawnFailed {
                    program: cmd.program_display(),
                    reason: "not found".to_string(),
                }),
            }
        }

        async fn spawn_detached(&self, _cmd: &CommandSpec) -> Result<Option<u32>, RunnerError> {
            Ok(None)
        }
    }

    fn options() -> ResolverOptions {
        ResolverOptions {
            platform: Platform::Linux,
            home: None,
            ..ResolverOptions::default()
        }
    }

    fn check<'a>(output: &'a DoctorOutput, name: &str) -> &'a DoctorCheck {
        output
            .checks
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("missing check {name}"))
    }

    #[tokio::test]
    async fn test_checks_are_sorted_by_name() {
        let config = Config::builder().build().unwrap();
        let doctor = DoctorCommand::with_runner(
            config,
            Arc::new(VersionRunner {
                version: Some("4.4.1.stable.official"),
            }),
            options(),
        );
        let output = doctor.run(false).await;

        assert_eq!(output.schema_version, "1");
        let names: Vec<_> = output.checks.iter().map(|c| c.name.clone()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_old_engine_warns_about_uids() {
        let config = Config::builder().build().unwrap();
        let doctor = DoctorCommand::with_runner(
            config,
            Arc::new(VersionRunner {
                version: Some("4.3.0.stable"),
            }),
            options(),
        );
        let output = doctor.run(false).await;

        assert_eq!(check(&output, "godot_path").status, CheckStatus::Pass);
        let version = check(&output, "godot_version");
        assert_eq!(version.status, CheckStatus::Warn);
        assert!(version.details.contains("4.4"));
    }

    #[tokio::test]
    async fn test_strict_mode_without_engine_fails() {
        let config = Config::builder().strict_path_validation(true).build().unwrap();
        let doctor = DoctorCommand::with_runner(
            config,
            Arc::new(VersionRunner { version: None }),
            options(),
        );
        let output = doctor.run(false).await;

        assert!(!output.ok);
        let path = check(&output, "godot_path");
        assert_eq!(path.status, CheckStatus::Fail);
        assert!(path.details.contains("Could not find a valid Godot executable path"));
        assert_eq!(check(&output, "godot_version").status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn test_operations_script_and_project_checks() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("godot_operations.gd");
        std::fs::write(&script, "extends SceneTree\n").unwrap();
        let project = temp.path().join("game");
        std::fs::create_dir(&project).unwrap();

        let config = Config::builder()
            .operations_script(&script)
            .default_project_path(&project)
            .build()
            .unwrap();
        let doctor = DoctorCommand::with_runner(
            config,
            Arc::new(VersionRunner {
                version: Some("4.4.stable"),
            }),
            options(),
        );
        let output = doctor.run(false).await;

        assert_eq!(check(&output, "operations_script").status, CheckStatus::Pass);
        assert_eq!(check(&output, "default_project").status, CheckStatus::Warn);
        assert!(check(&output, "config").details.contains("operations_script (programmatic)"));
    }

    #[test]
    fn test_check_status_serialization() {
        let check = DoctorCheck::new("godot_path", CheckStatus::Warn, "fallback");
        let json = serde_json::to_value(&check).unwrap();
        assert_eq!(json["status"], "warn");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(to_title_case("godot_on_path"), "Godot On Path");
        assert_eq!(to_title_case("config"), "Config");
    }
}
