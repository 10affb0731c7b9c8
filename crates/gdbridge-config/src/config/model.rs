use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use gdbridge_utils::types::ConfigSource;

/// Default timeout for one-shot engine invocations.
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 120;

/// Default timeout for `--version` probes.
pub const DEFAULT_VERSION_TIMEOUT_SECS: u64 = 10;

/// Default capacity of each supervised output buffer, in lines.
pub const DEFAULT_OUTPUT_MAX_LINES: usize = 10_000;

/// Operations script location relative to the executable's directory.
pub const DEFAULT_OPERATIONS_SCRIPT: &str = "scripts/godot_operations.gd";

/// Effective configuration for the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub godot: GodotConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub source_attribution: HashMap<String, ConfigSource>,
    /// Problems found during discovery that did not stop it.
    #[serde(skip)]
    pub(crate) warnings: Vec<String>,
}

/// `[godot]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GodotConfig {
    /// Explicit engine executable; highest-priority resolver candidate.
    pub path: Option<String>,
    /// When no candidate answers `--version`, fail with `ExecutableNotFound`
    /// instead of falling back to the platform default path.
    /// Candidates are validated the same way in both modes.
    pub strict_path_validation: Option<bool>,
    /// Append `--debug-godot` to operation invocations.
    pub debug_flag: Option<bool>,
    /// GDScript that performs headless operations.
    pub operations_script: Option<PathBuf>,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Project used by tools that accept an optional `projectPath`.
    pub default_project_path: Option<PathBuf>,
    pub operation_timeout_secs: Option<u64>,
    pub version_timeout_secs: Option<u64>,
    pub output_max_lines: Option<usize>,
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
}

/// Shape of a TOML config file. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub godot: GodotConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Built-in defaults with every key attributed to [`ConfigSource::Default`].
    #[must_use]
    pub fn defaults() -> Self {
        let mut source_attribution = HashMap::new();
        for key in [
            "strict_path_validation",
            "debug_flag",
            "operations_script",
            "operation_timeout_secs",
            "version_timeout_secs",
            "output_max_lines",
            "verbose",
        ] {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        Self {
            godot: GodotConfig {
                path: None,
                strict_path_validation: Some(false),
                debug_flag: Some(true),
                operations_script: None,
            },
            server: ServerConfig {
                default_project_path: None,
                operation_timeout_secs: Some(DEFAULT_OPERATION_TIMEOUT_SECS),
                version_timeout_secs: Some(DEFAULT_VERSION_TIMEOUT_SECS),
                output_max_lines: Some(DEFAULT_OUTPUT_MAX_LINES),
            },
            logging: LoggingConfig {
                verbose: Some(false),
            },
            source_attribution,
            warnings: Vec::new(),
        }
    }

    /// Discovery warnings, for the caller to report once logging is set up.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Start building a configuration in code.
    #[must_use]
    pub fn builder() -> super::ConfigBuilder {
        super::ConfigBuilder::new()
    }

    #[must_use]
    pub fn godot_path(&self) -> Option<&str> {
        self.godot.path.as_deref().filter(|p| !p.is_empty())
    }

    #[must_use]
    pub fn strict_path_validation(&self) -> bool {
        self.godot.strict_path_validation.unwrap_or(false)
    }

    #[must_use]
    pub fn debug_flag(&self) -> bool {
        self.godot.debug_flag.unwrap_or(true)
    }

    /// Operations script path. Falls back to `scripts/godot_operations.gd`
    /// next to the running executable.
    #[must_use]
    pub fn operations_script(&self) -> PathBuf {
        if let Some(path) = &self.godot.operations_script {
            return path.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_OPERATIONS_SCRIPT)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OPERATIONS_SCRIPT))
    }

    #[must_use]
    pub fn default_project_path(&self) -> Option<&PathBuf> {
        self.server.default_project_path.as_ref()
    }

    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(
            self.server
                .operation_timeout_secs
                .unwrap_or(DEFAULT_OPERATION_TIMEOUT_SECS),
        )
    }

    #[must_use]
    pub fn version_timeout(&self) -> Duration {
        Duration::from_secs(
            self.server
                .version_timeout_secs
                .unwrap_or(DEFAULT_VERSION_TIMEOUT_SECS),
        )
    }

    #[must_use]
    pub fn output_max_lines(&self) -> usize {
        self.server
            .output_max_lines
            .unwrap_or(DEFAULT_OUTPUT_MAX_LINES)
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.logging.verbose.unwrap_or(false)
    }

    /// Source of a key, if it has one.
    #[must_use]
    pub fn source_of(&self, key: &str) -> Option<ConfigSource> {
        self.source_attribution.get(key).copied()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}
