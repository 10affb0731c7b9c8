use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use gdbridge_utils::error::ConfigError;
use gdbridge_utils::paths::is_godot_project;

use super::model::ConfigFile;
use super::{CliArgs, Config, ConfigSource};

/// Directory searched for in the working directory and its ancestors.
pub const CONFIG_DIR_NAME: &str = ".gdbridge";

/// File name inside [`CONFIG_DIR_NAME`] or [`HOME_ENV`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Overrides the fallback config directory.
pub const HOME_ENV: &str = "GDBRIDGE_HOME";

const PROJECT_PATH_ENV: &str = "GODOT_PROJECT_PATH";
const DEBUG_ENV: &str = "DEBUG";

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Uses the current working directory for config file discovery and the
    /// process environment for env overrides.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args, |key| std::env::var(key).ok())
    }

    /// Discover starting from `start_dir`, reading env values through `env`.
    ///
    /// Tests use this to avoid process-global state.
    pub fn discover_from<F>(start_dir: &Path, cli_args: &CliArgs, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::defaults();

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.is_file() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    }
                    .into());
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir, env(HOME_ENV).as_deref())?,
        };

        if let Some(path) = &config_path {
            let file = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config file");
            config.apply(file, ConfigSource::Config);
        }

        let env_values = env_layer(&env, &mut config.warnings);
        config.apply(env_values, ConfigSource::Env);
        config.apply(cli_layer(cli_args), ConfigSource::Cli);

        config.validate()?;
        Ok(config)
    }

    /// Find the config file to load, if any.
    ///
    /// Searches `.gdbridge/config.toml` upward from `start_dir`, stopping at a
    /// repository root (`.git`, `.hg`, `.svn`). Falls back to
    /// `$GDBRIDGE_HOME/config.toml`, then the platform config directory.
    pub fn discover_config_file_from(
        start_dir: &Path,
        home_override: Option<&str>,
    ) -> Result<Option<PathBuf>> {
        let mut current_dir = Some(start_dir);

        while let Some(dir) = current_dir {
            let config_path = dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Ok(Some(config_path));
            }

            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists()
            {
                break;
            }

            current_dir = dir.parent();
        }

        let home = match home_override.filter(|h| !h.is_empty()) {
            Some(home) => Some(PathBuf::from(home)),
            None => dirs::config_dir().map(|dir| dir.join("gdbridge")),
        };

        Ok(home
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file()))
    }

    fn load_config_file(path: &Path) -> Result<ConfigFile> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                anyhow::Error::from(ConfigError::InvalidFile(format!(
                    "{}: {}",
                    path.display(),
                    e.message()
                )))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )),
        }
    }

    /// Overlay every value present in `layer`, recording `source` for each.
    pub(crate) fn apply(&mut self, layer: ConfigFile, source: ConfigSource) {
        let ConfigFile {
            godot,
            server,
            logging,
        } = layer;
        let attribution = &mut self.source_attribution;
        let mut set = |key: &str| {
            attribution.insert(key.to_string(), source);
        };

        overlay(&mut self.godot.path, godot.path, "godot_path", &mut set);
        overlay(
            &mut self.godot.strict_path_validation,
            godot.strict_path_validation,
            "strict_path_validation",
            &mut set,
        );
        overlay(&mut self.godot.debug_flag, godot.debug_flag, "debug_flag", &mut set);
        overlay(
            &mut self.godot.operations_script,
            godot.operations_script,
            "operations_script",
            &mut set,
        );
        overlay(
            &mut self.server.default_project_path,
            server.default_project_path,
            "default_project_path",
            &mut set,
        );
        overlay(
            &mut self.server.operation_timeout_secs,
            server.operation_timeout_secs,
            "operation_timeout_secs",
            &mut set,
        );
        overlay(
            &mut self.server.version_timeout_secs,
            server.version_timeout_secs,
            "version_timeout_secs",
            &mut set,
        );
        overlay(
            &mut self.server.output_max_lines,
            server.output_max_lines,
            "output_max_lines",
            &mut set,
        );
        overlay(&mut self.logging.verbose, logging.verbose, "verbose", &mut set);
    }
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>, key: &str, set: &mut impl FnMut(&str)) {
    if value.is_some() {
        *slot = value;
        set(key);
    }
}

/// Values taken from the process environment.
///
/// `GODOT_PROJECT_PATH` is only accepted when it points at a Godot project;
/// otherwise a warning is recorded and the value ignored.
fn env_layer(env: &impl Fn(&str) -> Option<String>, warnings: &mut Vec<String>) -> ConfigFile {
    let mut layer = ConfigFile::default();

    if let Some(project) = env(PROJECT_PATH_ENV).filter(|p| !p.is_empty()) {
        if is_godot_project(&project) {
            layer.server.default_project_path = Some(PathBuf::from(project));
        } else {
            warnings.push(format!(
                "{PROJECT_PATH_ENV} ({project}) does not contain a project.godot file; ignoring it"
            ));
        }
    }

    if env(DEBUG_ENV).as_deref() == Some("true") {
        layer.logging.verbose = Some(true);
    }

    layer
}

fn cli_layer(cli: &CliArgs) -> ConfigFile {
    let mut layer = ConfigFile::default();
    layer.godot.path = cli.godot_path.clone();
    layer.godot.strict_path_validation = cli.strict_path_validation;
    layer.godot.debug_flag = cli.debug_flag;
    layer.godot.operations_script = cli.operations_script.clone();
    layer.server.default_project_path = cli.default_project_path.clone();
    layer.server.operation_timeout_secs = cli.operation_timeout_secs;
    layer.server.output_max_lines = cli.output_max_lines;
    layer.logging.verbose = cli.verbose;
    layer
}
