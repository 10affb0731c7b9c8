use std::path::PathBuf;

use gdbridge_utils::error::ConfigError;

use super::model::ConfigFile;
use super::{Config, ConfigSource};

/// Builds a [`Config`] in code without touching the filesystem or environment.
///
/// ```rust
/// use gdbridge_config::Config;
///
/// let config = Config::builder()
///     .godot_path("/opt/godot/godot")
///     .strict_path_validation(true)
///     .output_max_lines(500)
///     .build()
///     .unwrap();
/// assert_eq!(config.output_max_lines(), 500);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    layer: ConfigFile,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn godot_path(mut self, path: impl Into<String>) -> Self {
        self.layer.godot.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn strict_path_validation(mut self, strict: bool) -> Self {
        self.layer.godot.strict_path_validation = Some(strict);
        self
    }

    #[must_use]
    pub fn debug_flag(mut self, enabled: bool) -> Self {
        self.layer.godot.debug_flag = Some(enabled);
        self
    }

    #[must_use]
    pub fn operations_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.layer.godot.operations_script = Some(path.into());
        self
    }

    #[must_use]
    pub fn default_project_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.layer.server.default_project_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn operation_timeout_secs(mut self, secs: u64) -> Self {
        self.layer.server.operation_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn version_timeout_secs(mut self, secs: u64) -> Self {
        self.layer.server.version_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn output_max_lines(mut self, lines: usize) -> Self {
        self.layer.server.output_max_lines = Some(lines);
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.layer.logging.verbose = Some(verbose);
        self
    }

    /// Apply the values over the defaults and validate.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut config = Config::defaults();
        config.apply(self.layer, ConfigSource::Programmatic);
        config.validate()?;
        Ok(config)
    }
}
