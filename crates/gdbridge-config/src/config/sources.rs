use std::collections::BTreeMap;

use super::{Config, ConfigSource};

impl Config {
    /// Effective values and their sources, keyed by name.
    ///
    /// Unset optional keys are omitted. Used by `gdbridge config`.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, ConfigSource)> {
        let mut out = BTreeMap::new();
        let source = |key: &str| self.source_of(key).unwrap_or(ConfigSource::Default);

        let mut put = |key: &str, value: String| {
            out.insert(key.to_string(), (value, source(key)));
        };

        if let Some(path) = self.godot_path() {
            put("godot_path", path.to_string());
        }
        put(
            "strict_path_validation",
            self.strict_path_validation().to_string(),
        );
        put("debug_flag", self.debug_flag().to_string());
        put(
            "operations_script",
            self.operations_script().display().to_string(),
        );
        if let Some(project) = self.default_project_path() {
            put("default_project_path", project.display().to_string());
        }
        put(
            "operation_timeout_secs",
            self.operation_timeout().as_secs().to_string(),
        );
        put(
            "version_timeout_secs",
            self.version_timeout().as_secs().to_string(),
        );
        put("output_max_lines", self.output_max_lines().to_string());
        put("verbose", self.verbose().to_string());

        out
    }
}
