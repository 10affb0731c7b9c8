use gdbridge_utils::error::ConfigError;

use super::Config;

impl Config {
    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.godot.path
            && path.trim().is_empty()
        {
            return Err(invalid("godot.path", "empty string"));
        }

        for (key, value) in [
            ("server.operation_timeout_secs", self.server.operation_timeout_secs),
            ("server.version_timeout_secs", self.server.version_timeout_secs),
        ] {
            if value == Some(0) {
                return Err(invalid(key, "0 (must be at least 1 second)"));
            }
        }

        if self.server.output_max_lines == Some(0) {
            return Err(invalid("server.output_max_lines", "0 (must be at least 1)"));
        }

        if let Some(script) = &self.godot.operations_script
            && script.as_os_str().is_empty()
        {
            return Err(invalid("godot.operations_script", "empty path"));
        }

        Ok(())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
