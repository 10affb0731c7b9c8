use std::path::PathBuf;

/// Configuration overrides supplied on the command line.
///
/// Every field is optional; `None` leaves lower-precedence sources in effect.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file; disables upward discovery.
    pub config_path: Option<PathBuf>,
    pub godot_path: Option<String>,
    pub strict_path_validation: Option<bool>,
    pub debug_flag: Option<bool>,
    pub operations_script: Option<PathBuf>,
    pub default_project_path: Option<PathBuf>,
    pub operation_timeout_secs: Option<u64>,
    pub output_max_lines: Option<usize>,
    pub verbose: Option<bool>,
}
