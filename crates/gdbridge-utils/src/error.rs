use std::fmt;
use thiserror::Error;

pub use gdbridge_runner::RunnerError;

/// Library-level error type with user-facing context and suggestions.
///
/// Every failure a tool call or CLI command can hit is one of these. The tool
/// server renders them as an error response (message plus a "Possible
/// solutions" block); the CLI renders them with [`display_for_user`](Self::display_for_user)
/// and exits with [`to_exit_code`](Self::to_exit_code).
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration errors and invalid requests |
/// | 10 | Engine invocation timed out |
/// | 69 | No usable Godot executable |
/// | 70 | Engine process failed to run |
/// | 1 | Other errors |
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Godot error: {0}")]
    Godot(#[from] GodotError),

    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Message, context and suggestions for an error a user can act on.
///
/// Tool responses render `suggestions` as "Possible solutions"; the CLI
/// renders them under "Suggestions".
pub trait UserFriendlyError {
    /// One-line message without internal detail.
    fn user_message(&self) -> String;

    /// Extra detail, such as the paths that were searched.
    fn context(&self) -> Option<String>;

    /// Steps the user can take, most likely first.
    fn suggestions(&self) -> Vec<String>;

    /// Kind of failure.
    fn category(&self) -> ErrorCategory;
}

/// Broad error kinds, shown as a heading in user-facing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    GodotIntegration,
    ProcessExecution,
    FileSystem,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Validation => write!(f, "Validation"),
            Self::GodotIntegration => write!(f, "Godot Integration"),
            Self::ProcessExecution => write!(f, "Process Execution"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

/// Bad or missing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files are TOML with optional [godot], [server], and [logging] sections."
                    .to_string(),
            ),
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' configuration option has specific format requirements."
            )),
            Self::NotFound { .. } => Some(
                "gdbridge searches for .gdbridge/config.toml starting from the current directory upward."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax using a TOML validator".to_string(),
                "Run 'gdbridge config' to see the effective configuration".to_string(),
            ],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "operation_timeout_secs" | "version_timeout_secs" => {
                    vec!["Use a whole number of seconds greater than zero".to_string()]
                }
                "output_max_lines" => {
                    vec!["Use a line count greater than zero (default: 10000)".to_string()]
                }
                _ => vec!["Check the documentation for valid values".to_string()],
            },
            Self::NotFound { .. } => vec![
                "Check the path passed to --config".to_string(),
                "Omit --config to use discovery".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Failures locating or talking to the Godot executable
#[derive(Error, Debug)]
pub enum GodotError {
    #[error("Could not find a valid Godot executable path")]
    ExecutableNotFound { searched: Vec<String> },

    #[error("Failed to get Godot version from {path}: {reason}")]
    VersionProbeFailed { path: String, reason: String },

    #[error("{feature} are only supported in Godot {required} or later. Current version: {current}")]
    UnsupportedVersion {
        feature: &'static str,
        required: &'static str,
        current: String,
    },

    #[error("Operation parameters must be a JSON object")]
    ParamsNotObject,

    #[error("Failed to encode operation parameters: {0}")]
    ParamEncoding(#[from] serde_json::Error),
}

impl UserFriendlyError for GodotError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::ExecutableNotFound { searched } if !searched.is_empty() => {
                Some(format!("Searched: {}", searched.join(", ")))
            }
            Self::UnsupportedVersion { .. } => Some(
                "The operation relies on engine features introduced in a later Godot release."
                    .to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ExecutableNotFound { .. } => vec![
                "Ensure Godot is installed correctly".to_string(),
                "Set GODOT_PATH environment variable to specify the correct path".to_string(),
            ],
            Self::VersionProbeFailed { .. } => vec![
                "Ensure Godot is installed correctly".to_string(),
                "Check if the GODOT_PATH environment variable is set correctly".to_string(),
            ],
            Self::UnsupportedVersion {
                feature, required, ..
            } => vec![
                format!("Upgrade to Godot {required} or later to use {feature}"),
                format!("Use resource paths instead of {feature} for this version of Godot"),
            ],
            Self::ParamsNotObject | Self::ParamEncoding(_) => {
                vec!["Pass tool arguments as a JSON object".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::ParamsNotObject | Self::ParamEncoding(_) => ErrorCategory::Validation,
            _ => ErrorCategory::GodotIntegration,
        }
    }
}

/// Kinds of project files a request may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Scene,
    TargetScene,
    Texture,
    File,
    Directory,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scene => write!(f, "Scene file"),
            Self::TargetScene => write!(f, "Target scene"),
            Self::Texture => write!(f, "Texture file"),
            Self::File => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
        }
    }
}

/// A tool request that cannot be served as given
#[derive(Error, Debug)]
pub enum RequestError {
    /// One or more required arguments are absent; `hint` names them.
    #[error("{message}")]
    Missing { message: String, hint: String },

    /// A path argument contains a parent-directory sequence.
    #[error("{label}")]
    UnsafePath { label: String },

    #[error("Not a valid Godot project: {path}")]
    NotAProject { path: String },

    #[error("{kind} does not exist: {path}")]
    MissingFile { kind: FileKind, path: String },

    #[error("{message}")]
    InvalidArgument { message: String, hint: String },
}

impl RequestError {
    pub fn missing(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Missing {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn unsafe_path(label: impl Into<String>) -> Self {
        Self::UnsafePath {
            label: label.into(),
        }
    }
}

impl UserFriendlyError for RequestError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        None
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Missing { hint, .. } | Self::InvalidArgument { hint, .. } => vec![hint.clone()],
            Self::UnsafePath { .. } => vec![
                "Provide a valid path without \"..\" or other potentially unsafe characters"
                    .to_string(),
            ],
            Self::NotAProject { .. } => vec![
                "Ensure the path points to a directory containing a project.godot file"
                    .to_string(),
                "Use list_projects to find valid Godot projects".to_string(),
            ],
            Self::MissingFile { kind, .. } => match kind {
                FileKind::Scene | FileKind::TargetScene => vec![
                    "Ensure the scene path is correct".to_string(),
                    "Use create_scene to create a new scene first".to_string(),
                ],
                FileKind::Texture => vec![
                    "Ensure the texture path is correct".to_string(),
                    "Upload or create the texture file first".to_string(),
                ],
                FileKind::File => vec!["Ensure the file path is correct".to_string()],
                FileKind::Directory => {
                    vec!["Provide a valid directory path that exists on the system".to_string()]
                }
            },
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingFile { .. } | Self::NotAProject { .. } => ErrorCategory::FileSystem,
            _ => ErrorCategory::Validation,
        }
    }
}

impl UserFriendlyError for RunnerError {
    fn user_message(&self) -> String {
        match self {
            Self::NoActiveProcess => "No active Godot process.".to_string(),
            other => other.to_string(),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Timeout { .. } => Some(
                "One-shot engine invocations are killed when they exceed the operation timeout."
                    .to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SpawnFailed { .. } | Self::WaitFailed { .. } | Self::PipeUnavailable { .. } => {
                vec![
                    "Ensure Godot is installed correctly".to_string(),
                    "Check if the GODOT_PATH environment variable is set correctly".to_string(),
                    "Verify the project path is accessible".to_string(),
                ]
            }
            Self::Timeout { .. } => vec![
                "Increase server.operation_timeout_secs in .gdbridge/config.toml".to_string(),
                "Check whether the project opens cleanly in the editor".to_string(),
            ],
            Self::NoActiveProcess => vec![
                "Use run_project to start a Godot project first".to_string(),
                "Check if the Godot process crashed unexpectedly".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::ProcessExecution
    }
}

impl UserFriendlyError for BridgeError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.user_message(),
            Self::Godot(e) => e.user_message(),
            Self::Request(e) => e.user_message(),
            Self::Runner(e) => e.user_message(),
            Self::Io(e) => format!("File system error: {e}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(e) => e.context(),
            Self::Godot(e) => e.context(),
            Self::Request(e) => e.context(),
            Self::Runner(e) => e.context(),
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Godot(e) => e.suggestions(),
            Self::Request(e) => e.suggestions(),
            Self::Runner(e) => e.suggestions(),
            Self::Io(_) => vec!["Check file permissions and that the path exists".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(e) => e.category(),
            Self::Godot(e) => e.category(),
            Self::Request(e) => e.category(),
            Self::Runner(e) => e.category(),
            Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

impl BridgeError {
    /// Multi-line rendering for stderr.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Map this error to the CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            Self::Config(_) | Self::Request(_) => ExitCode::CLI_ARGS,
            Self::Godot(GodotError::ExecutableNotFound { .. }) => ExitCode::GODOT_NOT_FOUND,
            Self::Godot(_) => ExitCode::GODOT_FAILURE,
            Self::Runner(RunnerError::Timeout { .. }) => ExitCode::TIMEOUT,
            Self::Runner(_) => ExitCode::GODOT_FAILURE,
            Self::Io(_) => ExitCode::INTERNAL,
        }
    }
}
