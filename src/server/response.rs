//! Tool call results
//!
//! Every tool answers with `{content: [{type: "text", text}], isError?}`.
//! Failures carry the message as the first text item and, when there are
//! any, a second item listing possible solutions.

use serde_json::{Value, json};
use tracing::warn;

use gdbridge_utils::error::{GodotError, RequestError, RunnerError};
use gdbridge_utils::{BridgeError, UserFriendlyError};

/// Suggestions attached to failures while running the engine.
pub const EXECUTION_SUGGESTIONS: &[&str] = &[
    "Ensure Godot is installed correctly",
    "Check if the GODOT_PATH environment variable is set correctly",
    "Verify the project path is accessible",
];

/// Suggestions attached to engine failures in scene-builder tools.
pub const SCENE_BUILDER_EXECUTION_SUGGESTIONS: &[&str] = &[
    "Ensure Godot is installed correctly",
    "Verify the project path is accessible",
];

/// Result of a tool handler before rendering.
pub type ToolResult = Result<ToolResponse, ToolFailure>;

/// A successful tool result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResponse {
    texts: Vec<String>,
    is_error: bool,
}

impl ToolResponse {
    /// Single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            texts: vec![text.into()],
            is_error: false,
        }
    }

    /// Pretty-printed JSON as a single text item.
    pub fn json(value: &Value) -> Self {
        Self::text(pretty(value))
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    #[must_use]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Render as the `result` of a `tools/call` response.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let content: Vec<Value> = self
            .texts
            .iter()
            .map(|text| json!({"type": "text", "text": text}))
            .collect();

        if self.is_error {
            json!({"content": content, "isError": true})
        } else {
            json!({"content": content})
        }
    }
}

/// A failed tool call: a message plus possible solutions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    pub message: String,
    pub suggestions: Vec<String>,
}

impl ToolFailure {
    pub fn new(message: impl Into<String>, suggestions: &[&str]) -> Self {
        Self {
            message: message.into(),
            suggestions: suggestions.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// `"<action>: <error>"` with fixed suggestions, for errors raised while
    /// the engine was being run.
    pub fn wrap(action: &str, error: &impl UserFriendlyError, suggestions: &[&str]) -> Self {
        Self::new(format!("{action}: {}", error.user_message()), suggestions)
    }

    /// `"<action>: <stderr>"`, for failures the operations script reported.
    pub fn reported(action: &str, stderr: &str, suggestions: &[&str]) -> Self {
        Self::new(format!("{action}: {stderr}"), suggestions)
    }
}

impl From<BridgeError> for ToolFailure {
    fn from(error: BridgeError) -> Self {
        Self {
            message: error.user_message(),
            suggestions: error.suggestions(),
        }
    }
}

impl From<RequestError> for ToolFailure {
    fn from(error: RequestError) -> Self {
        BridgeError::from(error).into()
    }
}

impl From<GodotError> for ToolFailure {
    fn from(error: GodotError) -> Self {
        BridgeError::from(error).into()
    }
}

impl From<RunnerError> for ToolFailure {
    fn from(error: RunnerError) -> Self {
        BridgeError::from(error).into()
    }
}

impl From<ToolFailure> for ToolResponse {
    fn from(failure: ToolFailure) -> Self {
        if failure.suggestions.is_empty() {
            warn!(message = %failure.message, "tool call failed");
        } else {
            warn!(
                message = %failure.message,
                suggestions = %failure.suggestions.join(", "),
                "tool call failed"
            );
        }

        let mut texts = vec![failure.message];
        if !failure.suggestions.is_empty() {
            let list: Vec<String> = failure
                .suggestions
                .iter()
                .map(|s| format!("- {s}"))
                .collect();
            texts.push(format!("Possible solutions:\n{}", list.join("\n")));
        }

        Self {
            texts,
            is_error: true,
        }
    }
}

/// Two-space indented JSON.
pub(crate) fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
