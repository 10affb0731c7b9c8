//! Access to `tools/call` arguments

use serde_json::{Map, Value};

use gdbridge_godot::ParameterCodec;

/// Tool arguments with keys in the public (camelCase) convention.
///
/// Callers may send snake_case keys; they are normalized on the way in.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    map: Map<String, Value>,
}

impl ToolArgs {
    /// Normalize raw `arguments`. Anything but an object yields no arguments.
    #[must_use]
    pub fn normalize(raw: &Value) -> Self {
        match ParameterCodec::to_public(raw) {
            Value::Object(map) => Self { map },
            _ => Self::default(),
        }
    }

    /// A non-empty string argument.
    #[must_use]
    pub fn str(&self, key: &str) -> Option<&str> {
        self.map
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// `true` only for a literal boolean `true`.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.map.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// The argument if the key is present at all, `null` included.
    #[must_use]
    pub fn present(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// The argument unless it is absent, `null`, `false`, zero, or an empty string.
    #[must_use]
    pub fn truthy(&self, key: &str) -> Option<&Value> {
        self.map.get(key).filter(|value| match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        })
    }
}

/// Builds the camelCase parameter object sent to an operation.
#[derive(Debug, Default)]
pub struct Params(Map<String, Value>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Copy `key` from `args` when present.
    #[must_use]
    pub fn copy_present(mut self, args: &ToolArgs, key: &str) -> Self {
        if let Some(value) = args.present(key) {
            self.0.insert(key.to_string(), value.clone());
        }
        self
    }

    /// Copy `key` from `args` when truthy.
    #[must_use]
    pub fn copy_truthy(mut self, args: &ToolArgs, key: &str) -> Self {
        if let Some(value) = args.truthy(key) {
            self.0.insert(key.to_string(), value.clone());
        }
        self
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snake_case_input_is_normalized() {
        let args = ToolArgs::normalize(&json!({"project_path": "/g", "scenePath": "a.tscn"}));
        assert_eq!(args.str("projectPath"), Some("/g"));
        assert_eq!(args.str("scenePath"), Some("a.tscn"));
    }

    #[test]
    fn test_empty_and_non_string_values_are_missing() {
        let args = ToolArgs::normalize(&json!({"projectPath": "", "scenePath": 3}));
        assert_eq!(args.str("projectPath"), None);
        assert_eq!(args.str("scenePath"), None);
    }

    #[test]
    fn test_non_object_arguments() {
        let args = ToolArgs::normalize(&json!("oops"));
        assert_eq!(args.present("projectPath"), None);
        let args = ToolArgs::normalize(&Value::Null);
        assert!(!args.flag("recursive"));
    }

    #[test]
    fn test_truthiness() {
        let args = ToolArgs::normalize(&json!({
            "zero": 0, "one": 1.5, "no": false, "null": null, "empty": "",
            "obj": {}, "list": []
        }));
        for key in ["zero", "no", "null", "empty", "absent"] {
            assert!(args.truthy(key).is_none(), "{key}");
        }
        for key in ["one", "obj", "list"] {
            assert!(args.truthy(key).is_some(), "{key}");
        }
        assert!(args.present("null").is_some());
    }

    #[test]
    fn test_params_builder() {
        let args = ToolArgs::normalize(&json!({
            "itemName": "",
            "useRandomScale": false,
            "rootDir": "res://x",
        }));
        let params = Params::new()
            .with("collectionName", "trees")
            .copy_truthy(&args, "itemName")
            .copy_present(&args, "useRandomScale")
            .copy_truthy(&args, "rootDir")
            .into_value();
        assert_eq!(
            params,
            json!({"collectionName": "trees", "useRandomScale": false, "rootDir": "res://x"})
        );
    }
}
