//! Parameter name normalization
//!
//! Requests use camelCase keys; the operations script expects snake_case.
//! A fixed table covers every known key. Unknown keys go through a
//! mechanical transform, which does not always round-trip.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Internal (snake_case) and public (camelCase) names for known keys.
const MAPPINGS: &[(&str, &str)] = &[
    ("project_path", "projectPath"),
    ("scene_path", "scenePath"),
    ("root_node_type", "rootNodeType"),
    ("parent_node_path", "parentNodePath"),
    ("node_type", "nodeType"),
    ("node_name", "nodeName"),
    ("texture_path", "texturePath"),
    ("node_path", "nodePath"),
    ("output_path", "outputPath"),
    ("mesh_item_names", "meshItemNames"),
    ("new_path", "newPath"),
    ("file_path", "filePath"),
    ("directory", "directory"),
    ("recursive", "recursive"),
    ("scene", "scene"),
    ("collection_name", "collectionName"),
    ("item_name", "itemName"),
    ("root_dir", "rootDir"),
    ("target_scene", "targetScene"),
    ("parent_path", "parentPath"),
    ("instance_name", "instanceName"),
    ("apply_random_transform", "applyRandomTransform"),
    ("use_random_vertical_offset", "useRandomVerticalOffset"),
    ("use_random_rotation", "useRandomRotation"),
    ("use_random_scale", "useRandomScale"),
    ("random_offset_y_min", "randomOffsetYMin"),
    ("random_offset_y_max", "randomOffsetYMax"),
    ("random_rot_x", "randomRotX"),
    ("random_rot_y", "randomRotY"),
    ("random_rot_z", "randomRotZ"),
    ("random_scale_min", "randomScaleMin"),
    ("random_scale_max", "randomScaleMax"),
    ("placements", "placements"),
];

static TO_PUBLIC: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| MAPPINGS.iter().copied().collect());

static TO_INTERNAL: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| MAPPINGS.iter().map(|&(internal, public)| (public, internal)).collect());

/// Converts request payloads between the public and internal key conventions.
///
/// Both directions recurse into nested objects but not into arrays, and
/// return non-object input unchanged.
///
/// ```rust
/// use gdbridge_godot::ParameterCodec;
/// use serde_json::json;
///
/// let internal = ParameterCodec::to_internal(&json!({"projectPath": "/g", "nodeName": "Player"}));
/// assert_eq!(internal, json!({"project_path": "/g", "node_name": "Player"}));
/// ```
pub struct ParameterCodec;

impl ParameterCodec {
    /// camelCase keys to snake_case.
    #[must_use]
    pub fn to_internal(value: &Value) -> Value {
        convert(value, &TO_INTERNAL, camel_to_snake)
    }

    /// snake_case keys to camelCase.
    #[must_use]
    pub fn to_public(value: &Value) -> Value {
        convert(value, &TO_PUBLIC, snake_to_camel)
    }
}

fn convert(
    value: &Value,
    table: &HashMap<&'static str, &'static str>,
    fallback: fn(&str) -> String,
) -> Value {
    let Value::Object(map) = value else {
        return value.clone();
    };

    let converted: Map<String, Value> = map
        .iter()
        .map(|(key, inner)| {
            let key = table
                .get(key.as_str())
                .map_or_else(|| fallback(key), |mapped| (*mapped).to_string());
            let inner = match inner {
                Value::Object(_) => convert(inner, table, fallback),
                other => other.clone(),
            };
            (key, inner)
        })
        .collect();

    Value::Object(converted)
}

/// Insert `_` before each ASCII uppercase letter and lowercase it.
#[must_use]
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Drop each `_` that precedes an ASCII lowercase letter and uppercase the letter.
#[must_use]
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(ch) = chars.next() {
        match (ch, chars.peek()) {
            ('_', Some(next)) if next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_entries_both_ways() {
        for &(internal, public) in MAPPINGS {
            let as_internal = ParameterCodec::to_internal(&json!({ public: 1 }));
            assert_eq!(as_internal, json!({ internal: 1 }), "{public}");
            let as_public = ParameterCodec::to_public(&json!({ internal: 1 }));
            assert_eq!(as_public, json!({ public: 1 }), "{internal}");
        }
    }

    #[test]
    fn test_table_agrees_with_mechanical_transform() {
        for &(internal, public) in MAPPINGS {
            assert_eq!(camel_to_snake(public), internal);
            assert_eq!(snake_to_camel(internal), public);
        }
    }

    #[test]
    fn test_mechanical_fallback() {
        assert_eq!(camel_to_snake("someNewKey"), "some_new_key");
        assert_eq!(camel_to_snake("HTTPPort"), "_h_t_t_p_port");
        assert_eq!(snake_to_camel("some_new_key"), "someNewKey");
        assert_eq!(snake_to_camel("trailing_"), "trailing_");
        assert_eq!(snake_to_camel("digit_1"), "digit_1");
        assert_eq!(snake_to_camel("double__under"), "double_Under");
    }

    #[test]
    fn test_nested_objects_recurse_arrays_do_not() {
        let input = json!({
            "properties": {"nodeName": "A", "innerThing": {"deepKey": true}},
            "placements": [{"itemName": "tree"}]
        });
        let output = ParameterCodec::to_internal(&input);
        assert_eq!(
            output,
            json!({
                "properties": {"node_name": "A", "inner_thing": {"deep_key": true}},
                "placements": [{"itemName": "tree"}]
            })
        );
    }

    #[test]
    fn test_non_objects_unchanged_both_ways() {
        for value in [json!(null), json!(3), json!("projectPath"), json!([{"nodeName": 1}])] {
            assert_eq!(ParameterCodec::to_internal(&value), value);
            assert_eq!(ParameterCodec::to_public(&value), value);
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let input = json!({"scenePath": "a.tscn"});
        let before = input.clone();
        let _ = ParameterCodec::to_internal(&input);
        assert_eq!(input, before);
    }
}
