//! Round-trip properties of ParameterCodec

use proptest::prelude::*;
use serde_json::{Map, Value};

use gdbridge_godot::ParameterCodec;

const PUBLIC_KEYS: &[&str] = &[
    "projectPath",
    "scenePath",
    "rootNodeType",
    "parentNodePath",
    "nodeType",
    "nodeName",
    "texturePath",
    "nodePath",
    "outputPath",
    "meshItemNames",
    "newPath",
    "filePath",
    "directory",
    "recursive",
    "scene",
    "collectionName",
    "itemName",
    "rootDir",
    "targetScene",
    "parentPath",
    "instanceName",
    "applyRandomTransform",
    "useRandomVerticalOffset",
    "useRandomRotation",
    "useRandomScale",
    "randomOffsetYMin",
    "randomOffsetYMax",
    "randomRotX",
    "randomRotY",
    "randomRotZ",
    "randomScaleMin",
    "randomScaleMax",
    "placements",
];

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        ".{0,12}".prop_map(Value::String),
    ]
}

/// Objects keyed only by table entries, nested to any depth.
fn arb_tabled_object() -> impl Strategy<Value = Value> {
    let key = proptest::sample::select(PUBLIC_KEYS);
    arb_leaf().prop_recursive(4, 32, 6, move |inner| {
        let child = prop_oneof![
            inner.clone(),
            prop::collection::vec(inner, 0..3).prop_map(Value::Array),
        ];
        prop::collection::vec((key.clone(), child), 0..6).prop_map(|entries| {
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect::<Map<_, _>>(),
            )
        })
    })
}

proptest! {
    #[test]
    fn public_internal_public_is_identity(value in arb_tabled_object()) {
        let internal = ParameterCodec::to_internal(&value);
        prop_assert_eq!(ParameterCodec::to_public(&internal), value);
    }

    #[test]
    fn lowercase_words_round_trip_through_fallback(
        words in prop::collection::vec("[a-z]{1,6}", 1..4)
    ) {
        let snake = words.join("_");
        let public = ParameterCodec::to_public(&serde_json::json!({ snake.clone(): 1 }));
        let back = ParameterCodec::to_internal(&public);
        prop_assert_eq!(back, serde_json::json!({ snake: 1 }));
    }
}
