//! Canonical cache keys for tool invocations.
//!
//! Two calls collide on the same key iff they name the same tool and their
//! parameters are equal as JSON values, regardless of key insertion order.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt::Write;

use stepweave_core::Parameters;

/// Compute the cache key for `tool_name` called with `parameters`.
///
/// The key is the hex SHA-256 digest of `"<tool>:<canonical json>"`, where
/// object keys are sorted at every nesting level.
pub fn canonical_key(tool_name: &str, parameters: &Parameters) -> String {
    let mut material = String::with_capacity(tool_name.len() + 64);
    material.push_str(tool_name);
    material.push(':');
    write_canonical_object(&mut material, parameters);

    let digest = Sha256::digest(material.as_bytes());
    format!("{digest:x}")
}

/// Serialize `value` with sorted object keys.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(&mut out, value);
    out
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => write_canonical_object(out, map),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        // Scalars already have a single JSON spelling.
        scalar => {
            let _ = write!(out, "{scalar}");
        }
    }
}

fn write_canonical_object(out: &mut String, map: &serde_json::Map<String, Value>) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    out.push('{');
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", Value::String(key.clone()));
        out.push(':');
        write_canonical(out, &map[key]);
    }
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn params(value: Value) -> Parameters {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn key_is_stable_hex_digest() {
        let key = canonical_key("get_weather", &params(json!({"city": "Paris"})));
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(
            key,
            canonical_key("get_weather", &params(json!({"city": "Paris"})))
        );
    }

    #[test]
    fn parameter_order_does_not_matter() {
        let mut forward = Parameters::new();
        forward.insert("city".into(), json!("Paris"));
        forward.insert("units".into(), json!("metric"));

        let mut reverse = Parameters::new();
        reverse.insert("units".into(), json!("metric"));
        reverse.insert("city".into(), json!("Paris"));

        assert_eq!(
            canonical_key("get_weather", &forward),
            canonical_key("get_weather", &reverse)
        );
    }

    #[test]
    fn tool_name_and_values_separate_keys() {
        let p = params(json!({"q": "tokio"}));
        assert_ne!(canonical_key("github_search", &p), canonical_key("news", &p));
        assert_ne!(
            canonical_key("github_search", &p),
            canonical_key("github_search", &params(json!({"q": "serde"})))
        );
    }

    #[test]
    fn nested_objects_are_sorted() {
        assert_eq!(
            canonical_json(&json!({"b": {"y": 1, "x": [2, {"d": 4, "c": 3}]}, "a": null})),
            r#"{"a":null,"b":{"x":[2,{"c":3,"d":4}],"y":1}}"#
        );
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(
            canonical_json(&json!({"q\"": "line\nbreak"})),
            r#"{"q\"":"line\nbreak"}"#
        );
    }

    proptest! {
        #[test]
        fn prop_insertion_order_is_irrelevant(
            pairs in prop::collection::btree_map("[a-z]{1,8}", 0i64..1000, 0..8)
        ) {
            let mut forward = Parameters::new();
            for (k, v) in &pairs {
                forward.insert(k.clone(), json!(v));
            }
            let mut reverse = Parameters::new();
            for (k, v) in pairs.iter().rev() {
                reverse.insert(k.clone(), json!(v));
            }
            prop_assert_eq!(canonical_key("tool", &forward), canonical_key("tool", &reverse));
        }
    }
}
