//! JSON schemas for structured model output.
//!
//! Strict structured output wants every object closed
//! (`additionalProperties: false`), every property required and no `$ref`
//! indirection, so the `schemars` output is rewritten accordingly.

use schemars::{JsonSchema, schema_for};
use serde_json::{Map, Value};

/// A named JSON schema sent along with a structured completion
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredSchema {
    pub name: String,
    pub schema: Value,
}

impl StructuredSchema {
    /// Builds the strict schema for `T`
    pub fn for_type<T: JsonSchema>() -> Self {
        let mut value = serde_json::to_value(schema_for!(T)).unwrap_or_default();

        close_objects(&mut value);
        inline_refs(&mut value);

        if let Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        Self {
            name: T::schema_name(),
            schema: value,
        }
    }

    /// Pretty-printed schema, for embedding in prompts
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.schema).unwrap_or_default()
    }
}

fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("object") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));

                let keys = map
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| props.keys().cloned().map(Value::String).collect::<Vec<_>>());
                if let Some(keys) = keys {
                    map.insert("required".to_string(), Value::Array(keys));
                }
            }
            for (_, child) in map.iter_mut() {
                close_objects(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}

fn inline_refs(value: &mut Value) {
    let definitions = value
        .get("definitions")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    if !definitions.is_empty() {
        replace_refs(value, &definitions);
    }
}

fn replace_refs(value: &mut Value, definitions: &Map<String, Value>) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(mut resolved) = target {
                replace_refs(&mut resolved, definitions);
                *value = resolved;
                return;
            }

            for (key, child) in map.iter_mut() {
                if key != "definitions" {
                    replace_refs(child, definitions);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|v| replace_refs(v, definitions)),
        _ => {}
    }
}
