//! Schema-driven argument checking for tools.
//!
//! Every tool declares a JSON-schema-shaped parameter contract; dispatch
//! runs the arguments through this checker before execution, uniformly for
//! every tool. The checker covers the subset of JSON Schema the built-in
//! tools declare: `required` fields, primitive `type` tags, and `enum`
//! value lists.

use serde_json::Value;

use crate::error::ToolError;

/// Validate `arguments` against a tool's parameter schema.
///
/// Unknown fields are accepted; only declared constraints are enforced.
pub fn validate_arguments(schema: &Value, arguments: &Value) -> Result<(), ToolError> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        // No declared contract, nothing to check.
        return Ok(());
    };

    let args = arguments.as_object().ok_or_else(|| {
        ToolError::InvalidParameters("arguments must be a JSON object".into())
    })?;

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !args.contains_key(field) {
                return Err(ToolError::InvalidParameters(format!(
                    "missing required field '{field}'"
                )));
            }
        }
    }

    for (name, value) in args {
        let Some(property) = properties.get(name) else {
            continue;
        };

        if let Some(expected) = property.get("type").and_then(Value::as_str) {
            if !type_matches(expected, value) {
                return Err(ToolError::InvalidParameters(format!(
                    "field '{name}' must be of type {expected}"
                )));
            }
        }

        if let Some(allowed) = property.get("enum").and_then(Value::as_array) {
            if !allowed.contains(value) {
                return Err(ToolError::InvalidParameters(format!(
                    "field '{name}' must be one of {}",
                    serde_json::to_string(allowed).unwrap_or_default()
                )));
            }
        }
    }

    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        // Unknown type tags are not enforced.
        _ => true,
    }
}
