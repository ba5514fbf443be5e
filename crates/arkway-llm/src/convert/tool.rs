//! Conversion of function declarations into Responses API tools

use std::collections::HashSet;

use serde_json::{Map, Value, json};

use crate::protocol::responses::FunctionTool;
use crate::types::FunctionDeclaration;

impl From<&FunctionDeclaration> for FunctionTool {
    fn from(decl: &FunctionDeclaration) -> Self {
        Self {
            tool_type: "function".to_owned(),
            name: decl.name.clone(),
            description: decl.description.clone(),
            parameters: declaration_parameters(decl),
        }
    }
}

/// Parameter schema for a declaration
///
/// A typed schema with properties wins over the raw JSON Schema; with
/// neither the function takes an empty object.
fn declaration_parameters(decl: &FunctionDeclaration) -> Value {
    if let Some(schema) = &decl.parameters
        && let Some(properties) = &schema.properties
    {
        let properties: Map<String, Value> = properties
            .iter()
            .map(|(name, prop)| {
                let value = serde_json::to_value(prop).unwrap_or_else(|_| json!({}));
                (name.clone(), normalize_schema(&value))
            })
            .collect();
        let mut parameters = json!({
            "type": "object",
            "properties": properties,
        });

        if let Some(required) = schema.required.as_ref().filter(|r| !r.is_empty()) {
            parameters["required"] = json!(required);
        }

        return parameters;
    }

    decl.parameters_json_schema
        .clone()
        .unwrap_or_else(|| json!({"type": "object", "properties": {}}))
}

/// Convert one declaration into a function tool
pub fn declaration_to_tool(decl: &FunctionDeclaration) -> FunctionTool {
    FunctionTool::from(decl)
}

/// Convert declarations, dropping later duplicates of a name
///
/// Returns `None` when there is nothing to send.
pub fn declarations_to_tools(decls: &[FunctionDeclaration]) -> Option<Vec<FunctionTool>> {
    let mut seen = HashSet::new();
    let tools: Vec<FunctionTool> = decls
        .iter()
        .filter(|decl| {
            let fresh = seen.insert(decl.name.as_str());
            if !fresh {
                tracing::warn!(function = %decl.name, "dropping duplicate function declaration");
            }
            fresh
        })
        .map(FunctionTool::from)
        .collect();

    (!tools.is_empty()).then_some(tools)
}

/// Normalize a serialized schema tree to JSON Schema conventions
///
/// Type tags are lower-cased and null entries removed from enum lists,
/// recursively through `properties`, `items` and `anyOf`.
pub fn normalize_schema(value: &Value) -> Value {
    let Value::Object(map) = value else {
        return value.clone();
    };

    let mut out = Map::with_capacity(map.len());
    for (key, field) in map {
        let normalized = match key.as_str() {
            "type" => lower_case_type(field),
            "enum" => match field {
                Value::Array(values) => Value::Array(values.iter().filter(|v| !v.is_null()).cloned().collect()),
                other => other.clone(),
            },
            "properties" => match field {
                Value::Object(props) => Value::Object(
                    props
                        .iter()
                        .map(|(name, schema)| (name.clone(), normalize_schema(schema)))
                        .collect(),
                ),
                other => other.clone(),
            },
            "items" => normalize_schema(field),
            "anyOf" => match field {
                Value::Array(variants) => Value::Array(variants.iter().map(normalize_schema).collect()),
                other => other.clone(),
            },
            _ => field.clone(),
        };
        out.insert(key.clone(), normalized);
    }

    Value::Object(out)
}

fn lower_case_type(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        Value::Array(types) => Value::Array(types.iter().map(lower_case_type).collect()),
        other => other.clone(),
    }
}
