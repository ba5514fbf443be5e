//! Conversion of structured-output schemas into the `text` request field

use serde_json::{Value, json};

use crate::protocol::responses::TextConfig;
use crate::types::SchemaSource;

/// Format types accepted verbatim from a raw schema value
const RAW_FORMAT_TYPES: [&str; 2] = ["json_schema", "json_object"];

/// Name reported for raw JSON Schemas, which carry none of their own
const DEFAULT_SCHEMA_NAME: &str = "response";

/// Build the `text` field for a structured-output schema
///
/// Shapes the vendor cannot express are logged and omitted so the request
/// still goes out without structured output.
pub fn schema_to_text_config(source: &SchemaSource) -> Option<TextConfig> {
    let (name, schema) = match source {
        SchemaSource::Raw(value @ Value::Object(map)) => {
            if map
                .get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| RAW_FORMAT_TYPES.contains(&t))
            {
                return Some(TextConfig { format: value.clone() });
            }
            (DEFAULT_SCHEMA_NAME, value)
        }
        SchemaSource::Named(named) if named.schema.is_object() => (named.name.as_str(), &named.schema),
        SchemaSource::Raw(other) => {
            tracing::warn!(schema = %other, "unsupported response schema, structured output disabled");
            return None;
        }
        SchemaSource::Named(named) => {
            tracing::warn!(name = %named.name, "response schema is not an object, structured output disabled");
            return None;
        }
    };

    Some(TextConfig {
        format: json!({
            "type": "json_schema",
            "name": name,
            "schema": schema,
            "strict": true,
        }),
    })
}
