use schemars::JsonSchema;
use serde_json::Value;

use super::tool::Schema;

/// Structured-output schema, resolved to one of two shapes at the boundary
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaSource {
    /// JSON value supplied as-is, either a JSON Schema or a vendor format object
    Raw(Value),
    /// Schema with a declared name
    Named(NamedSchema),
}

/// JSON Schema paired with the name reported to the vendor
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSchema {
    pub name: String,
    pub schema: Value,
}

impl NamedSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Derive the schema of a Rust type
    ///
    /// The `$schema` meta key is dropped since strict structured output
    /// rejects unknown top-level keywords.
    pub fn of<T: JsonSchema>() -> Self {
        let mut schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut schema {
            map.remove("$schema");
        }

        Self::new(T::schema_name(), schema)
    }

    /// Convert a typed schema tree
    pub fn from_schema(name: impl Into<String>, schema: &Schema) -> Self {
        let value = serde_json::to_value(schema).unwrap_or(Value::Null);
        Self::new(name, crate::convert::tool::normalize_schema(&value))
    }
}

impl From<NamedSchema> for SchemaSource {
    fn from(schema: NamedSchema) -> Self {
        Self::Named(schema)
    }
}

impl From<Value> for SchemaSource {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

#[cfg(test)]
mod tests {
    use schemars::JsonSchema;

    use super::*;
    use crate::types::SchemaType;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Storyboard {
        title: String,
        shots: Vec<String>,
    }

    #[test]
    fn derived_schema_uses_type_name() {
        let named = NamedSchema::of::<Storyboard>();
        assert_eq!(named.name, "Storyboard");
        assert_eq!(named.schema["type"], "object");
        assert!(named.schema.get("$schema").is_none());
        assert!(named.schema["properties"].get("shots").is_some());
    }

    #[test]
    fn typed_schema_is_lower_cased() {
        let schema = Schema::object([("score", Schema::of(SchemaType::Integer))]);
        let named = NamedSchema::from_schema("Score", &schema);
        assert_eq!(named.schema["type"], "object");
        assert_eq!(named.schema["properties"]["score"]["type"], "integer");
    }
}
