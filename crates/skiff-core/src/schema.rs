//! Hand-declared tool input schemas.
//!
//! Each tool describes its input as an ordered list of properties. The schema
//! is rendered as a JSON Schema object with `additionalProperties: false`.
//! The `required` list follows declaration order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// JSON type of a schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    String,
    Integer,
    Boolean,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Integer => "integer",
            PropertyKind::Boolean => "boolean",
        }
    }
}

/// A single input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProperty {
    pub name: String,
    pub kind: PropertyKind,
    pub description: String,
    pub required: bool,
}

/// Input schema of a tool: an object with a fixed set of properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSchema {
    properties: Vec<SchemaProperty>,
}

impl InputSchema {
    pub fn object() -> Self {
        Self::default()
    }

    /// Add a required string property.
    pub fn required(self, name: &str, description: &str) -> Self {
        self.property(name, PropertyKind::String, description, true)
    }

    /// Add an optional string property.
    pub fn optional(self, name: &str, description: &str) -> Self {
        self.property(name, PropertyKind::String, description, false)
    }

    pub fn property(
        mut self,
        name: &str,
        kind: PropertyKind,
        description: &str,
        required: bool,
    ) -> Self {
        self.properties.retain(|p| p.name != name);
        self.properties.push(SchemaProperty {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            required,
        });
        self
    }

    pub fn properties(&self) -> &[SchemaProperty] {
        &self.properties
    }

    /// Names of required properties, in declaration order.
    pub fn required_names(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Render as a JSON Schema object.
    pub fn to_value(&self) -> Value {
        let mut properties = Map::new();
        for property in &self.properties {
            properties.insert(
                property.name.clone(),
                json!({
                    "type": property.kind.as_str(),
                    "description": property.description,
                }),
            );
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_names(),
            "additionalProperties": false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_object_schema() {
        let schema = InputSchema::object()
            .required("path", "The path to the file")
            .optional("encoding", "Text encoding");

        let value = schema.to_value();
        assert_eq!(value["type"], "object");
        assert_eq!(value["additionalProperties"], false);
        assert_eq!(value["required"], json!(["path"]));
        assert_eq!(value["properties"]["path"]["type"], "string");
        assert_eq!(
            value["properties"]["encoding"]["description"],
            "Text encoding"
        );
    }

    #[test]
    fn redeclaring_a_property_replaces_it() {
        let schema = InputSchema::object()
            .optional("path", "first")
            .required("path", "second");

        assert_eq!(schema.properties().len(), 1);
        assert_eq!(schema.required_names(), vec!["path"]);
        assert_eq!(schema.properties()[0].description, "second");
    }

    #[test]
    fn rendering_is_deterministic() {
        let build = || {
            InputSchema::object()
                .required("path", "p")
                .required("old_str", "o")
                .required("new_str", "n")
        };
        assert_eq!(build().to_value(), build().to_value());
        assert_eq!(build().required_names(), vec!["path", "old_str", "new_str"]);
    }
}
