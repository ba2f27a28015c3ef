//! JSON Schema documents derived from shapes.
//!
//! Purely structural: the same shape always yields an equal document. The
//! serialized form is JSON-Schema-like, not tied to a particular draft.
use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use crate::shape::{DynamicKind, RecordShape, Shape};
use crate::visitor::{Root, ShapeVisitor};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonSchema {
    Object(ObjectSchema),
    Array(Box<JsonSchema>),
    Set(Box<JsonSchema>),
    Map(Box<JsonSchema>),
    Number,
    String,
    Timestamp,
    Boolean,
    Null,
    Binary,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSchema {
    pub title: String,
    /// Compared without regard to order.
    pub properties: IndexMap<String, JsonSchema>,
    pub required: BTreeSet<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// VISITOR
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaVisitor;

impl ShapeVisitor for SchemaVisitor {
    type Output = JsonSchema;

    fn dynamic_shape(&self, _kind: DynamicKind) -> JsonSchema {
        JsonSchema::Any
    }
    fn binary_shape(&self) -> JsonSchema {
        JsonSchema::Binary
    }
    fn bool_shape(&self) -> JsonSchema {
        JsonSchema::Boolean
    }
    fn number_shape(&self) -> JsonSchema {
        JsonSchema::Number
    }
    fn nothing_shape(&self) -> JsonSchema {
        JsonSchema::Null
    }
    fn string_shape(&self) -> JsonSchema {
        JsonSchema::String
    }
    fn timestamp_shape(&self) -> JsonSchema {
        JsonSchema::Timestamp
    }
    fn array_shape(&self, element: &Shape, root: &Root<'_, JsonSchema>) -> JsonSchema {
        JsonSchema::Array(Box::new(element.visit(root)))
    }
    fn set_shape(&self, element: &Shape, root: &Root<'_, JsonSchema>) -> JsonSchema {
        JsonSchema::Set(Box::new(element.visit(root)))
    }
    fn map_shape(&self, value: &Shape, root: &Root<'_, JsonSchema>) -> JsonSchema {
        JsonSchema::Map(Box::new(value.visit(root)))
    }
    fn record_shape(&self, record: &RecordShape, root: &Root<'_, JsonSchema>) -> JsonSchema {
        JsonSchema::Object(ObjectSchema {
            title: record.name().to_string(),
            properties: record
                .members()
                .map(|(name, member)| (name.to_string(), member.shape.visit(root)))
                .collect(),
            required: record.required_members().map(str::to_string).collect(),
        })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// EMISSION
// ————————————————————————————————————————————————————————————————————————————

impl JsonSchema {
    pub fn of(shape: &Shape) -> Self {
        shape.visit(&SchemaVisitor)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(object) => {
                let properties: serde_json::Map<String, Value> = object
                    .properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect();
                let mut o = json!({
                    "type": "object",
                    "title": object.title,
                    "properties": properties,
                });
                // BTreeSet iteration is sorted, so the emitted list is stable.
                if !object.required.is_empty() {
                    o["required"] = Value::Array(object.required.iter().cloned().map(Value::from).collect());
                }
                o
            }
            // Sets decode with duplicates kept, so both emit a plain array.
            Self::Array(items) | Self::Set(items) => json!({ "type": "array", "items": items.to_value() }),
            Self::Map(values) => json!({ "type": "object", "additionalProperties": values.to_value() }),
            Self::Number => json!({ "type": "number" }),
            Self::String => json!({ "type": "string" }),
            Self::Timestamp => json!({ "type": "string", "format": "date-time" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Null => json!({ "type": "null" }),
            Self::Binary => json!({ "type": "string", "contentEncoding": "base16" }),
            Self::Any => json!({}),
        }
    }
}

impl Serialize for JsonSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
