use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

use crate::error::{DecodeError, EncodeError};
use crate::mapper::{JsonMapper, Mapper};
use crate::shape::ShapeKind;
use crate::value::Value;

pub struct ArrayMapper {
    pub element: JsonMapper,
}

impl Mapper<Value, Json> for ArrayMapper {
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        match value {
            Value::Array(items) => write_items(&self.element, items),
            other => Err(EncodeError::unexpected(ShapeKind::Array, other)),
        }
    }
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        match wire {
            Json::Array(items) => Ok(Value::Array(read_items(&self.element, items)?)),
            other => Err(DecodeError::unexpected(ShapeKind::Array, other)),
        }
    }
}

/// Sets travel as plain arrays. Decoding keeps duplicates and wire order.
pub struct SetMapper {
    pub element: JsonMapper,
}

impl Mapper<Value, Json> for SetMapper {
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        match value {
            Value::Set(items) => write_items(&self.element, items),
            other => Err(EncodeError::unexpected(ShapeKind::Set, other)),
        }
    }
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        match wire {
            Json::Array(items) => Ok(Value::Set(read_items(&self.element, items)?)),
            other => Err(DecodeError::unexpected(ShapeKind::Set, other)),
        }
    }
}

pub struct MapMapper {
    pub value: JsonMapper,
}

impl Mapper<Value, Json> for MapMapper {
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        let Value::Map(entries) = value else {
            return Err(EncodeError::unexpected(ShapeKind::Map, value));
        };
        let mut out = Map::with_capacity(entries.len());
        for (key, v) in entries {
            let json = self.value.write(v).map_err(|e| e.at_member(key))?;
            out.insert(key.clone(), json);
        }
        Ok(Json::Object(out))
    }
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        let Json::Object(entries) = wire else {
            return Err(DecodeError::unexpected(ShapeKind::Map, wire));
        };
        let mut out = IndexMap::with_capacity(entries.len());
        for (key, json) in entries {
            let v = self.value.read(json).map_err(|e| e.at_member(key))?;
            out.insert(key.clone(), v);
        }
        Ok(Value::Map(out))
    }
}

fn write_items(element: &JsonMapper, items: &[Value]) -> Result<Json, EncodeError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| element.write(item).map_err(|e| e.at_index(i)))
        .collect::<Result<Vec<_>, _>>()
        .map(Json::Array)
}

fn read_items(element: &JsonMapper, items: &[Json]) -> Result<Vec<Value>, DecodeError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| element.read(item).map_err(|e| e.at_index(i)))
        .collect()
}
