//! Structural type metamodel.
//!
//! A [`Shape`] describes the structure of a value: six scalar leaves, three
//! homogeneous collections and named records. Shapes are immutable trees;
//! records can only be created through [`RecordBuilder`], which rejects
//! duplicate members. Records are owned, so a built shape cannot refer back
//! to itself; definitions loaded through [`def`] refer to records by name
//! and are checked for self-reference there.
pub mod def;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConstructionError;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "def::ShapeDef")]
pub enum Shape {
    Dynamic(DynamicKind),
    Binary,
    Bool,
    Number,
    Nothing,
    String,
    Timestamp,
    Array(Box<Shape>),
    Set(Box<Shape>),
    Map(Box<Shape>),
    Record(RecordShape),
}

/// Flavour of an untyped payload. Both behave identically at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicKind {
    #[default]
    Any,
    Unknown,
}

/// Variant tag of a [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Dynamic,
    Binary,
    Bool,
    Number,
    Nothing,
    String,
    Timestamp,
    Array,
    Set,
    Map,
    Record,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordShape {
    name: String,
    members: IndexMap<String, Member>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub shape: Shape,
    pub required: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Shape {
    pub fn dynamic() -> Self {
        Self::Dynamic(DynamicKind::Any)
    }
    pub fn array(element: Shape) -> Self {
        Self::Array(Box::new(element))
    }
    pub fn set(element: Shape) -> Self {
        Self::Set(Box::new(element))
    }
    pub fn map(value: Shape) -> Self {
        Self::Map(Box::new(value))
    }
    pub fn record(name: impl Into<String>) -> RecordBuilder {
        RecordBuilder { name: name.into(), members: Vec::new() }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Dynamic(_) => ShapeKind::Dynamic,
            Self::Binary => ShapeKind::Binary,
            Self::Bool => ShapeKind::Bool,
            Self::Number => ShapeKind::Number,
            Self::Nothing => ShapeKind::Nothing,
            Self::String => ShapeKind::String,
            Self::Timestamp => ShapeKind::Timestamp,
            Self::Array(_) => ShapeKind::Array,
            Self::Set(_) => ShapeKind::Set,
            Self::Map(_) => ShapeKind::Map,
            Self::Record(_) => ShapeKind::Record,
        }
    }

    /// Element shape of an `Array` or `Set`.
    pub fn element(&self) -> Option<&Shape> {
        match self {
            Self::Array(element) | Self::Set(element) => Some(element),
            _ => None,
        }
    }

    /// Value shape of a `Map`.
    pub fn value(&self) -> Option<&Shape> {
        match self {
            Self::Map(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordShape> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl RecordShape {
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().map(|(k, m)| (k.as_str(), m))
    }
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }
    pub fn required_members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().filter(|(_, m)| m.required).map(|(k, _)| k.as_str())
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

pub struct RecordBuilder {
    name: String,
    members: Vec<(String, Member)>,
}

impl RecordBuilder {
    pub fn required(self, name: impl Into<String>, shape: Shape) -> Self {
        self.member(name, shape, true)
    }
    pub fn optional(self, name: impl Into<String>, shape: Shape) -> Self {
        self.member(name, shape, false)
    }
    pub fn member(mut self, name: impl Into<String>, shape: Shape, required: bool) -> Self {
        self.members.push((name.into(), Member { shape, required }));
        self
    }

    pub fn build(self) -> Result<Shape, ConstructionError> {
        let mut members = IndexMap::with_capacity(self.members.len());
        for (name, member) in self.members {
            if members.contains_key(&name) {
                return Err(ConstructionError::DuplicateMember { record: self.name, member: name });
            }
            members.insert(name, member);
        }
        Ok(Shape::Record(RecordShape { name: self.name, members }))
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dynamic => "dynamic",
            Self::Binary => "binary",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Nothing => "nothing",
            Self::String => "string",
            Self::Timestamp => "timestamp",
            Self::Array => "array",
            Self::Set => "set",
            Self::Map => "map",
            Self::Record => "record",
        };
        f.write_str(name)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
