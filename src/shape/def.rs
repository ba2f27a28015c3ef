//! File-loadable shape definitions.
//!
//! ```json
//! { "type": "record", "name": "Event", "members": {
//!     "id":   { "shape": { "type": "string" } },
//!     "tags": { "shape": { "type": "array", "element": { "type": "string" } }, "required": false }
//! } }
//! ```
//!
//! A record name stands for that record, so a record may not appear again,
//! by name, anywhere below itself.
use indexmap::IndexMap;
use serde::Deserialize;

use super::{DynamicKind, Shape};
use crate::error::ConstructionError;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDef {
    Dynamic {
        #[serde(default)]
        kind: DynamicKind,
    },
    Binary,
    Bool,
    Number,
    Nothing,
    String,
    Timestamp,
    Array { element: Box<ShapeDef> },
    Set { element: Box<ShapeDef> },
    Map { value: Box<ShapeDef> },
    Record {
        name: String,
        #[serde(default)]
        members: IndexMap<String, MemberDef>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberDef {
    pub shape: ShapeDef,
    #[serde(default = "required_by_default")]
    pub required: bool,
}

fn required_by_default() -> bool {
    true
}

impl TryFrom<ShapeDef> for Shape {
    type Error = ConstructionError;

    fn try_from(def: ShapeDef) -> Result<Self, Self::Error> {
        check_acyclic(&def, &mut Vec::new())?;
        into_shape(def)
    }
}

fn into_shape(def: ShapeDef) -> Result<Shape, ConstructionError> {
    Ok(match def {
        ShapeDef::Dynamic { kind } => Shape::Dynamic(kind),
        ShapeDef::Binary => Shape::Binary,
        ShapeDef::Bool => Shape::Bool,
        ShapeDef::Number => Shape::Number,
        ShapeDef::Nothing => Shape::Nothing,
        ShapeDef::String => Shape::String,
        ShapeDef::Timestamp => Shape::Timestamp,
        ShapeDef::Array { element } => Shape::array(into_shape(*element)?),
        ShapeDef::Set { element } => Shape::set(into_shape(*element)?),
        ShapeDef::Map { value } => Shape::map(into_shape(*value)?),
        ShapeDef::Record { name, members } => {
            let mut builder = Shape::record(name);
            for (member, def) in members {
                builder = builder.member(member, into_shape(def.shape)?, def.required);
            }
            builder.build()?
        }
    })
}

/// Walks `def` looking for a record name already on `chain`.
fn check_acyclic(def: &ShapeDef, chain: &mut Vec<String>) -> Result<(), ConstructionError> {
    match def {
        ShapeDef::Array { element } | ShapeDef::Set { element } => check_acyclic(element, chain),
        ShapeDef::Map { value } => check_acyclic(value, chain),
        ShapeDef::Record { name, members } => {
            if let Some(start) = chain.iter().position(|seen| seen == name) {
                let mut cycle = chain[start..].to_vec();
                cycle.push(name.clone());
                return Err(ConstructionError::CyclicRecord { chain: cycle });
            }
            chain.push(name.clone());
            for member in members.values() {
                check_acyclic(&member.shape, chain)?;
            }
            chain.pop();
            Ok(())
        }
        _ => Ok(()),
    }
}
