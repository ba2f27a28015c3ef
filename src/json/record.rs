use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

use crate::error::{DecodeError, EncodeError};
use crate::mapper::{JsonMapper, Mapper};
use crate::shape::ShapeKind;
use crate::value::Value;

pub struct RecordMapper {
    pub members: Vec<MemberMapper>,
}

pub struct MemberMapper {
    pub name: String,
    pub required: bool,
    pub mapper: JsonMapper,
}

impl Mapper<Value, Json> for RecordMapper {
    /// Writes declared members in declaration order. Absent optional members
    /// leave no key behind; undeclared domain members are ignored.
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        let Value::Record(fields) = value else {
            return Err(EncodeError::unexpected(ShapeKind::Record, value));
        };
        let mut out = Map::with_capacity(self.members.len());
        for member in &self.members {
            match fields.get(&member.name) {
                Some(v) => {
                    let json = member.mapper.write(v).map_err(|e| e.at_member(&member.name))?;
                    out.insert(member.name.clone(), json);
                }
                None if member.required => return Err(EncodeError::missing(&member.name)),
                None => {}
            }
        }
        Ok(Json::Object(out))
    }

    /// Key order on the wire does not matter; the result follows declaration
    /// order.
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        let Json::Object(fields) = wire else {
            return Err(DecodeError::unexpected(ShapeKind::Record, wire));
        };
        let mut out = IndexMap::with_capacity(self.members.len());
        for member in &self.members {
            match fields.get(&member.name) {
                Some(json) => {
                    let v = member.mapper.read(json).map_err(|e| e.at_member(&member.name))?;
                    out.insert(member.name.clone(), v);
                }
                None if member.required => return Err(DecodeError::missing(&member.name)),
                None => {}
            }
        }
        Ok(Value::Record(out))
    }
}
