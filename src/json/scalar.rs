use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde_json::Value as Json;

use crate::error::{DecodeError, DecodeErrorKind, EncodeError, EncodeErrorKind};
use crate::mapper::Mapper;
use crate::shape::ShapeKind;
use crate::value::Value;

/// Largest integer an IEEE double holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub struct DynamicMapper;

impl Mapper<Value, Json> for DynamicMapper {
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        match value {
            Value::Dynamic(json) => Ok(json.clone()),
            other => Err(EncodeError::unexpected(ShapeKind::Dynamic, other)),
        }
    }
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        Ok(Value::Dynamic(wire.clone()))
    }
}

/// Bytes as a lowercase hex string.
pub struct BinaryMapper;

impl Mapper<Value, Json> for BinaryMapper {
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        match value {
            Value::Binary(bytes) => Ok(Json::String(hex::encode(bytes))),
            other => Err(EncodeError::unexpected(ShapeKind::Binary, other)),
        }
    }
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        match wire {
            Json::String(s) => Ok(Value::Binary(hex::decode(s).map_err(DecodeError::new)?)),
            other => Err(DecodeError::unexpected(ShapeKind::Binary, other)),
        }
    }
}

pub struct BoolMapper;

impl Mapper<Value, Json> for BoolMapper {
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        match value {
            Value::Bool(b) => Ok(Json::Bool(*b)),
            other => Err(EncodeError::unexpected(ShapeKind::Bool, other)),
        }
    }
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        match wire {
            Json::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(DecodeError::unexpected(ShapeKind::Bool, other)),
        }
    }
}

pub struct NumberMapper;

impl Mapper<Value, Json> for NumberMapper {
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        match value {
            Value::Number(n) => number_to_json(*n),
            other => Err(EncodeError::unexpected(ShapeKind::Number, other)),
        }
    }
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        match wire.as_f64() {
            Some(n) => Ok(Value::Number(n)),
            None => Err(DecodeError::unexpected(ShapeKind::Number, wire)),
        }
    }
}

// Integral values within 2^53 are written as JSON integers.
fn number_to_json(n: f64) -> Result<Json, EncodeError> {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Ok(Json::from(n as i64));
    }
    serde_json::Number::from_f64(n)
        .map(Json::Number)
        .ok_or_else(|| EncodeError::new(EncodeErrorKind::NonFiniteNumber(n)))
}

pub struct NothingMapper;

impl Mapper<Value, Json> for NothingMapper {
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        match value {
            Value::Nothing => Ok(Json::Null),
            other => Err(EncodeError::unexpected(ShapeKind::Nothing, other)),
        }
    }
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        match wire {
            Json::Null => Ok(Value::Nothing),
            other => Err(DecodeError::unexpected(ShapeKind::Nothing, other)),
        }
    }
}

pub struct StringMapper;

impl Mapper<Value, Json> for StringMapper {
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        match value {
            Value::String(s) => Ok(Json::String(s.clone())),
            other => Err(EncodeError::unexpected(ShapeKind::String, other)),
        }
    }
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        match wire {
            Json::String(s) => Ok(Value::String(s.clone())),
            other => Err(DecodeError::unexpected(ShapeKind::String, other)),
        }
    }
}

/// RFC 3339 in UTC with millisecond precision: `2024-03-01T12:00:00.250Z`.
pub struct IsoTimestampMapper;

impl Mapper<Value, Json> for IsoTimestampMapper {
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        match value {
            Value::Timestamp(t) => {
                four_digit_year(t)?;
                Ok(Json::String(t.to_rfc3339_opts(SecondsFormat::Millis, true)))
            }
            other => Err(EncodeError::unexpected(ShapeKind::Timestamp, other)),
        }
    }
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        let Json::String(s) = wire else {
            return Err(DecodeError::unexpected(ShapeKind::Timestamp, wire));
        };
        let t = DateTime::parse_from_rfc3339(s).map_err(|source| {
            DecodeError::new(DecodeErrorKind::InvalidTimestamp { value: s.clone(), source })
        })?;
        Ok(Value::Timestamp(t.with_timezone(&Utc)))
    }
}

/// Both timestamp literals hold a four-digit year, so their readers reject
/// the signed form chrono writes outside 0000..=9999.
pub(crate) fn four_digit_year(t: &DateTime<Utc>) -> Result<(), EncodeError> {
    if (0..=9999).contains(&t.year()) {
        Ok(())
    } else {
        Err(EncodeError::new(EncodeErrorKind::TimestampOutOfRange(*t)))
    }
}
