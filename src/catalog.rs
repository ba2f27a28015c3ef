//! JSON data-catalog adapter.
//!
//! Binds the generated JSON codec to the catalog's storage convention:
//! newline-delimited records and timestamps written as
//! `YYYY-MM-DD HH:mm:ss.SSS` in UTC, because the downstream query engine
//! rejects RFC 3339 offsets.
use chrono::NaiveDateTime;
use serde_json::Value as Json;

use crate::codec::ByteCodec;
use crate::error::{DecodeError, DecodeErrorKind, EncodeError};
use crate::json::scalar::four_digit_year;
use crate::json::{self, MapperVisitor};
use crate::mapper::{JsonMapper, Mapper};
use crate::shape::{DynamicKind, RecordShape, Shape, ShapeKind};
use crate::value::Value;
use crate::visitor::{Root, ShapeVisitor};

const TIMESTAMP_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
// `%.f` also accepts a missing or longer fraction.
const TIMESTAMP_READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const NEWLINE: u8 = b'\n';

// ————————————————————————————————————————————————————————————————————————————
// TIMESTAMP OVERRIDE
// ————————————————————————————————————————————————————————————————————————————

/// Catalog timestamp literal, always UTC, no offset suffix. Sub-millisecond
/// precision is dropped on write.
pub struct CatalogTimestampMapper;

impl Mapper<Value, Json> for CatalogTimestampMapper {
    fn write(&self, value: &Value) -> Result<Json, EncodeError> {
        match value {
            Value::Timestamp(t) => {
                four_digit_year(t)?;
                Ok(Json::String(t.format(TIMESTAMP_WRITE_FORMAT).to_string()))
            }
            other => Err(EncodeError::unexpected(ShapeKind::Timestamp, other)),
        }
    }
    fn read(&self, wire: &Json) -> Result<Value, DecodeError> {
        let Json::String(s) = wire else {
            return Err(DecodeError::unexpected(ShapeKind::Timestamp, wire));
        };
        let t = NaiveDateTime::parse_from_str(s, TIMESTAMP_READ_FORMAT).map_err(|source| {
            DecodeError::new(DecodeErrorKind::InvalidTimestamp { value: s.clone(), source })
        })?;
        Ok(Value::Timestamp(t.and_utc()))
    }
}

/// Wraps a JSON mapper visitor and replaces only its timestamp handler.
///
/// Every other handler is delegated with the outer `root`, so timestamps
/// nested in collections and records are overridden as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcTimestampVisitor<V = MapperVisitor> {
    inner: V,
}

impl<V> UtcTimestampVisitor<V> {
    pub fn new(inner: V) -> Self {
        Self { inner }
    }
}

impl<V: ShapeVisitor<Output = JsonMapper>> ShapeVisitor for UtcTimestampVisitor<V> {
    type Output = JsonMapper;

    fn timestamp_shape(&self) -> JsonMapper {
        Box::new(CatalogTimestampMapper)
    }

    fn dynamic_shape(&self, kind: DynamicKind) -> JsonMapper {
        self.inner.dynamic_shape(kind)
    }
    fn binary_shape(&self) -> JsonMapper {
        self.inner.binary_shape()
    }
    fn bool_shape(&self) -> JsonMapper {
        self.inner.bool_shape()
    }
    fn number_shape(&self) -> JsonMapper {
        self.inner.number_shape()
    }
    fn nothing_shape(&self) -> JsonMapper {
        self.inner.nothing_shape()
    }
    fn string_shape(&self) -> JsonMapper {
        self.inner.string_shape()
    }
    fn array_shape(&self, element: &Shape, root: &Root<'_, JsonMapper>) -> JsonMapper {
        self.inner.array_shape(element, root)
    }
    fn set_shape(&self, element: &Shape, root: &Root<'_, JsonMapper>) -> JsonMapper {
        self.inner.set_shape(element, root)
    }
    fn map_shape(&self, value: &Shape, root: &Root<'_, JsonMapper>) -> JsonMapper {
        self.inner.map_shape(value, root)
    }
    fn record_shape(&self, record: &RecordShape, root: &Root<'_, JsonMapper>) -> JsonMapper {
        self.inner.record_shape(record, root)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DATA TYPE
// ————————————————————————————————————————————————————————————————————————————

/// Line-delimited JSON storage format. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDataType;

impl JsonDataType {
    pub const EXTENSION: &'static str = "json";

    pub fn extension(&self) -> &'static str {
        Self::EXTENSION
    }

    /// Byte codec for `shape` using catalog timestamps.
    pub fn mapper(&self, shape: &Shape) -> ByteCodec {
        let visitor = UtcTimestampVisitor::<MapperVisitor>::default();
        ByteCodec::new(json::mapper_with(shape, &visitor))
    }

    /// Non-empty newline-delimited records of `buffer`, in order.
    pub fn split<'a>(&self, buffer: &'a [u8]) -> Lines<'a> {
        Lines { rest: Some(buffer) }
    }

    /// Concatenates `records`, each followed by a newline (the last one too).
    pub fn join<I>(&self, records: I) -> Vec<u8>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut out = Vec::new();
        for record in records {
            out.extend_from_slice(record.as_ref());
            out.push(NEWLINE);
        }
        out
    }
}

/// Iterator returned by [`JsonDataType::split`]. Zero-length lines are skipped.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = self.rest?;
            let line = match rest.iter().position(|b| *b == NEWLINE) {
                Some(i) => {
                    self.rest = Some(&rest[i + 1..]);
                    &rest[..i]
                }
                None => {
                    self.rest = None;
                    rest
                }
            };
            if !line.is_empty() {
                return Some(line);
            }
        }
    }
}

impl std::iter::FusedIterator for Lines<'_> {}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
