//! Shape descriptors interpreted by visitors into JSON codecs and JSON Schema
//! documents.
//!
//! - [`shape`]: the closed metamodel (scalars, collections, records).
//! - [`visitor`]: one handler per shape variant, open recursion through `root`.
//! - [`json`] / [`codec`]: generated JSON mappers and their byte layer.
//! - [`json_schema`]: generated schema documents.
//! - [`catalog`]: line-delimited storage with catalog timestamps.
pub mod catalog;
pub mod cli;
pub mod codec;
pub mod error;
pub mod json;
pub mod json_schema;
pub mod mapper;
pub mod path_de;
pub mod shape;
pub mod value;
pub mod visitor;

pub use catalog::{JsonDataType, UtcTimestampVisitor};
pub use codec::ByteCodec;
pub use error::{ConstructionError, DecodeError, EncodeError};
pub use json::MapperVisitor;
pub use json_schema::{JsonSchema, SchemaVisitor};
pub use mapper::{JsonMapper, Mapper};
pub use shape::{Shape, ShapeKind};
pub use value::Value;
pub use visitor::ShapeVisitor;
