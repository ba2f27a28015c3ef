//! Error taxonomy: construction, decode and encode failures.
use std::fmt;
use thiserror::Error;

use crate::shape::ShapeKind;

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTION
// ————————————————————————————————————————————————————————————————————————————

/// A shape that can never be valid. Raised before any value flows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// A record contains itself through the given chain of record names.
    #[error("record `{}` contains itself: {}", .chain[0], .chain.join(" -> "))]
    CyclicRecord { chain: Vec<String> },
    #[error("record `{record}` declares member `{member}` more than once")]
    DuplicateMember { record: String, member: String },
}

// ————————————————————————————————————————————————————————————————————————————
// PATHS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Member(String),
    Index(usize),
}

/// Location of a failing value, rendered as `$.member[3]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
    fn prepend(&mut self, segment: Segment) {
        self.0.insert(0, segment);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                Segment::Index(i) => write!(f, "[{i}]")?,
                Segment::Member(name) if is_identifier(name) => write!(f, ".{name}")?,
                Segment::Member(name) => write!(f, "[{name:?}]")?,
            }
        }
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

// ————————————————————————————————————————————————————————————————————————————
// DECODE
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Error)]
#[error("decode failed at {path}: {kind}")]
pub struct DecodeError {
    pub path: Path,
    pub kind: DecodeErrorKind,
}

#[derive(Debug, Error)]
pub enum DecodeErrorKind {
    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("input is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("expected {expected}, found {found}")]
    UnexpectedType { expected: ShapeKind, found: &'static str },
    #[error("required member `{0}` is missing")]
    MissingMember(String),
    #[error("invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("invalid binary payload: {0}")]
    InvalidBinary(#[from] hex::FromHexError),
}

impl DecodeError {
    pub fn new(kind: impl Into<DecodeErrorKind>) -> Self {
        Self { path: Path::root(), kind: kind.into() }
    }
    pub fn unexpected(expected: ShapeKind, found: &serde_json::Value) -> Self {
        Self::new(DecodeErrorKind::UnexpectedType { expected, found: json_kind(found) })
    }
    pub fn missing(member: &str) -> Self {
        Self::new(DecodeErrorKind::MissingMember(member.to_string()))
    }
    pub fn at_member(mut self, name: &str) -> Self {
        self.path.prepend(Segment::Member(name.to_string()));
        self
    }
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.prepend(Segment::Index(index));
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ENCODE
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Error)]
#[error("encode failed at {path}: {kind}")]
pub struct EncodeError {
    pub path: Path,
    pub kind: EncodeErrorKind,
}

#[derive(Debug, Error)]
pub enum EncodeErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedType { expected: ShapeKind, found: &'static str },
    #[error("required member `{0}` is missing")]
    MissingMember(String),
    #[error("{0} cannot be represented as a JSON number")]
    NonFiniteNumber(f64),
    #[error("timestamp {0} is outside years 0000..=9999")]
    TimestampOutOfRange(chrono::DateTime<chrono::Utc>),
    #[error("failed to serialize JSON text: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl EncodeError {
    pub fn new(kind: impl Into<EncodeErrorKind>) -> Self {
        Self { path: Path::root(), kind: kind.into() }
    }
    pub fn unexpected(expected: ShapeKind, found: &crate::value::Value) -> Self {
        Self::new(EncodeErrorKind::UnexpectedType { expected, found: found.kind_name() })
    }
    pub fn missing(member: &str) -> Self {
        Self::new(EncodeErrorKind::MissingMember(member.to_string()))
    }
    pub fn at_member(mut self, name: &str) -> Self {
        self.path.prepend(Segment::Member(name.to_string()));
        self
    }
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.prepend(Segment::Index(index));
        self
    }
}

/// JSON type name used in error messages.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
