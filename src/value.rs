//! Domain values converted by mappers.
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Untyped payload, carried as-is.
    Dynamic(serde_json::Value),
    Binary(Vec<u8>),
    Bool(bool),
    Number(f64),
    Nothing,
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<Value>),
    /// Unordered collection. Duplicates are not removed.
    Set(Vec<Value>),
    Map(IndexMap<String, Value>),
    /// Record members by name; an absent optional member has no entry.
    Record(IndexMap<String, Value>),
}

impl Value {
    /// Builds a record value from `(member, value)` pairs.
    pub fn record<K, I>(members: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Record(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Dynamic(_) => "dynamic",
            Self::Binary(_) => "binary",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Nothing => "nothing",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::Array(_) => "array",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    /// Member of a record value.
    pub fn get(&self, member: &str) -> Option<&Value> {
        match self {
            Self::Record(members) | Self::Map(members) => members.get(member),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t)
    }
}
