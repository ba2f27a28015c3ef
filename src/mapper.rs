//! The write/read contract shared by every generated codec.
use crate::error::{DecodeError, EncodeError};
use crate::value::Value;

/// Converts between a domain value `V` and a wire value `W`.
///
/// `read(write(v))` must give back `v` for every value legal under the shape
/// the mapper was built for.
pub trait Mapper<V, W> {
    fn write(&self, value: &V) -> Result<W, EncodeError>;
    fn read(&self, wire: &W) -> Result<V, DecodeError>;
}

/// Mapper between domain values and JSON values.
pub type JsonMapper = Box<dyn Mapper<Value, serde_json::Value> + Send + Sync>;

impl<V, W, M: Mapper<V, W> + ?Sized> Mapper<V, W> for Box<M> {
    fn write(&self, value: &V) -> Result<W, EncodeError> {
        (**self).write(value)
    }
    fn read(&self, wire: &W) -> Result<V, DecodeError> {
        (**self).read(wire)
    }
}
