//! UTF-8 JSON text on top of a [`JsonMapper`].
use crate::error::{DecodeError, EncodeError};
use crate::mapper::{JsonMapper, Mapper};
use crate::value::Value;

/// `write = utf8(json_text(mapper.write(v)))`, `read = mapper.read(parse(utf8(bytes)))`.
pub struct ByteCodec {
    mapper: JsonMapper,
}

impl ByteCodec {
    pub fn new(mapper: JsonMapper) -> Self {
        Self { mapper }
    }

    pub fn json_mapper(&self) -> &JsonMapper {
        &self.mapper
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let json = self.mapper.write(value)?;
        serde_json::to_vec(&json).map_err(EncodeError::new)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        let text = std::str::from_utf8(bytes).map_err(DecodeError::new)?;
        let json: serde_json::Value = serde_json::from_str(text).map_err(DecodeError::new)?;
        self.mapper.read(&json)
    }
}

impl Mapper<Value, Vec<u8>> for ByteCodec {
    fn write(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.encode(value)
    }
    fn read(&self, wire: &Vec<u8>) -> Result<Value, DecodeError> {
        self.decode(wire)
    }
}

impl From<JsonMapper> for ByteCodec {
    fn from(mapper: JsonMapper) -> Self {
        Self::new(mapper)
    }
}
