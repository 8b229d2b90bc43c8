//! Identifier-tagged, schema-typed payload envelope.
//!
//! The JSON form carries the schema inline and the payload as standard base64,
//! so a peer in any language can decode it without out-of-band schema exchange.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{QualnameError, Result};
use crate::protocol::row::decode_row;
use crate::protocol::schema::Schema;
use crate::value::Row;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Routing key naming the payload format.
    pub identifier: String,
    /// Schema the payload was encoded with.
    pub schema: Schema,
    /// Row-encoded record (zero-copy).
    #[serde(with = "base64_payload")]
    pub payload: Bytes,
}

impl Envelope {
    pub fn new(identifier: impl Into<String>, schema: Schema, payload: Bytes) -> Self {
        Self {
            identifier: identifier.into(),
            schema,
            payload,
        }
    }

    /// Decode the payload against the carried schema.
    pub fn decode_row(&self) -> Result<Row> {
        self.schema.validate()?;
        decode_row(&self.schema, self.payload.clone())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| QualnameError::codec(format!("envelope json encode: {e}")))
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| QualnameError::codec(format!("invalid envelope json: {e}")))
    }
}

mod base64_payload {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(payload: &Bytes, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(payload))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Bytes, D::Error> {
        let raw = String::deserialize(d)?;
        STANDARD
            .decode(raw.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
