//! Payload framing and Avro datum helpers.
//!
//! Encoded events carry their schema id inline: one magic byte, the id as
//! a big-endian i32, then the raw Avro datum. The same id is repeated in
//! the event content type so consumers can route without touching the
//! payload.

use apache_avro::types::Value;
use apache_avro::Schema;
use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, SchemaError};

/// First byte of every framed payload.
pub const MAGIC_BYTE: u8 = 0x00;

/// Content type attached to encoded events, `avro/binary+{schema_id}`.
pub fn content_type_for(schema_id: i32) -> String {
    format!("avro/binary+{}", schema_id)
}

/// Prefix an Avro datum with the magic byte and schema id.
pub fn frame_datum(schema_id: i32, datum: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + 4 + datum.len());
    buf.put_u8(MAGIC_BYTE);
    buf.put_i32(schema_id);
    buf.put_slice(datum);
    buf.freeze()
}

/// Split a framed payload into its schema id and raw Avro datum.
pub fn unframe_datum(data: &[u8]) -> Result<(i32, &[u8])> {
    if data.len() < 5 {
        return Err(SchemaError::Decoding(format!(
            "payload too short for schema id framing: {} bytes",
            data.len()
        )));
    }

    if data[0] != MAGIC_BYTE {
        return Err(SchemaError::Decoding(format!(
            "invalid magic byte: expected 0x00, got 0x{:02x}",
            data[0]
        )));
    }

    let mut id_bytes = &data[1..5];
    let schema_id = id_bytes.get_i32();
    Ok((schema_id, &data[5..]))
}

/// Encode an Avro value into a raw datum.
pub fn encode_datum(schema: &Schema, value: Value) -> Result<Vec<u8>> {
    apache_avro::to_avro_datum(schema, value).map_err(|e| SchemaError::Encoding(e.to_string()))
}

/// Decode a raw datum against the schema it was written with.
pub fn decode_datum(schema: &Schema, datum: &[u8]) -> Result<Value> {
    apache_avro::from_avro_datum(schema, &mut &datum[..], None)
        .map_err(|e| SchemaError::Decoding(e.to_string()))
}

/// Parsing Canonical Form of a schema definition.
///
/// Two definitions describe the same schema exactly when their canonical
/// forms are byte-equal, regardless of whitespace or doc attributes.
pub fn canonical_definition(definition: &str) -> Result<String> {
    let schema =
        Schema::parse_str(definition).map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;
    Ok(schema.canonical_form())
}
