//! Shared types for schema registration and encoded event payloads.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Serialization format of a registered schema.
///
/// Only Avro payloads are produced by this crate, but the registry
/// stores the format tag alongside every schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaFormat {
    Avro,
    Json,
}

impl SchemaFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaFormat::Avro => "AVRO",
            SchemaFormat::Json => "JSON",
        }
    }
}

/// A schema version as stored by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredSchema {
    /// Registry-assigned identifier, unique across all groups.
    pub id: i32,
    /// Group the schema was registered under.
    pub group: String,
    /// Schema name, taken from the Avro record name.
    pub name: String,
    /// Version within the group and name, starting at 1.
    pub version: i32,
    pub format: SchemaFormat,
    /// Schema definition document.
    pub definition: String,
}

/// Request body for registering a new schema version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterSchemaRequest {
    pub definition: String,
    pub format: SchemaFormat,
}

/// Response body returned by the registry after a registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterSchemaResponse {
    pub id: i32,
}

/// A serialized event ready for publishing.
///
/// The payload carries the schema id inline (magic byte framing) and the
/// content type repeats it as transport metadata, so consumers can route
/// on either.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedEvent {
    /// Id of the schema the payload was encoded with.
    pub schema_id: i32,
    /// Content type of the form `avro/binary+{schema_id}`.
    pub content_type: String,
    /// Framed Avro payload.
    pub payload: Bytes,
}
