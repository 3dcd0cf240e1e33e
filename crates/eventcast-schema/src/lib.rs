//! Schema-validated event serialization for EventCast.
//!
//! This crate owns the schema half of the publishing pipeline:
//!
//! - **Registry clients**: [`RestSchemaRegistry`] speaks to a remote
//!   registry over HTTP, [`MemorySchemaRegistry`] backs tests and local
//!   development.
//! - **Serialization**: [`EventSerializer`] resolves record schemas to
//!   registry-assigned ids and encodes records into framed Avro
//!   payloads.
//! - **Records**: [`TypedRecord`] for types with compiled-in schemas,
//!   [`DynamicRecord`] for records assembled against fetched schemas.
//!
//! Payloads are framed as one magic byte, the schema id as a big-endian
//! i32, then the raw Avro datum. The content type `avro/binary+{id}`
//! repeats the id as transport metadata.

pub mod auth;
pub mod error;
pub mod record;
pub mod registry;
pub mod rest;
pub mod serde;
pub mod serializer;
pub mod types;

pub use auth::AmbientCredential;
pub use error::{Result, SchemaError};
pub use record::{record_name, DynamicRecord, TypedRecord};
pub use registry::{MemorySchemaRegistry, SchemaRegistry};
pub use rest::RestSchemaRegistry;
pub use serializer::{EventSerializer, EventSerializerBuilder};
pub use types::{EncodedEvent, RegisteredSchema, SchemaFormat};
