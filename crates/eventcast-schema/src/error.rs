use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised by schema resolution and event serialization.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// No schema with this name is registered under the group.
    #[error("Schema '{name}' not found in group '{group}'")]
    SchemaNotFound { group: String, name: String },

    /// No schema is registered under this id.
    #[error("No schema registered under id {0}")]
    SchemaIdNotFound(i32),

    /// The schema definition is not valid Avro.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A record could not be encoded against its schema.
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// A payload could not be decoded against the writer schema.
    #[error("Decoding failed: {0}")]
    Decoding(String),

    /// The schema registry rejected a request or was unreachable.
    #[error("Schema registry error: {0}")]
    Registry(String),

    /// A serializer or registry client was built with incomplete options.
    #[error("Configuration error: {0}")]
    Config(String),
}
