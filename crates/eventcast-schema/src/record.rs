//! Record representations accepted by the serializer.
//!
//! Typed records carry their schema definition in the binary, the way
//! code generated from an `.avsc` document would. Dynamic records are
//! assembled at runtime against a schema fetched from the registry.

use apache_avro::types::{Record, Value};
use apache_avro::Schema;
use serde::Serialize;

use crate::error::{Result, SchemaError};

/// A record type with its Avro schema compiled into the binary.
pub trait TypedRecord: Serialize {
    /// Schema definition this type serializes under.
    fn definition() -> &'static str;
}

/// Extract the record name from a schema.
///
/// Schemas are registered under their record name, so only record
/// schemas qualify for serialization.
pub fn record_name(schema: &Schema) -> Result<String> {
    if let Schema::Record(record_schema) = schema {
        Ok(record_schema.name.fullname(None))
    } else {
        Err(SchemaError::InvalidSchema(
            "only record schemas can be registered and serialized".to_string(),
        ))
    }
}

/// A record populated field by field against a fetched schema.
#[derive(Debug, Clone)]
pub struct DynamicRecord {
    schema: Schema,
    name: String,
    fields: Vec<(String, Value)>,
}

impl DynamicRecord {
    /// Wrap a parsed record schema.
    pub fn new(schema: Schema) -> Result<Self> {
        let name = record_name(&schema)?;
        Ok(DynamicRecord {
            schema,
            name,
            fields: Vec::new(),
        })
    }

    /// Parse a schema definition and wrap it.
    pub fn from_definition(definition: &str) -> Result<Self> {
        let schema =
            Schema::parse_str(definition).map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;
        Self::new(schema)
    }

    /// Set a field by name.
    ///
    /// Unknown field names are rejected here; type mismatches surface
    /// when the record is encoded.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        if !self.has_field(field) {
            return Err(SchemaError::Encoding(format!(
                "record '{}' has no field named '{}'",
                self.name, field
            )));
        }

        self.fields.push((field.to_string(), value.into()));
        Ok(())
    }

    /// Record name, as it appears in the registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Assemble the Avro value for encoding.
    pub(crate) fn to_value(&self) -> Result<Value> {
        let mut record = Record::new(&self.schema).ok_or_else(|| {
            SchemaError::Encoding(format!("schema '{}' cannot hold record fields", self.name))
        })?;

        for (field, value) in &self.fields {
            record.put(field, value.clone());
        }

        Ok(record.into())
    }

    fn has_field(&self, field: &str) -> bool {
        if let Schema::Record(record_schema) = &self.schema {
            record_schema.fields.iter().any(|f| f.name == field)
        } else {
            false
        }
    }
}
