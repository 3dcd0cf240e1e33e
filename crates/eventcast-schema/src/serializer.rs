//! Schema-validated event serialization.

use std::collections::HashMap;
use std::sync::Arc;

use apache_avro::types::Value;
use apache_avro::Schema;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::record::{record_name, DynamicRecord, TypedRecord};
use crate::registry::SchemaRegistry;
use crate::serde::{content_type_for, decode_datum, encode_datum, frame_datum, unframe_datum};
use crate::types::{EncodedEvent, SchemaFormat};

/// Serializer that validates every record against a registry schema.
///
/// Encoded payloads are framed with the id the registry assigned to the
/// schema, and the same id is repeated in the event content type.
/// Resolved ids are cached, so steady-state serialization costs no
/// registry round trips.
///
/// # Examples
///
/// ```ignore
/// let registry = Arc::new(RestSchemaRegistry::new("http://localhost:8081"));
/// let serializer = EventSerializer::builder()
///     .registry(registry)
///     .group("orders-group")
///     .build()?;
///
/// let event = serializer.serialize(&order).await?;
/// ```
pub struct EventSerializer {
    registry: Arc<dyn SchemaRegistry>,
    group: String,
    auto_register: bool,
    // Keyed by canonical definition; a changed definition is a cache miss.
    id_cache: RwLock<HashMap<String, i32>>,
}

impl EventSerializer {
    pub fn builder() -> EventSerializerBuilder {
        EventSerializerBuilder::new()
    }

    /// Group schemas are resolved under.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Serialize a typed record under its compiled-in schema.
    pub async fn serialize<T: TypedRecord>(&self, record: &T) -> Result<EncodedEvent> {
        let schema = Schema::parse_str(T::definition())
            .map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;
        let value =
            apache_avro::to_value(record).map_err(|e| SchemaError::Encoding(e.to_string()))?;

        self.encode(&schema, value).await
    }

    /// Serialize a dynamic record under the schema it was built from.
    pub async fn serialize_dynamic(&self, record: &DynamicRecord) -> Result<EncodedEvent> {
        let value = record.to_value()?;
        self.encode(record.schema(), value).await
    }

    /// Decode a framed payload, fetching its writer schema by id.
    pub async fn deserialize(&self, data: &[u8]) -> Result<(i32, Value)> {
        let (schema_id, datum) = unframe_datum(data)?;

        let registered = self
            .registry
            .get_schema_by_id(schema_id)
            .await?
            .ok_or(SchemaError::SchemaIdNotFound(schema_id))?;
        let schema = Schema::parse_str(&registered.definition)
            .map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;

        let value = decode_datum(&schema, datum)?;
        Ok((schema_id, value))
    }

    async fn encode(&self, schema: &Schema, value: Value) -> Result<EncodedEvent> {
        let name = record_name(schema)?;
        let schema_id = self.schema_id_for(&name, schema).await?;

        // Resolution validates and reorders the value against the schema
        // before it hits the wire.
        let resolved = value
            .resolve(schema)
            .map_err(|e| SchemaError::Encoding(format!("record '{}': {}", name, e)))?;
        let datum = encode_datum(schema, resolved)?;

        Ok(EncodedEvent {
            schema_id,
            content_type: content_type_for(schema_id),
            payload: frame_datum(schema_id, &datum),
        })
    }

    async fn schema_id_for(&self, name: &str, schema: &Schema) -> Result<i32> {
        let definition = schema.canonical_form();

        if let Some(id) = self.id_cache.read().await.get(&definition) {
            return Ok(*id);
        }

        let schema_id = match self
            .registry
            .resolve_schema(&self.group, name, &definition)
            .await?
        {
            Some(registered) => registered.id,
            None if self.auto_register => {
                let id = self
                    .registry
                    .register_schema(&self.group, name, &definition, SchemaFormat::Avro)
                    .await?;
                debug!(schema_id = id, group = %self.group, name = %name, "Auto-registered schema");
                id
            }
            None => {
                return Err(SchemaError::SchemaNotFound {
                    group: self.group.clone(),
                    name: name.to_string(),
                });
            }
        };

        self.id_cache.write().await.insert(definition, schema_id);
        debug!(schema_id = schema_id, name = %name, "Cached schema id");
        Ok(schema_id)
    }
}

impl std::fmt::Debug for EventSerializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSerializer")
            .field("group", &self.group)
            .field("auto_register", &self.auto_register)
            .finish_non_exhaustive()
    }
}

/// Builder for [`EventSerializer`].
pub struct EventSerializerBuilder {
    registry: Option<Arc<dyn SchemaRegistry>>,
    group: Option<String>,
    auto_register: bool,
}

impl EventSerializerBuilder {
    pub fn new() -> Self {
        EventSerializerBuilder {
            registry: None,
            group: None,
            auto_register: false,
        }
    }

    /// Registry schemas are resolved against. Required.
    pub fn registry(mut self, registry: Arc<dyn SchemaRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Group schemas are resolved under. Required.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Register schemas the registry does not know instead of failing
    /// resolution. Disabled by default.
    pub fn auto_register(mut self, enabled: bool) -> Self {
        self.auto_register = enabled;
        self
    }

    pub fn build(self) -> Result<EventSerializer> {
        let registry = self
            .registry
            .ok_or_else(|| SchemaError::Config("registry is required".to_string()))?;
        let group = self
            .group
            .ok_or_else(|| SchemaError::Config("group is required".to_string()))?;

        Ok(EventSerializer {
            registry,
            group,
            auto_register: self.auto_register,
            id_cache: RwLock::new(HashMap::new()),
        })
    }
}

impl Default for EventSerializerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
