//! Schema registry abstraction and the in-memory implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::serde::canonical_definition;
use crate::types::{RegisteredSchema, SchemaFormat};

/// Storage and lookup of schema versions.
///
/// Ids are unique across all groups, so an id alone is enough to fetch
/// a schema back. Definitions are compared in Parsing Canonical Form,
/// never textually.
#[async_trait]
pub trait SchemaRegistry: Send + Sync {
    /// Register a schema version under a group.
    ///
    /// Registering a definition already present under the same group and
    /// name returns the existing id instead of creating a new version.
    async fn register_schema(
        &self,
        group: &str,
        name: &str,
        definition: &str,
        format: SchemaFormat,
    ) -> Result<i32>;

    /// Find the registration matching an exact definition.
    async fn resolve_schema(
        &self,
        group: &str,
        name: &str,
        definition: &str,
    ) -> Result<Option<RegisteredSchema>>;

    /// Fetch the latest version registered under a group and name.
    async fn get_schema(&self, group: &str, name: &str) -> Result<Option<RegisteredSchema>>;

    /// Fetch a schema by its registry id.
    async fn get_schema_by_id(&self, id: i32) -> Result<Option<RegisteredSchema>>;
}

/// In-memory registry used by tests and local development.
pub struct MemorySchemaRegistry {
    schemas: RwLock<HashMap<i32, RegisteredSchema>>,
    next_id: AtomicI32,
}

impl MemorySchemaRegistry {
    pub fn new() -> Self {
        MemorySchemaRegistry {
            schemas: RwLock::new(HashMap::new()),
            next_id: AtomicI32::new(1),
        }
    }

    async fn versions_of(&self, group: &str, name: &str) -> Vec<RegisteredSchema> {
        let schemas = self.schemas.read().await;
        let mut versions: Vec<RegisteredSchema> = schemas
            .values()
            .filter(|s| s.group == group && s.name == name)
            .cloned()
            .collect();
        versions.sort_by_key(|s| s.version);
        versions
    }
}

impl Default for MemorySchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaRegistry for MemorySchemaRegistry {
    async fn register_schema(
        &self,
        group: &str,
        name: &str,
        definition: &str,
        format: SchemaFormat,
    ) -> Result<i32> {
        let canonical = canonical_definition(definition)?;

        // Scan and insert under one write lock so concurrent registrations
        // of the same definition cannot race to two ids.
        let mut schemas = self.schemas.write().await;

        let mut latest_version = 0;
        for existing in schemas.values().filter(|s| s.group == group && s.name == name) {
            if canonical_definition(&existing.definition)? == canonical {
                tracing::debug!(
                    id = existing.id,
                    group = %group,
                    name = %name,
                    "Schema already registered"
                );
                return Ok(existing.id);
            }
            latest_version = latest_version.max(existing.version);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let version = latest_version + 1;
        schemas.insert(
            id,
            RegisteredSchema {
                id,
                group: group.to_string(),
                name: name.to_string(),
                version,
                format,
                definition: definition.to_string(),
            },
        );

        tracing::info!(
            id = id,
            group = %group,
            name = %name,
            version = version,
            "Schema registered"
        );
        Ok(id)
    }

    async fn resolve_schema(
        &self,
        group: &str,
        name: &str,
        definition: &str,
    ) -> Result<Option<RegisteredSchema>> {
        let canonical = canonical_definition(definition)?;

        for existing in self.versions_of(group, name).await {
            if canonical_definition(&existing.definition)? == canonical {
                return Ok(Some(existing));
            }
        }
        Ok(None)
    }

    async fn get_schema(&self, group: &str, name: &str) -> Result<Option<RegisteredSchema>> {
        Ok(self.versions_of(group, name).await.pop())
    }

    async fn get_schema_by_id(&self, id: i32) -> Result<Option<RegisteredSchema>> {
        Ok(self.schemas.read().await.get(&id).cloned())
    }
}
