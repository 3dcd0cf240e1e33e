//! HTTP client for a remote schema registry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::auth::AmbientCredential;
use crate::error::{Result, SchemaError};
use crate::registry::SchemaRegistry;
use crate::serde::canonical_definition;
use crate::types::{RegisterSchemaRequest, RegisterSchemaResponse, RegisteredSchema, SchemaFormat};

/// Client for the registry's REST endpoints.
///
/// `POST /groups/{group}/schemas/{name}/versions` registers a version,
/// `GET /groups/{group}/schemas/{name}` returns the latest version and
/// `GET /schemas/{id}` looks a schema up by id.
pub struct RestSchemaRegistry {
    base_url: String,
    credential: AmbientCredential,
    http_client: reqwest::Client,
}

impl RestSchemaRegistry {
    /// Create a client for the registry at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        RestSchemaRegistry {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential: AmbientCredential::default(),
            http_client,
        }
    }

    /// Attach a credential to every request.
    pub fn with_credential(mut self, credential: AmbientCredential) -> Self {
        self.credential = credential;
        self
    }

    async fn fetch_schema(&self, url: String, context: &str) -> Result<Option<RegisteredSchema>> {
        let request = self.credential.apply(self.http_client.get(&url));
        let response = request
            .send()
            .await
            .map_err(|e| SchemaError::Registry(format!("Failed to fetch {}: {}", context, e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SchemaError::Registry(format!(
                "Registry returned {} for {}: {}",
                status, context, body
            )));
        }

        let schema: RegisteredSchema = response.json().await.map_err(|e| {
            SchemaError::Registry(format!("Invalid registry response for {}: {}", context, e))
        })?;
        Ok(Some(schema))
    }
}

#[async_trait]
impl SchemaRegistry for RestSchemaRegistry {
    async fn register_schema(
        &self,
        group: &str,
        name: &str,
        definition: &str,
        format: SchemaFormat,
    ) -> Result<i32> {
        let url = format!(
            "{}/groups/{}/schemas/{}/versions",
            self.base_url, group, name
        );
        let body = RegisterSchemaRequest {
            definition: definition.to_string(),
            format,
        };

        let request = self.credential.apply(self.http_client.post(&url).json(&body));
        let response = request
            .send()
            .await
            .map_err(|e| SchemaError::Registry(format!("Failed to register schema: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SchemaError::Registry(format!(
                "Registry rejected schema '{}' in group '{}' with {}: {}",
                name, group, status, text
            )));
        }

        let parsed: RegisterSchemaResponse = response
            .json()
            .await
            .map_err(|e| SchemaError::Registry(format!("Invalid registration response: {}", e)))?;

        tracing::debug!(
            schema_id = parsed.id,
            group = %group,
            name = %name,
            "Schema registered"
        );
        Ok(parsed.id)
    }

    async fn resolve_schema(
        &self,
        group: &str,
        name: &str,
        definition: &str,
    ) -> Result<Option<RegisteredSchema>> {
        let canonical = canonical_definition(definition)?;

        // The registry exposes no lookup-by-definition endpoint, so the
        // latest version is fetched and compared locally.
        match self.get_schema(group, name).await? {
            Some(registered) if canonical_definition(&registered.definition)? == canonical => {
                Ok(Some(registered))
            }
            _ => Ok(None),
        }
    }

    async fn get_schema(&self, group: &str, name: &str) -> Result<Option<RegisteredSchema>> {
        let url = format!("{}/groups/{}/schemas/{}", self.base_url, group, name);
        self.fetch_schema(url, &format!("schema '{}' in group '{}'", name, group))
            .await
    }

    async fn get_schema_by_id(&self, id: i32) -> Result<Option<RegisteredSchema>> {
        let url = format!("{}/schemas/{}", self.base_url, id);
        self.fetch_schema(url, &format!("schema id {}", id)).await
    }
}
