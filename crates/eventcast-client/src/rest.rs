//! HTTP sink for a remote event stream service.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use eventcast_schema::{AmbientCredential, EncodedEvent};
use serde::Serialize;
use tracing::debug;

use crate::connection::ConnectionInfo;
use crate::error::{ClientError, Result};
use crate::sink::EventSink;

#[derive(Debug, Serialize)]
struct PublishMessage {
    /// Base64 of the framed Avro payload.
    payload: String,
    #[serde(rename = "contentType")]
    content_type: String,
}

#[derive(Debug, Serialize)]
struct PublishRequest {
    messages: Vec<PublishMessage>,
}

/// Sink that posts batches to `POST {endpoint}/streams/{stream}/messages`.
pub struct RestEventSink {
    endpoint: String,
    credential: AmbientCredential,
    http_client: reqwest::Client,
}

impl RestEventSink {
    /// Create a sink for the service at `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        RestEventSink {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            credential: AmbientCredential::default(),
            http_client,
        }
    }

    /// Attach a credential to every request.
    pub fn with_credential(mut self, credential: AmbientCredential) -> Self {
        self.credential = credential;
        self
    }

    /// Build a sink from a parsed connection string.
    ///
    /// Ambient credentials from the environment win; with none set, the
    /// connection string's shared access key pair is used as basic
    /// authentication.
    pub fn from_connection(info: &ConnectionInfo) -> Self {
        let credential = Self::credential_for(info, AmbientCredential::from_env());
        Self::new(info.endpoint.clone()).with_credential(credential)
    }

    fn credential_for(info: &ConnectionInfo, ambient: AmbientCredential) -> AmbientCredential {
        if ambient != AmbientCredential::Anonymous {
            return ambient;
        }

        match (&info.key_name, &info.key) {
            (Some(key_name), Some(key)) => AmbientCredential::Basic {
                username: key_name.clone(),
                password: key.clone(),
            },
            _ => AmbientCredential::Anonymous,
        }
    }
}

#[async_trait]
impl EventSink for RestEventSink {
    async fn send_batch(&self, stream: &str, events: &[EncodedEvent]) -> Result<()> {
        let url = format!("{}/streams/{}/messages", self.endpoint, stream);
        let body = PublishRequest {
            messages: events
                .iter()
                .map(|event| PublishMessage {
                    payload: STANDARD.encode(&event.payload),
                    content_type: event.content_type.clone(),
                })
                .collect(),
        };

        let request = self.credential.apply(self.http_client.post(&url).json(&body));
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::TransmissionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::ServiceRejected { status, body });
        }

        debug!(stream = %stream, events = events.len(), "Batch posted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_publish_request_wire_format() {
        let event = EncodedEvent {
            schema_id: 1,
            content_type: "avro/binary+1".to_string(),
            payload: Bytes::from_static(b"\x00\x00\x00\x00\x01hi"),
        };

        let body = PublishRequest {
            messages: vec![PublishMessage {
                payload: STANDARD.encode(&event.payload),
                content_type: event.content_type.clone(),
            }],
        };

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"contentType\":\"avro/binary+1\""));
        assert!(json.contains(&STANDARD.encode(b"\x00\x00\x00\x00\x01hi")));
    }

    #[test]
    fn test_ambient_credential_wins_over_shared_key() {
        let info = ConnectionInfo::parse(
            "Endpoint=https://s.example.com;SharedAccessKeyName=send;SharedAccessKey=abc",
        )
        .unwrap();

        let ambient = AmbientCredential::Bearer {
            token: "tok".to_string(),
        };
        let credential = RestEventSink::credential_for(&info, ambient.clone());
        assert_eq!(credential, ambient);
    }

    #[test]
    fn test_shared_key_used_when_no_ambient_credential() {
        let info = ConnectionInfo::parse(
            "Endpoint=https://s.example.com;SharedAccessKeyName=send;SharedAccessKey=abc",
        )
        .unwrap();

        let credential = RestEventSink::credential_for(&info, AmbientCredential::Anonymous);
        assert_eq!(
            credential,
            AmbientCredential::Basic {
                username: "send".to_string(),
                password: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_anonymous_when_connection_has_no_key() {
        let info = ConnectionInfo::parse("Endpoint=https://s.example.com").unwrap();

        let credential = RestEventSink::credential_for(&info, AmbientCredential::Anonymous);
        assert_eq!(credential, AmbientCredential::Anonymous);
    }
}
