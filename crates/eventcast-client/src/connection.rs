//! Connection string parsing.

use crate::error::{ClientError, Result};

/// Parsed form of an event stream connection string.
///
/// Connection strings are semicolon-separated key/value pairs:
///
/// ```text
/// Endpoint=https://streams.example.com;SharedAccessKeyName=send;SharedAccessKey=abc=;EntityPath=orders
/// ```
///
/// Only `Endpoint` is required. Keys match case-insensitively and
/// unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Base URL of the event stream service, without a trailing slash.
    pub endpoint: String,
    pub key_name: Option<String>,
    pub key: Option<String>,
    /// Default stream for publishers built from this connection.
    pub entity_path: Option<String>,
}

impl ConnectionInfo {
    pub fn parse(connection_string: &str) -> Result<Self> {
        let mut endpoint = None;
        let mut key_name = None;
        let mut key = None;
        let mut entity_path = None;

        for segment in connection_string.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            // Split at the first '=' only; shared access keys are base64
            // and may end in padding.
            let (k, v) = segment.split_once('=').ok_or_else(|| {
                ClientError::InvalidConnectionString(format!(
                    "expected key=value, got '{}'",
                    segment
                ))
            })?;

            match k.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(v.trim().trim_end_matches('/').to_string()),
                "sharedaccesskeyname" => key_name = Some(v.trim().to_string()),
                "sharedaccesskey" => key = Some(v.trim().to_string()),
                "entitypath" => entity_path = Some(v.trim().to_string()),
                _ => tracing::trace!(key = %k, "Ignoring unknown connection string key"),
            }
        }

        let endpoint = endpoint.ok_or_else(|| {
            ClientError::InvalidConnectionString("missing 'Endpoint' key".to_string())
        })?;

        Ok(ConnectionInfo {
            endpoint,
            key_name,
            key,
            entity_path,
        })
    }
}
