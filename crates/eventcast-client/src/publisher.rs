//! Event publisher and its builder.

use std::sync::Arc;

use tracing::{debug, info};

use crate::batch::{EventBatch, DEFAULT_MAX_BATCH_BYTES};
use crate::connection::ConnectionInfo;
use crate::error::{ClientError, Result};
use crate::rest::RestEventSink;
use crate::sink::EventSink;

/// Delivery receipt for a sent batch.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub stream: String,
    /// Events delivered.
    pub events: usize,
    /// Accounted bytes delivered.
    pub bytes: usize,
}

/// Publisher for one event stream.
///
/// The publisher hands out size-budgeted batches and sends them whole.
/// Sending consumes the batch, so a batch is sent at most once. Failed
/// sends are reported, never retried.
///
/// # Examples
///
/// ```ignore
/// let publisher = EventPublisher::builder()
///     .connection_string("Endpoint=https://streams.example.com;EntityPath=orders")
///     .build()?;
///
/// let mut batch = publisher.create_batch();
/// if batch.try_add(event) {
///     let receipt = publisher.send(batch).await?;
/// }
/// ```
pub struct EventPublisher {
    sink: Arc<dyn EventSink>,
    stream: String,
    max_batch_bytes: usize,
}

impl EventPublisher {
    pub fn builder() -> EventPublisherBuilder {
        EventPublisherBuilder::new()
    }

    /// Stream this publisher sends to.
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Create an empty batch bounded by the configured byte budget.
    pub fn create_batch(&self) -> EventBatch {
        EventBatch::new(self.max_batch_bytes)
    }

    /// Send a batch to the stream.
    ///
    /// Empty batches are skipped without touching the transport.
    pub async fn send(&self, batch: EventBatch) -> Result<SendReceipt> {
        if batch.is_empty() {
            debug!(stream = %self.stream, "Skipping empty batch");
            return Ok(SendReceipt {
                stream: self.stream.clone(),
                events: 0,
                bytes: 0,
            });
        }

        let events = batch.len();
        let bytes = batch.size_bytes();
        self.sink
            .send_batch(&self.stream, &batch.into_events())
            .await?;

        info!(
            stream = %self.stream,
            events = events,
            bytes = bytes,
            "Batch published"
        );
        Ok(SendReceipt {
            stream: self.stream.clone(),
            events,
            bytes,
        })
    }
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("stream", &self.stream)
            .field("max_batch_bytes", &self.max_batch_bytes)
            .finish_non_exhaustive()
    }
}

/// Builder for [`EventPublisher`].
pub struct EventPublisherBuilder {
    sink: Option<Arc<dyn EventSink>>,
    connection_string: Option<String>,
    stream: Option<String>,
    max_batch_bytes: usize,
}

impl EventPublisherBuilder {
    pub fn new() -> Self {
        EventPublisherBuilder {
            sink: None,
            connection_string: None,
            stream: None,
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
        }
    }

    /// Use an explicit sink. Takes precedence over `connection_string`.
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build a REST sink from a connection string.
    pub fn connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    /// Stream to publish to. Falls back to the connection string's
    /// `EntityPath`.
    pub fn stream(mut self, stream: impl Into<String>) -> Self {
        self.stream = Some(stream.into());
        self
    }

    /// Byte budget for batches created by the publisher.
    pub fn max_batch_bytes(mut self, max_batch_bytes: usize) -> Self {
        self.max_batch_bytes = max_batch_bytes;
        self
    }

    pub fn build(self) -> Result<EventPublisher> {
        let mut entity_path = None;

        let sink: Arc<dyn EventSink> = match (self.sink, self.connection_string) {
            (Some(sink), _) => sink,
            (None, Some(connection_string)) => {
                let info = ConnectionInfo::parse(&connection_string)?;
                entity_path = info.entity_path.clone();
                Arc::new(RestEventSink::from_connection(&info))
            }
            (None, None) => {
                return Err(ClientError::ConfigError(
                    "either a sink or a connection string is required".to_string(),
                ));
            }
        };

        let stream = self
            .stream
            .or(entity_path)
            .ok_or_else(|| ClientError::ConfigError("stream is required".to_string()))?;

        if self.max_batch_bytes == 0 {
            return Err(ClientError::ConfigError(
                "max_batch_bytes must be positive".to_string(),
            ));
        }

        Ok(EventPublisher {
            sink,
            stream,
            max_batch_bytes: self.max_batch_bytes,
        })
    }
}

impl Default for EventPublisherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemoryEventSink;

    #[test]
    fn test_build_requires_sink_or_connection_string() {
        let err = EventPublisher::builder().stream("orders").build().unwrap_err();
        assert!(matches!(err, ClientError::ConfigError(_)));
    }

    #[test]
    fn test_build_requires_stream() {
        let sink: Arc<dyn EventSink> = Arc::new(MemoryEventSink::new());
        let err = EventPublisher::builder().sink(sink).build().unwrap_err();
        assert!(err.to_string().contains("stream is required"));
    }

    #[test]
    fn test_build_rejects_zero_budget() {
        let sink: Arc<dyn EventSink> = Arc::new(MemoryEventSink::new());
        let err = EventPublisher::builder()
            .sink(sink)
            .stream("orders")
            .max_batch_bytes(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("max_batch_bytes"));
    }

    #[test]
    fn test_stream_falls_back_to_entity_path() {
        let publisher = EventPublisher::builder()
            .connection_string("Endpoint=https://s.example.com;EntityPath=orders")
            .build()
            .unwrap();

        assert_eq!(publisher.stream(), "orders");
    }

    #[test]
    fn test_explicit_stream_overrides_entity_path() {
        let publisher = EventPublisher::builder()
            .connection_string("Endpoint=https://s.example.com;EntityPath=orders")
            .stream("returns")
            .build()
            .unwrap();

        assert_eq!(publisher.stream(), "returns");
    }

    #[test]
    fn test_create_batch_uses_configured_budget() {
        let sink: Arc<dyn EventSink> = Arc::new(MemoryEventSink::new());
        let publisher = EventPublisher::builder()
            .sink(sink)
            .stream("orders")
            .max_batch_bytes(256)
            .build()
            .unwrap();

        assert_eq!(publisher.create_batch().max_bytes(), 256);
    }
}
