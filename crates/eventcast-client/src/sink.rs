//! Event stream transport and the in-memory implementation.

use async_trait::async_trait;
use eventcast_schema::EncodedEvent;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::Result;

/// Transport that delivers encoded event batches to a named stream.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver a batch to a stream.
    ///
    /// Delivery is all-or-nothing: an error means no event in the batch
    /// was accepted.
    async fn send_batch(&self, stream: &str, events: &[EncodedEvent]) -> Result<()>;
}

/// A batch as recorded by [`MemoryEventSink`].
#[derive(Debug, Clone)]
pub struct SentBatch {
    pub stream: String,
    pub events: Vec<EncodedEvent>,
}

/// Sink that records batches instead of sending them, for tests and
/// local development.
#[derive(Default)]
pub struct MemoryEventSink {
    batches: RwLock<Vec<SentBatch>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All batches accepted so far.
    pub async fn sent_batches(&self) -> Vec<SentBatch> {
        self.batches.read().await.clone()
    }

    /// Number of events across all accepted batches.
    pub async fn total_events(&self) -> usize {
        self.batches.read().await.iter().map(|b| b.events.len()).sum()
    }
}

#[async_trait]
impl EventSink for MemoryEventSink {
    async fn send_batch(&self, stream: &str, events: &[EncodedEvent]) -> Result<()> {
        self.batches.write().await.push(SentBatch {
            stream: stream.to_string(),
            events: events.to_vec(),
        });

        info!(stream = %stream, events = events.len(), "Batch accepted");
        Ok(())
    }
}
