//! Size-budgeted event batches.

use eventcast_schema::EncodedEvent;
use tracing::trace;

/// Default batch size budget, 1 MiB.
pub const DEFAULT_MAX_BATCH_BYTES: usize = 1024 * 1024;

/// Accounted per event on top of its payload, covering framing and
/// transport metadata.
const EVENT_OVERHEAD_BYTES: usize = 16;

/// A batch of encoded events bounded by a byte budget.
///
/// Batches are created by [`EventPublisher::create_batch`] and consumed
/// by [`EventPublisher::send`], so a batch can never be sent twice.
///
/// [`EventPublisher::create_batch`]: crate::EventPublisher::create_batch
/// [`EventPublisher::send`]: crate::EventPublisher::send
#[derive(Debug)]
pub struct EventBatch {
    events: Vec<EncodedEvent>,
    size_bytes: usize,
    max_bytes: usize,
}

impl EventBatch {
    pub(crate) fn new(max_bytes: usize) -> Self {
        EventBatch {
            events: Vec::new(),
            size_bytes: 0,
            max_bytes,
        }
    }

    /// Try to add an event to the batch.
    ///
    /// Returns false when the event would push the batch past its byte
    /// budget; the batch is left unchanged.
    pub fn try_add(&mut self, event: EncodedEvent) -> bool {
        let event_bytes = event_size(&event);

        if self.size_bytes + event_bytes > self.max_bytes {
            trace!(
                batch_bytes = self.size_bytes,
                event_bytes = event_bytes,
                max_bytes = self.max_bytes,
                "Event does not fit batch budget"
            );
            return false;
        }

        self.size_bytes += event_bytes;
        self.events.push(event);
        true
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Accounted size: payload bytes plus per-event overhead.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub(crate) fn into_events(self) -> Vec<EncodedEvent> {
        self.events
    }
}

fn event_size(event: &EncodedEvent) -> usize {
    event.payload.len() + EVENT_OVERHEAD_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn event_with_payload(len: usize) -> EncodedEvent {
        EncodedEvent {
            schema_id: 1,
            content_type: "avro/binary+1".to_string(),
            payload: Bytes::from(vec![0u8; len]),
        }
    }

    #[test]
    fn test_try_add_within_budget() {
        let mut batch = EventBatch::new(100);

        assert!(batch.try_add(event_with_payload(20)));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.size_bytes(), 20 + EVENT_OVERHEAD_BYTES);
    }

    #[test]
    fn test_try_add_rejects_event_over_budget() {
        let mut batch = EventBatch::new(50);

        assert!(batch.try_add(event_with_payload(20)));
        assert!(!batch.try_add(event_with_payload(20)));

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.size_bytes(), 20 + EVENT_OVERHEAD_BYTES);
    }

    #[test]
    fn test_try_add_allows_exact_fit() {
        let mut batch = EventBatch::new(36);
        assert!(batch.try_add(event_with_payload(20)));
        assert_eq!(batch.size_bytes(), batch.max_bytes());
    }

    #[test]
    fn test_oversized_event_rejected_even_when_empty() {
        let mut batch = EventBatch::new(10);

        assert!(!batch.try_add(event_with_payload(20)));
        assert!(batch.is_empty());
        assert_eq!(batch.size_bytes(), 0);
    }

    #[test]
    fn test_into_events_preserves_insertion_order() {
        let mut batch = EventBatch::new(1024);
        for schema_id in 1..=3 {
            batch.try_add(EncodedEvent {
                schema_id,
                content_type: format!("avro/binary+{}", schema_id),
                payload: Bytes::from_static(&[0x00]),
            });
        }

        let ids: Vec<i32> = batch.into_events().iter().map(|e| e.schema_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
