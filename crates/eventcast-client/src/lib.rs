//! Batched event publishing for EventCast streams.
//!
//! The publisher hands out size-budgeted batches, and sending consumes
//! the batch:
//!
//! ```ignore
//! let publisher = EventPublisher::builder()
//!     .connection_string(&settings.connection_string)
//!     .stream(&settings.stream_name)
//!     .build()?;
//!
//! let mut batch = publisher.create_batch();
//! batch.try_add(event);
//! let receipt = publisher.send(batch).await?;
//! ```
//!
//! Transports implement [`EventSink`]: [`RestEventSink`] posts batches
//! over HTTP, [`MemoryEventSink`] records them for tests and local
//! development.

pub mod batch;
pub mod connection;
pub mod error;
pub mod publisher;
pub mod rest;
pub mod sink;

pub use batch::{EventBatch, DEFAULT_MAX_BATCH_BYTES};
pub use connection::ConnectionInfo;
pub use error::{ClientError, Result};
pub use publisher::{EventPublisher, EventPublisherBuilder, SendReceipt};
pub use rest::RestEventSink;
pub use sink::{EventSink, MemoryEventSink, SentBatch};
