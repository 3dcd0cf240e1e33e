//! Error types for the EventCast client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when publishing events.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The connection string could not be parsed.
    ///
    /// ## Causes
    /// - A segment without a `=` separator
    /// - A missing `Endpoint` key
    ///
    /// ## Resolution
    /// Check the connection string against the expected shape:
    /// `Endpoint=https://...;SharedAccessKeyName=...;SharedAccessKey=...;EntityPath=...`
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    /// A publisher was built with incomplete options.
    ///
    /// ## Causes
    /// - Neither a sink nor a connection string was provided
    /// - No stream name was given and the connection string carries no
    ///   `EntityPath`
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The batch never reached the event stream service.
    ///
    /// ## Causes
    /// - Connection refused or reset
    /// - Request timeout
    /// - DNS resolution failure
    ///
    /// ## Resolution
    /// Usually transient. The publisher does not retry; callers own the
    /// retry policy.
    #[error("Transmission failed: {0}")]
    TransmissionFailed(String),

    /// The event stream service answered but rejected the batch.
    ///
    /// ## Causes
    /// - Authentication or authorization failure (401, 403)
    /// - Unknown stream (404)
    /// - Batch too large for the service (413)
    #[error("Event stream rejected the batch with status {status}: {body}")]
    ServiceRejected { status: u16, body: String },
}
