//! Error types for the Horizon Skin core.

use thiserror::Error;

/// Errors raised by core primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The worker has been shut down and no longer accepts jobs.
    #[error("worker '{0}' has been shut down")]
    WorkerStopped(String),
    /// The operating system refused to spawn a worker thread.
    #[error("failed to spawn worker thread '{name}': {source}")]
    WorkerSpawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// The event queue an event was posted to no longer exists.
    #[error("event queue closed")]
    QueueClosed,
}

/// A specialized Result type for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
