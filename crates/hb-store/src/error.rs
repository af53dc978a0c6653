/// Errors from hash store operations.
///
/// A missing entry is not an error: lookups return `Option`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// `start()` was called on a store that is already running.
    #[error("hash store is already initialized")]
    AlreadyInitialized,

    /// The store is not running (never started, or already shut down).
    #[error("hash store is not initialized")]
    NotInitialized,

    /// The pending-job queue is at capacity.
    #[error("hash queue is full ({capacity} pending jobs)")]
    QueueFull { capacity: usize },

    /// The configuration cannot be used to build a store.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),

    /// `start()` was called outside of a tokio runtime.
    #[error("hash store must be started from within a tokio runtime")]
    NoRuntime,

    /// The writer task has exited.
    #[error("store writer is closed")]
    WriterClosed,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
