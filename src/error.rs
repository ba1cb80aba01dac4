//! Error taxonomy for queue, pool, and shard operations.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by queue, pool, and shard operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller supplied a priority outside `0..levels`.
    #[error("invalid priority {priority} (queue has {levels} levels)")]
    InvalidPriority {
        /// Priority that was requested.
        priority: usize,
        /// Number of levels the queue was built with.
        levels: usize,
    },

    /// The caller supplied a shard index outside `0..shards`.
    #[error("invalid shard index {shard} (pool has {shards} shards)")]
    InvalidShard {
        /// Shard index that was requested.
        shard: usize,
        /// Number of shards in the pool.
        shards: usize,
    },

    /// The queue has been closed; no new tasks are accepted.
    #[error("queue is closed")]
    QueueClosed,

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// A worker thread could not be spawned.
    #[error("executor error: {0}")]
    Executor(String),

    /// I/O failure, e.g. while exporting metrics.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub(crate) fn executor<S: Into<String>>(msg: S) -> Self {
        Error::Executor(msg.into())
    }

    #[cfg(feature = "telemetry")]
    pub(crate) fn telemetry<S: Into<String>>(msg: S) -> Self {
        Error::Other(format!("telemetry: {}", msg.into()))
    }
}
