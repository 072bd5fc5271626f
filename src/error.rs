use std::io;
use thiserror::Error;

use crate::pool::MAX_THREADS;

/// Error type for batchpool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// Requested worker count is outside the supported range.
    #[error("invalid thread count {0}: must be between 1 and {MAX_THREADS}")]
    InvalidThreadCount(u32),

    /// `execute` was called with an empty batch of work items.
    #[error("batch must contain at least one work item")]
    EmptyBatch,

    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Result type alias for batchpool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
