//! Worker error types

use std::io;
use thiserror::Error;

use super::unit::WorkerId;

/// Errors from worker lifecycle operations
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid worker configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to spawn thread for worker {id}: {source}")]
    Spawn {
        id: WorkerId,
        #[source]
        source: io::Error,
    },

    #[error("Worker {0} was already launched")]
    AlreadyLaunched(WorkerId),

    #[error("Worker {0} was never launched")]
    NotLaunched(WorkerId),

    #[error("Worker {id} joined before finishing ({progress}/{target})")]
    Unfinished { id: WorkerId, progress: u32, target: u32 },

    #[error("Worker {0} was already joined")]
    AlreadyJoined(WorkerId),

    #[error("Worker {0} thread panicked")]
    Panicked(WorkerId),
}

impl WorkerError {
    /// Errors that mean the process ran out of a system resource
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, WorkerError::Spawn { .. })
    }
}
