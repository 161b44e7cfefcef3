//! Custom Errors and Types
//!
//! Sync outcomes (authentication, stage and event statuses) are plain values.
//! The errors here only cover the plumbing around them: the command queue,
//! orchestrator assembly, configuration and timestamp persistence.

use std::io;

use thiserror::Error;

use crate::domain::synchronization::value_objects::category::SyncCategory;

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("the orchestrator request queue is closed")]
    QueueClosed,
    #[error("the orchestrator stopped before replying")]
    WorkerDropped,
    #[error("no download stage registered for {0}")]
    MissingStage(SyncCategory),
    #[error("unknown sync category '{0}'")]
    UnknownCategory(String),
    #[error("failed to load orchestrator config: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum TimestampStoreError {
    #[error("timestamp store io failed: {0}")]
    Io(#[from] io::Error),
    #[error("timestamp store contents could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("timestamp store lock was poisoned")]
    Poisoned,
}
