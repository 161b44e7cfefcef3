//! Orchestrator Related Commands
//!

use tokio::sync::oneshot;

use crate::domain::synchronization::value_objects::{
    category::SyncCategory, sync_event::SyncReport, sync_request::SyncRequest,
};

#[derive(Debug)]
pub enum SyncCommand {
    Sync {
        request: SyncRequest,
        /// Receives the report once every event of the request is published.
        reply_tx: Option<oneshot::Sender<SyncReport>>,
    },
    Shutdown {
        reply_tx: oneshot::Sender<()>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Authenticating,
    AuthFailed,
    StageRunning(SyncCategory),
    Done,
    Stopped,
}
