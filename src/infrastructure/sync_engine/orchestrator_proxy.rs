use chrono::{DateTime, Utc};
use log::info;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use uuid::Uuid;

use crate::{
    common::errors::{OrchestratorError, Result},
    domain::synchronization::value_objects::{
        category::SyncCategory,
        sync_event::{SyncEvent, SyncReport},
        sync_request::SyncRequest,
    },
    infrastructure::mq::progress_publisher::ProgressPublisher,
};

use super::{
    orchestrator::commands::{OrchestratorState, SyncCommand},
    sync_time_tracker::SyncTimeTracker,
};

/// Public handle to a running orchestrator: submit requests, subscribe to
/// their events and read last-synced times. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    cmd_tx: mpsc::Sender<SyncCommand>,
    publisher: ProgressPublisher,
    state_rx: watch::Receiver<OrchestratorState>,
    tracker: SyncTimeTracker,
}

impl SyncHandle {
    pub(crate) fn new(
        cmd_tx: mpsc::Sender<SyncCommand>,
        publisher: ProgressPublisher,
        state_rx: watch::Receiver<OrchestratorState>,
        tracker: SyncTimeTracker,
    ) -> Self {
        Self {
            cmd_tx,
            publisher,
            state_rx,
            tracker,
        }
    }

    /// Queues a request behind any in flight and returns its id. Waits only
    /// while the queue is full.
    pub async fn submit(&self, request: SyncRequest) -> Result<Uuid> {
        let request_id = *request.id();
        self.cmd_tx
            .send(SyncCommand::Sync {
                request,
                reply_tx: None,
            })
            .await
            .map_err(|_| OrchestratorError::QueueClosed)?;
        info!("Queued sync request {}", request_id);
        Ok(request_id)
    }

    /// Queues a request and waits until all of its events are published.
    pub async fn sync(&self, request: SyncRequest) -> Result<SyncReport> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(SyncCommand::Sync {
                request,
                reply_tx: Some(reply_tx),
            })
            .await
            .map_err(|_| OrchestratorError::QueueClosed)?;
        reply_rx.await.map_err(|_| OrchestratorError::WorkerDropped)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.publisher.subscribe()
    }

    pub fn state(&self) -> OrchestratorState {
        *self.state_rx.borrow()
    }

    pub fn last_synced(&self, category: SyncCategory) -> Option<DateTime<Utc>> {
        self.tracker.last_synced(category)
    }

    /// Stops the orchestrator once the requests queued ahead of the shutdown
    /// are done.
    pub async fn shutdown(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(SyncCommand::Shutdown { reply_tx })
            .await
            .map_err(|_| OrchestratorError::QueueClosed)?;
        reply_rx.await.map_err(|_| OrchestratorError::WorkerDropped)
    }

    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }
}
