//! Data Sync Orchestrator (Actor Model)
//!
//! Primary Components:
//! 1. SyncOrchestrator: consumes the request queue, authenticates and runs stage plans
//! 2. SyncHandle: submits requests, hands out event subscriptions
//! 3. ProgressPublisher: fans events out to subscribers
//! 4. SyncTimeTracker: last successful sync time for forms and cohorts

pub mod orchestrator;
pub mod orchestrator_proxy;
pub mod sync_time_tracker;

use std::sync::Arc;

use log::info;

use crate::domain::synchronization::{
    authenticator::Authenticator, download_stage::DownloadStages, notifier::SyncNotifier,
    value_objects::sync_config::OrchestratorConfig,
};

use self::{
    orchestrator::orchestrator::SyncOrchestrator, orchestrator_proxy::SyncHandle,
    sync_time_tracker::SyncTimeTracker,
};

/// Create and run a sync orchestrator on the current tokio runtime
pub fn init_orchestrator(
    config: OrchestratorConfig,
    authenticator: Arc<dyn Authenticator>,
    stages: DownloadStages,
    tracker: SyncTimeTracker,
    notifier: Arc<dyn SyncNotifier>,
) -> SyncHandle {
    let (orchestrator, handle) =
        SyncOrchestrator::new(config, authenticator, stages, tracker, notifier);

    info!("Start running sync orchestrator...");
    tokio::spawn(async move {
        orchestrator.run().await;
    });

    handle
}
